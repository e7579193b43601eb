//! Merkle Tree construction and audit path extraction

use crate::{
    error::Error,
    hash::{DigestProvider, MerkleHash},
    node::{Branch, Leaf, Node, Position},
    proof::{MerkleProof, ProofNode},
    running::RunningDigest,
};
use log::{debug, trace};
use std::{fmt, marker::PhantomData};

/// Merkle Tree data structure
pub struct MerkleTree<HF: DigestProvider> {
    _hasher: PhantomData<HF>,
    pub(crate) root: Node,
    pub(crate) num_leaves: usize,
}

impl<HF: DigestProvider> MerkleTree<HF> {
    /// Build a tree over an ordered sequence of elements.
    ///
    /// The shape depends only on the number of elements: a sequence of `n > 2`
    /// nodes is split at [`split_point`], the prefix becomes the left subtree
    /// and the trailing one or two nodes the right subtree. A single element
    /// becomes the root itself.
    pub fn build<I>(elements: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut leaves: Vec<Node> = elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| Node::Leaf(Leaf::new::<HF>(index, element.as_ref())))
            .collect();
        let num_leaves = leaves.len();

        let root = match num_leaves {
            0 => return Err(Error::EmptyInput),
            1 => leaves.pop().ok_or(Error::EmptyInput)?,
            _ => build_subtree::<HF>(leaves, Position::Left).ok_or(Error::EmptyInput)?,
        };
        debug!(
            "built merkle tree over {} leaves with root {}",
            num_leaves,
            root.hash()
        );

        Ok(Self {
            _hasher: PhantomData,
            root,
            num_leaves,
        })
    }

    /// Get the merkle root of the tree
    pub fn root(&self) -> &MerkleHash {
        self.root.hash()
    }

    pub fn root_node(&self) -> &Node {
        &self.root
    }

    /// Get the number of leaves in the tree
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    pub fn contains(&self, element: impl AsRef<[u8]>) -> bool {
        let element = element.as_ref();
        self.find_path(|leaf| leaf.element == element).is_some()
    }

    /// Produce the audit path for `element`.
    ///
    /// Leaves are matched by value, visiting right subtrees before left ones,
    /// so with duplicate elements the last occurrence in input order is the
    /// one proven. Use [`MerkleTree::prove_index`] to pick a specific one.
    pub fn prove_inclusion(&self, element: impl AsRef<[u8]>) -> Result<MerkleProof<HF>, Error> {
        let element = element.as_ref();
        match self.find_path(|leaf| leaf.element == element) {
            Some(path) => {
                trace!("audit path of {} siblings for {}", path.len(), hex::encode(element));
                Ok(MerkleProof::new(path, *self.root(), element))
            }
            None => {
                debug!("element {} is not in the tree", hex::encode(element));
                Err(Error::not_found(element))
            }
        }
    }

    /// Produce the audit path for the element at `index` in the input sequence
    pub fn prove_index(&self, index: usize) -> Result<MerkleProof<HF>, Error> {
        if index >= self.num_leaves {
            return Err(Error::ExceededMaxIndex(index, self.num_leaves));
        }
        let mut found = None;
        let path = self.find_path(|leaf| {
            if leaf.index == index {
                found = Some(leaf.element.clone());
                true
            } else {
                false
            }
        });
        match (path, found) {
            (Some(path), Some(element)) => Ok(MerkleProof::new(path, *self.root(), element)),
            _ => Err(Error::ExceededMaxIndex(index, self.num_leaves)),
        }
    }

    /// Start a running digest from this tree's root.
    ///
    /// Elements appended to it are folded into the digest only; the tree is
    /// untouched and cannot prove them.
    pub fn running_digest(&self) -> RunningDigest<HF> {
        RunningDigest::new(*self.root())
    }

    /// Depth first search for the first leaf accepted by `matches`, right
    /// subtrees first. Returns the siblings along the way, nearest first,
    /// each tagged with the slot it occupies under the shared parent.
    fn find_path<F>(&self, mut matches: F) -> Option<Vec<ProofNode>>
    where
        F: FnMut(&Leaf) -> bool,
    {
        struct Visit<'a> {
            node: &'a Node,
            depth: usize,
            sibling: Option<ProofNode>,
        }

        // trail[d - 1] holds the sibling of the node visited at depth d
        let mut trail: Vec<Option<ProofNode>> = Vec::new();
        let mut pending = vec![Visit {
            node: &self.root,
            depth: 0,
            sibling: None,
        }];

        while let Some(visit) = pending.pop() {
            trail.truncate(visit.depth.saturating_sub(1));
            if visit.depth > 0 {
                trail.push(visit.sibling);
            }
            match visit.node {
                Node::Leaf(leaf) => {
                    if matches(leaf) {
                        return Some(trail.iter().rev().flatten().copied().collect());
                    }
                }
                Node::Branch(branch) => {
                    // Pushed left first so the right child is searched first
                    for slot in [Position::Left, Position::Right] {
                        if let Some(child) = branch.child(slot) {
                            let other = slot.opposite();
                            pending.push(Visit {
                                node: child,
                                depth: visit.depth + 1,
                                sibling: branch
                                    .child(other)
                                    .map(|sibling| ProofNode::new(*sibling.hash(), other)),
                            });
                        }
                    }
                }
            }
        }
        None
    }
}

impl<HF: DigestProvider> fmt::Debug for MerkleTree<HF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("root", self.root())
            .field("num_leaves", &self.num_leaves)
            .finish()
    }
}

// The split rule yields a tree about n / 2 levels deep, too deep for the
// recursive drop glue of boxed nodes on large inputs.
impl<HF: DigestProvider> Drop for MerkleTree<HF> {
    fn drop(&mut self) {
        let root = std::mem::replace(
            &mut self.root,
            Node::Leaf(Leaf {
                hash: MerkleHash::default(),
                element: Vec::new(),
                position: Position::Left,
                index: 0,
            }),
        );
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            if let Node::Branch(branch) = node {
                pending.push(*branch.left);
                if let Some(right) = branch.right {
                    pending.push(*right);
                }
            }
        }
    }
}

/// Where a group of `n` nodes is split: the last two nodes form the right
/// group when `n` is even, the last one when `n` is odd.
pub fn split_point(n: usize) -> usize {
    if n % 2 == 0 {
        n.saturating_sub(2)
    } else {
        n - 1
    }
}

/// Build the subtree over `nodes` placed at `position`, or `None` when there
/// are no nodes.
///
/// Equivalent to recursing on the prefix of every split, unrolled: the
/// trailing groups are peeled off first and then joined back onto the
/// innermost prefix from the inside out.
fn build_subtree<HF: DigestProvider>(mut nodes: Vec<Node>, position: Position) -> Option<Node> {
    let mut trailing = Vec::new();
    while nodes.len() > 2 {
        let at = split_point(nodes.len());
        trailing.push(nodes.split_off(at));
    }

    let innermost = if trailing.is_empty() {
        position
    } else {
        Position::Left
    };
    let mut subtree = build_group::<HF>(nodes, innermost)?;
    while let Some(group) = trailing.pop() {
        let right = build_group::<HF>(group, Position::Right)?;
        let position = if trailing.is_empty() {
            position
        } else {
            Position::Left
        };
        subtree = Node::Branch(Branch::join::<HF>(subtree, right, position));
    }
    Some(subtree)
}

/// Build a branch over a group of one or two nodes
fn build_group<HF: DigestProvider>(nodes: Vec<Node>, position: Position) -> Option<Node> {
    let mut nodes = nodes.into_iter();
    let left = nodes.next()?;
    let branch = match nodes.next() {
        Some(right) => Branch::join::<HF>(left, right, position),
        None => Branch::singleton(left, position),
    };
    Some(Node::Branch(branch))
}
