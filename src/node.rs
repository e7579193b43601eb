//! Tree nodes

use crate::hash::{DigestProvider, MerkleHash};
use std::fmt;

/// Which child slot a node occupies under its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    Left,
    Right,
}

impl Position {
    /// Position tag given to the leaf built from the element at `index`.
    ///
    /// Even indices are tagged `Right` and odd indices `Left`.
    pub fn from_index(index: usize) -> Self {
        if index & 1 == 0 {
            Position::Right
        } else {
            Position::Left
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Position::Left => Position::Right,
            Position::Right => Position::Left,
        }
    }
}

/// A node of a built tree
#[derive(Debug)]
pub enum Node {
    Leaf(Leaf),
    Branch(Branch),
}

impl Node {
    pub fn hash(&self) -> &MerkleHash {
        match self {
            Node::Leaf(leaf) => &leaf.hash,
            Node::Branch(branch) => &branch.hash,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Node::Leaf(leaf) => leaf.position,
            Node::Branch(branch) => branch.position,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Node::Leaf(_) => None,
            Node::Branch(branch) => Some(branch),
        }
    }
}

/// A single input element and its digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub(crate) hash: MerkleHash,
    pub(crate) element: Vec<u8>,
    pub(crate) position: Position,
    pub(crate) index: usize,
}

impl Leaf {
    pub(crate) fn new<HF: DigestProvider>(index: usize, element: &[u8]) -> Self {
        Self {
            hash: HF::hash(element),
            element: element.to_vec(),
            position: Position::from_index(index),
            index,
        }
    }

    pub fn hash(&self) -> &MerkleHash {
        &self.hash
    }

    pub fn element(&self) -> &[u8] {
        &self.element
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Index of the element in the sequence the tree was built from
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Internal node owning two children.
///
/// A branch built over a single trailing node has no right child; its hash
/// is the left child's hash, copied unchanged.
pub struct Branch {
    pub(crate) hash: MerkleHash,
    pub(crate) left: Box<Node>,
    pub(crate) right: Option<Box<Node>>,
    pub(crate) position: Position,
}

impl Branch {
    /// Join two subtrees under a new branch with hash `H(left || right)`
    pub(crate) fn join<HF: DigestProvider>(left: Node, right: Node, position: Position) -> Self {
        Self {
            hash: HF::hash_pair(left.hash(), right.hash()),
            left: Box::new(left),
            right: Some(Box::new(right)),
            position,
        }
    }

    /// Wrap a lone node next to the empty placeholder
    pub(crate) fn singleton(child: Node, position: Position) -> Self {
        Self {
            hash: *child.hash(),
            left: Box::new(child),
            right: None,
            position,
        }
    }

    pub fn hash(&self) -> &MerkleHash {
        &self.hash
    }

    pub fn left(&self) -> &Node {
        &self.left
    }

    /// `None` when the right slot holds the empty placeholder
    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    pub fn child(&self, slot: Position) -> Option<&Node> {
        match slot {
            Position::Left => Some(self.left()),
            Position::Right => self.right(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

// Children are left out: trees are about n / 2 levels deep, so following
// them would overflow the stack.
impl fmt::Debug for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branch")
            .field("hash", &self.hash)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
