//! Merkle Proof types and validation

use crate::{
    hash::{DigestProvider, MerkleHash},
    node::Position,
};
use log::trace;
use std::{fmt, marker::PhantomData};

/// Sibling digest on an audit path and the child slot it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofNode {
    pub hash: MerkleHash,
    pub position: Position,
}

impl ProofNode {
    pub fn new(hash: MerkleHash, position: Position) -> Self {
        Self { hash, position }
    }

    /// Combine this sibling with the digest computed so far
    fn fold<HF: DigestProvider>(&self, current: &MerkleHash) -> MerkleHash {
        match self.position {
            Position::Left => HF::hash_pair(&self.hash, current),
            Position::Right => HF::hash_pair(current, &self.hash),
        }
    }
}

/// Merkle Proof for an individual element.
///
/// Holds everything needed to recompute the root without the tree: the
/// element, the sibling digests ordered from the element's own sibling up to
/// the root's child, and the root the proof claims membership in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct MerkleProof<HF: DigestProvider> {
    #[cfg_attr(feature = "serde", serde(skip))]
    _hasher: PhantomData<HF>,
    /// Path through the tree to the root node
    pub(crate) path: Vec<ProofNode>,
    pub(crate) root: MerkleHash,
    pub(crate) element: Vec<u8>,
}

impl<HF: DigestProvider> MerkleProof<HF> {
    /// Assemble a proof from its detached parts
    pub fn new(path: Vec<ProofNode>, root: MerkleHash, element: impl Into<Vec<u8>>) -> Self {
        Self {
            _hasher: PhantomData,
            path,
            root,
            element: element.into(),
        }
    }

    pub fn path(&self) -> &[ProofNode] {
        &self.path
    }

    pub fn root(&self) -> &MerkleHash {
        &self.root
    }

    pub fn element(&self) -> &[u8] {
        &self.element
    }

    /// Compute the implied Merkle Root Hash from the audit path, or `None`
    /// when the path is empty
    pub fn compute_implied_root(&self) -> Option<MerkleHash> {
        if self.path.is_empty() {
            return None;
        }
        let leaf = HF::hash(&self.element);
        Some(
            self.path
                .iter()
                .fold(leaf, |current, sibling| sibling.fold::<HF>(&current)),
        )
    }

    /// Check whether the element is a member of the tree with the claimed root
    pub fn validate(&self) -> bool {
        match self.compute_implied_root() {
            Some(implied) if implied == self.root => true,
            Some(implied) => {
                trace!("implied root {} does not match claimed root {}", implied, self.root);
                false
            }
            None => {
                trace!("rejecting proof with an empty audit path");
                false
            }
        }
    }
}

// Hash functions are marker types here, so none of these impls bound on HF
impl<HF: DigestProvider> Clone for MerkleProof<HF> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone(), self.root, self.element.clone())
    }
}

impl<HF: DigestProvider> PartialEq for MerkleProof<HF> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.root == other.root && self.element == other.element
    }
}

impl<HF: DigestProvider> Eq for MerkleProof<HF> {}

impl<HF: DigestProvider> fmt::Debug for MerkleProof<HF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleProof")
            .field("path", &self.path)
            .field("root", &self.root)
            .field("element", &hex::encode(&self.element))
            .finish()
    }
}

/// Validate a detached proof
pub fn verify<HF: DigestProvider>(proof: &MerkleProof<HF>) -> bool {
    proof.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{Sha256, Sha3_256};

    fn two_element_proof() -> MerkleProof<Sha256> {
        // Proof that "two" sits in the right slot next to "one"
        let root = Sha256::hash_pair(&Sha256::hash(b"one"), &Sha256::hash(b"two"));
        MerkleProof::new(
            vec![ProofNode::new(Sha256::hash(b"one"), Position::Left)],
            root,
            "two",
        )
    }

    #[test]
    fn test_validate_hand_built_proof() {
        let proof = two_element_proof();
        assert!(proof.validate());
        assert!(verify(&proof));
        assert_eq!(proof.compute_implied_root().as_ref(), Some(proof.root()));
    }

    #[test]
    fn test_sibling_position_orders_concatenation() {
        let mut proof = two_element_proof();
        proof.path[0].position = Position::Right;
        assert!(!proof.validate());
        assert_eq!(
            proof.compute_implied_root(),
            Some(Sha256::hash_pair(&Sha256::hash(b"two"), &Sha256::hash(b"one")))
        );
    }

    #[test]
    fn test_empty_path_is_rejected() {
        // Even when the root is the element's own digest
        let proof = MerkleProof::<Sha256>::new(Vec::new(), Sha256::hash(b"one"), "one");
        assert!(proof.compute_implied_root().is_none());
        assert!(!proof.validate());

        let proof = MerkleProof::<Sha256>::new(Vec::new(), MerkleHash::default(), Vec::<u8>::new());
        assert!(!proof.validate());
    }

    #[test]
    fn test_wrong_digest_is_rejected() {
        let proof = two_element_proof();
        let same_parts = MerkleProof::<Sha3_256>::new(
            proof.path().to_vec(),
            *proof.root(),
            proof.element().to_vec(),
        );
        assert!(!same_parts.validate());
    }

    #[test]
    fn test_multi_level_fold() {
        let one_two = Sha256::hash_pair(&Sha256::hash(b"one"), &Sha256::hash(b"two"));
        let root = Sha256::hash_pair(&one_two, &Sha256::hash(b"three"));
        let proof = MerkleProof::<Sha256>::new(
            vec![
                ProofNode::new(Sha256::hash(b"one"), Position::Left),
                ProofNode::new(Sha256::hash(b"three"), Position::Right),
            ],
            root,
            b"two".to_vec(),
        );
        assert!(proof.validate());

        let truncated = MerkleProof::<Sha256>::new(proof.path()[..1].to_vec(), root, "two");
        assert!(!truncated.validate());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use crate::{MerkleProof, MerkleTree, Sha256};

    #[test]
    fn test_detached_proof_survives_json() {
        let tree = MerkleTree::<Sha256>::build(["one", "two", "three", "four", "five"]).unwrap();
        let proof = tree.prove_inclusion("three").unwrap();

        let encoded = serde_json::to_string(&proof).unwrap();
        drop(tree);
        let decoded: MerkleProof<Sha256> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, proof);
        assert!(decoded.validate());
    }
}
