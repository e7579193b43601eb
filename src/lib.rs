//! Merkle Tree inclusion proofs
//!
//! Builds a binary hash tree over an ordered sequence of byte strings and
//! produces audit paths that prove one element's membership given only the
//! element, the sibling digests and the root.
//!
//! A tree built from a single element has the element's digest as its root
//! and no siblings, so its proof has an empty audit path and
//! [`MerkleProof::validate`] rejects it. Check such a tree with
//! [`MerkleTree::contains`] or by comparing the root to the element's digest.

mod error;
mod hash;
mod node;
mod proof;
mod running;
mod tree;

pub use crate::{
    error::Error,
    hash::{Blake2s256, DigestProvider, MerkleHash, Sha256, Sha3_256},
    node::{Branch, Leaf, Node, Position},
    proof::{verify, MerkleProof, ProofNode},
    running::RunningDigest,
    tree::{split_point, MerkleTree},
};

#[cfg(test)]
mod test_utils {
    use super::*;

    pub(crate) fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Distinct binary elements, one per index
    pub(crate) fn hash_elements(count: usize) -> Vec<Vec<u8>> {
        (0..count as u64)
            .map(|i| Sha256::hash(&i.to_le_bytes()).to_vec())
            .collect()
    }
}
