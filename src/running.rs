//! Running digest over appended elements

use crate::hash::{DigestProvider, MerkleHash};
use log::trace;
use std::{fmt, marker::PhantomData};

/// Digest that folds new elements into an existing root as
/// `H(current || H(element))`.
///
/// This is not a Merkle tree: nothing appended here can be proven, it only
/// yields a new digest committing to the previous one and the element.
pub struct RunningDigest<HF: DigestProvider> {
    _hasher: PhantomData<HF>,
    current: MerkleHash,
    appended: usize,
}

impl<HF: DigestProvider> RunningDigest<HF> {
    pub fn new(seed: MerkleHash) -> Self {
        Self {
            _hasher: PhantomData,
            current: seed,
            appended: 0,
        }
    }

    /// Fold `element` into the digest and return the new value
    pub fn append(&mut self, element: impl AsRef<[u8]>) -> MerkleHash {
        let element = HF::hash(element.as_ref());
        self.current = HF::hash_pair(&self.current, &element);
        self.appended += 1;
        trace!("running digest now {} after {} appends", self.current, self.appended);
        self.current
    }

    pub fn digest(&self) -> &MerkleHash {
        &self.current
    }

    /// Number of elements appended since the seed
    pub fn appended(&self) -> usize {
        self.appended
    }
}

impl<HF: DigestProvider> Clone for RunningDigest<HF> {
    fn clone(&self) -> Self {
        Self {
            _hasher: PhantomData,
            current: self.current,
            appended: self.appended,
        }
    }
}

impl<HF: DigestProvider> fmt::Debug for RunningDigest<HF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningDigest")
            .field("current", &self.current)
            .field("appended", &self.appended)
            .finish()
    }
}
