//! Hash primitive used to build and verify trees

use sha3::digest::{consts::U32, Digest, OutputSizeUser};
use std::{fmt, ops::Deref};

pub use blake2::Blake2s256;
pub use sha2::Sha256;
pub use sha3::Sha3_256;

/// A hash function producing 32 byte digests.
///
/// All arguments are concatenated in call order before hashing. There is no
/// padding, separator or length prefix between them, so `hash_all(&[b"ab", b"c"])`
/// and `hash_all(&[b"a", b"bc"])` produce the same digest.
pub trait DigestProvider {
    /// Hash the concatenation of every part
    fn hash_all(parts: &[&[u8]]) -> MerkleHash;

    /// Hash a single byte string
    fn hash(data: &[u8]) -> MerkleHash {
        Self::hash_all(&[data])
    }

    /// Hash two nodes on a merkle tree by concatenating the left and
    /// right values, left first
    fn hash_pair(left: &[u8], right: &[u8]) -> MerkleHash {
        Self::hash_all(&[left, right])
    }
}

impl<D> DigestProvider for D
where
    D: Digest + OutputSizeUser<OutputSize = U32>,
{
    fn hash_all(parts: &[&[u8]]) -> MerkleHash {
        let mut hasher = <D as Digest>::new();
        let mut result = [0u8; 32];

        for part in parts {
            Digest::update(&mut hasher, part);
        }
        result.copy_from_slice(hasher.finalize().as_slice());
        MerkleHash(result)
    }
}

/// Container for Merkle Hashes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MerkleHash(pub [u8; 32]);

impl From<[u8; 32]> for MerkleHash {
    fn from(value: [u8; 32]) -> Self {
        MerkleHash(value)
    }
}

impl Deref for MerkleHash {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for MerkleHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<[u8; 32]> for MerkleHash {
    fn eq(&self, other: &[u8; 32]) -> bool {
        &self.0 == other
    }
}

impl fmt::LowerHex for MerkleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Display for MerkleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ::hex_literal::hex;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            Sha256::hash(b"abc"),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(
            Sha256::hash(b""),
            hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
        assert_eq!(
            Sha3_256::hash(b"abc"),
            hex!("3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532")
        );
        assert_eq!(
            Blake2s256::hash(b"abc"),
            hex!("508c5e8c327c14e2e1a72ba34eeb452f37458b209ed63a294d999b4c86675982")
        );
    }

    #[test]
    fn test_parts_are_concatenated() {
        let joined = Sha256::hash(b"onetwo");
        assert_eq!(Sha256::hash_pair(b"one", b"two"), joined);
        assert_eq!(Sha256::hash_all(&[&b"on"[..], &b"et"[..], &b"wo"[..]]), joined);
        assert_eq!(Sha256::hash_all(&[&b""[..], &b"onetwo"[..], &b""[..]]), joined);
        assert_ne!(Sha256::hash_pair(b"two", b"one"), joined);
    }

    #[test]
    fn test_from_array() {
        let digest = MerkleHash::from(hex!(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        ));
        assert_eq!(Sha256::hash(b"abc"), digest);
        assert_eq!(digest.as_ref(), &digest[..]);
    }

    #[test]
    fn test_hex_rendering() {
        let digest = Sha256::hash(b"abc");
        assert_eq!(
            digest.to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(format!("{:x}", digest), digest.to_string());
    }
}
