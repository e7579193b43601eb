//! Merkle Tree Errors

use displaydoc::Display;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Error {
    /// Must supply at least one element to build a tree
    EmptyInput,
    /// Cannot construct audit path for element: {0}
    ElementNotFound(String),
    /// Requested index: {0} exceeds number of leaves: {1}
    ExceededMaxIndex(usize, usize),
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn not_found(element: &[u8]) -> Self {
        Error::ElementNotFound(hex::encode(element))
    }
}
