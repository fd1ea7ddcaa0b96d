//! Card container error types

use thiserror::Error;

/// Errors produced while decoding, editing, or rebuilding the card
/// text container
#[derive(Debug, Error)]
pub enum CardTextError {
    /// Decompression failed: wrong key or genuinely damaged input
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// Brute-force key search exhausted its ceiling
    #[error("crypto key not found after searching 0..{ceiling:#x}")]
    KeyNotFound {
        /// Exclusive upper bound of the search
        ceiling: u64,
    },

    /// Index blob length is not a multiple of the record slot size
    #[error("malformed index: {len} bytes is not a multiple of the {slot}-byte record slot")]
    MalformedIndex {
        /// Byte length of the offending blob
        len: usize,
        /// Record slot size in bytes
        slot: usize,
    },

    /// Offset sequences of unequal length cannot be interleaved
    #[error("offset sequence mismatch: {names} name offsets vs {descs} description offsets")]
    OffsetMismatch {
        /// Length of the name offset sequence
        names: usize,
        /// Length of the description offset sequence
        descs: usize,
    },

    /// Edit requested for a record index past the end of the corpus
    #[error("edit out of range: record {index} of {len}")]
    OutOfRangeEdit {
        /// Requested record index
        index: usize,
        /// Number of records in the corpus
        len: usize,
    },

    /// Operation requires a loaded corpus
    #[error("no corpus loaded")]
    NotLoaded,

    /// Key handling error from the crypto layer
    #[error("crypto error: {0}")]
    Crypto(#[from] cardtext_crypto::CryptoError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for card container operations
pub type CardTextResult<T> = Result<T, CardTextError>;
