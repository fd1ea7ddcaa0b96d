//! Crypto key value type
//!
//! The container key is a single non-negative integer. It is unknown
//! when a session first starts, discovered once by brute force, and
//! persisted as a hexadecimal string for every later session.

use std::fmt;

use crate::error::CryptoError;

/// The symmetric key for the card container keystream.
///
/// Treated as write-once for the process lifetime: once validated
/// against a real file it never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CryptoKey(u64);

impl CryptoKey {
    /// Create a key from its raw integer value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw integer value of the key.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Parse a key from its hex persistence format.
    ///
    /// Accepts an optional `0x` prefix and surrounding whitespace,
    /// matching what earlier tools wrote into their config stores.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let trimmed = hex.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| CryptoError::InvalidKeyFormat(format!("invalid hex {trimmed:?}: {e}")))
    }

    /// Render the key in its hex persistence format (no prefix).
    pub fn to_hex(self) -> String {
        format!("{:x}", self.0)
    }
}

impl From<u64> for CryptoKey {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
