//! Pluggable key persistence backends
//!
//! The core calls a [`KeyProvider`] exactly twice per session: once
//! at session start to load a previously discovered key, and once
//! after a successful brute-force discovery to persist it.
//! Applications can implement the trait over a settings database,
//! a config file, the OS keyring, or anything else.

use crate::error::CryptoError;
use crate::keys::CryptoKey;

/// Persistence backend for the discovered container key.
///
/// The wire format is the hex string produced by
/// [`CryptoKey::to_hex`]; backends that store the raw string stay
/// compatible with configs written by earlier tools.
pub trait KeyProvider {
    /// Load the persisted key, if one was ever stored.
    fn load(&self) -> Result<Option<CryptoKey>, CryptoError>;

    /// Persist the key, replacing any previous value.
    fn store(&mut self, key: CryptoKey) -> Result<(), CryptoError>;
}

/// In-memory key store for tests and embedders without persistence.
///
/// Holds the key in its hex wire format so the round trip through
/// [`CryptoKey::from_hex`] is exercised even without real storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyStore {
    stored: Option<String>,
}

impl MemoryKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an already-known key.
    pub fn with_key(key: CryptoKey) -> Self {
        Self {
            stored: Some(key.to_hex()),
        }
    }
}

impl KeyProvider for MemoryKeyStore {
    fn load(&self) -> Result<Option<CryptoKey>, CryptoError> {
        self.stored
            .as_deref()
            .map(CryptoKey::from_hex)
            .transpose()
    }

    fn store(&mut self, key: CryptoKey) -> Result<(), CryptoError> {
        self.stored = Some(key.to_hex());
        Ok(())
    }
}
