//! Cryptographic primitives for the card text container
//!
//! The game obfuscates its card text files with a position- and
//! key-dependent XOR keystream. The key is a single unsigned integer
//! that is not shipped with the game; it is discovered by brute force
//! (see the `cardtext-formats` crate) and then persisted.
//!
//! # Components
//!
//! - **Keystream**: the self-inverse XOR transform ([`xor`])
//! - **Key type**: [`CryptoKey`] with its hex persistence format
//! - **Key persistence**: the [`KeyProvider`] trait for external
//!   storage backends, plus [`MemoryKeyStore`] for embedders without
//!   persistence
//!
//! # Examples
//!
//! ```
//! use cardtext_crypto::{CryptoKey, xor};
//!
//! let key = CryptoKey::new(7);
//! let mut data = b"card text".to_vec();
//! xor::apply_keystream(&mut data, key);
//! assert_ne!(&data[..], b"card text");
//!
//! // The transform is its own inverse.
//! xor::apply_keystream(&mut data, key);
//! assert_eq!(&data[..], b"card text");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod provider;
pub mod xor;

pub use error::CryptoError;
pub use keys::CryptoKey;
pub use provider::{KeyProvider, MemoryKeyStore};
