//! Compress-then-cipher codec and brute-force key discovery
//!
//! On disk each card file is zlib-compressed and then obfuscated with
//! the XOR keystream. Decoding reverses both layers; a failed inflate
//! is the validation signal key discovery relies on, since the zlib
//! header and adler32 trailer reject a wrong keystream in practice.

use cardtext_crypto::{CryptoKey, xor};
use flate2::Compression;
use flate2::read::{ZlibDecoder, ZlibEncoder};
use std::io::Read;
use tracing::{debug, info};

use super::error::{CardTextError, CardTextResult};

/// Maximum allowed decompression size (64 MiB)
///
/// The real corpus decompresses to a few megabytes; the cap bounds
/// the damage a hostile or corrupted stream can do.
pub const MAX_DECOMPRESSION_SIZE: usize = 64 * 1024 * 1024;

/// Exclusive upper bound for brute-force key search.
///
/// Observed keys fit comfortably below 2^16. The original tooling
/// searched without a bound, which loops forever on unsupported
/// input; exceeding this ceiling reports
/// [`CardTextError::KeyNotFound`] instead.
pub const KEY_SEARCH_CEILING: u64 = 0x1_0000;

/// Decode one card file: strip the keystream, then inflate.
///
/// # Errors
///
/// [`CardTextError::CorruptData`] if the inflate fails (wrong key or
/// damaged input) or the output exceeds [`MAX_DECOMPRESSION_SIZE`].
pub fn decode(cipher_text: &[u8], key: CryptoKey) -> CardTextResult<Vec<u8>> {
    let compressed = xor::apply(cipher_text, key);
    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut decompressed = Vec::new();

    // Read in chunks to enforce the size limit
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = decoder
            .read(&mut buffer)
            .map_err(|e| CardTextError::CorruptData(format!("zlib inflate failed: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        if decompressed.len() + bytes_read > MAX_DECOMPRESSION_SIZE {
            return Err(CardTextError::CorruptData(format!(
                "decompressed size exceeds limit of {MAX_DECOMPRESSION_SIZE} bytes"
            )));
        }

        decompressed.extend_from_slice(&buffer[..bytes_read]);
    }

    Ok(decompressed)
}

/// Encode one card file: deflate, then apply the keystream.
///
/// Inverse of [`decode`]: `decode(encode(p, k), k) == p` for any
/// payload and key.
pub fn encode(plain: &[u8], key: CryptoKey) -> CardTextResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(plain, Compression::default());
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed)?;

    xor::apply_keystream(&mut compressed, key);
    Ok(compressed)
}

/// Check a single key with one decode attempt.
pub fn validate_key(cipher_text: &[u8], key: CryptoKey) -> bool {
    decode(cipher_text, key).is_ok()
}

/// Find the container key for `cipher_text`.
///
/// A persisted key, when given, is validated with one decode attempt
/// before any searching. Otherwise keys are tried from 0 upward; the
/// first key whose decode succeeds is the answer. False positives
/// are negligible because an arbitrary wrong keystream almost never
/// yields a structurally valid zlib stream.
///
/// # Errors
///
/// [`CardTextError::KeyNotFound`] if no key below
/// [`KEY_SEARCH_CEILING`] validates — corrupt or unsupported input.
pub fn discover_key(
    cipher_text: &[u8],
    persisted: Option<CryptoKey>,
) -> CardTextResult<CryptoKey> {
    if let Some(key) = persisted {
        if validate_key(cipher_text, key) {
            debug!("persisted key {key} validated");
            return Ok(key);
        }
        debug!("persisted key {key} rejected, falling back to brute force");
    }

    for raw in 0..KEY_SEARCH_CEILING {
        let key = CryptoKey::new(raw);
        if validate_key(cipher_text, key) {
            info!("crypto key discovered: {key}");
            return Ok(key);
        }
    }

    Err(CardTextError::KeyNotFound {
        ceiling: KEY_SEARCH_CEILING,
    })
}
