//! Position-dependent XOR keystream
//!
//! The game's card files are obfuscated with a keystream derived from
//! the byte position and a single integer key:
//!
//! ```text
//! v = ((i + key + 0x23D) * key) XOR (i mod 7)
//! out[i] = in[i] XOR (v AND 0xFF)
//! ```
//!
//! All arithmetic is wrapping u64; only the low 8 bits of `v` reach
//! the output, but the width must match on both sides of the round
//! trip. The transform is its own inverse, so one function serves
//! both encryption and decryption. Not cryptographically strong —
//! it is obfuscation, kept bit-exact for compatibility with the
//! game's own loader.

use crate::keys::CryptoKey;

/// Additive bias baked into the game's keystream derivation.
const KEY_BIAS: u64 = 0x23D;

/// Apply the keystream to `data` in place.
///
/// Encryption and decryption are the same operation. Total over any
/// slice, including empty.
pub fn apply_keystream(data: &mut [u8], key: CryptoKey) {
    let k = key.value();
    for (i, byte) in data.iter_mut().enumerate() {
        let i = i as u64;
        let v = i.wrapping_add(k).wrapping_add(KEY_BIAS).wrapping_mul(k) ^ (i % 7);
        *byte ^= (v & 0xFF) as u8;
    }
}

/// Allocating form of [`apply_keystream`].
pub fn apply(data: &[u8], key: CryptoKey) -> Vec<u8> {
    let mut out = data.to_vec();
    apply_keystream(&mut out, key);
    out
}
