//! Binary codec for the card index table
//!
//! The decoded index blob is a flat run of u32 little-endian values,
//! alternating name offset and description offset: 8 bytes per slot.
//!
//! ```text
//! u32 LE  name_offsets[0]   (fixed header entry, 4)
//! u32 LE  desc_offsets[0]   (fixed header entry, 4)
//! u32 LE  name_offsets[1]   (fixed header entry, 8)
//! u32 LE  desc_offsets[1]   (fixed header entry, 8)
//! u32 LE  name_offsets[2]   (padded end of record 0's name)
//! u32 LE  desc_offsets[2]   (padded end of record 0's description)
//! ...
//! ```
//!
//! Parsing keeps the header entries in the returned sequences so
//! `build_index(parse_index(b)) == b` holds byte for byte.

use super::error::{CardTextError, CardTextResult};

/// Bytes per record slot: one name offset plus one description offset.
pub const RECORD_SLOT_SIZE: usize = 8;

/// Fixed header entries leading both offset sequences.
pub const HEADER_OFFSETS: [u32; 2] = [4, 8];

/// De-interleave the index blob into its two offset sequences.
///
/// # Errors
///
/// [`CardTextError::MalformedIndex`] if the blob length is not a
/// multiple of [`RECORD_SLOT_SIZE`]. Truncated input is never
/// silently accepted.
pub fn parse_index(data: &[u8]) -> CardTextResult<(Vec<u32>, Vec<u32>)> {
    if data.len() % RECORD_SLOT_SIZE != 0 {
        return Err(CardTextError::MalformedIndex {
            len: data.len(),
            slot: RECORD_SLOT_SIZE,
        });
    }

    let slots = data.len() / RECORD_SLOT_SIZE;
    let mut name_offsets = Vec::with_capacity(slots);
    let mut desc_offsets = Vec::with_capacity(slots);

    for slot in data.chunks_exact(RECORD_SLOT_SIZE) {
        name_offsets.push(u32::from_le_bytes([slot[0], slot[1], slot[2], slot[3]]));
        desc_offsets.push(u32::from_le_bytes([slot[4], slot[5], slot[6], slot[7]]));
    }

    Ok((name_offsets, desc_offsets))
}

/// Re-interleave two offset sequences into index blob bytes.
///
/// Exact inverse of [`parse_index`].
///
/// # Errors
///
/// [`CardTextError::OffsetMismatch`] if the sequences differ in
/// length — they always advance in lockstep, one entry per record.
pub fn build_index(name_offsets: &[u32], desc_offsets: &[u32]) -> CardTextResult<Vec<u8>> {
    if name_offsets.len() != desc_offsets.len() {
        return Err(CardTextError::OffsetMismatch {
            names: name_offsets.len(),
            descs: desc_offsets.len(),
        });
    }

    let mut out = Vec::with_capacity(name_offsets.len() * RECORD_SLOT_SIZE);
    for (name, desc) in name_offsets.iter().zip(desc_offsets) {
        out.extend_from_slice(&name.to_le_bytes());
        out.extend_from_slice(&desc.to_le_bytes());
    }

    Ok(out)
}
