//! Card text container format
//!
//! The game ships every card's localized name and description in
//! three interdependent files: an interleaved offset table
//! (`card_indx.bytes`) and two text blobs (`card_name.bytes`,
//! `card_desc.bytes`). Each file is zlib-compressed and then
//! obfuscated with a keyed XOR keystream whose key must be
//! discovered by brute force.
//!
//! Record boundaries in the blobs are defined by the cumulative,
//! 4-byte-aligned padded lengths of every earlier record, so editing
//! one string invalidates every later offset in both blobs. All
//! writes therefore go through [`RebuildEngine`], which re-derives
//! the complete offset table and both blobs from the in-memory
//! corpus.
//!
//! # Features
//!
//! - Symmetric decode/encode of the compress-then-cipher container
//! - Bounded brute-force key discovery validated by zlib structure
//! - Offset-table parse/build with a byte-exact round-trip guarantee
//! - Single-entry edits and bulk replacement with full
//!   index-consistent rebuilds

mod codec;
mod corpus;
mod engine;
mod error;
mod index;

pub use codec::{
    KEY_SEARCH_CEILING, MAX_DECOMPRESSION_SIZE, decode, discover_key, encode, validate_key,
};
pub use corpus::{
    CardTextCorpus, Field, Record, SerializedBlobs, serialize_corpus, split_records,
};
pub use engine::{AssetStore, FileRole, RebuildEngine, RebuiltFiles, SessionContext};
pub use error::{CardTextError, CardTextResult};
pub use index::{HEADER_OFFSETS, RECORD_SLOT_SIZE, build_index, parse_index};
