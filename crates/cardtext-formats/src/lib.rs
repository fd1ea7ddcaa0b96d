//! Card text container codecs and the index-consistent rebuild engine
//!
//! This crate implements the reverse-engineered container format the
//! game uses for card names and descriptions: three interdependent
//! files (an offset table and two text blobs), each zlib-compressed
//! and then obfuscated with a keyed XOR keystream.
//!
//! # Design Principles
//!
//! - **Symmetric operations**: every parser has a matching builder
//! - **Round-trip guarantee**: `decode(encode(p, k), k) == p` and
//!   `build(parse(b)) == b`
//! - **All-or-nothing rebuilds**: an edit produces all three output
//!   files together or none at all

#![warn(missing_docs)]
#![allow(clippy::cast_possible_truncation)] // offsets are u32 by format

pub mod card;
