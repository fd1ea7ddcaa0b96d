//! In-memory card text corpus and blob (de)serialization
//!
//! The corpus is the ordered list of every card's (name, description)
//! pair. Order is canonical: the game's card catalog addresses
//! records by position, so the sequence must never be reordered once
//! established. Individual records are edited in place; wholesale
//! replacement is the only other mutation.
//!
//! Serialization rebuilds both text blobs and both offset sequences
//! from scratch. Record `k`'s padded length is its UTF-8 byte length
//! (+8 for record 0, whose region absorbs the blob's leading header
//! bytes), rounded up past the next 4-byte boundary with 1 to 4
//! trailing NULs — the pad is never zero.

use super::error::{CardTextError, CardTextResult};
use super::index::HEADER_OFFSETS;

/// Alignment of record text within a blob.
const ALIGN: usize = 4;

/// Leading NUL bytes reserved at the front of each text blob.
const BLOB_HEADER_LEN: usize = 8;

/// Which text field of a record an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The card's name.
    Name,
    /// The card's description.
    Description,
}

/// One card's localized text pair at a stable index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Stable position in the corpus; external catalogs key on this.
    pub index: usize,
    /// Card name.
    pub name: String,
    /// Card description.
    pub description: String,
}

/// Ordered sequence of all card text records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardTextCorpus {
    records: Vec<Record>,
}

impl CardTextCorpus {
    /// Build a corpus from (name, description) pairs, assigning
    /// indices 0..N in order. This is the bulk-replacement path used
    /// by full translation imports.
    pub fn from_pairs<N, D, I>(pairs: I) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        I: IntoIterator<Item = (N, D)>,
    {
        let records = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (name, description))| Record {
                index,
                name: name.into(),
                description: description.into(),
            })
            .collect();
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow a record by index.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// All records in canonical order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Replace one field of one record.
    ///
    /// # Errors
    ///
    /// [`CardTextError::OutOfRangeEdit`] if `index` is past the end;
    /// the corpus is untouched in that case.
    pub fn set_field(&mut self, index: usize, field: Field, value: String) -> CardTextResult<()> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(CardTextError::OutOfRangeEdit { index, len })?;

        match field {
            Field::Name => record.name = value,
            Field::Description => record.description = value,
        }
        Ok(())
    }
}

/// Serialized corpus: both text blobs plus their offset sequences.
///
/// The offset sequences include the two fixed header entries, so
/// each has N+2 values for N records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedBlobs {
    /// Name blob bytes (8-NUL header, then padded names).
    pub name_blob: Vec<u8>,
    /// Description blob bytes.
    pub desc_blob: Vec<u8>,
    /// Name offset sequence, `[4, 8, end_0, end_1, ...]`.
    pub name_offsets: Vec<u32>,
    /// Description offset sequence, same shape.
    pub desc_offsets: Vec<u32>,
}

/// Slice both blobs into records using the parsed offset sequences.
///
/// The leading `4` in each sequence is header-only; slice boundaries
/// run between the remaining values. Text is decoded as permissive
/// UTF-8 (invalid byte sequences are dropped) and trailing NUL
/// padding is stripped.
///
/// # Errors
///
/// [`CardTextError::OffsetMismatch`] if the sequences disagree on
/// record count, [`CardTextError::CorruptData`] if an offset points
/// outside its blob or runs backwards.
pub fn split_records(
    name_blob: &[u8],
    desc_blob: &[u8],
    name_offsets: &[u32],
    desc_offsets: &[u32],
) -> CardTextResult<CardTextCorpus> {
    if name_offsets.len() != desc_offsets.len() {
        return Err(CardTextError::OffsetMismatch {
            names: name_offsets.len(),
            descs: desc_offsets.len(),
        });
    }

    let names = slice_texts(name_blob, name_offsets)?;
    let descs = slice_texts(desc_blob, desc_offsets)?;

    Ok(CardTextCorpus::from_pairs(names.into_iter().zip(descs)))
}

/// Rebuild both blobs and both offset sequences from the corpus.
///
/// Deterministic: the same corpus always yields the same bytes.
pub fn serialize_corpus(corpus: &CardTextCorpus) -> SerializedBlobs {
    let mut names = BlobWriter::new(corpus.len());
    let mut descs = BlobWriter::new(corpus.len());

    for (k, record) in corpus.records().iter().enumerate() {
        names.push_text(&record.name, k == 0);
        descs.push_text(&record.description, k == 0);
    }

    SerializedBlobs {
        name_blob: names.blob,
        desc_blob: descs.blob,
        name_offsets: names.offsets,
        desc_offsets: descs.offsets,
    }
}

/// Incremental writer for one text blob and its offset sequence.
struct BlobWriter {
    blob: Vec<u8>,
    offsets: Vec<u32>,
    end: usize,
}

impl BlobWriter {
    fn new(records: usize) -> Self {
        let mut offsets = Vec::with_capacity(records + HEADER_OFFSETS.len());
        offsets.extend_from_slice(&HEADER_OFFSETS);
        Self {
            blob: vec![0u8; BLOB_HEADER_LEN],
            offsets,
            end: 0,
        }
    }

    fn push_text(&mut self, text: &str, first: bool) {
        let mut len = text.len();
        if first {
            // Record 0's padded length absorbs the blob header.
            len += BLOB_HEADER_LEN;
        }
        // Never zero: text ending on a 4-byte boundary still gets a
        // full 4 NULs of padding.
        let pad = ALIGN - len % ALIGN;

        self.end += len + pad;
        self.offsets.push(self.end as u32);
        self.blob.extend_from_slice(text.as_bytes());
        self.blob.resize(self.blob.len() + pad, 0);
    }
}

fn slice_texts(blob: &[u8], offsets: &[u32]) -> CardTextResult<Vec<String>> {
    // offsets[0] is the fixed header entry; boundaries start at the
    // second value (8, the end of the blob header).
    let bounds = offsets.get(1..).unwrap_or(&[]);

    let mut texts = Vec::with_capacity(bounds.len().saturating_sub(1));
    for pair in bounds.windows(2) {
        let (start, end) = (pair[0] as usize, pair[1] as usize);
        if start > end || end > blob.len() {
            return Err(CardTextError::CorruptData(format!(
                "record slice {start}..{end} outside blob of {} bytes",
                blob.len()
            )));
        }
        texts.push(decode_padded_text(&blob[start..end]));
    }

    Ok(texts)
}

/// Permissive UTF-8 decode: invalid byte sequences are dropped, then
/// trailing NUL padding is stripped.
fn decode_padded_text(bytes: &[u8]) -> String {
    let mut remaining = bytes;
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(remaining) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let (valid, rest) = remaining.split_at(err.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                remaining = match err.error_len() {
                    Some(skip) => &rest[skip..],
                    None => &[],
                };
            }
        }
    }

    out.truncate(out.trim_end_matches('\0').len());
    out
}
