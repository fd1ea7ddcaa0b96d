//! Rebuild engine: load, edit, and re-encode the three card files
//!
//! Changing one string's length shifts every later offset in both
//! blobs, so there is no safe incremental update: any edit forces a
//! full re-serialization of the corpus and a rebuild of all three
//! files together. The engine holds the corpus between edits and
//! produces the three encoded buffers in one shot.

use cardtext_crypto::{CryptoKey, KeyProvider};
use tracing::{debug, info};

use super::codec;
use super::corpus::{self, CardTextCorpus, Field};
use super::error::{CardTextError, CardTextResult};
use super::index;

/// Which of the three card files a raw buffer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// The interleaved offset table.
    Index,
    /// The name text blob.
    Name,
    /// The description text blob.
    Description,
}

impl FileRole {
    /// TextAsset name of this file inside the game bundle.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Index => "card_indx.bytes",
            Self::Name => "card_name.bytes",
            Self::Description => "card_desc.bytes",
        }
    }
}

/// External storage for the raw (ciphered) card files.
///
/// The engine never learns how a role maps to physical storage;
/// Unity bundle plumbing lives entirely behind this trait.
pub trait AssetStore {
    /// Fetch the raw bytes of one card file.
    fn fetch_raw(&self, role: FileRole) -> CardTextResult<Vec<u8>>;

    /// Replace the raw bytes of one card file.
    fn store_raw(&mut self, role: FileRole, bytes: &[u8]) -> CardTextResult<()>;
}

/// Session-scoped context: the validated container key.
///
/// Replaces the ambient config singleton of earlier tools — the key
/// is established once, then passed explicitly to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    key: CryptoKey,
}

impl SessionContext {
    /// Build a context from an already-validated key.
    pub const fn new(key: CryptoKey) -> Self {
        Self { key }
    }

    /// Establish the session key against the raw index file.
    ///
    /// Loads the persisted key from `provider` and validates it with
    /// one decode attempt; on mismatch or absence falls back to
    /// brute force and persists the discovery.
    ///
    /// # Errors
    ///
    /// Propagates provider failures and
    /// [`CardTextError::KeyNotFound`] when the search ceiling is
    /// exceeded.
    pub fn establish(provider: &mut dyn KeyProvider, raw_index: &[u8]) -> CardTextResult<Self> {
        let persisted = provider.load()?;
        let key = codec::discover_key(raw_index, persisted)?;
        if persisted != Some(key) {
            provider.store(key)?;
        }
        Ok(Self::new(key))
    }

    /// The validated container key.
    pub const fn key(&self) -> CryptoKey {
        self.key
    }
}

/// Rebuilt output: all three encoded files, produced together.
///
/// Callers write these to external storage as a unit; a rebuild
/// never yields a partial set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuiltFiles {
    /// Encoded index table (`card_indx.bytes`).
    pub index: Vec<u8>,
    /// Encoded name blob (`card_name.bytes`).
    pub name: Vec<u8>,
    /// Encoded description blob (`card_desc.bytes`).
    pub desc: Vec<u8>,
}

/// The edit engine.
///
/// Idle until [`RebuildEngine::load`] succeeds, then holds the
/// corpus for edits and rebuilds. Single-session by design: one
/// engine owns one corpus, and callers serialize access to it.
#[derive(Debug)]
pub struct RebuildEngine {
    session: SessionContext,
    corpus: Option<CardTextCorpus>,
}

impl RebuildEngine {
    /// Create an idle engine for the given session.
    pub const fn new(session: SessionContext) -> Self {
        Self {
            session,
            corpus: None,
        }
    }

    /// Whether a corpus is currently loaded.
    pub const fn is_loaded(&self) -> bool {
        self.corpus.is_some()
    }

    /// Borrow the loaded corpus, if any.
    pub fn corpus(&self) -> Option<&CardTextCorpus> {
        self.corpus.as_ref()
    }

    /// Decode the three raw files and load the corpus.
    ///
    /// On any failure the engine keeps whatever corpus it held
    /// before the call — there is no partially loaded state.
    ///
    /// # Errors
    ///
    /// [`CardTextError::CorruptData`] from the codec layer,
    /// [`CardTextError::MalformedIndex`] from the index parser, and
    /// the slice errors of
    /// [`split_records`](corpus::split_records).
    pub fn load(
        &mut self,
        raw_index: &[u8],
        raw_name: &[u8],
        raw_desc: &[u8],
    ) -> CardTextResult<()> {
        let key = self.session.key();
        let decoded_index = codec::decode(raw_index, key)?;
        let decoded_name = codec::decode(raw_name, key)?;
        let decoded_desc = codec::decode(raw_desc, key)?;

        let (name_offsets, desc_offsets) = index::parse_index(&decoded_index)?;
        let loaded = corpus::split_records(
            &decoded_name,
            &decoded_desc,
            &name_offsets,
            &desc_offsets,
        )?;

        info!("loaded card text corpus: {} records", loaded.len());
        self.corpus = Some(loaded);
        Ok(())
    }

    /// Fetch all three raw files from `store` and load the corpus.
    pub fn load_from(&mut self, store: &impl AssetStore) -> CardTextResult<()> {
        let raw_index = store.fetch_raw(FileRole::Index)?;
        let raw_name = store.fetch_raw(FileRole::Name)?;
        let raw_desc = store.fetch_raw(FileRole::Description)?;
        self.load(&raw_index, &raw_name, &raw_desc)
    }

    /// Replace one field of one record, in memory only.
    ///
    /// # Errors
    ///
    /// [`CardTextError::NotLoaded`] before a successful load,
    /// [`CardTextError::OutOfRangeEdit`] for a bad index.
    pub fn edit_entry(
        &mut self,
        record_index: usize,
        field: Field,
        value: impl Into<String>,
    ) -> CardTextResult<()> {
        let loaded = self.corpus.as_mut().ok_or(CardTextError::NotLoaded)?;
        loaded.set_field(record_index, field, value.into())
    }

    /// Replace the whole corpus (bulk translation import).
    ///
    /// # Errors
    ///
    /// [`CardTextError::NotLoaded`] before a successful load; bulk
    /// replacement swaps the contents of an existing session, it
    /// does not start one.
    pub fn replace_corpus(&mut self, replacement: CardTextCorpus) -> CardTextResult<()> {
        if self.corpus.is_none() {
            return Err(CardTextError::NotLoaded);
        }
        self.corpus = Some(replacement);
        Ok(())
    }

    /// Re-serialize the entire corpus and encode all three files.
    ///
    /// Always a full rebuild: even a one-record edit shifts every
    /// later offset. Deterministic, so two rebuilds with no
    /// intervening edit are byte-identical.
    ///
    /// # Errors
    ///
    /// [`CardTextError::NotLoaded`] before a successful load.
    pub fn rebuild(&self) -> CardTextResult<RebuiltFiles> {
        let loaded = self.corpus.as_ref().ok_or(CardTextError::NotLoaded)?;

        let blobs = corpus::serialize_corpus(loaded);
        let index_bytes = index::build_index(&blobs.name_offsets, &blobs.desc_offsets)?;

        let key = self.session.key();
        let files = RebuiltFiles {
            index: codec::encode(&index_bytes, key)?,
            name: codec::encode(&blobs.name_blob, key)?,
            desc: codec::encode(&blobs.desc_blob, key)?,
        };

        debug!(
            "rebuilt {} records: index {} B, names {} B, descriptions {} B",
            loaded.len(),
            files.index.len(),
            files.name.len(),
            files.desc.len()
        );
        Ok(files)
    }

    /// Rebuild and write all three files to `store`.
    ///
    /// The rebuild completes in memory before the first store call,
    /// so a rebuild failure writes nothing.
    pub fn commit_to(&self, store: &mut impl AssetStore) -> CardTextResult<()> {
        let files = self.rebuild()?;
        store.store_raw(FileRole::Index, &files.index)?;
        store.store_raw(FileRole::Name, &files.name)?;
        store.store_raw(FileRole::Description, &files.desc)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use cardtext_crypto::MemoryKeyStore;
    use std::collections::HashMap;

    const TEST_KEY: CryptoKey = CryptoKey::new(7);

    /// Map-backed store standing in for the Unity bundle plumbing.
    #[derive(Debug, Default)]
    struct MapStore {
        files: HashMap<&'static str, Vec<u8>>,
    }

    impl AssetStore for MapStore {
        fn fetch_raw(&self, role: FileRole) -> CardTextResult<Vec<u8>> {
            self.files.get(role.file_name()).cloned().ok_or_else(|| {
                CardTextError::CorruptData(format!("missing file {}", role.file_name()))
            })
        }

        fn store_raw(&mut self, role: FileRole, bytes: &[u8]) -> CardTextResult<()> {
            self.files.insert(role.file_name(), bytes.to_vec());
            Ok(())
        }
    }

    fn seeded_store(corpus: &CardTextCorpus) -> MapStore {
        let engine = RebuildEngine {
            session: SessionContext::new(TEST_KEY),
            corpus: Some(corpus.clone()),
        };
        let mut store = MapStore::default();
        engine.commit_to(&mut store).expect("seeding should succeed");
        store
    }

    fn sample_corpus() -> CardTextCorpus {
        CardTextCorpus::from_pairs([
            ("Ace", "A strong card"),
            ("Bee", "A small card"),
            ("Cur", "A stray card"),
        ])
    }

    #[test]
    fn test_idle_engine_rejects_operations() {
        let mut engine = RebuildEngine::new(SessionContext::new(TEST_KEY));
        assert!(!engine.is_loaded());

        assert!(matches!(
            engine.edit_entry(0, Field::Name, "x"),
            Err(CardTextError::NotLoaded)
        ));
        assert!(matches!(engine.rebuild(), Err(CardTextError::NotLoaded)));
    }

    #[test]
    fn test_load_edit_rebuild_round_trip() {
        let store = seeded_store(&sample_corpus());
        let mut engine = RebuildEngine::new(SessionContext::new(TEST_KEY));

        engine.load_from(&store).expect("load should succeed");
        assert!(engine.is_loaded());
        assert_eq!(engine.corpus().expect("loaded").len(), 3);

        engine
            .edit_entry(1, Field::Name, "Hornet Queen")
            .expect("edit should succeed");

        let mut out = MapStore::default();
        engine.commit_to(&mut out).expect("commit should succeed");

        // A fresh engine reading the committed files sees the edit.
        let mut verify = RebuildEngine::new(SessionContext::new(TEST_KEY));
        verify.load_from(&out).expect("reload should succeed");
        let reloaded = verify.corpus().expect("loaded");
        assert_eq!(reloaded.get(1).expect("record 1").name, "Hornet Queen");
        // Edit isolation: every other field survives untouched.
        assert_eq!(reloaded.get(1).expect("record 1").description, "A small card");
        assert_eq!(reloaded.get(0).expect("record 0").name, "Ace");
        assert_eq!(reloaded.get(2).expect("record 2").description, "A stray card");
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let store = seeded_store(&sample_corpus());
        let mut engine = RebuildEngine::new(SessionContext::new(TEST_KEY));
        engine.load_from(&store).expect("load should succeed");

        let first = engine.rebuild().expect("rebuild should succeed");
        let second = engine.rebuild().expect("rebuild should succeed");
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_load_keeps_previous_corpus() {
        let store = seeded_store(&sample_corpus());
        let mut engine = RebuildEngine::new(SessionContext::new(TEST_KEY));
        engine.load_from(&store).expect("load should succeed");

        let result = engine.load(b"garbage", b"garbage", b"garbage");
        assert!(result.is_err());
        assert_eq!(engine.corpus().expect("still loaded").len(), 3);
    }

    #[test]
    fn test_load_with_wrong_key_fails_and_stays_idle() {
        let store = seeded_store(&sample_corpus());
        let mut engine = RebuildEngine::new(SessionContext::new(CryptoKey::new(8)));

        assert!(engine.load_from(&store).is_err());
        assert!(!engine.is_loaded());
    }

    #[test]
    fn test_edit_out_of_range_is_rejected() {
        let store = seeded_store(&sample_corpus());
        let mut engine = RebuildEngine::new(SessionContext::new(TEST_KEY));
        engine.load_from(&store).expect("load should succeed");

        let result = engine.edit_entry(3, Field::Description, "too far");
        assert!(matches!(
            result,
            Err(CardTextError::OutOfRangeEdit { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_replace_corpus_bulk() {
        let store = seeded_store(&sample_corpus());
        let mut engine = RebuildEngine::new(SessionContext::new(TEST_KEY));
        engine.load_from(&store).expect("load should succeed");

        let translation =
            CardTextCorpus::from_pairs([("As", "Eine starke Karte"), ("Biene", "Eine kleine Karte")]);
        engine
            .replace_corpus(translation.clone())
            .expect("bulk replace should succeed");

        assert_eq!(engine.corpus().expect("loaded"), &translation);
    }

    #[test]
    fn test_replace_corpus_requires_session() {
        let mut engine = RebuildEngine::new(SessionContext::new(TEST_KEY));
        let result = engine.replace_corpus(CardTextCorpus::default());
        assert!(matches!(result, Err(CardTextError::NotLoaded)));
    }

    #[test]
    fn test_establish_discovers_and_persists() {
        let store = seeded_store(&sample_corpus());
        let raw_index = store
            .fetch_raw(FileRole::Index)
            .expect("index should exist");

        let mut provider = MemoryKeyStore::new();
        let session =
            SessionContext::establish(&mut provider, &raw_index).expect("discovery should succeed");

        assert_eq!(session.key(), TEST_KEY);
        assert_eq!(
            provider.load().expect("load should succeed"),
            Some(TEST_KEY)
        );
    }

    #[test]
    fn test_establish_reuses_persisted_key() {
        let store = seeded_store(&sample_corpus());
        let raw_index = store
            .fetch_raw(FileRole::Index)
            .expect("index should exist");

        let mut provider = MemoryKeyStore::with_key(TEST_KEY);
        let session =
            SessionContext::establish(&mut provider, &raw_index).expect("validation should succeed");
        assert_eq!(session.key(), TEST_KEY);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(FileRole::Index.file_name(), "card_indx.bytes");
        assert_eq!(FileRole::Name.file_name(), "card_name.bytes");
        assert_eq!(FileRole::Description.file_name(), "card_desc.bytes");
    }
}
