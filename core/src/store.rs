//! Sled-backed inverted index and site metadata.
//!
//! Layout:
//! - `indexedwords`: `term 0x00 !weight(u32 BE) url` -> empty, so a prefix
//!   scan yields a term's postings heaviest first, ties by url
//! - `pagewords`: `url` -> bincode `Vec<(term, weight)>` currently indexed
//! - `sitemetadata`: `url` -> bincode [`SiteMetadata`]
//! - `meta`: `"index"` -> bincode [`IndexMeta`]

use crate::search::{IndexLookup, MetadataStore};
use crate::{DocId, Postings, SiteMetadata, Weight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const WORDS_TREE: &str = "indexedwords";
const PAGE_WORDS_TREE: &str = "pagewords";
const METADATA_TREE: &str = "sitemetadata";
const META_TREE: &str = "meta";
const META_KEY: &[u8] = b"index";
const KEY_SEPARATOR: u8 = 0;
const WEIGHT_LEN: usize = std::mem::size_of::<Weight>();

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),
    #[error("codec: {0}")]
    Codec(#[from] bincode::Error),
    #[error("stored key is not utf-8: {0}")]
    Key(#[from] std::string::FromUtf8Error),
    #[error("stored word key is truncated")]
    TruncatedKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub num_pages: u64,
    pub created_at: String,
    pub version: u32,
}

pub struct SledStore {
    db: sled::Db,
    words: sled::Tree,
    page_words: sled::Tree,
    metadata: sled::Tree,
    meta: sled::Tree,
    page_size: usize,
}

impl SledStore {
    /// Opens (or creates) the store at `path`. `page_size` bounds how many
    /// postings a lookup returns per requested page.
    pub fn open<P: AsRef<Path>>(path: P, page_size: usize) -> Result<Self, StoreError> {
        Self::from_db(sled::open(path)?, page_size)
    }

    pub fn temporary(page_size: usize) -> Result<Self, StoreError> {
        Self::from_db(sled::Config::new().temporary(true).open()?, page_size)
    }

    fn from_db(db: sled::Db, page_size: usize) -> Result<Self, StoreError> {
        Ok(Self {
            words: db.open_tree(WORDS_TREE)?,
            page_words: db.open_tree(PAGE_WORDS_TREE)?,
            metadata: db.open_tree(METADATA_TREE)?,
            meta: db.open_tree(META_TREE)?,
            db,
            page_size,
        })
    }

    pub fn page_size(&self) -> usize { self.page_size }

    /// Number of pages with stored metadata.
    pub fn page_count(&self) -> usize { self.metadata.len() }

    /// Inserts or replaces the display data of `url`.
    pub fn write_indexed_page(
        &self,
        url: &str,
        title: &str,
        description: &str,
    ) -> Result<(), StoreError> {
        let metadata = SiteMetadata {
            title: title.to_string(),
            description: description.to_string(),
        };
        let value = bincode::serialize(&metadata)?;
        self.metadata.insert(url.as_bytes(), value)?;
        Ok(())
    }

    /// Replaces the weighted words of `url`; words indexed by an earlier
    /// write and missing now stop matching. Returns how many were written.
    pub fn write_indexed_words<I>(&self, url: &str, words: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = (String, Weight)>,
    {
        let words: Vec<(String, Weight)> = words.into_iter().collect();
        let mut batch = sled::Batch::default();
        if let Some(previous) = self.page_words.get(url.as_bytes())? {
            let previous: Vec<(String, Weight)> = bincode::deserialize(&previous)?;
            for (word, weight) in &previous {
                batch.remove(word_key(word, *weight, url));
            }
        }
        for (word, weight) in &words {
            batch.insert(word_key(word, *weight, url), Vec::<u8>::new());
        }
        self.words.apply_batch(batch)?;
        self.page_words.insert(url.as_bytes(), bincode::serialize(&words)?)?;
        Ok(words.len())
    }

    pub fn write_meta(&self, meta: &IndexMeta) -> Result<(), StoreError> {
        self.meta.insert(META_KEY, bincode::serialize(meta)?)?;
        Ok(())
    }

    pub fn load_meta(&self) -> Result<Option<IndexMeta>, StoreError> {
        match self.meta.get(META_KEY)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// The `limit` heaviest postings of `term`, ties broken by url. Reads
    /// at most `limit` keys.
    pub fn top_postings(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<(DocId, Weight)>, StoreError> {
        let prefix = term_prefix(term);
        let mut postings = Vec::new();
        for entry in self.words.scan_prefix(&prefix).take(limit) {
            let (key, _) = entry?;
            let rest = &key[prefix.len()..];
            if rest.len() < WEIGHT_LEN {
                return Err(StoreError::TruncatedKey);
            }
            let (weight_bytes, url_bytes) = rest.split_at(WEIGHT_LEN);
            let mut inverted = [0u8; WEIGHT_LEN];
            inverted.copy_from_slice(weight_bytes);
            let weight = !Weight::from_be_bytes(inverted);
            postings.push((String::from_utf8(url_bytes.to_vec())?, weight));
        }
        Ok(postings)
    }

    pub fn flush(&self) -> Result<usize, StoreError> {
        Ok(self.db.flush()?)
    }
}

impl IndexLookup for SledStore {
    fn lookup(&self, term: &str, page: u64) -> anyhow::Result<Postings> {
        let pages = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
        let limit = self.page_size.saturating_mul(pages);
        Ok(self.top_postings(term, limit)?.into_iter().collect())
    }
}

impl MetadataStore for SledStore {
    fn resolve(&self, doc_ids: &[DocId]) -> anyhow::Result<HashMap<DocId, SiteMetadata>> {
        let mut found = HashMap::with_capacity(doc_ids.len());
        for doc_id in doc_ids {
            if let Some(bytes) = self.metadata.get(doc_id.as_bytes())? {
                let meta: SiteMetadata = bincode::deserialize(&bytes)?;
                found.insert(doc_id.clone(), meta);
            }
        }
        Ok(found)
    }
}

fn term_prefix(term: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(term.len() + 1);
    key.extend_from_slice(term.as_bytes());
    key.push(KEY_SEPARATOR);
    key
}

// inverted weight sorts heavier postings first
fn word_key(term: &str, weight: Weight, url: &str) -> Vec<u8> {
    let mut key = term_prefix(term);
    key.extend_from_slice(&(!weight).to_be_bytes());
    key.extend_from_slice(url.as_bytes());
    key
}
