//! Ranking engine for multi-term keyword search.
//!
//! Query terms are looked up one by one in the inverted index, their
//! postings folded into per-document scores ([`aggregate()`]), ordered with
//! a two-pass radix sort ([`rank()`]) and cut into pages ([`paginate()`]).
//! Storage sits behind the [`search::IndexLookup`] and
//! [`search::MetadataStore`] traits; [`store::SledStore`] implements both.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod aggregate;
pub mod page;
pub mod paginate;
pub mod rank;
pub mod search;
pub mod store;
pub mod tokenizer;

pub use aggregate::{aggregate, collapse_postings, ScoreAggregator};
pub use paginate::{paginate, parse_page_number, Page};
pub use rank::{radix_sort_by_key, rank, RankError};

/// Identifier of an indexed resource. In practice this is the page URL.
pub type DocId = String;
pub type Weight = u32;

/// Postings of a single term: document -> weight.
pub type Postings = HashMap<DocId, Weight>;

/// Running score of one document across all terms of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateScore {
    /// Sum of the weights of every term that matched the document.
    pub total_score: i64,
    /// Number of distinct query terms that matched the document.
    pub term_hits: u32,
}

pub type Aggregate = HashMap<DocId, AggregateScore>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub doc_id: DocId,
    pub total_score: i64,
    pub term_hits: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
}
