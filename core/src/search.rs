//! Query pipeline: lookup, aggregate, rank, paginate, resolve metadata.

use crate::{paginate, rank, DocId, Postings, RankError, ScoreAggregator, SiteMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;

/// Inverted index access: postings of one normalized term.
pub trait IndexLookup {
    /// Returns the postings for `term` needed to serve result page `page`.
    fn lookup(&self, term: &str, page: u64) -> anyhow::Result<Postings>;
}

/// Display data for ranked documents.
pub trait MetadataStore {
    /// Ids without stored metadata are left out of the returned map.
    /// An empty `doc_ids` must succeed with an empty map.
    fn resolve(&self, doc_ids: &[DocId]) -> anyhow::Result<HashMap<DocId, SiteMetadata>>;
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("ranking failed: {0}")]
    Rank(#[from] RankError),
    #[error("error getting metadata")]
    Metadata(#[source] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "url")]
    pub urls: Vec<DocId>,
    pub metadata: HashMap<DocId, SiteMetadata>,
    #[serde(rename = "elapsedtime")]
    pub elapsed_time_ms: u64,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "pageNo")]
    pub page_no: u64,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
}

/// Runs one query over already normalized `terms`.
///
/// A term whose lookup fails is skipped. Metadata is fetched for the
/// requested page only, and a failure there fails the whole query.
pub fn search<I, M>(
    index: &I,
    metadata: &M,
    terms: &[String],
    page_number: u64,
    page_size: usize,
) -> Result<SearchResults, SearchError>
where
    I: IndexLookup + ?Sized,
    M: MetadataStore + ?Sized,
{
    let start = Instant::now();

    let mut aggregator = ScoreAggregator::new();
    for term in terms {
        match index.lookup(term, page_number) {
            Ok(postings) => aggregator.fold(&postings),
            Err(err) => tracing::warn!(term = %term, error = %err, "term lookup failed, skipping"),
        }
    }
    let matched = aggregator.len();

    let ranked = rank(&aggregator.finish())?;
    let page = paginate(&ranked, page_number, page_size);
    let metadata = metadata.resolve(&page.doc_ids).map_err(SearchError::Metadata)?;

    let elapsed_time_ms = start.elapsed().as_millis() as u64;
    tracing::debug!(
        terms = terms.len(),
        matched,
        returned = page.doc_ids.len(),
        elapsed_time_ms,
        "search complete"
    );

    Ok(SearchResults {
        urls: page.doc_ids,
        metadata,
        elapsed_time_ms,
        total_results: page.total_results,
        page_no: page.page_number,
        page_size: page.page_size,
    })
}
