//! Turning crawled pages into weighted index entries.

use crate::tokenizer::{is_stopword, word_terms};
use crate::{DocId, Weight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Words whose summed weight ends up at or below this are not indexed.
pub const MIN_WORD_WEIGHT: u64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub words: Vec<CrawledWord>,
}

/// A word as counted by the crawler, with the HTML element it appeared in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledWord {
    pub word: String,
    pub parent: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedPage {
    pub url: DocId,
    pub title: String,
    pub description: String,
    pub words: HashMap<String, Weight>,
}

pub fn tag_multiplier(parent: &str) -> u64 {
    match parent {
        "title" => 30,
        "h1" => 20,
        "h2" => 18,
        "h3" => 16,
        "h4" => 14,
        "h5" => 12,
        "h6" => 10,
        "a" => 5,
        _ => 1,
    }
}

impl IndexedPage {
    pub fn from_crawled_page(page: CrawledPage) -> Self {
        let mut sums: HashMap<String, u64> = HashMap::new();
        for word in &page.words {
            let weight = u64::from(word.count) * tag_multiplier(&word.parent.to_ascii_lowercase());
            for term in word_terms(&word.word) {
                if is_stopword(&term) { continue; }
                *sums.entry(term).or_insert(0) += weight;
            }
        }

        let words = sums
            .into_iter()
            .filter(|(_, weight)| *weight > MIN_WORD_WEIGHT)
            .map(|(term, weight)| (term, Weight::try_from(weight).unwrap_or(Weight::MAX)))
            .collect();

        Self { url: page.url, title: page.title, description: page.description, words }
    }
}
