use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-zA-Z0-9 ]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Splits raw query text into lowercase alphanumeric terms.
///
/// Text is NFKC-normalized, every run of characters outside `[a-zA-Z0-9 ]`
/// becomes a space, and repeated terms are kept once (first occurrence wins)
/// so each distinct term counts a single hit per document.
pub fn normalize_query(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    normalized_tokens(text)
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Terms an indexed word is stored under, normalized exactly like query
/// text so that `"Don't"` in a page is found by the query `don't`.
pub fn word_terms(word: &str) -> Vec<String> {
    normalized_tokens(word)
}

fn normalized_tokens(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>();
    let stripped = NON_ALNUM.replace_all(&normalized, " ").to_lowercase();
    stripped.split_whitespace().map(str::to_string).collect()
}
