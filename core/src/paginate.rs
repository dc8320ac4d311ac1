use crate::DocId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub doc_ids: Vec<DocId>,
    pub page_number: u64,
    pub page_size: usize,
    pub total_results: usize,
}

/// Reads a 1-based page number. Missing, unparsable or zero falls back to 1.
pub fn parse_page_number(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

/// Cuts page `page_number` (1-based) of `page_size` entries out of `ranked`.
/// Pages past the end are empty.
pub fn paginate(ranked: &[DocId], page_number: u64, page_size: usize) -> Page {
    let page_number = page_number.max(1);
    let (lower, upper) = bounds(ranked.len(), page_number, page_size);
    let doc_ids = if lower < upper { ranked[lower..upper].to_vec() } else { Vec::new() };
    Page { doc_ids, page_number, page_size, total_results: ranked.len() }
}

fn bounds(len: usize, page_number: u64, page_size: usize) -> (usize, usize) {
    let size = page_size as u64;
    let lower = (page_number - 1).saturating_mul(size).min(len as u64) as usize;
    let upper = page_number.saturating_mul(size).min(len as u64) as usize;
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<DocId> {
        (0..n).map(|i| format!("https://site{i}.example")).collect()
    }

    #[test]
    fn first_and_last_page() {
        let ranked = ids(120);
        let first = paginate(&ranked, 1, 50);
        assert_eq!(first.doc_ids.len(), 50);
        assert_eq!(first.doc_ids[0], ranked[0]);
        let last = paginate(&ranked, 3, 50);
        assert_eq!(last.doc_ids, ranked[100..].to_vec());
        assert_eq!(last.total_results, 120);
    }

    #[test]
    fn far_page_is_empty() {
        let page = paginate(&ids(10), 1_000, 50);
        assert!(page.doc_ids.is_empty());
        assert_eq!(page.total_results, 10);
        assert_eq!(page.page_number, 1_000);
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let page = paginate(&ids(3), u64::MAX, usize::MAX);
        assert!(page.doc_ids.is_empty());
    }

    #[test]
    fn empty_ranking() {
        let page = paginate(&[], 1, 50);
        assert!(page.doc_ids.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[test]
    fn page_number_parsing() {
        assert_eq!(parse_page_number(None), 1);
        assert_eq!(parse_page_number(Some("")), 1);
        assert_eq!(parse_page_number(Some("abc")), 1);
        assert_eq!(parse_page_number(Some("-2")), 1);
        assert_eq!(parse_page_number(Some("0")), 1);
        assert_eq!(parse_page_number(Some(" 4 ")), 4);
    }
}
