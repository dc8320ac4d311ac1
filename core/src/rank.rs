use crate::{Aggregate, DocId, RankedEntry};
use thiserror::Error;

const RADIX: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("radix sort key must be non-negative, got {key}")]
    NegativeKey { key: i64 },
}

/// Orders the aggregate by term hits, then total score, both descending.
///
/// Two stable ascending radix passes (score, then hits) followed by one
/// reversal. Entries are laid out in descending id order before the first
/// pass, so documents tied on both keys come out in ascending id order.
pub fn rank(aggregate: &Aggregate) -> Result<Vec<DocId>, RankError> {
    Ok(rank_entries(aggregate)?.into_iter().map(|e| e.doc_id).collect())
}

pub fn rank_entries(aggregate: &Aggregate) -> Result<Vec<RankedEntry>, RankError> {
    let mut entries: Vec<RankedEntry> = aggregate
        .iter()
        .map(|(doc_id, score)| RankedEntry {
            doc_id: doc_id.clone(),
            total_score: score.total_score,
            term_hits: score.term_hits,
        })
        .collect();
    if entries.len() <= 1 {
        return Ok(entries);
    }

    entries.sort_unstable_by(|a, b| b.doc_id.cmp(&a.doc_id));
    let by_score = radix_sort_by_key(entries, |e| e.total_score)?;
    let mut ranked = radix_sort_by_key(by_score, |e| i64::from(e.term_hits))?;
    ranked.reverse();
    Ok(ranked)
}

/// Stable ascending LSD radix sort (base 10) over non-negative integer keys.
pub fn radix_sort_by_key<T, F>(items: Vec<T>, key: F) -> Result<Vec<T>, RankError>
where
    F: Fn(&T) -> i64,
{
    let mut maximum: u64 = 0;
    for item in &items {
        let k = key(item);
        if k < 0 {
            return Err(RankError::NegativeKey { key: k });
        }
        maximum = maximum.max(k as u64);
    }

    let unsigned_key = |item: &T| key(item) as u64;
    let mut items = items;
    let mut exponent: u64 = 1;
    while exponent <= maximum {
        items = counting_sort_by_digit(items, &unsigned_key, exponent);
        exponent = match exponent.checked_mul(RADIX) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(items)
}

fn counting_sort_by_digit<T, F>(items: Vec<T>, key: &F, exponent: u64) -> Vec<T>
where
    F: Fn(&T) -> u64,
{
    let digit = |item: &T| ((key(item) / exponent) % RADIX) as usize;

    let mut count = [0usize; RADIX as usize];
    for item in &items {
        count[digit(item)] += 1;
    }
    for i in 1..count.len() {
        count[i] += count[i - 1];
    }

    // back to front keeps equal digits in input order
    let mut output: Vec<Option<T>> = std::iter::repeat_with(|| None).take(items.len()).collect();
    for item in items.into_iter().rev() {
        let d = digit(&item);
        count[d] -= 1;
        output[count[d]] = Some(item);
    }
    output.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AggregateScore;

    fn agg(entries: &[(&str, i64, u32)]) -> Aggregate {
        entries
            .iter()
            .map(|(d, s, h)| (d.to_string(), AggregateScore::new(*s, *h)))
            .collect()
    }

    #[test]
    fn worked_example_order() {
        let a = agg(&[("d1", 2, 2), ("d2", 4, 2), ("d3", 1, 1)]);
        assert_eq!(rank(&a).unwrap(), vec!["d2", "d1", "d3"]);
    }

    #[test]
    fn hits_dominate_score() {
        let a = agg(&[("many", 3, 3), ("heavy", 900, 1), ("mid", 40, 2)]);
        assert_eq!(rank(&a).unwrap(), vec!["many", "mid", "heavy"]);
    }

    #[test]
    fn full_ties_are_ordered_by_id() {
        let a = agg(&[("c", 5, 1), ("a", 5, 1), ("b", 5, 1), ("z", 6, 1)]);
        assert_eq!(rank(&a).unwrap(), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn degenerate_sizes() {
        assert!(rank(&Aggregate::new()).unwrap().is_empty());
        assert_eq!(rank(&agg(&[("only", 3, 1)])).unwrap(), vec!["only"]);
    }

    #[test]
    fn negative_key_is_rejected() {
        let a = agg(&[("ok", 1, 1), ("bad", -4, 1)]);
        assert_eq!(rank(&a), Err(RankError::NegativeKey { key: -4 }));
        assert!(radix_sort_by_key(vec![3i64, -1], |k| *k).is_err());
    }

    #[test]
    fn radix_sort_multi_digit() {
        let sorted = radix_sort_by_key(vec![170i64, 45, 75, 90, 802, 24, 2, 66], |k| *k).unwrap();
        assert_eq!(sorted, vec![2, 24, 45, 66, 75, 90, 170, 802]);
    }

    #[test]
    fn radix_sort_is_stable() {
        // (key, original position)
        let items = vec![(22, 0), (1, 1), (20, 2), (1, 3), (2, 4), (22, 5), (2, 6)];
        let sorted = radix_sort_by_key(items, |(k, _)| *k).unwrap();
        assert_eq!(sorted, vec![(1, 1), (1, 3), (2, 4), (2, 6), (20, 2), (22, 0), (22, 5)]);
    }

    #[test]
    fn radix_sort_all_zero_and_extremes() {
        let zeros = radix_sort_by_key(vec![(0i64, 'a'), (0, 'b')], |(k, _)| *k).unwrap();
        assert_eq!(zeros, vec![(0, 'a'), (0, 'b')]);
        let wide = radix_sort_by_key(vec![i64::MAX, 0, 10_000_000_000], |k| *k).unwrap();
        assert_eq!(wide, vec![0, 10_000_000_000, i64::MAX]);
    }
}
