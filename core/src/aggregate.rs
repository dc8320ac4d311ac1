use crate::{Aggregate, AggregateScore, DocId, Postings, Weight};

/// Folds per-term postings into one score per document.
#[derive(Debug, Default)]
pub struct ScoreAggregator {
    scores: Aggregate,
}

impl ScoreAggregator {
    pub fn new() -> Self { Self::default() }

    /// Adds one term's postings. A document gains exactly one term hit per
    /// call no matter how it got into `postings`.
    pub fn fold(&mut self, postings: &Postings) {
        for (doc_id, &weight) in postings {
            let entry = self.scores.entry(doc_id.clone()).or_default();
            entry.total_score += i64::from(weight);
            entry.term_hits += 1;
        }
    }

    pub fn len(&self) -> usize { self.scores.len() }

    pub fn is_empty(&self) -> bool { self.scores.is_empty() }

    pub fn finish(self) -> Aggregate { self.scores }
}

/// Aggregates the postings of every query term. Term order does not matter.
pub fn aggregate<'a, I>(term_postings: I) -> Aggregate
where
    I: IntoIterator<Item = &'a Postings>,
{
    let mut aggregator = ScoreAggregator::new();
    for postings in term_postings {
        aggregator.fold(postings);
    }
    aggregator.finish()
}

/// Builds a term's postings from raw pairs. Repeated documents keep the
/// last weight seen.
pub fn collapse_postings<I>(pairs: I) -> Postings
where
    I: IntoIterator<Item = (DocId, Weight)>,
{
    pairs.into_iter().collect()
}

impl AggregateScore {
    pub fn new(total_score: i64, term_hits: u32) -> Self {
        Self { total_score, term_hits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postings(pairs: &[(&str, Weight)]) -> Postings {
        pairs.iter().map(|(d, w)| (d.to_string(), *w)).collect()
    }

    #[test]
    fn worked_example() {
        let ai = postings(&[("d1", 1), ("d2", 2)]);
        let domain = postings(&[("d1", 1), ("d2", 2), ("d3", 1)]);
        let agg = aggregate([&ai, &domain]);
        assert_eq!(agg.len(), 3);
        assert_eq!(agg["d1"], AggregateScore::new(2, 2));
        assert_eq!(agg["d2"], AggregateScore::new(4, 2));
        assert_eq!(agg["d3"], AggregateScore::new(1, 1));
    }

    #[test]
    fn empty_terms_contribute_nothing() {
        let empty = Postings::new();
        assert!(aggregate([&empty, &empty]).is_empty());
        assert!(aggregate(std::iter::empty::<&Postings>()).is_empty());
    }

    #[test]
    fn single_posting() {
        let only = postings(&[("d1", 7)]);
        let agg = aggregate([&only]);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg["d1"], AggregateScore::new(7, 1));
    }

    #[test]
    fn duplicate_pairs_collapse_last_wins() {
        let p = collapse_postings(vec![("d1".to_string(), 3), ("d1".to_string(), 9)]);
        assert_eq!(p.len(), 1);
        assert_eq!(p["d1"], 9);
        let agg = aggregate([&p]);
        assert_eq!(agg["d1"], AggregateScore::new(9, 1));
    }

    #[test]
    fn incremental_fold_matches_batch() {
        let a = postings(&[("x", 5), ("y", 1)]);
        let b = postings(&[("y", 4)]);
        let mut aggregator = ScoreAggregator::new();
        aggregator.fold(&a);
        assert_eq!(aggregator.len(), 2);
        aggregator.fold(&b);
        assert_eq!(aggregator.finish(), aggregate([&a, &b]));
    }

    #[test]
    fn zero_weight_still_counts_as_hit() {
        let p = postings(&[("d1", 0)]);
        let agg = aggregate([&p, &p]);
        assert_eq!(agg["d1"], AggregateScore::new(0, 2));
    }
}
