use criterion::{criterion_group, criterion_main, Criterion};
use search_core::{aggregate, rank, Postings};

fn term_postings(terms: usize, docs: usize) -> Vec<Postings> {
    (0..terms)
        .map(|t| {
            (0..docs)
                .filter(|d| (d + t) % 3 != 0)
                .map(|d| (format!("https://site{d}.example/"), ((d * 7919 + t * 104_729) % 5_000) as u32))
                .collect()
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let terms = term_postings(4, 20_000);
    let agg = aggregate(&terms);
    c.bench_function("aggregate_4x20k", |b| b.iter(|| aggregate(&terms)));
    c.bench_function("rank_20k", |b| b.iter(|| rank(&agg).unwrap()));
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
