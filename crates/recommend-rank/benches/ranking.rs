#![allow(clippy::cast_possible_truncation)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use recommend_core::{CommitEvent, Document, Query};
use recommend_rank::{Bm25Params, aggregate, filter_human, fuse, rank_authors};

const TIERS: &[(&str, usize)] = &[("small", 100), ("medium", 1_000), ("large", 10_000)];

const VOCABULARY: &[&str] = &[
    "fix", "ssh", "timeout", "parser", "cache", "login", "docs", "build", "retry", "socket",
    "config", "panic", "unicode", "windows", "release", "flaky", "test", "api", "memory", "leak",
];

const AUTHORS: &[&str] = &[
    "alice",
    "bob",
    "carol",
    "dave",
    "erin",
    "dependabot[bot]",
    "frank",
    "grace",
    "github-actions",
    "heidi",
];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Deterministic corpus: token choice walks the vocabulary with a stride
/// coprime to its length.
fn synthetic_documents(count: usize) -> Vec<Document> {
    (0..count)
        .filter_map(|i| {
            let len = 4 + i % 12;
            let tokens = (0..len).map(|j| VOCABULARY[(i * 7 + j * 3) % VOCABULARY.len()]);
            Document::new(AUTHORS[i % AUTHORS.len()], tokens).ok()
        })
        .collect()
}

fn synthetic_events(count: usize) -> Vec<CommitEvent> {
    (0..count)
        .filter_map(|i| {
            let author = AUTHORS[(i * 3) % AUTHORS.len()];
            let ts = now() - Duration::hours((i * 13 % 2_000) as i64);
            CommitEvent::new(Some(author.to_string()), author, ts, "src/lib.rs").ok()
        })
        .collect()
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking.tiered");
    let query = Query::from_keywords(["ssh timeout", "retry"]);

    for &(name, size) in TIERS {
        let documents = synthetic_documents(size);
        let events = synthetic_events(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("bm25", name), &documents, |b, docs| {
            b.iter(|| black_box(rank_authors(docs, &query, Bm25Params::default())));
        });

        group.bench_with_input(BenchmarkId::new("recency", name), &events, |b, events| {
            b.iter(|| black_box(aggregate(events, now(), 20)));
        });
    }

    group.finish();
}

fn bench_fusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking.fusion");

    for lists in [2usize, 8, 32] {
        let rankings: Vec<Vec<String>> = (0..lists)
            .map(|l| (0..50).map(|i| format!("user{}", (i * (l + 1)) % 70)).collect())
            .collect();
        group.bench_with_input(BenchmarkId::new("rrf", lists), &rankings, |b, rankings| {
            b.iter(|| black_box(fuse(rankings, 60.0, 10)));
        });
    }

    let ids: Vec<&str> = AUTHORS.iter().copied().cycle().take(1_000).collect();
    group.bench_function("filter_human", |b| b.iter(|| black_box(filter_human(&ids))));

    group.finish();
}

criterion_group!(benches, bench_ranking, bench_fusion);
criterion_main!(benches);
