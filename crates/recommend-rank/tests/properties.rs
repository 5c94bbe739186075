//! Property tests for the ranking core.
//!
//! Covers: empty-query zero scores, BM25 term-frequency monotonicity, fusion
//! symmetry and single-list identity, unanimous rank-1 winners, and filter
//! idempotence.

use proptest::prelude::*;
use recommend_core::{Document, Query};
use recommend_rank::{Bm25Params, filter_human, fuse, fuse_scored, rank};

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_token() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "ssh", "api", "timeout", "parser", "cache", "login", "docs", "build", "retry", "socket",
    ])
    .prop_map(str::to_string)
}

fn arb_document() -> impl Strategy<Value = Document> {
    ("[a-z]{1,8}", prop::collection::vec(arb_token(), 0..12))
        .prop_map(|(author, tokens)| Document::new(author, tokens).expect("non-empty author"))
}

fn arb_corpus() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(arb_document(), 0..12)
}

/// A ranking with unique identifiers drawn from a small alphabet so lists
/// overlap often.
fn arb_ranking() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-h]", 0..8).prop_map(|ids| {
        let mut seen = std::collections::HashSet::new();
        ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
    })
}

fn arb_params() -> impl Strategy<Value = Bm25Params> {
    (0.0f64..3.0, 0.0f64..=1.0).prop_map(|(k1, b)| Bm25Params { k1, b })
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    // BM25
    #[test]
    fn empty_query_scores_every_document_zero(corpus in arb_corpus(), params in arb_params()) {
        let scores = rank(&corpus, &Query::default(), params).expect("valid params");
        prop_assert_eq!(scores.len(), corpus.len());
        prop_assert!(scores.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn scores_are_finite_and_non_negative(
        corpus in arb_corpus(),
        terms in prop::collection::vec(arb_token(), 0..5),
        params in arb_params(),
    ) {
        let scores = rank(&corpus, &Query::from_terms(terms), params).expect("valid params");
        for s in scores {
            prop_assert!(s.score.is_finite());
            prop_assert!(s.score >= 0.0);
        }
    }

    #[test]
    fn score_is_monotone_in_term_frequency(
        others in prop::collection::vec(arb_document(), 0..6),
        tf in 1usize..6,
        filler in 1usize..6,
        params in arb_params(),
    ) {
        // Replace one filler token with the query term: |d| and avgdl stay
        // fixed, df stays fixed because tf >= 1 on both sides.
        let build = |tf: usize, filler: usize| {
            let tokens = std::iter::repeat_n("needle", tf).chain(std::iter::repeat_n("hay", filler));
            let mut corpus = vec![Document::new("target", tokens).expect("doc")];
            corpus.extend(others.iter().cloned());
            corpus
        };
        let query = Query::from_terms(["needle"]);
        let before = rank(&build(tf, filler), &query, params).expect("rank")[0].score;
        let after = rank(&build(tf + 1, filler - 1), &query, params).expect("rank")[0].score;
        prop_assert!(after >= before - 1e-12, "tf {tf}->{}: {before} > {after}", tf + 1);
    }

    // Fusion
    #[test]
    fn fusion_is_symmetric(rankings in prop::collection::vec(arb_ranking(), 0..4)) {
        let mut reversed = rankings.clone();
        reversed.reverse();
        let forward = fuse(&rankings, 60.0, usize::MAX).expect("fuse");
        let backward = fuse(&reversed, 60.0, usize::MAX).expect("fuse");
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn single_ranking_is_identity(ranking in arb_ranking(), k in 0.0f64..200.0) {
        let fused = fuse(&[ranking.clone()], k, ranking.len()).expect("fuse");
        prop_assert_eq!(fused, ranking);
    }

    #[test]
    fn unanimous_first_place_wins(
        tails in prop::collection::vec(arb_ranking(), 1..4),
        k in 0.0f64..200.0,
    ) {
        let rankings: Vec<Vec<String>> = tails
            .into_iter()
            .map(|tail| {
                std::iter::once("winner".to_string())
                    .chain(tail.into_iter().filter(|id| id != "winner"))
                    .collect()
            })
            .collect();
        let fused = fuse_scored(&rankings, k).expect("fuse");
        prop_assert_eq!(fused[0].id.as_str(), "winner");
        if let Some(runner_up) = fused.get(1) {
            prop_assert!(fused[0].score > runner_up.score);
        }
    }

    // Human filter
    #[test]
    fn filter_human_is_idempotent(ids in prop::collection::vec("[a-z\\-\\[\\]]{1,12}", 0..12)) {
        let once = filter_human(&ids);
        let twice = filter_human(&once);
        prop_assert_eq!(once, twice);
    }
}
