//! Okapi BM25 relevance of pull-request text against issue keywords.
//!
//! # Scoring
//!
//! ```text
//! idf(t)      = ln(1 + (N - df(t) + 0.5) / (df(t) + 0.5))
//! score(d, q) = sum over t in q of
//!               idf(t) * tf(t,d) * (k1 + 1) / (tf(t,d) + k1 * (1 - b + b * |d| / avgdl))
//! ```
//!
//! The `+1` inside the logarithm keeps `idf` positive even for terms present
//! in every document, so adding a matching term never lowers a score.
//!
//! Document scores are then summed per author by [`rank_authors`]; an author
//! with many moderately relevant pull requests can outrank one with a single
//! strong match.

use std::collections::HashMap;

use recommend_core::error::ensure_finite;
use recommend_core::{Document, Query, RankError, RankedList, ScoredEntity};
use tracing::debug;

/// BM25 tuning constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation. `0` reduces BM25 to binary matching.
    pub k1: f64,
    /// Length normalisation strength in `[0, 1]`.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

impl Bm25Params {
    /// Build validated parameters.
    ///
    /// # Errors
    ///
    /// See [`Bm25Params::validate`].
    pub fn new(k1: f64, b: f64) -> Result<Self, RankError> {
        let params = Self { k1, b };
        params.validate()?;
        Ok(params)
    }

    /// # Errors
    ///
    /// Returns [`RankError::InvalidParameter`] when `k1` is non-finite or
    /// negative, or `b` is non-finite or outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), RankError> {
        if ensure_finite("k1", self.k1)? < 0.0 {
            return Err(RankError::InvalidParameter {
                name: "k1",
                value: self.k1,
                reason: "must be >= 0",
            });
        }
        if !(0.0..=1.0).contains(&ensure_finite("b", self.b)?) {
            return Err(RankError::InvalidParameter {
                name: "b",
                value: self.b,
                reason: "must be within [0, 1]",
            });
        }
        Ok(())
    }
}

/// BM25 score of the document at `index` in the corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentScore {
    pub index: usize,
    pub score: f64,
}

/// Smoothed Robertson-Sparck-Jones inverse document frequency.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn idf(corpus_size: usize, document_frequency: usize) -> f64 {
    let n = corpus_size as f64;
    let df = document_frequency as f64;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}

/// Score every document in `corpus` against `query`.
///
/// Results are in corpus order. An empty corpus yields an empty vector; an
/// empty query, or a document sharing no term with it, scores `0.0`.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] if `params` is invalid.
#[allow(clippy::cast_precision_loss)]
pub fn rank(
    corpus: &[Document],
    query: &Query,
    params: Bm25Params,
) -> Result<Vec<DocumentScore>, RankError> {
    params.validate()?;

    if corpus.is_empty() {
        return Ok(Vec::new());
    }

    let zeroes = || -> Vec<DocumentScore> {
        (0..corpus.len())
            .map(|index| DocumentScore { index, score: 0.0 })
            .collect()
    };

    let total_len: usize = corpus.iter().map(Document::len).sum();
    if query.is_empty() || total_len == 0 {
        return Ok(zeroes());
    }
    let avgdl = total_len as f64 / corpus.len() as f64;

    // Only query terms matter, so term frequencies are tracked for those alone.
    let term_freqs: Vec<HashMap<&str, usize>> = corpus
        .iter()
        .map(|doc| {
            let mut tf = HashMap::new();
            for token in doc.tokens() {
                if query.contains(token) {
                    *tf.entry(token.as_str()).or_insert(0) += 1;
                }
            }
            tf
        })
        .collect();

    let weights: Vec<(&str, f64)> = query
        .terms()
        .map(|term| {
            let df = term_freqs.iter().filter(|tf| tf.contains_key(term)).count();
            (term, idf(corpus.len(), df))
        })
        .collect();

    let scores = corpus
        .iter()
        .zip(&term_freqs)
        .enumerate()
        .map(|(index, (doc, tf))| {
            let norm = params.k1 * (1.0 - params.b + params.b * doc.len() as f64 / avgdl);
            let score = weights
                .iter()
                .filter_map(|(term, weight)| {
                    let tf = *tf.get(term)? as f64;
                    Some(weight * (tf * (params.k1 + 1.0)) / (tf + norm))
                })
                .sum();
            DocumentScore { index, score }
        })
        .collect();

    Ok(scores)
}

/// Rank authors by the sum of their documents' BM25 scores.
///
/// Every author in the corpus appears, including those scoring `0.0`. Ties
/// keep the order in which authors first appear in the corpus.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] if `params` is invalid.
pub fn rank_authors(
    corpus: &[Document],
    query: &Query,
    params: Bm25Params,
) -> Result<RankedList, RankError> {
    let scores = rank(corpus, query, params)?;

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ScoredEntity> = Vec::new();
    for DocumentScore { index, score } in scores {
        let author = corpus[index].author();
        match positions.get(author) {
            Some(&pos) => totals[pos].score += score,
            None => {
                positions.insert(author, totals.len());
                totals.push(ScoredEntity::new(author, score));
            }
        }
    }

    debug!(
        documents = corpus.len(),
        authors = totals.len(),
        terms = query.len(),
        "lexical ranking complete"
    );
    Ok(RankedList::from_first_seen(totals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(author: &str, text: &str) -> Document {
        Document::from_text(author, text, None).expect("valid document")
    }

    fn assert_approx_eq(actual: f64, expected: f64) {
        let tolerance = 1e-10;
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual ({actual}) != expected ({expected})"
        );
    }

    #[test]
    fn empty_corpus_yields_empty_result() {
        let scores = rank(&[], &Query::from_terms(["ssh"]), Bm25Params::default()).expect("rank");
        assert!(scores.is_empty());
    }

    #[test]
    fn empty_query_scores_zero() {
        let corpus = vec![doc("a", "ssh timeout"), doc("b", "docs typo")];
        let scores = rank(&corpus, &Query::default(), Bm25Params::default()).expect("rank");
        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn all_empty_documents_score_zero() {
        let corpus = vec![
            Document::new("a", Vec::<String>::new()).expect("doc"),
            Document::new("b", Vec::<String>::new()).expect("doc"),
        ];
        let scores = rank(&corpus, &Query::from_terms(["ssh"]), Bm25Params::default()).expect("rank");
        assert!(scores.iter().all(|s| s.score == 0.0 && s.score.is_finite()));
    }

    #[test]
    fn idf_matches_formula() {
        // N = 4, df = 1: ln(1 + 3.5 / 1.5)
        assert_approx_eq(idf(4, 1), (1.0_f64 + 3.5 / 1.5).ln());
        // Term in every document still has positive weight.
        assert!(idf(3, 3) > 0.0);
        // Absent term is finite.
        assert!(idf(3, 0).is_finite());
    }

    #[test]
    fn single_term_score_matches_hand_computation() {
        let corpus = vec![doc("a", "ssh ssh timeout"), doc("b", "docs only here now")];
        let scores = rank(&corpus, &Query::from_terms(["ssh"]), Bm25Params::default()).expect("rank");

        // N = 2, df = 1, |d0| = 3, avgdl = 3.5, tf = 2
        let idf = (1.0_f64 + 1.5 / 1.5).ln();
        let norm = 1.5 * (1.0 - 0.75 + 0.75 * 3.0 / 3.5);
        let expected = idf * (2.0 * 2.5) / (2.0 + norm);
        assert_approx_eq(scores[0].score, expected);
        assert_approx_eq(scores[1].score, 0.0);
    }

    #[test]
    fn relevant_document_scores_higher() {
        let corpus = vec![
            doc("a", "refactor logging output"),
            doc("b", "fix ssh connection timeout in ssh client"),
            doc("c", "bump version"),
        ];
        let query = Query::from_keywords(["SSH", "connection timeout"]);
        let scores = rank(&corpus, &query, Bm25Params::default()).expect("rank");
        assert!(scores[1].score > scores[0].score);
        assert!(scores[1].score > scores[2].score);
    }

    #[test]
    fn authors_accumulate_document_scores() {
        let corpus = vec![
            doc("alice", "ssh timeout"),
            doc("bob", "ssh"),
            doc("alice", "ssh retry"),
            doc("carol", "docs"),
        ];
        let query = Query::from_terms(["ssh"]);
        let docs = rank(&corpus, &query, Bm25Params::default()).expect("rank");
        let authors = rank_authors(&corpus, &query, Bm25Params::default()).expect("rank");

        assert_eq!(
            authors.identifiers().collect::<Vec<_>>(),
            vec!["alice", "bob", "carol"]
        );
        assert_approx_eq(
            authors.score_of("alice").expect("alice"),
            docs[0].score + docs[2].score,
        );
        assert_approx_eq(authors.score_of("carol").expect("carol"), 0.0);
    }

    #[test]
    fn zero_score_authors_keep_first_seen_order() {
        let corpus = vec![doc("zed", "a"), doc("amy", "b")];
        let authors =
            rank_authors(&corpus, &Query::from_terms(["nothing"]), Bm25Params::default())
                .expect("rank");
        assert_eq!(authors.identifiers().collect::<Vec<_>>(), vec!["zed", "amy"]);
    }

    #[test]
    fn k1_zero_is_binary_matching() {
        let corpus = vec![doc("a", "ssh ssh ssh"), doc("b", "ssh x y")];
        let params = Bm25Params::new(0.0, 0.75).expect("params");
        let scores = rank(&corpus, &Query::from_terms(["ssh"]), params).expect("rank");
        assert_approx_eq(scores[0].score, scores[1].score);
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(Bm25Params::new(f64::NAN, 0.75).is_err());
        assert!(Bm25Params::new(1.2, f64::INFINITY).is_err());
        assert!(Bm25Params::new(-1.0, 0.75).is_err());
        assert!(Bm25Params::new(1.2, 1.01).is_err());

        let bad = Bm25Params { k1: 1.5, b: -0.5 };
        assert!(matches!(
            rank(&[], &Query::default(), bad),
            Err(RankError::InvalidParameter { name: "b", .. })
        ));
    }
}
