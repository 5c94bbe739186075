//! End-to-end contributor recommendation over materialised inputs.
//!
//! ```text
//! keywords ──► Query ──► BM25 over PR documents ──► authors ──► HumanFilter ──┐
//!                                                                            ├─► RRF ──► top N
//! commits on selected paths ──► recency aggregation ──► HumanFilter ─────────┘
//! ```
//!
//! Nothing here performs I/O. Fetching, keyword extraction and rendering are
//! the caller's business.

use chrono::{DateTime, Utc};
use recommend_core::config::RecommendConfig;
use recommend_core::{CommitEvent, Document, Query, RankError, RankedList};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::fusion::{FusedEntity, fuse_scored};
use crate::human::HumanFilter;
use crate::lexical::{Bm25Params, rank_authors};
use crate::recency::aggregate;

/// Inputs for one recommendation run.
#[derive(Debug, Clone, Copy)]
pub struct RecommendRequest<'a> {
    /// Extracted keywords, possibly with duplicates.
    pub keywords: &'a [String],
    /// Pull-request documents.
    pub documents: &'a [Document],
    /// Commit events for candidate files.
    pub events: &'a [CommitEvent],
    /// When set, only events on these paths are aggregated.
    pub code_paths: Option<&'a [String]>,
}

/// Outcome of a recommendation run, with both intermediate rankings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Query terms in lexicographic order.
    pub query_terms: Vec<String>,
    /// Human authors by BM25 relevance, truncated to the lexical candidate count.
    pub lexical: RankedList,
    /// Human authors by commit activity, truncated to the recency candidate count.
    pub recency: RankedList,
    /// Final fused ranking, truncated to `fusion.top_n`.
    pub fused: Vec<FusedEntity>,
}

impl Recommendation {
    /// Recommended identifiers, best first.
    pub fn contributors(&self) -> impl Iterator<Item = &str> {
        self.fused.iter().map(|entity| entity.id.as_str())
    }
}

/// Run both signals and fuse them.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] if `config` holds an invalid
/// BM25 or RRF parameter.
#[instrument(skip_all, fields(
    documents = request.documents.len(),
    events = request.events.len(),
    keywords = request.keywords.len(),
))]
pub fn recommend(
    request: &RecommendRequest<'_>,
    config: &RecommendConfig,
    filter: &HumanFilter,
    now: DateTime<Utc>,
) -> Result<Recommendation, RankError> {
    config.validate()?;

    let query = Query::from_keywords(request.keywords);
    if query.is_empty() {
        warn!("no query terms; lexical ranking will score every author 0");
    }

    let params = Bm25Params::new(config.lexical.k1, config.lexical.b)?;
    let mut lexical = rank_authors(request.documents, &query, params)?;
    filter.retain_humans(&mut lexical);
    lexical.truncate(config.lexical.candidates);

    let events: Vec<CommitEvent> = match request.code_paths {
        Some(paths) => request
            .events
            .iter()
            .filter(|event| paths.iter().any(|p| p == event.path()))
            .cloned()
            .collect(),
        None => request.events.to_vec(),
    };
    let mut recency = aggregate(&events, now, config.recency.commit_limit);
    filter.retain_humans(&mut recency);
    recency.truncate(config.recency.candidates);

    debug!(
        lexical = lexical.len(),
        recency = recency.len(),
        "fusing candidate rankings"
    );

    let mut fused = fuse_scored(&[&lexical, &recency], config.fusion.k)?;
    fused.retain(|entity| filter.is_human(&entity.id));
    fused.truncate(config.fusion.top_n);

    Ok(Recommendation {
        query_terms: query.terms().map(ToString::to_string).collect(),
        lexical,
        recency,
        fused,
    })
}
