//! Contributor ranking fusion via Reciprocal Rank Fusion (RRF).
//!
//! The lexical and recency rankings score on unrelated scales (BM25 sums vs.
//! commit counts), so they are combined by rank position only.
//!
//! # Algorithm Overview
//!
//! ```text
//! RRF score = sum over all lists of: 1 / (k + rank_in_list)
//! ```
//!
//! Where:
//! - `k` is a constant (default 60) that reduces the impact of high ranks.
//!   Lower values sharpen the advantage of agreeing on rank 1.
//! - Ranks are 1-indexed; items absent from a list contribute 0.
//! - Results are sorted by fused score descending, then by best rank in any
//!   list, then by identifier.
//!
//! # Example
//!
//! ```
//! use recommend_rank::fusion::fuse;
//!
//! let by_text = vec!["alice", "bob", "carol"];
//! let by_recency = vec!["bob", "dave", "alice"];
//! let fused = fuse(&[by_text, by_recency], 60.0, 2).unwrap();
//! assert_eq!(fused, vec!["bob", "alice"]);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use recommend_core::RankError;
use recommend_core::error::ensure_finite;
use serde::Serialize;
use tracing::trace;

/// Default RRF constant.
pub const DEFAULT_RRF_K: f64 = 60.0;

/// A fused identifier with its per-list rank breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedEntity {
    pub id: String,

    /// Sum of `1 / (k + rank)` over the lists containing `id`.
    pub score: f64,

    /// Lowest 1-based rank across all input lists.
    pub best_rank: usize,

    /// 1-based rank in each input list, `None` where absent. Indexed like
    /// the `rankings` argument.
    pub ranks: Vec<Option<usize>>,
}

/// Check the RRF constant.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] when `k` is non-finite or
/// negative.
pub fn validate_k(k: f64) -> Result<f64, RankError> {
    if ensure_finite("k", k)? < 0.0 {
        return Err(RankError::InvalidParameter {
            name: "k",
            value: k,
            reason: "must be >= 0",
        });
    }
    Ok(k)
}

/// Fuse ranked lists of identifiers into one consensus ranking.
///
/// Accepts any number of lists, each ordered best first. `RankedList`,
/// `Vec<&str>` and `Vec<String>` all work as list types. An identifier
/// repeated inside one list only counts at its first position.
///
/// The fused score sums contributions in ascending rank order, so the
/// result does not depend on the order of `rankings`.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] for an invalid `k`.
#[allow(clippy::cast_precision_loss)]
pub fn fuse_scored<R, S>(rankings: &[R], k: f64) -> Result<Vec<FusedEntity>, RankError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let k = validate_k(k)?;

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut fused: Vec<FusedEntity> = Vec::new();

    for (list_idx, ranking) in rankings.iter().enumerate() {
        for (idx, item) in ranking.as_ref().iter().enumerate() {
            let id = item.as_ref();
            let rank = idx + 1; // 1-indexed
            let pos = *positions.entry(id).or_insert_with(|| {
                fused.push(FusedEntity {
                    id: id.to_string(),
                    score: 0.0,
                    best_rank: usize::MAX,
                    ranks: vec![None; rankings.len()],
                });
                fused.len() - 1
            });

            let entity = &mut fused[pos];
            if entity.ranks[list_idx].is_some() {
                trace!(id, list = list_idx, rank, "ignoring repeated identifier");
                continue;
            }
            entity.ranks[list_idx] = Some(rank);
            entity.best_rank = entity.best_rank.min(rank);
        }
    }

    for entity in &mut fused {
        let mut ranks: Vec<usize> = entity.ranks.iter().flatten().copied().collect();
        ranks.sort_unstable();
        entity.score = ranks.iter().map(|&r| 1.0 / (k + r as f64)).sum();
    }

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.best_rank.cmp(&b.best_rank))
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(fused)
}

/// Fuse ranked lists and return the top `top_n` identifiers.
///
/// `top_n == 0` returns an empty vector.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] for an invalid `k`.
pub fn fuse<R, S>(rankings: &[R], k: f64, top_n: usize) -> Result<Vec<String>, RankError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut fused = fuse_scored(rankings, k)?;
    fused.truncate(top_n);
    Ok(fused.into_iter().map(|entity| entity.id).collect())
}
