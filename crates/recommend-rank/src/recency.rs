//! Recency-weighted contributor activity.
//!
//! Each retained commit adds `1` to its author's count and
//! `1 / (days_since + 1)` to the author's recency score:
//!
//! | age        | recency weight |
//! |------------|----------------|
//! | same day   | 1.0            |
//! | 1 day      | 0.5            |
//! | 10 days    | ~0.091         |
//!
//! The combined score is `count + recency_score`. Recency is bounded by the
//! count, so it mostly separates authors with equal commit counts in favour
//! of the one who committed more recently.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use recommend_core::{AuthorStats, CommitEvent, RankedList, ScoredEntity};
use tracing::debug;

/// Whole days elapsed between `timestamp` and `now`, floored and clamped at
/// zero so future-dated commits count as "today".
#[must_use]
pub fn days_since(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> i64 {
    (now - timestamp).num_days().max(0)
}

/// `1 / (days + 1)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn recency_weight(days: i64) -> f64 {
    1.0 / (days.max(0) as f64 + 1.0)
}

/// Per-author statistics over the `limit` most recent events.
///
/// Events are ordered newest first (stable, so equal timestamps keep input
/// order) and truncated to `limit` across all files. The result lists authors
/// in the order they are first seen in that truncated sequence.
#[must_use]
pub fn aggregate_stats(
    events: &[CommitEvent],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<(String, AuthorStats)> {
    let mut recent: Vec<&CommitEvent> = events.iter().collect();
    recent.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    recent.truncate(limit);

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<(String, AuthorStats)> = Vec::new();
    for event in recent {
        let author = event.author();
        let pos = *positions.entry(author).or_insert_with(|| {
            stats.push((author.to_string(), AuthorStats::default()));
            stats.len() - 1
        });
        let entry = &mut stats[pos].1;
        entry.count += 1;
        entry.recency_score += recency_weight(days_since(now, event.timestamp()));
    }

    debug!(
        events = events.len(),
        retained = events.len().min(limit),
        authors = stats.len(),
        "recency aggregation complete"
    );
    stats
}

/// Rank authors by `count + recency_score` over the `limit` most recent
/// events. Zero events or `limit == 0` yield an empty ranking.
#[must_use]
pub fn aggregate(events: &[CommitEvent], now: DateTime<Utc>, limit: usize) -> RankedList {
    let scored = aggregate_stats(events, now, limit)
        .into_iter()
        .map(|(author, stats)| ScoredEntity::new(author, stats.combined()))
        .collect();
    RankedList::from_first_seen(scored)
}
