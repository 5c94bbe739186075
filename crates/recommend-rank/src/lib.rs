#![forbid(unsafe_code)]
//! recommend-rank library.
//!
//! Pure ranking components for contributor recommendation:
//!
//! - [`lexical`]: BM25 scoring of pull-request text, summed per author.
//! - [`recency`]: commit counts plus `1/(days+1)` recency decay.
//! - [`fusion`]: Reciprocal Rank Fusion of any number of rankings.
//! - [`human`]: regex-based bot filtering.
//! - [`pipeline`]: the two-signal recommendation flow.
//!
//! None of these hold state between calls or touch the network.
//!
//! # Conventions
//!
//! - **Errors**: `recommend_core::RankError` for invalid parameters.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod fusion;
pub mod human;
pub mod lexical;
pub mod pipeline;
pub mod recency;

pub use fusion::{DEFAULT_RRF_K, FusedEntity, fuse, fuse_scored};
pub use human::{DEFAULT_BOT_PATTERNS, HumanFilter, filter_human, is_human};
pub use lexical::{Bm25Params, DocumentScore, rank, rank_authors};
pub use pipeline::{Recommendation, RecommendRequest, recommend};
pub use recency::{aggregate, aggregate_stats};
