#![forbid(unsafe_code)]
//! recommend-core library.
//!
//! Data model, error taxonomy, configuration and provider records shared by
//! the ranking crate and the CLI.
//!
//! # Conventions
//!
//! - **Errors**: `RankError` (thiserror) inside the ranking model,
//!   `anyhow::Result` for file loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod keywords;
pub mod model;
pub mod provider;

pub use error::{ErrorCode, RankError};
pub use model::{
    AuthorStats, CommitEvent, Document, Query, RankedList, ScoredEntity, dedupe_keywords,
    tokenize,
};
