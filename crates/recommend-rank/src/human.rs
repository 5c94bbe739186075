//! Bot-account detection.
//!
//! Identifiers are matched case-insensitively against whole-string regex
//! patterns. The patterns are plain data: [`DEFAULT_BOT_PATTERNS`] covers
//! common automation accounts and callers may replace or extend it.

use std::sync::LazyLock;

use recommend_core::config::FilterConfig;
use recommend_core::{RankError, RankedList};
use regex::{Regex, RegexSet};

/// Built-in patterns for non-human accounts.
///
/// Each pattern must match the whole identifier.
pub const DEFAULT_BOT_PATTERNS: &[&str] = &[
    r".*bot",
    r"bot-.*",
    r".*bot-.*",
    r".*\[bot\].*",
    r"dependabot.*",
    r".*[-_.]ci",
    r".*[-_.]ci[-_.].*",
    r".*actions?",
    r"web-flow",
    r"github-actions",
    r".*automation.*",
    r"pre-?commit",
    r".*travis.*",
    r".*circleci.*",
    r".*mergify.*",
];

static DEFAULT_FILTER: LazyLock<HumanFilter> = LazyLock::new(|| {
    HumanFilter::new(DEFAULT_BOT_PATTERNS).expect("built-in bot patterns compile")
});

/// Classifies identifiers as human or bot.
#[derive(Debug, Clone)]
pub struct HumanFilter {
    patterns: Vec<String>,
    set: RegexSet,
}

impl HumanFilter {
    /// Build a filter from bot patterns.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidPattern`] naming the first pattern that
    /// fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        let anchored: Vec<String> = patterns.iter().map(|p| anchor(p)).collect();
        for (raw, full) in patterns.iter().zip(&anchored) {
            Regex::new(full).map_err(|source| RankError::InvalidPattern {
                pattern: raw.clone(),
                source,
            })?;
        }

        let set = RegexSet::new(&anchored).map_err(|source| RankError::InvalidPattern {
            pattern: patterns.join(" | "),
            source,
        })?;
        Ok(Self { patterns, set })
    }

    /// Built-in patterns plus `extra`.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidPattern`] if an extra pattern is invalid.
    pub fn with_extra<I, S>(extra: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra: Vec<String> = extra.into_iter().map(|p| p.as_ref().to_string()).collect();
        Self::new(DEFAULT_BOT_PATTERNS.iter().map(|p| (*p).to_string()).chain(extra))
    }

    /// Build the filter described by a `[filter]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidPattern`] if a configured pattern is invalid.
    pub fn from_config(config: &FilterConfig) -> Result<Self, RankError> {
        match &config.patterns {
            Some(patterns) => Self::new(patterns.iter().chain(&config.extra_patterns)),
            None if config.extra_patterns.is_empty() => Ok(Self::default()),
            None => Self::with_extra(&config.extra_patterns),
        }
    }

    /// Patterns as supplied (without anchoring).
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// `true` unless `identifier` matches a bot pattern.
    #[must_use]
    pub fn is_human(&self, identifier: &str) -> bool {
        !self.set.is_match(identifier)
    }

    /// Keep human identifiers, preserving order.
    #[must_use]
    pub fn filter_human<S>(&self, identifiers: &[S]) -> Vec<S>
    where
        S: AsRef<str> + Clone,
    {
        identifiers
            .iter()
            .filter(|id| self.is_human(id.as_ref()))
            .cloned()
            .collect()
    }

    /// Remove bot entries from a ranking in place. Relative order is kept.
    pub fn retain_humans(&self, list: &mut RankedList) {
        list.retain(|id| self.is_human(id));
    }
}

impl Default for HumanFilter {
    fn default() -> Self {
        DEFAULT_FILTER.clone()
    }
}

/// [`HumanFilter::is_human`] with the built-in patterns.
#[must_use]
pub fn is_human(identifier: &str) -> bool {
    DEFAULT_FILTER.is_human(identifier)
}

/// [`HumanFilter::filter_human`] with the built-in patterns.
#[must_use]
pub fn filter_human<S>(identifiers: &[S]) -> Vec<S>
where
    S: AsRef<str> + Clone,
{
    DEFAULT_FILTER.filter_human(identifiers)
}

fn anchor(pattern: &str) -> String {
    format!("(?i)^(?:{pattern})$")
}
