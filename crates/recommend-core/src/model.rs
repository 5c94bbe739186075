//! Typed inputs and outputs of the ranking core.
//!
//! Everything here is plain in-memory data: the orchestrator validates and
//! converts provider payloads into these types before any ranking runs.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RankError;

/// Case-fold `text` and split it on whitespace.
///
/// Punctuation stays attached to words, so `"fix:"` and `"fix"` are distinct
/// terms. Keywords go through the same function, which keeps query terms and
/// document terms comparable.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Deduplicate keywords, keeping the first occurrence of each.
///
/// Keywords are trimmed; blank entries are dropped. Comparison is exact, so
/// `"API"` and `"api"` both survive here and only collapse once tokenized.
#[must_use]
pub fn dedupe_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            continue;
        }
        if seen.insert(keyword.to_string()) {
            unique.push(keyword.to_string());
        }
    }
    unique
}

fn non_empty(field: &'static str, value: &str) -> Result<(), RankError> {
    if value.trim().is_empty() {
        Err(RankError::EmptyIdentifier { field })
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Document / Query
// ---------------------------------------------------------------------------

/// One scored unit of text (a pull request) owned by an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    author: String,
    tokens: Vec<String>,
}

impl Document {
    /// Build a document from pre-split tokens. Tokens are case-folded.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::EmptyIdentifier`] if `author` is blank.
    pub fn new<I, S>(author: impl Into<String>, tokens: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let author = author.into();
        non_empty("document.author", &author)?;
        Ok(Self {
            author,
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        })
    }

    /// Build a document from a title and optional body.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::EmptyIdentifier`] if `author` is blank.
    pub fn from_text(
        author: impl Into<String>,
        title: &str,
        body: Option<&str>,
    ) -> Result<Self, RankError> {
        let mut tokens = tokenize(title);
        if let Some(body) = body {
            tokens.extend(tokenize(body));
        }
        Self::new(author, tokens)
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Document length `|d|` in tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Unique, unordered set of case-folded query terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    terms: BTreeSet<String>,
}

impl Query {
    /// Build a query from extracted keywords.
    ///
    /// Keywords are deduplicated, then each one is tokenized, so the keyword
    /// `"integration tests"` contributes `integration` and `tests`.
    #[must_use]
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = dedupe_keywords(keywords)
            .iter()
            .flat_map(|keyword| tokenize(keyword))
            .collect();
        Self { terms }
    }

    /// Build a query from individual terms. Each term is case-folded as-is.
    #[must_use]
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// Terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// An identifier with a producer-specific score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub id: String,
    pub score: f64,
}

impl ScoredEntity {
    #[must_use]
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

impl AsRef<str> for ScoredEntity {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

/// Entities ordered by score descending.
///
/// Equal scores keep the order in which the entities were supplied, so the
/// same inputs always produce the same list. Only [`RankedList::from_first_seen`]
/// builds one; the list serializes as a plain array but never deserializes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RankedList {
    entries: Vec<ScoredEntity>,
}

impl RankedList {
    /// Sort `entries` (given in first-seen order) by score descending.
    #[must_use]
    pub fn from_first_seen(mut entries: Vec<ScoredEntity>) -> Self {
        debug_assert!(entries.iter().all(|e| e.score.is_finite()));
        // `sort_by` is stable: ties keep first-seen order.
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[ScoredEntity] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<ScoredEntity> {
        self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredEntity> {
        self.entries.iter()
    }

    /// Identifiers in rank order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Score of `id`, if ranked.
    #[must_use]
    pub fn score_of(&self, id: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.score)
    }

    /// Keep only the top `n` entries.
    pub fn truncate(&mut self, n: usize) {
        self.entries.truncate(n);
    }

    /// Drop entries whose identifier fails `keep`. Order is preserved.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|e| keep(&e.id));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AsRef<[ScoredEntity]> for RankedList {
    fn as_ref(&self) -> &[ScoredEntity] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a ScoredEntity;
    type IntoIter = std::slice::Iter<'a, ScoredEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Commit events
// ---------------------------------------------------------------------------

/// One commit touching one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEvent {
    login: Option<String>,
    display_name: String,
    timestamp: DateTime<Utc>,
    path: String,
}

impl CommitEvent {
    /// Build an event. A blank `login` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::EmptyIdentifier`] when neither `login` nor
    /// `display_name` carries a usable identifier.
    pub fn new(
        login: Option<String>,
        display_name: impl Into<String>,
        timestamp: DateTime<Utc>,
        path: impl Into<String>,
    ) -> Result<Self, RankError> {
        let login = login.filter(|l| !l.trim().is_empty());
        let display_name = display_name.into();
        if login.is_none() {
            non_empty("commit.author", &display_name)?;
        }
        Ok(Self {
            login,
            display_name,
            timestamp,
            path: path.into(),
        })
    }

    /// Author identifier: the login when present, otherwise the display name.
    #[must_use]
    pub fn author(&self) -> &str {
        self.login.as_deref().unwrap_or(&self.display_name)
    }

    #[must_use]
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Per-author accumulator built by the recency aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AuthorStats {
    pub count: u64,
    pub recency_score: f64,
}

impl AuthorStats {
    /// `count + recency_score`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn combined(&self) -> f64 {
        self.count as f64 + self.recency_score
    }
}
