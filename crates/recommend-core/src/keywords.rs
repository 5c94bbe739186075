//! Keyword extraction capability.
//!
//! Extraction quality is not this crate's concern: any backend (an LLM, a
//! rule set, a test fixture) plugs in through [`KeywordProvider`] and the
//! ranking code only ever sees the resulting strings.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::dedupe_keywords;
use crate::provider::Issue;

/// Turns an issue into a list of technical keywords.
pub trait KeywordProvider {
    /// Extract keywords from the issue's title, body and labels.
    ///
    /// # Errors
    ///
    /// Implementations report backend failures; an issue with nothing to
    /// extract should yield an empty list instead.
    fn extract_keywords(&self, issue: &Issue) -> Result<Vec<String>>;
}

/// A fixed keyword list, independent of the issue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticKeywords {
    keywords: Vec<String>,
}

impl StaticKeywords {
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: dedupe_keywords(keywords),
        }
    }
}

impl KeywordProvider for StaticKeywords {
    fn extract_keywords(&self, _issue: &Issue) -> Result<Vec<String>> {
        Ok(self.keywords.clone())
    }
}

/// One entry of a keyword file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub issue_number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Keywords extracted ahead of time and stored as a JSON array of
/// [`KeywordEntry`] records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordFile {
    entries: Vec<KeywordEntry>,
}

impl KeywordFile {
    #[must_use]
    pub const fn from_entries(entries: Vec<KeywordEntry>) -> Self {
        Self { entries }
    }

    /// Read a keyword file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let entries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse keyword file {}", path.display()))?;
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }
}

impl KeywordProvider for KeywordFile {
    fn extract_keywords(&self, issue: &Issue) -> Result<Vec<String>> {
        let matching: Vec<&KeywordEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.issue_number == issue.number)
            .collect();
        if matching.is_empty() {
            warn!(issue = issue.number, "keyword file has no entry for issue");
        }
        Ok(dedupe_keywords(
            matching.iter().flat_map(|entry| entry.keywords.iter()),
        ))
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "can", "does", "doesn't", "for",
    "from", "has", "have", "how", "if", "in", "into", "is", "it", "its", "not", "of", "on",
    "or", "should", "that", "the", "this", "to", "was", "when", "where", "which", "while",
    "with", "without", "would",
];

/// Rule-based fallback: title words plus labels.
///
/// Title words are case-folded, stripped of surrounding punctuation, and kept
/// when they are not stop words and at least `min_len` characters long.
/// Labels are always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTerms {
    pub min_len: usize,
}

impl Default for TitleTerms {
    fn default() -> Self {
        Self { min_len: 3 }
    }
}

impl KeywordProvider for TitleTerms {
    fn extract_keywords(&self, issue: &Issue) -> Result<Vec<String>> {
        let words = issue
            .title
            .split_whitespace()
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|word| word.chars().count() >= self.min_len)
            .filter(|word| !STOP_WORDS.contains(&word.as_str()));

        Ok(dedupe_keywords(words.chain(issue.labels.iter().cloned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(number: u64, title: &str, labels: &[&str]) -> Issue {
        Issue {
            number,
            title: title.to_string(),
            body: None,
            labels: labels.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn static_keywords_are_deduplicated() {
        let provider = StaticKeywords::new(["ssh", "api", "ssh"]);
        let keywords = provider
            .extract_keywords(&issue(1, "anything", &[]))
            .expect("keywords");
        assert_eq!(keywords, vec!["ssh", "api"]);
    }

    #[test]
    fn keyword_file_selects_matching_issue() {
        let file = KeywordFile::from_entries(vec![
            KeywordEntry {
                issue_number: 1,
                title: "one".into(),
                keywords: vec!["galaxy".into()],
                labels: vec![],
            },
            KeywordEntry {
                issue_number: 2,
                title: "two".into(),
                keywords: vec!["ssh".into(), "timeout".into(), "ssh".into()],
                labels: vec![],
            },
        ]);
        let keywords = file
            .extract_keywords(&issue(2, "two", &[]))
            .expect("keywords");
        assert_eq!(keywords, vec!["ssh", "timeout"]);

        let none = file
            .extract_keywords(&issue(3, "three", &[]))
            .expect("keywords");
        assert!(none.is_empty());
    }

    #[test]
    fn keyword_file_parses_extraction_output() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("kw.json");
        std::fs::write(
            &path,
            r#"[{"issue_number": 5, "title": "t", "keywords": ["RHEL", "S3 bucket"], "labels": ["bug"]}]"#,
        )
        .expect("write");
        let file = KeywordFile::load(&path).expect("load");
        assert_eq!(file.entries().len(), 1);
        assert_eq!(file.entries()[0].keywords, vec!["RHEL", "S3 bucket"]);
    }

    #[test]
    fn title_terms_drop_stop_words_and_short_tokens() {
        let keywords = TitleTerms::default()
            .extract_keywords(&issue(
                9,
                "Timeout in the SSH connection (paramiko) on CI",
                &["networking"],
            ))
            .expect("keywords");
        assert_eq!(
            keywords,
            vec!["timeout", "ssh", "connection", "paramiko", "networking"]
        );
    }
}
