//! Typed records for code-hosting payloads.
//!
//! Field names follow the GitHub REST shapes so a snapshot can be assembled
//! straight from API responses. Conversion into [`Document`] and
//! [`CommitEvent`] is the only way provider data reaches the ranking core.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RankError;
use crate::model::{CommitEvent, Document};

/// An open issue to find contributors for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Label names. Accepts plain strings or GitHub label objects.
    #[serde(default, deserialize_with = "label_names")]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub login: String,
}

/// A closed pull request from the repository history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// `null` for deleted ("ghost") accounts.
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl PullRequest {
    /// Tokenize title and body into a [`Document`] owned by the PR author.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::EmptyIdentifier`] if the PR has no author login.
    pub fn to_document(&self) -> Result<Document, RankError> {
        let login = self.user.as_ref().map_or("", |u| u.login.as_str());
        Document::from_text(login, &self.title, self.body.as_deref())
    }
}

/// One hit from a code search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSearchHit {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSignature {
    pub name: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub author: GitSignature,
}

/// A commit as listed for one file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// File the commit was listed for.
    pub path: String,
    #[serde(default)]
    pub sha: Option<String>,
    /// Linked account; `null` when the commit email maps to no account.
    #[serde(default)]
    pub author: Option<UserRef>,
    pub commit: CommitDetail,
}

impl CommitRecord {
    /// Convert to a [`CommitEvent`], falling back to the git author name when
    /// there is no linked account.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::EmptyIdentifier`] if both login and name are blank.
    pub fn to_event(&self) -> Result<CommitEvent, RankError> {
        CommitEvent::new(
            self.author.as_ref().map(|u| u.login.clone()),
            self.commit.author.name.clone(),
            self.commit.author.date,
            self.path.clone(),
        )
    }
}

/// Everything fetched for one issue, materialised on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// `owner/repo` or a repository URL.
    #[serde(default)]
    pub repository: Option<String>,
    pub issue: Issue,
    /// Pre-extracted keywords; when absent a keyword provider is consulted.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,
    #[serde(default)]
    pub code_search: Vec<CodeSearchHit>,
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }
}

/// Split a repository URL (or `owner/repo`) into `(owner, repo)`.
///
/// # Errors
///
/// Returns an error when fewer than two path segments are present.
pub fn parse_repo_url(url: &str) -> Result<(String, String)> {
    let trimmed = url.trim();
    let path = match trimmed.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => trimmed,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
        bail!("Invalid GitHub URL format. Expected: https://github.com/owner/repo");
    };
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    Ok((owner.to_string(), repo.to_string()))
}

/// Keep the first `limit` paths whose extension is in `allowed_extensions`.
///
/// Extensions are compared case-insensitively and include the leading dot
/// (`".rs"`). Paths without an extension never match.
#[must_use]
pub fn select_code_paths<'a, I>(paths: I, allowed_extensions: &[String], limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let allowed: Vec<String> = allowed_extensions
        .iter()
        .map(|ext| ext.to_ascii_lowercase())
        .collect();

    paths
        .into_iter()
        .filter(|path| {
            Path::new(path)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| allowed.contains(&format!(".{}", ext.to_ascii_lowercase())))
        })
        .take(limit)
        .map(ToString::to_string)
        .collect()
}

fn label_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Name(String),
        Object { name: String },
    }

    let labels = Option::<Vec<Label>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(labels
        .into_iter()
        .map(|label| match label {
            Label::Name(name) | Label::Object { name } => name,
        })
        .collect())
}
