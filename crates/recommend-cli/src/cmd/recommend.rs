//! `git-recommend recommend`: rank likely contributors for one issue.
//!
//! Reads a JSON snapshot (issue, closed PRs, code-search hits, commits),
//! resolves keywords and config, then runs the lexical + recency pipeline.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use recommend_core::config::{RecommendConfig, resolve_config};
use recommend_core::keywords::{KeywordFile, KeywordProvider, StaticKeywords, TitleTerms};
use recommend_core::provider::{Snapshot, parse_repo_url, select_code_paths};
use recommend_core::{CommitEvent, Document, RankedList};
use recommend_rank::{FusedEntity, HumanFilter, RecommendRequest, recommend};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// JSON snapshot with the issue and repository history.
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Keyword file (`[{issue_number, keywords, ...}]`). Overrides snapshot keywords.
    #[arg(long, value_name = "FILE")]
    pub keywords_file: Option<PathBuf>,

    /// Config file. Defaults to `.git-recommend.toml`, then the user config.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reference time for recency decay (RFC 3339). Defaults to now.
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<DateTime<Utc>>,

    /// Number of contributors to recommend.
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// RRF constant; lower values reward rank-1 agreement more.
    #[arg(long, value_name = "K", allow_negative_numbers = true)]
    pub rrf_k: Option<f64>,
}

/// Full command output.
#[derive(Debug, Serialize)]
pub struct RecommendOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub issue: u64,
    pub title: String,
    pub keywords: Vec<String>,
    pub query_terms: Vec<String>,
    pub code_paths: Vec<String>,
    pub contributors: Vec<FusedEntity>,
    pub lexical: RankedList,
    pub recency: RankedList,
}

/// Run the recommendation pipeline on a snapshot file.
///
/// # Errors
///
/// Returns an error if the snapshot, keyword file or config cannot be
/// loaded, or a ranking parameter is invalid.
pub fn run_recommend(args: &RecommendArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let snapshot = Snapshot::load(&args.snapshot)?;
    let mut config = resolve_config(args.config.as_deref(), project_root)?;
    apply_overrides(&mut config, args);

    let filter = HumanFilter::from_config(&config.filter).context("Failed to build bot filter")?;

    let keywords = extract_keywords(&snapshot, args.keywords_file.as_deref())?;
    info!(issue = snapshot.issue.number, keywords = keywords.len(), "extracted keywords");

    let documents = collect_documents(&snapshot);
    let events = collect_events(&snapshot);

    let code_paths = select_code_paths(
        snapshot.code_search.iter().map(|hit| hit.path.as_str()),
        &config.paths.allowed_extensions,
        config.paths.limit,
    );
    debug!(?code_paths, "selected code paths");

    let request = RecommendRequest {
        keywords: &keywords,
        documents: &documents,
        events: &events,
        // No code-search hits: the snapshot's commits are already scoped.
        code_paths: (!snapshot.code_search.is_empty()).then_some(code_paths.as_slice()),
    };
    let now = args.now.unwrap_or_else(Utc::now);
    let result = recommend(&request, &config, &filter, now)?;

    let repository = snapshot
        .repository
        .as_deref()
        .and_then(|repo| match parse_repo_url(repo) {
            Ok((owner, name)) => Some(format!("{owner}/{name}")),
            Err(e) => {
                warn!(repository = repo, error = %e, "ignoring repository field");
                None
            }
        });

    let out = RecommendOutput {
        repository,
        issue: snapshot.issue.number,
        title: snapshot.issue.title.clone(),
        keywords,
        query_terms: result.query_terms,
        code_paths,
        contributors: result.fused,
        lexical: result.lexical,
        recency: result.recency,
    };

    render_mode(output, &out, render_text, render_pretty)
}

fn apply_overrides(config: &mut RecommendConfig, args: &RecommendArgs) {
    if let Some(top_n) = args.top_n {
        config.fusion.top_n = top_n;
    }
    if let Some(k) = args.rrf_k {
        config.fusion.k = k;
    }
}

/// `--keywords-file` wins over snapshot keywords; title terms are the fallback.
fn extract_keywords(snapshot: &Snapshot, keywords_file: Option<&Path>) -> Result<Vec<String>> {
    let provider: Box<dyn KeywordProvider> = match (keywords_file, &snapshot.keywords) {
        (Some(path), _) => Box::new(KeywordFile::load(path)?),
        (None, Some(keywords)) => Box::new(StaticKeywords::new(keywords)),
        (None, None) => Box::new(TitleTerms::default()),
    };
    provider
        .extract_keywords(&snapshot.issue)
        .with_context(|| format!("Failed to extract keywords for issue #{}", snapshot.issue.number))
}

fn collect_documents(snapshot: &Snapshot) -> Vec<Document> {
    snapshot
        .pull_requests
        .iter()
        .filter_map(|pr| match pr.to_document() {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(pr = pr.number, error = %e, "skipping pull request without author");
                None
            }
        })
        .collect()
}

fn collect_events(snapshot: &Snapshot) -> Vec<CommitEvent> {
    snapshot
        .commits
        .iter()
        .filter_map(|commit| match commit.to_event() {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(path = %commit.path, error = %e, "skipping unattributed commit");
                None
            }
        })
        .collect()
}

fn render_text(out: &RecommendOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if out.contributors.is_empty() {
        writeln!(w, "advice  no-candidates  issue={}", out.issue)?;
        return Ok(());
    }
    for entity in &out.contributors {
        writeln!(w, "{}  score={:.5}", entity.id, entity.score)?;
    }
    Ok(())
}

fn render_pretty(out: &RecommendOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = match &out.repository {
        Some(repo) => format!("{repo}#{}: {}", out.issue, out.title),
        None => format!("#{}: {}", out.issue, out.title),
    };
    pretty_section(w, &heading)?;
    pretty_kv(w, "Keywords", out.keywords.join(", "))?;
    if !out.code_paths.is_empty() {
        pretty_kv(w, "Code paths", out.code_paths.join(", "))?;
    }
    writeln!(w)?;

    if out.contributors.is_empty() {
        writeln!(w, "No human contributors found for this issue.")?;
        writeln!(w, "Try a broader keyword list or a longer commit history.")?;
        return Ok(());
    }

    writeln!(w, "{:<4}  {:<24}  {:>8}  {:>7}  {:>7}", "#", "CONTRIBUTOR", "RRF", "TEXT", "RECENT")?;
    for (i, entity) in out.contributors.iter().enumerate() {
        let rank_in = |list: usize| {
            entity
                .ranks
                .get(list)
                .copied()
                .flatten()
                .map_or_else(|| "-".to_string(), |r| r.to_string())
        };
        writeln!(
            w,
            "{:<4}  {:<24}  {:>8.5}  {:>7}  {:>7}",
            i + 1,
            entity.id,
            entity.score,
            rank_in(0),
            rank_in(1)
        )?;
    }
    Ok(())
}
