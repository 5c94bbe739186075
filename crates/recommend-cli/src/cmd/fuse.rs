//! `git-recommend fuse`: Reciprocal Rank Fusion over ranking files.

use crate::output::{OutputMode, pretty_section, render_mode};
use anyhow::{Context, Result};
use clap::Args;
use recommend_rank::{DEFAULT_RRF_K, FusedEntity, fuse_scored};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct FuseArgs {
    /// JSON files, each an array of identifiers ordered best first.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// RRF constant.
    #[arg(long, value_name = "K", default_value_t = DEFAULT_RRF_K, allow_negative_numbers = true)]
    pub rrf_k: f64,

    /// Maximum number of fused identifiers to print.
    #[arg(short = 'n', long, default_value_t = 3)]
    pub top_n: usize,
}

#[derive(Debug, Serialize)]
pub struct FuseOutput {
    pub k: f64,
    pub lists: usize,
    pub results: Vec<FusedEntity>,
}

/// Fuse the rankings stored in `args.files`.
///
/// # Errors
///
/// Returns an error if a file is unreadable or not a JSON string array, or
/// if `--rrf-k` is invalid.
pub fn run_fuse(args: &FuseArgs, output: OutputMode) -> Result<()> {
    let rankings = args
        .files
        .iter()
        .map(|path| load_ranking(path))
        .collect::<Result<Vec<_>>>()?;

    let mut results = fuse_scored(&rankings, args.rrf_k)?;
    results.truncate(args.top_n);

    let out = FuseOutput {
        k: args.rrf_k,
        lists: rankings.len(),
        results,
    };
    render_mode(output, &out, render_text, render_pretty)
}

fn load_ranking(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Expected a JSON array of identifiers in {}", path.display()))
}

fn render_text(out: &FuseOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for entity in &out.results {
        writeln!(w, "{}  score={:.5}", entity.id, entity.score)?;
    }
    Ok(())
}

fn render_pretty(out: &FuseOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("RRF over {} list(s), k={}", out.lists, out.k))?;
    for (i, entity) in out.results.iter().enumerate() {
        writeln!(w, "{:<4}  {:<24}  {:>8.5}", i + 1, entity.id, entity.score)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_ranking_reads_string_array() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("a.json");
        std::fs::write(&path, r#"["alice", "bob"]"#).expect("write");
        assert_eq!(load_ranking(&path).expect("load"), vec!["alice", "bob"]);
    }

    #[test]
    fn load_ranking_rejects_objects() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("a.json");
        std::fs::write(&path, r#"{"alice": 1}"#).expect("write");
        let err = load_ranking(&path).expect_err("must fail");
        assert!(format!("{err:#}").contains("JSON array"));
    }
}
