//! `git-recommend humans`: drop bot accounts from a list of identifiers.

use crate::output::{OutputMode, render_mode};
use anyhow::{Context, Result};
use clap::Args;
use recommend_core::config::resolve_config;
use recommend_rank::HumanFilter;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct HumansArgs {
    /// Identifiers to classify. Read one per line from stdin when omitted.
    pub identifiers: Vec<String>,

    /// Config file supplying `[filter]` patterns.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct HumansOutput {
    pub humans: Vec<String>,
    pub bots: Vec<String>,
}

/// Classify identifiers with the configured bot patterns.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, a pattern is invalid,
/// or stdin cannot be read.
pub fn run_humans(args: &HumansArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), project_root)?;
    let filter = HumanFilter::from_config(&config.filter)?;

    let identifiers = if args.identifiers.is_empty() {
        read_identifiers(std::io::stdin().lock())?
    } else {
        args.identifiers.clone()
    };

    let out = classify(&filter, identifiers);
    render_mode(output, &out, render_text, render_text)
}

fn read_identifiers(reader: impl BufRead) -> Result<Vec<String>> {
    let mut identifiers = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read identifiers from stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            identifiers.push(trimmed.to_string());
        }
    }
    Ok(identifiers)
}

fn classify(filter: &HumanFilter, identifiers: Vec<String>) -> HumansOutput {
    let (humans, bots): (Vec<String>, Vec<String>) = identifiers
        .into_iter()
        .partition(|id| filter.is_human(id));
    HumansOutput { humans, bots }
}

fn render_text(out: &HumansOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for id in &out.humans {
        writeln!(w, "{id}")?;
    }
    Ok(())
}
