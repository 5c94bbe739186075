use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RankError, ensure_finite};

/// Project-local config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".git-recommend.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecommendConfig {
    #[serde(default)]
    pub lexical: LexicalConfig,
    #[serde(default)]
    pub recency: RecencyConfig,
    #[serde(default)]
    pub fusion: FusionConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalConfig {
    #[serde(default = "default_k1")]
    pub k1: f64,
    #[serde(default = "default_b")]
    pub b: f64,
    /// Authors kept from the lexical ranking before fusion.
    #[serde(default = "default_candidates")]
    pub candidates: usize,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            k1: default_k1(),
            b: default_b(),
            candidates: default_candidates(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyConfig {
    /// Global cap on the most recent commits considered.
    #[serde(default = "default_commit_limit")]
    pub commit_limit: usize,
    #[serde(default = "default_candidates")]
    pub candidates: usize,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            commit_limit: default_commit_limit(),
            candidates: default_candidates(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// RRF constant; lower values favour rank-1 agreement more steeply.
    #[serde(default = "default_rrf_k")]
    pub k: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            k: default_rrf_k(),
            top_n: default_top_n(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_path_limit")]
    pub limit: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            limit: default_path_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterConfig {
    /// Replaces the built-in bot patterns when set.
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
    /// Appended to whichever pattern set is active.
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

impl RecommendConfig {
    /// Check every numeric knob before any ranking runs.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidParameter`] for a non-finite or
    /// out-of-range `k1`, `b`, or fusion `k`.
    pub fn validate(&self) -> Result<(), RankError> {
        let k1 = ensure_finite("k1", self.lexical.k1)?;
        if k1 < 0.0 {
            return Err(RankError::InvalidParameter {
                name: "k1",
                value: k1,
                reason: "must be >= 0",
            });
        }
        let b = ensure_finite("b", self.lexical.b)?;
        if !(0.0..=1.0).contains(&b) {
            return Err(RankError::InvalidParameter {
                name: "b",
                value: b,
                reason: "must be within [0, 1]",
            });
        }
        let k = ensure_finite("k", self.fusion.k)?;
        if k < 0.0 {
            return Err(RankError::InvalidParameter {
                name: "k",
                value: k,
                reason: "must be >= 0",
            });
        }
        Ok(())
    }
}

/// Load and validate a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or fails
/// [`RecommendConfig::validate`].
pub fn load_config_file(path: &Path) -> Result<RecommendConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<RecommendConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(config)
}

/// Per-user config location (`<config dir>/git-recommend/config.toml`).
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("git-recommend/config.toml"))
}

/// Resolve the effective config.
///
/// Precedence: `explicit` path, then `.git-recommend.toml` under
/// `project_root`, then the user config file, then defaults. The explicit
/// path must exist; the others are optional.
///
/// # Errors
///
/// Returns an error if a selected file cannot be loaded.
pub fn resolve_config(explicit: Option<&Path>, project_root: &Path) -> Result<RecommendConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let project = project_root.join(PROJECT_CONFIG_FILE);
    if project.exists() {
        tracing::debug!(path = %project.display(), "using project config");
        return load_config_file(&project);
    }

    if let Some(user) = user_config_path().filter(|p| p.exists()) {
        tracing::debug!(path = %user.display(), "using user config");
        return load_config_file(&user);
    }

    Ok(RecommendConfig::default())
}

const fn default_k1() -> f64 {
    1.5
}

const fn default_b() -> f64 {
    0.75
}

const fn default_candidates() -> usize {
    5
}

const fn default_commit_limit() -> usize {
    20
}

const fn default_rrf_k() -> f64 {
    60.0
}

const fn default_top_n() -> usize {
    3
}

const fn default_path_limit() -> usize {
    5
}

fn default_allowed_extensions() -> Vec<String> {
    [
        ".py", ".java", ".c", ".cpp", ".js", ".ts", ".rb", ".go", ".cs", ".php", ".rs", ".swift",
        ".kt",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}
