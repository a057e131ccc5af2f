use serde::Deserialize;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

use crate::github::{RepoTarget, PAGE_SIZE};

pub const DEFAULT_CONFIG_FILE: &str = ".pr-stats.toml";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Longest accepted day window, about a century.
pub const MAX_THRESHOLD_DAYS: i64 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required params: {}", .0.join(", "))]
    MissingParams(Vec<&'static str>),

    #[error("invalid threshold {name} = {value}: must be between {min} and {max}")]
    InvalidThreshold {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Top-level configuration loaded from .pr-stats.toml.
/// All fields are optional; owner, repo and token are checked by `validate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Which repository to query and how to reach the API
    #[serde(default)]
    pub github: GitHubConfig,

    /// Windows and cut-offs used when classifying pull requests
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// Base URL of the REST API, for GitHub Enterprise or testing
    pub api_url: Option<String>,
    /// Upper bound on listing pages fetched. Unbounded when unset; 0 is rejected.
    pub max_pages: Option<NonZeroUsize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdConfig {
    /// Length of the "past week" activity window, in days
    #[serde(default = "default_recent_days")]
    pub recent_days: i64,

    /// Open pull requests older than this many days are stuck in review
    #[serde(default = "default_stuck_days")]
    pub stuck_days: i64,

    /// Changed-file count at which a pull request is complex.
    /// Capped at one page of the files endpoint.
    #[serde(default = "default_complex_files")]
    pub complex_files: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            recent_days: default_recent_days(),
            stuck_days: default_stuck_days(),
            complex_files: default_complex_files(),
        }
    }
}

fn default_recent_days() -> i64 {
    7
}

fn default_stuck_days() -> i64 {
    14
}

fn default_complex_files() -> usize {
    10
}

impl Config {
    /// Load from `path` when given (it must exist), otherwise from
    /// .pr-stats.toml in the current directory, or defaults if that is absent.
    /// The token falls back to the GITHUB_TOKEN env var.
    pub fn load_path(path: Option<&Path>) -> Result<Config, ConfigError> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None if default_path.exists() => Self::load_from(default_path)?,
            None => Config::default(),
        };

        if config.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.github.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Check that owner, repo and token are all present and non-empty, and
    /// that every threshold is in range. Reports every missing field at once.
    pub fn validate(&self) -> Result<RepoTarget, ConfigError> {
        self.thresholds.validate()?;

        let owner = non_empty(self.github.owner.as_deref());
        let repo = non_empty(self.github.repo.as_deref());
        let token = non_empty(self.github.token.as_deref());

        match (owner, repo, token) {
            (Some(owner), Some(repo), Some(token)) => Ok(RepoTarget {
                owner: owner.to_string(),
                repo: repo.to_string(),
                token: token.to_string(),
                api_url: self
                    .github
                    .api_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            }),
            (owner, repo, token) => {
                let missing = [("owner", owner), ("repo", repo), ("token", token)]
                    .into_iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| name)
                    .collect();
                Err(ConfigError::MissingParams(missing))
            }
        }
    }
}

impl ThresholdConfig {
    /// Day windows must be non-negative and small enough for date arithmetic.
    /// `complex_files` must be reachable within one page of the files endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("recent_days", self.recent_days, 0, MAX_THRESHOLD_DAYS)?;
        check_range("stuck_days", self.stuck_days, 0, MAX_THRESHOLD_DAYS)?;
        let complex_files = i64::try_from(self.complex_files).unwrap_or(i64::MAX);
        check_range("complex_files", complex_files, 1, PAGE_SIZE as i64)
    }
}

fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold {
            name,
            value,
            min,
            max,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
