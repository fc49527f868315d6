use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SecretsError;

/// Page size used when neither the command line nor the config file sets one
pub const DEFAULT_MAX_RESULTS: i32 = 100;

/// Page sizes ListSecrets accepts
pub const MAX_RESULTS_RANGE: std::ops::RangeInclusive<i32> = 1..=DEFAULT_MAX_RESULTS;

/// Settings for a single invocation, resolved once and passed to each command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub region: String,
    pub debug: bool,
    pub max_results: i32,
}

/// Optional on-disk defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub max_results: Option<i32>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }
}

impl Config {
    /// Resolve the invocation config.
    ///
    /// `region` already carries the `--region` flag or `AWS_REGION` (clap reads
    /// the env var), so the file is only consulted when both are absent.
    /// A `max_results` given on the command line wins over the file.
    pub fn resolve(
        region: Option<String>,
        max_results: Option<i32>,
        debug: bool,
        file: Option<&FileConfig>,
    ) -> Result<Self, SecretsError> {
        let region = region
            .filter(|r| !r.is_empty())
            .or_else(|| file.and_then(|f| f.region.clone()))
            .filter(|r| !r.is_empty())
            .ok_or(SecretsError::NoRegion)?;

        let max_results = max_results
            .or_else(|| file.and_then(|f| f.max_results))
            .unwrap_or(DEFAULT_MAX_RESULTS);
        if !MAX_RESULTS_RANGE.contains(&max_results) {
            return Err(SecretsError::InvalidMaxResults(max_results));
        }

        Ok(Self {
            region,
            debug,
            max_results,
        })
    }
}
