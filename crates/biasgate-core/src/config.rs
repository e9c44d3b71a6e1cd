use std::collections::HashMap;

use thiserror::Error;

/// Run-level scan configuration, sourced from the environment before
/// orchestration starts and immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Glob pattern selecting candidate files.
    pub paths: String,
    /// Minimum acceptable truth score.
    pub threshold: u32,
    /// Category label forwarded to the analyzer, opaque to the pipeline.
    pub domain: String,
    /// Whether below-threshold files fail the run.
    pub fail_on_bias: bool,
}

impl ScanConfig {
    pub(crate) const PATHS_ENV: &'static str = "SCAN_PATHS";
    pub(crate) const THRESHOLD_ENV: &'static str = "SCAN_THRESHOLD";
    pub(crate) const DOMAIN_ENV: &'static str = "SCAN_DOMAIN";
    pub(crate) const FAIL_ON_BIAS_ENV: &'static str = "SCAN_FAIL_ON_BIAS";

    /// Load configuration from environment variables.
    ///
    /// * `SCAN_PATHS`        — Glob pattern (default `**/*.md`).
    /// * `SCAN_THRESHOLD`    — Minimum truth score (default 70).
    /// * `SCAN_DOMAIN`       — Analyzer domain (default `general`).
    /// * `SCAN_FAIL_ON_BIAS` — Fail on below-threshold files (default true).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_map(std::env::vars().collect())
    }

    fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let paths = vars
            .get(Self::PATHS_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "**/*.md".to_string());
        let threshold = match vars.get(Self::THRESHOLD_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidThreshold { value: raw.clone() })?,
            None => 70,
        };
        let domain = vars
            .get(Self::DOMAIN_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "general".to_string());
        let fail_on_bias = vars
            .get(Self::FAIL_ON_BIAS_ENV)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Ok(Self {
            paths,
            threshold,
            domain,
            fail_on_bias,
        })
    }
}

/// Fatal configuration problems, surfaced before any scanning begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SCAN_THRESHOLD `{value}`: expected an integer")]
    InvalidThreshold { value: String },
    #[error("invalid path pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
