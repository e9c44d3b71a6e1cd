mod http;
mod settings;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpAnalysisClient;
pub use settings::AnalyzerSettings;

/// A named structural pattern reported by the analyzer, with a severity label.
///
/// Opaque beyond these two fields; severity ordering is not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub severity: String,
}

/// Per-file verdict returned by the analyzer.
///
/// Absent wire fields default: score 100, no flags, no bias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default = "default_truth_score")]
    pub truth_score: u32,
    #[serde(default)]
    pub flags: Vec<Flag>,
    #[serde(default)]
    pub bias_detected: bool,
}

fn default_truth_score() -> u32 {
    100
}

impl Default for Verdict {
    fn default() -> Self {
        Self {
            truth_score: default_truth_score(),
            flags: Vec::new(),
            bias_detected: false,
        }
    }
}

/// Client abstraction for the external content analyzer.
///
/// The analyzer itself is a black box; swapping in a stub implementation is
/// how the orchestrator is tested deterministically.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Analyze a block of text within the given domain, returning a verdict.
    async fn analyze(&self, text: &str, domain: &str) -> Result<Verdict>;
}

/// Placeholder client used when no analyzer endpoint is configured.
#[derive(Debug, Default, Clone)]
pub struct NoopAnalysisClient;

#[async_trait]
impl AnalysisClient for NoopAnalysisClient {
    async fn analyze(&self, _text: &str, _domain: &str) -> Result<Verdict> {
        Ok(Verdict::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_defaults_absent_fields() {
        let verdict: Verdict = serde_json::from_str("{}").unwrap();
        assert_eq!(verdict.truth_score, 100);
        assert!(verdict.flags.is_empty());
        assert!(!verdict.bias_detected);
    }

    #[test]
    fn verdict_parses_full_payload() {
        let raw = r#"{
            "truth_score": 42,
            "bias_detected": true,
            "flags": [{"name": "loaded_language", "severity": "high"}]
        }"#;
        let verdict: Verdict = serde_json::from_str(raw).unwrap();
        assert_eq!(verdict.truth_score, 42);
        assert!(verdict.bias_detected);
        assert_eq!(verdict.flags[0].name, "loaded_language");
        assert_eq!(verdict.flags[0].severity, "high");
    }

    #[tokio::test]
    async fn noop_client_returns_clean_verdict() {
        let client = NoopAnalysisClient;
        let verdict = client.analyze("some text", "general").await.unwrap();
        assert_eq!(verdict, Verdict::default());
    }
}
