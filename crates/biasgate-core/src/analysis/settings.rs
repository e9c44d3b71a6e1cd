use std::collections::HashMap;

/// Environment-driven configuration for the analyzer HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AnalyzerSettings {
    pub(crate) const ENDPOINT_ENV: &'static str = "BIASCLEAR_API_URL";
    pub(crate) const API_KEY_ENV: &'static str = "BIASCLEAR_API_KEY";
    pub(crate) const TIMEOUT_ENV: &'static str = "BIASCLEAR_TIMEOUT_SECS";

    /// Load settings from environment variables.
    ///
    /// * `BIASCLEAR_API_URL`      — Analyzer endpoint; absent means the noop client.
    /// * `BIASCLEAR_API_KEY`      — Optional bearer token.
    /// * `BIASCLEAR_TIMEOUT_SECS` — Optional per-request timeout.
    pub fn from_env() -> Self {
        Self::from_map(std::env::vars().collect())
    }

    fn from_map(vars: HashMap<String, String>) -> Self {
        let endpoint = vars
            .get(Self::ENDPOINT_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let api_key = vars
            .get(Self::API_KEY_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let timeout_secs = vars
            .get(Self::TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            endpoint,
            api_key,
            timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_yields_no_endpoint() {
        let settings = AnalyzerSettings::from_map(HashMap::new());
        assert!(settings.endpoint.is_none());
        assert!(settings.api_key.is_none());
        assert!(settings.timeout_secs.is_none());
    }

    #[test]
    fn blank_endpoint_is_treated_as_absent() {
        let settings = AnalyzerSettings::from_map(map(&[(AnalyzerSettings::ENDPOINT_ENV, "   ")]));
        assert!(settings.endpoint.is_none());
    }

    #[test]
    fn parses_endpoint_key_and_timeout() {
        let settings = AnalyzerSettings::from_map(map(&[
            (AnalyzerSettings::ENDPOINT_ENV, "https://api.example.com/scan"),
            (AnalyzerSettings::API_KEY_ENV, "secret"),
            (AnalyzerSettings::TIMEOUT_ENV, "30"),
        ]));
        assert_eq!(
            settings.endpoint.as_deref(),
            Some("https://api.example.com/scan")
        );
        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.timeout_secs, Some(30));
    }

    #[test]
    fn malformed_timeout_is_ignored() {
        let settings =
            AnalyzerSettings::from_map(map(&[(AnalyzerSettings::TIMEOUT_ENV, "soon")]));
        assert!(settings.timeout_secs.is_none());
    }
}
