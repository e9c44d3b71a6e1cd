use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{AnalysisClient, AnalyzerSettings, Verdict};

/// Analyzer adapter that submits text to a hosted scan endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpAnalysisClient {
    pub fn new(settings: &AnalyzerSettings) -> Result<Self> {
        let url = match &settings.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => bail!(
                "analyzer endpoint must be provided via {}",
                AnalyzerSettings::ENDPOINT_ENV
            ),
        };
        let mut builder = Client::builder().user_agent("biasgate/0.3");
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .context("failed to build analyzer HTTP client")?;
        Ok(Self {
            http,
            url,
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, text: &str, domain: &str) -> Result<Verdict> {
        let payload = ScanRequest { text, domain };
        let mut request = self.http.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .context("failed to call analyzer endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("analyzer error ({}): {}", status, body);
        }

        response
            .json::<Verdict>()
            .await
            .context("failed to parse analyzer verdict")
    }
}

#[derive(Serialize)]
struct ScanRequest<'a> {
    text: &'a str,
    domain: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn settings(endpoint: &str) -> AnalyzerSettings {
        AnalyzerSettings {
            endpoint: Some(endpoint.to_string()),
            api_key: Some("test-key".to_string()),
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn posts_text_and_parses_verdict() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .header("authorization", "Bearer test-key")
                    .json_body(json!({"text": "sample text", "domain": "news"}));
                then.status(200).json_body(json!({
                    "truth_score": 55,
                    "bias_detected": true,
                    "flags": [{"name": "framing", "severity": "medium"}]
                }));
            })
            .await;

        let client = HttpAnalysisClient::new(&settings(&server.url("/scan"))).unwrap();
        let verdict = client.analyze("sample text", "news").await.unwrap();

        mock.assert_async().await;
        assert_eq!(verdict.truth_score, 55);
        assert!(verdict.bias_detected);
        assert_eq!(verdict.flags.len(), 1);
    }

    #[tokio::test]
    async fn sparse_response_falls_back_to_defaults() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = HttpAnalysisClient::new(&settings(&server.url("/scan"))).unwrap();
        let verdict = client.analyze("sample", "general").await.unwrap();
        assert_eq!(verdict, Verdict::default());
    }

    #[tokio::test]
    async fn surfaces_server_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(503).body("overloaded");
            })
            .await;

        let client = HttpAnalysisClient::new(&settings(&server.url("/scan"))).unwrap();
        let err = client.analyze("sample", "general").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let err = HttpAnalysisClient::new(&AnalyzerSettings {
            endpoint: None,
            api_key: None,
            timeout_secs: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains(AnalyzerSettings::ENDPOINT_ENV));
    }
}
