//! Summarizer providers
//!
//! OpenAI互換エンドポイント向けプロバイダーと、テスト・オフライン用の
//! 固定応答プロバイダー。

use crate::config::LlmSettings;
use crate::error::{Error, Result};
use crate::llm::types::{SummaryRequest, SummaryResponse};
use crate::llm::Summarizer;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    settings: LlmSettings,
}

impl OpenAiCompatProvider {
    pub fn new(settings: LlmSettings) -> Result<Self> {
        if settings.api_key.is_empty() {
            return Err(Error::Config(
                "llm.api_key is empty; configure a key or use the static summarizer".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl Summarizer for OpenAiCompatProvider {
    async fn generate(&self, request: SummaryRequest) -> Result<SummaryResponse> {
        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.settings.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt},
            ],
        });

        debug!(model = %self.settings.model, "sending summary request");
        let response: Value = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| Error::Llm("response carried no message content".to_string()))?;

        Ok(SummaryResponse {
            summary: content.trim().to_string(),
        })
    }
}

/// Fixed-response summarizer for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticSummarizer {
    summary: String,
}

impl StaticSummarizer {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

impl Default for StaticSummarizer {
    fn default() -> Self {
        Self::new("Anomaly review complete; see flagged rows for detail")
    }
}

#[async_trait]
impl Summarizer for StaticSummarizer {
    async fn generate(&self, _request: SummaryRequest) -> Result<SummaryResponse> {
        Ok(SummaryResponse {
            summary: self.summary.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_summarizer_returns_fixed_text() {
        let summarizer = StaticSummarizer::new("three clipping rows around noon");
        let response = summarizer
            .generate(SummaryRequest {
                system: String::new(),
                prompt: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(response.summary, "three clipping rows around noon");
    }

    #[test]
    fn test_provider_rejects_missing_api_key() {
        let settings = LlmSettings::default();
        assert!(OpenAiCompatProvider::new(settings).is_err());
    }
}
