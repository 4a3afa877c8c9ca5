//! HTTP client for the `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::GeminiError;

use super::TextGenerator;
use super::response::{GenerateRequest, parse_generate_response};

/// Gemini API client.
///
/// One request per call, no retries, and reqwest's default timeouts.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        api_base: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_base, &config.model, &config.api_key)
    }

    /// `{api_base}/models/{model}:generateContent`, without the key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = self.endpoint();
        debug!(%url, prompt_len = prompt.len(), "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| GeminiError::Request(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeminiError::Request(e.without_url()))?;

        if status != reqwest::StatusCode::OK {
            return Err(GeminiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_generate_response(&body)
    }
}
