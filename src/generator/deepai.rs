use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::TextGenerator;
use crate::utils::error::GenerationError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    output: Option<String>,
}

/// DeepAI-style text generator: `POST {"text": ...}` with an `api-key`
/// header, reply in `output`.
#[derive(Debug, Clone)]
pub struct DeepAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl DeepAiClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

fn parse_output(raw: &[u8]) -> Result<String, GenerationError> {
    let parsed: GenerateResponse =
        serde_json::from_slice(raw).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    parsed
        .output
        .ok_or_else(|| GenerationError::Malformed("missing `output` field".to_string()))
}

#[async_trait]
impl TextGenerator for DeepAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&GenerateRequest { text: prompt })
            .send()
            .await?
            .error_for_status()?;

        let raw = response.bytes().await?;
        parse_output(&raw)
    }
}
