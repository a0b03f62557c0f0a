//! Ollama `/api/generate` client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{LanguageModel, LlmError, LlmResult};

/// Connection parameters, fixed at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: "gpt-oss:120b-cloud".to_string(),
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.2,
        }
    }
}

impl From<&cafeqa_core::Settings> for OllamaConfig {
    fn from(settings: &cafeqa_core::Settings) -> Self {
        Self {
            model: settings.llm_model.clone(),
            base_url: settings.cloud_ollama_url.clone(),
            temperature: settings.temperature,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        let resp = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        tracing::debug!(
            model = %self.config.model,
            chars = result.response.len(),
            "LLM generation complete"
        );
        Ok(result.response)
    }
}
