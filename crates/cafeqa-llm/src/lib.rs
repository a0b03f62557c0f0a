//! cafeqa-llm — text generation against an Ollama endpoint.
//!
//! The chain only depends on the [`LanguageModel`] trait; [`OllamaClient`]
//! is the implementation configured from `LLM_MODEL`, `CLOUD_OLLAMA_URL`
//! and `TEMPERATURE`.

pub mod ollama;

use async_trait::async_trait;
use thiserror::Error;

pub use ollama::{OllamaClient, OllamaConfig};

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM client configuration error: {0}")]
    Config(String),

    #[error("LLM network error: {0}")]
    Network(String),

    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("LLM response could not be decoded: {0}")]
    Decode(String),
}

pub type LlmResult<T> = Result<T, LlmError>;

/// A single-shot text completion model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `prompt` and return the generated text.
    async fn generate(&self, prompt: &str) -> LlmResult<String>;
}
