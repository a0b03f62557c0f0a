//! Error types for the cafeqa-server crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Settings error: {0}")]
    Settings(#[from] cafeqa_core::CoreError),

    #[error("LLM client error: {0}")]
    Llm(#[from] cafeqa_llm::LlmError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
