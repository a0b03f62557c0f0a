//! Error types for the cafeqa-chain crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Missing prompt input: {0}")]
    MissingInput(String),

    #[error("Unexpected prompt input: {0}")]
    UnexpectedInput(String),

    #[error("Malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: String },

    #[error("Template placeholders {found:?} do not match declared inputs {declared:?}")]
    InputMismatch {
        declared: Vec<String>,
        found: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum QaError {
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("{0}")]
    Llm(#[from] cafeqa_llm::LlmError),

    #[error("{0}")]
    Graph(#[from] cafeqa_graph::GraphError),

    #[error("Could not serialize graph context: {0}")]
    Context(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QaError>;
