//! The generate → execute → synthesize question-answering chain.

use std::num::NonZeroUsize;
use std::sync::Arc;

use cafeqa_graph::{GraphStore, Record};
use cafeqa_llm::LanguageModel;
use serde::Serialize;

use crate::cypher::extract_cypher;
use crate::error::{PromptError, Result};
use crate::prompts::{cypher_prompt, qa_prompt, PromptTemplate};

/// Rows handed to the answer prompt when not configured otherwise.
pub const DEFAULT_TOP_K: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// A successfully answered question.
#[derive(Debug, Clone, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    /// The statement the model generated, after fence stripping.
    pub cypher: String,
    /// Graph rows the answer was synthesized from.
    pub context: Vec<Record>,
}

/// Cypher question-answering over a graph.
///
/// Cheap to share behind an `Arc`; holds no per-question state.
pub struct GraphCypherQaChain {
    llm: Arc<dyn LanguageModel>,
    graph: Arc<dyn GraphStore>,
    cypher_prompt: PromptTemplate,
    qa_prompt: PromptTemplate,
    top_k: NonZeroUsize,
}

impl GraphCypherQaChain {
    /// Build a chain with the built-in prompts and `top_k` of 5.
    pub fn from_llm(llm: Arc<dyn LanguageModel>, graph: Arc<dyn GraphStore>) -> Self {
        Self {
            llm,
            graph,
            cypher_prompt: cypher_prompt(),
            qa_prompt: qa_prompt(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: NonZeroUsize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Replace the Cypher generation prompt. It must take `schema` and `question`.
    pub fn with_cypher_prompt(mut self, prompt: PromptTemplate) -> std::result::Result<Self, PromptError> {
        prompt.expect_inputs(&["schema", "question"])?;
        self.cypher_prompt = prompt;
        Ok(self)
    }

    /// Replace the answer prompt. It must take `context` and `question`.
    pub fn with_qa_prompt(mut self, prompt: PromptTemplate) -> std::result::Result<Self, PromptError> {
        prompt.expect_inputs(&["context", "question"])?;
        self.qa_prompt = prompt;
        Ok(self)
    }

    pub fn top_k(&self) -> usize {
        self.top_k.get()
    }

    /// Answer `question` from the graph.
    ///
    /// The schema is introspected afresh on every call. An empty generated
    /// statement skips the graph and answers from an empty context.
    pub async fn invoke(&self, question: &str) -> Result<QaAnswer> {
        let schema = self.graph.graph_schema().await?.to_string();

        let prompt = self
            .cypher_prompt
            .render(&[("schema", schema.as_str()), ("question", question)])?;
        let completion = self.llm.generate(&prompt).await?;
        let cypher = extract_cypher(&completion);
        tracing::debug!(%cypher, "Generated Cypher");

        let context = if cypher.is_empty() {
            Vec::new()
        } else {
            self.graph
                .run_cypher_limited(&cypher, None, self.top_k.get())
                .await?
        };
        tracing::info!(rows = context.len(), top_k = self.top_k.get(), "Graph context retrieved");

        let context_text = serde_json::to_string(&context)?;
        let prompt = self
            .qa_prompt
            .render(&[("context", context_text.as_str()), ("question", question)])?;
        let answer = self.llm.generate(&prompt).await?.trim().to_string();

        Ok(QaAnswer {
            answer,
            cypher,
            context,
        })
    }
}
