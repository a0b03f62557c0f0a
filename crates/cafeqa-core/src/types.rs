//! Core data types shared between the graph client, the QA chain, and the HTTP API.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ── HTTP API ──────────────────────────────────────────────────────

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub token: String,
}

/// Successful body of `POST /chat`.
///
/// `answer` always holds user-facing text. When the question could not be
/// answered, `answer` carries the fallback message and `error` the failure
/// description, so clients can branch without parsing the answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn answered(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            error: None,
        }
    }

    pub fn failed(answer: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            error: Some(error.into()),
        }
    }
}

/// Error body, e.g. `{"detail": "Token inválido."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

// ── Graph Schema ──────────────────────────────────────────────────

/// Distinct node labels and relationship types present in the graph.
///
/// Both lists are sorted and contain no duplicates; the only constructor
/// enforces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaSummary {
    nodes: Vec<String>,
    rels: Vec<String>,
}

impl SchemaSummary {
    pub fn new<N, R>(nodes: N, rels: R) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            nodes: sorted_unique(nodes),
            rels: sorted_unique(rels),
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn rels(&self) -> &[String] {
        &self.rels
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.rels.is_empty()
    }
}

fn sorted_unique<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_serializes_to_empty_lists() {
        let json = serde_json::to_value(SchemaSummary::default()).unwrap();
        assert_eq!(json, serde_json::json!({"nodes": [], "rels": []}));
    }

    #[test]
    fn summary_is_sorted_and_deduplicated() {
        let summary = SchemaSummary::new(
            ["Origen", "Cafe", "Metodo", "Cafe"],
            ["TIENE_ORIGEN", "SE_PREPARA_CON", "TIENE_ORIGEN"],
        );
        assert_eq!(summary.nodes(), ["Cafe", "Metodo", "Origen"]);
        assert_eq!(summary.rels(), ["SE_PREPARA_CON", "TIENE_ORIGEN"]);
        assert!(!summary.is_empty());
    }

    #[test]
    fn chat_response_omits_error_when_answered() {
        let json = serde_json::to_value(ChatResponse::answered("Un método de filtrado")).unwrap();
        assert_eq!(json, serde_json::json!({"answer": "Un método de filtrado"}));
    }

    #[test]
    fn chat_response_carries_error_when_failed() {
        let json = serde_json::to_value(ChatResponse::failed("fallback", "boom")).unwrap();
        assert_eq!(json["answer"], "fallback");
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn chat_request_requires_both_fields() {
        let ok: ChatRequest =
            serde_json::from_str(r#"{"message": "hola", "token": "token1"}"#).unwrap();
        assert_eq!(ok.message, "hola");
        assert!(serde_json::from_str::<ChatRequest>(r#"{"message": "hola"}"#).is_err());
    }
}
