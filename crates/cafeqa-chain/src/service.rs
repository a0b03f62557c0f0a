//! The outermost question-answering boundary.

use std::sync::Arc;

use crate::chain::{GraphCypherQaChain, QaAnswer};
use crate::error::QaError;

const FALLBACK_PREFIX: &str = "Ocurrió un error procesando la consulta";

/// Result of asking a question: either an answer or the reason there is none.
#[derive(Debug)]
pub enum QaOutcome {
    Answered(QaAnswer),
    Failed(QaError),
}

impl QaOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, QaOutcome::Answered(_))
    }

    /// Text to show the user: the answer, or a fallback embedding the error.
    pub fn answer_text(&self) -> String {
        match self {
            QaOutcome::Answered(a) => a.answer.clone(),
            QaOutcome::Failed(e) => format!("{FALLBACK_PREFIX}: {e}"),
        }
    }

    pub fn error(&self) -> Option<&QaError> {
        match self {
            QaOutcome::Answered(_) => None,
            QaOutcome::Failed(e) => Some(e),
        }
    }
}

/// Shared handle around the chain, safe for concurrent requests.
#[derive(Clone)]
pub struct QaService {
    chain: Arc<GraphCypherQaChain>,
}

impl QaService {
    pub fn new(chain: GraphCypherQaChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }

    /// Answer `question`. Never fails; failures come back as [`QaOutcome::Failed`].
    pub async fn ask(&self, question: &str) -> QaOutcome {
        match self.chain.invoke(question).await {
            Ok(answer) => QaOutcome::Answered(answer),
            Err(e) => {
                tracing::warn!(error = %e, "Question answering failed");
                QaOutcome::Failed(e)
            }
        }
    }
}
