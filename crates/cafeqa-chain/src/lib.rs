//! cafeqa-chain: natural-language questions answered from a Neo4j graph.
//!
//! A question runs through three stages: the model writes one Cypher
//! statement constrained to the live schema, the statement runs against the
//! graph (at most `top_k` rows), and the model phrases the rows as an answer.
//! [`QaService`] is the outer boundary: it never fails, it returns a
//! [`QaOutcome`] that tells answers and failures apart.

pub mod chain;
pub mod cypher;
pub mod error;
pub mod prompts;
pub mod service;

pub use chain::{GraphCypherQaChain, QaAnswer, DEFAULT_TOP_K};
pub use error::{PromptError, QaError};
pub use prompts::PromptTemplate;
pub use service::{QaOutcome, QaService};
