//! The graph access seam used by the question-answering chain.

use async_trait::async_trait;
use cafeqa_core::SchemaSummary;

use crate::schema::{self, GraphSchema};

/// One result row: column name to value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Named query parameters.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Unsupported parameter {name}: {reason}")]
    Parameter { name: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Read access to a property graph.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute `cypher` with optional named parameters and collect every row.
    async fn run_cypher(
        &self,
        cypher: &str,
        params: Option<&Params>,
    ) -> Result<Vec<Record>, GraphError>;

    /// Execute `cypher` and return at most `limit` rows.
    async fn run_cypher_limited(
        &self,
        cypher: &str,
        params: Option<&Params>,
        limit: usize,
    ) -> Result<Vec<Record>, GraphError> {
        let mut rows = self.run_cypher(cypher, params).await?;
        rows.truncate(limit);
        Ok(rows)
    }

    /// Distinct node labels and relationship types currently in the graph.
    async fn schema_summary(&self) -> Result<SchemaSummary, GraphError> {
        let rows = self.run_cypher(schema::SUMMARY_QUERY, None).await?;
        Ok(schema::summary_from_rows(&rows))
    }

    /// Labels, properties, and relationship patterns, for prompting.
    async fn graph_schema(&self) -> Result<GraphSchema, GraphError> {
        let node_rows = self.run_cypher(schema::NODE_PROPERTIES_QUERY, None).await?;
        let rel_rows = self.run_cypher(schema::REL_PROPERTIES_QUERY, None).await?;
        let pattern_rows = self.run_cypher(schema::PATTERNS_QUERY, None).await?;
        Ok(GraphSchema::from_rows(&node_rows, &rel_rows, &pattern_rows))
    }
}
