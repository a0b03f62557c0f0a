//! cafeqa-graph — Neo4j access for the question-answering chain.
//!
//! All graph reads flow through the [`GraphStore`] trait so the chain and
//! the HTTP layer can run against a fake in tests. [`GraphClient`] is the
//! neo4rs-backed implementation used in production.

pub mod client;
pub mod schema;
pub mod store;

pub use client::{GraphClient, GraphConfig};
pub use schema::{GraphSchema, PropertySet, RelationshipPattern};
pub use store::{GraphError, GraphStore, Params, Record};
