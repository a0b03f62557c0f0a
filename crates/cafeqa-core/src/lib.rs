//! cafeqa-core: Shared types, settings, and error handling for the cafeqa service.
//!
//! This crate provides the foundational pieces used across all cafeqa crates:
//! - Chat request/response types for the HTTP API
//! - The schema summary returned by graph introspection
//! - Settings loaded from the environment and an optional TOML file
//! - The shared-secret API token
//! - Common error types

pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::ApiToken;
pub use config::Settings;
pub use error::CoreError;
pub use types::{ChatRequest, ChatResponse, SchemaSummary};
