//! Settings for cafeqa services.
//!
//! Settings are loaded from (in priority order):
//! 1. Environment variables (unprefixed: `API_TOKEN`, `NEO4J_URI`, ...),
//!    including any defined in a `.env` file
//! 2. Config file (`cafeqa.toml` by default)
//! 3. Defaults
//!
//! Connection credentials are not validated here; a missing `NEO4J_URI`
//! surfaces on the first graph query.

use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;

use crate::auth::ApiToken;
use crate::error::CoreError;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Shared secret expected in every `/chat` request.
    #[serde(default = "default_api_token")]
    pub api_token: String,

    /// Model identifier passed to Ollama.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Base URL of the Ollama endpoint.
    #[serde(default = "default_ollama_url")]
    pub cloud_ollama_url: String,

    /// Sampling temperature; lower is more deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub neo4j_uri: Option<String>,

    #[serde(default = "default_neo4j_user")]
    pub neo4j_user: String,

    #[serde(default)]
    pub neo4j_password: Option<String>,

    /// Target database; the server default when unset.
    #[serde(default)]
    pub neo4j_database: Option<String>,

    /// Maximum number of graph rows handed to the answer prompt. Zero is
    /// rejected when the settings are deserialized.
    #[serde(default = "default_top_k")]
    pub top_k: NonZeroUsize,

    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_api_token() -> String {
    "token1".to_string()
}

fn default_llm_model() -> String {
    "gpt-oss:120b-cloud".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

const DEFAULT_TOP_K: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

fn default_top_k() -> NonZeroUsize {
    DEFAULT_TOP_K
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_token: default_api_token(),
            llm_model: default_llm_model(),
            cloud_ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            neo4j_uri: None,
            neo4j_user: default_neo4j_user(),
            neo4j_password: None,
            neo4j_database: None,
            top_k: default_top_k(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Settings {
    /// Load settings from `.env`, `<file_prefix>.toml` (optional) and the
    /// process environment.
    pub fn load(file_prefix: &str) -> Result<Self, CoreError> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            // Values stay strings (`API_TOKEN=007` is "007"); numeric
            // fields are parsed during deserialization.
            .add_source(config::Environment::default())
            .build()?;

        Self::from_config(cfg)
    }

    /// Load settings from a single TOML file, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .build()?;

        Self::from_config(cfg)
    }

    fn from_config(cfg: config::Config) -> Result<Self, CoreError> {
        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(CoreError::InvalidSetting {
                key: "temperature",
                reason: format!("expected a non-negative number, got {}", self.temperature),
            });
        }
        Ok(())
    }

    pub fn api_token(&self) -> ApiToken {
        ApiToken::new(&self.api_token)
    }
}
