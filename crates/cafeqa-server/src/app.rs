//! Construction of the long-lived service handles.

use std::sync::Arc;

use cafeqa_chain::{GraphCypherQaChain, QaService};
use cafeqa_core::Settings;
use cafeqa_graph::{GraphClient, GraphConfig};
use cafeqa_llm::{OllamaClient, OllamaConfig};

use crate::error::Result;
use crate::http::AppState;

/// Model and graph handles built once at startup and shared by every request.
///
/// Nothing here touches the network: the graph pool opens on first query,
/// so bad credentials surface as failed answers rather than a failed start.
pub struct Services {
    pub settings: Settings,
    pub llm: Arc<OllamaClient>,
    pub graph: Arc<GraphClient>,
    pub qa: QaService,
}

impl Services {
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let llm = Arc::new(OllamaClient::new(OllamaConfig::from(&settings))?);
        let graph = Arc::new(GraphClient::new(GraphConfig::from(&settings)));

        let chain = GraphCypherQaChain::from_llm(llm.clone(), graph.clone())
            .with_top_k(settings.top_k);

        tracing::info!(
            model = %settings.llm_model,
            ollama_url = %settings.cloud_ollama_url,
            top_k = settings.top_k.get(),
            "Services configured"
        );

        Ok(Self {
            llm,
            graph,
            qa: QaService::new(chain),
            settings,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            qa: self.qa.clone(),
            token: self.settings.api_token(),
        }
    }
}
