//! Neo4j connection management and the production [`GraphStore`].

use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph, Query};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::store::{GraphError, GraphStore, Params, Record};

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: Option<String>,
    pub user: String,
    pub password: Option<String>,
    pub database: Option<String>,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: None,
            user: "neo4j".to_string(),
            password: None,
            database: None,
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

impl From<&cafeqa_core::Settings> for GraphConfig {
    fn from(settings: &cafeqa_core::Settings) -> Self {
        Self {
            uri: settings.neo4j_uri.clone(),
            user: settings.neo4j_user.clone(),
            password: settings.neo4j_password.clone(),
            database: settings.neo4j_database.clone(),
            ..Default::default()
        }
    }
}

/// Thread-safe Neo4j client with connection pooling.
///
/// The pool is opened on first use, so a missing or unreachable database
/// only fails the queries that need it. Each query borrows a pooled
/// connection for the lifetime of its row stream.
pub struct GraphClient {
    config: GraphConfig,
    graph: OnceCell<Graph>,
}

impl GraphClient {
    /// Create a client without connecting.
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            graph: OnceCell::new(),
        }
    }

    /// Create a client and open the connection pool immediately.
    pub async fn connect(config: GraphConfig) -> Result<Self, GraphError> {
        let client = Self::new(config);
        client.graph().await?;
        Ok(client)
    }

    async fn graph(&self) -> Result<&Graph, GraphError> {
        self.graph.get_or_try_init(|| open(&self.config)).await
    }

    async fn execute(
        &self,
        cypher: &str,
        params: Option<&Params>,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, GraphError> {
        let graph = self.graph().await?;
        let query = build_query(cypher, params)?;

        let mut stream = graph.execute(query).await?;
        let mut rows = Vec::new();
        while limit.map_or(true, |max| rows.len() < max) {
            let Some(row) = stream.next().await? else {
                break;
            };
            rows.push(row_to_record(&row)?);
        }

        tracing::debug!(rows = rows.len(), "Cypher query returned");
        Ok(rows)
    }
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn run_cypher(
        &self,
        cypher: &str,
        params: Option<&Params>,
    ) -> Result<Vec<Record>, GraphError> {
        self.execute(cypher, params, None).await
    }

    async fn run_cypher_limited(
        &self,
        cypher: &str,
        params: Option<&Params>,
        limit: usize,
    ) -> Result<Vec<Record>, GraphError> {
        self.execute(cypher, params, Some(limit)).await
    }
}

async fn open(config: &GraphConfig) -> Result<Graph, GraphError> {
    let uri = config
        .uri
        .as_deref()
        .ok_or_else(|| GraphError::Connection("NEO4J_URI is not set".to_string()))?;
    let password = config
        .password
        .as_deref()
        .ok_or_else(|| GraphError::Connection("NEO4J_PASSWORD is not set".to_string()))?;

    let mut builder = ConfigBuilder::default()
        .uri(uri)
        .user(&config.user)
        .password(password)
        .max_connections(config.max_connections as usize)
        .fetch_size(config.fetch_size);
    if let Some(db) = &config.database {
        builder = builder.db(db.as_str());
    }
    let neo_config = builder
        .build()
        .map_err(|e| GraphError::Connection(e.to_string()))?;

    let graph = Graph::connect(neo_config)
        .await
        .map_err(|e| GraphError::Connection(e.to_string()))?;

    tracing::info!(uri = %uri, "Connected to Neo4j");
    Ok(graph)
}

fn build_query(cypher: &str, params: Option<&Params>) -> Result<Query, GraphError> {
    let mut query = neo4rs::query(cypher);
    for (name, value) in params.into_iter().flatten() {
        query = query.param(name, json_to_bolt(name, value)?);
    }
    Ok(query)
}

fn row_to_record(row: &neo4rs::Row) -> Result<Record, GraphError> {
    row.to::<Record>()
        .map_err(|e| GraphError::Serialization(format!("Failed to read row: {e}")))
}

/// Convert a JSON parameter value into its Bolt representation.
fn json_to_bolt(name: &str, value: &Value) -> Result<BoltType, GraphError> {
    let bolt = match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => BoltType::from(i),
            (None, Some(f)) => BoltType::from(f),
            (None, None) => {
                return Err(GraphError::Parameter {
                    name: name.to_string(),
                    reason: format!("number {n} is out of range"),
                })
            }
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => {
            let items = items
                .iter()
                .map(|item| json_to_bolt(name, item))
                .collect::<Result<Vec<_>, _>>()?;
            BoltType::List(BoltList::from(items))
        }
        Value::Object(map) => {
            let mut bolt_map = BoltMap::new();
            for (key, item) in map {
                bolt_map.put(BoltString::from(key.as_str()), json_to_bolt(name, item)?);
            }
            BoltType::Map(bolt_map)
        }
    };
    Ok(bolt)
}
