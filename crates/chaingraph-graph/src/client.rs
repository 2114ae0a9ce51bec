//! Neo4j connection management and the shared graph client.

use neo4rs::{query, ConfigBuilder, Graph, Query};

use crate::statement::{CypherQuery, COUNT_COLUMN};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Statement rejected: {0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GraphError {
    /// Whether the error means the store itself is unreachable, as opposed to
    /// one statement failing.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::Connection(_)
                | Self::Query(neo4rs::Error::ConnectionError)
                | Self::Query(neo4rs::Error::IOError { .. })
        )
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            max_connections: 4,
            fetch_size: 256,
        }
    }
}

/// Neo4j graph client.
///
/// Acquired once per run and passed to every load. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j and verify the server answers.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let client = Self { graph };
        client.verify_connectivity().await?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(client)
    }

    /// Round-trip a trivial statement to prove the connection is usable.
    pub async fn verify_connectivity(&self) -> Result<(), GraphError> {
        let q = query(&format!("RETURN 1 AS {COUNT_COLUMN}"));
        match self.query_count(q).await {
            Ok(1) => Ok(()),
            Ok(other) => Err(GraphError::Connection(format!(
                "unexpected connectivity probe result: {other}"
            ))),
            Err(e) => Err(GraphError::Connection(e.to_string())),
        }
    }

    /// Execute a write-only query, discarding any result.
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }

    /// Execute a query returning a single count column.
    pub async fn query_count(&self, query: Query) -> Result<i64, GraphError> {
        match self.query_one(query).await? {
            Some(row) => row.get::<i64>(COUNT_COLUMN).map_err(|e| {
                GraphError::Serialization(format!("Failed to read count column: {e}"))
            }),
            None => Ok(0),
        }
    }
}

/// Convert a rendered statement into a neo4rs query with bound parameters.
pub(crate) fn to_query(rendered: &CypherQuery) -> Query {
    use chaingraph_core::PropertyValue;

    rendered
        .params
        .iter()
        .fold(query(&rendered.text), |q, (key, value)| match value {
            PropertyValue::String(s) => q.param(key, s.clone()),
            PropertyValue::Integer(i) => q.param(key, *i),
            PropertyValue::Float(x) => q.param(key, *x),
            PropertyValue::Boolean(b) => q.param(key, *b),
        })
}
