//! Neo4j over the HTTP transactional endpoint.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GraphStore, Row};
use crate::config::GraphConfig;
use crate::error::GraphError;

const NODE_PROPERTIES_QUERY: &str = "CALL apoc.meta.data() \
     YIELD label, other, elementType, type, property \
     WHERE NOT type = \"RELATIONSHIP\" AND elementType = \"node\" \
     WITH label AS nodeLabels, collect({property:property, type:type}) AS properties \
     RETURN {labels: nodeLabels, properties: properties} AS output";

const REL_PROPERTIES_QUERY: &str = "CALL apoc.meta.data() \
     YIELD label, other, elementType, type, property \
     WHERE NOT type = \"RELATIONSHIP\" AND elementType = \"relationship\" \
     WITH label AS nodeLabels, collect({property:property, type:type}) AS properties \
     RETURN {type: nodeLabels, properties: properties} AS output";

const REL_QUERY: &str = "CALL apoc.meta.data() \
     YIELD label, other, elementType, type, property \
     WHERE type = \"RELATIONSHIP\" AND elementType = \"node\" \
     UNWIND other AS other_node \
     RETURN \"(:\" + label + \")-[:\" + property + \"]->(:\" + toString(other_node) + \")\" AS output";

/// Graph store backed by a Neo4j server.
pub struct Neo4jGraph {
    client: reqwest::Client,
    config: GraphConfig,
    schema: RwLock<Option<String>>,
}

impl Neo4jGraph {
    pub fn new(client: reqwest::Client, config: GraphConfig) -> Self {
        Self {
            client,
            config,
            schema: RwLock::new(None),
        }
    }

    /// Create the store and verify the server answers with these credentials.
    pub async fn connect(client: reqwest::Client, config: GraphConfig) -> Result<Self> {
        tracing::info!("Connecting to Neo4j graph database: {}", config.url);
        let graph = Self::new(client, config);

        match graph.run("RETURN 1", serde_json::json!({})).await {
            Ok(_) => {}
            Err(GraphError::Query { code, .. }) if code == "401" || code == "403" => {
                anyhow::bail!(
                    "Could not connect to Neo4j database. \
                     Please ensure that the username and password are correct"
                );
            }
            Err(e) => {
                anyhow::bail!(
                    "Could not connect to Neo4j database. \
                     Please ensure that the url is correct: {e}"
                );
            }
        }

        tracing::info!("Connected to Neo4j: {}", graph.config.url);
        Ok(graph)
    }

    fn commit_url(&self) -> String {
        format!(
            "{}/db/{}/tx/commit",
            self.config.url.trim_end_matches('/'),
            self.config.database
        )
    }

    async fn run(&self, cypher: &str, params: Value) -> Result<Vec<Row>, GraphError> {
        let body = TxRequest {
            statements: vec![Statement {
                statement: cypher.to_string(),
                parameters: params,
            }],
        };

        let resp = self
            .client
            .post(self.commit_url())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .timeout(Duration::from_secs(self.config.query_timeout_secs))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(GraphError::Query {
                code: status.as_u16().to_string(),
                message: body,
            });
        }

        let body: TxResponse = resp.json().await?;
        decode_response(body)
    }

    async fn refresh_schema(&self) -> Result<String, GraphError> {
        tracing::info!("Refreshing graph database schema");

        let node_properties = self.schema_outputs(NODE_PROPERTIES_QUERY).await?;
        let rel_properties = self.schema_outputs(REL_PROPERTIES_QUERY).await?;
        let relationships = self.schema_outputs(REL_QUERY).await?;

        let schema = format_schema(&node_properties, &rel_properties, &relationships);
        *self.schema.write() = Some(schema.clone());
        Ok(schema)
    }

    async fn schema_outputs(&self, cypher: &str) -> Result<Vec<Value>, GraphError> {
        tracing::debug!("Querying Neo4j schema: {cypher}");
        let rows = match self.run(cypher, serde_json::json!({})).await {
            Ok(rows) => rows,
            Err(GraphError::Query { code, message }) if code.contains("ClientError") => {
                return Err(GraphError::Query {
                    code,
                    message: format!(
                        "APOC procedures unavailable. Please ensure the APOC plugin is \
                         installed and 'apoc.meta.data()' is allowed: {message}"
                    ),
                });
            }
            Err(e) => return Err(e),
        };

        Ok(rows
            .into_iter()
            .filter_map(|mut row| row.remove("output"))
            .collect())
    }
}

#[async_trait]
impl GraphStore for Neo4jGraph {
    async fn query(&self, cypher: &str, params: Value) -> Result<Vec<Row>, GraphError> {
        tracing::info!("Querying Neo4j graph database: {cypher} % {params}");
        self.run(cypher, params).await
    }

    async fn schema(&self, refresh: bool) -> Result<String, GraphError> {
        let cached = self.schema.read().clone();
        if let (false, Some(schema)) = (refresh, cached) {
            return Ok(schema);
        }
        self.refresh_schema().await
    }
}

fn format_schema(node_properties: &[Value], rel_properties: &[Value], relationships: &[Value]) -> String {
    let list = |values: &[Value]| Value::Array(values.to_vec()).to_string();
    format!(
        "Node properties are the following:\n{}\n\
         Relationship properties are the following:\n{}\n\
         The relationships are the following:\n{}\n",
        list(node_properties),
        list(rel_properties),
        list(relationships)
    )
}

/// Zip each result row with its column names. Server-side errors win over data.
fn decode_response(body: TxResponse) -> Result<Vec<Row>, GraphError> {
    if let Some(err) = body.errors.into_iter().next() {
        return Err(GraphError::Query {
            code: err.code,
            message: err.message,
        });
    }

    let mut rows = Vec::new();
    for result in body.results {
        for record in result.data {
            if record.row.len() != result.columns.len() {
                return Err(GraphError::MalformedRecord {
                    field: "row".to_string(),
                    reason: format!(
                        "has {} values for {} columns",
                        record.row.len(),
                        result.columns.len()
                    ),
                });
            }
            rows.push(result.columns.iter().cloned().zip(record.row).collect());
        }
    }
    Ok(rows)
}

// ─── Request/Response types ────────────────────────────

#[derive(Serialize)]
struct TxRequest {
    statements: Vec<Statement>,
}

#[derive(Serialize)]
struct Statement {
    statement: String,
    parameters: Value,
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Deserialize)]
struct TxResult {
    columns: Vec<String>,
    data: Vec<TxRecord>,
}

#[derive(Deserialize)]
struct TxRecord {
    row: Vec<Value>,
}

#[derive(Deserialize)]
struct TxError {
    code: String,
    message: String,
}
