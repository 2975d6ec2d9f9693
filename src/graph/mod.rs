//! Graph database boundary.
//!
//! The pipeline only ever issues two query shapes against the graph: a scan of
//! question titles with their stored embeddings, and the question -> answer
//! traversal for a set of titles. Both are built here and decoded into typed
//! records, so a row with a missing or mistyped field fails fast instead of
//! leaking untyped values into the pipeline.

pub mod neo4j;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::GraphError;
use crate::models::{AnswerNode, AnswerPath, QuestionNode, ScoredTitle};

pub use neo4j::Neo4jGraph;

/// One result record, keyed by the column names in the `RETURN` clause.
pub type Row = Map<String, Value>;

/// Executes parametrized Cypher and describes the stored schema.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a query with named parameters and return its records.
    async fn query(&self, cypher: &str, params: Value) -> Result<Vec<Row>, GraphError>;

    /// Human-readable schema (node properties, relationship properties,
    /// relationship patterns). Cached unless `refresh` is set.
    async fn schema(&self, refresh: bool) -> Result<String, GraphError>;
}

const TITLE_CANDIDATES_QUERY: &str = "MATCH (n:Question) WHERE n.embedding IS NOT NULL \
     RETURN n.title AS title, n.embedding AS embedding";

const ANSWER_PATHS_QUERY: &str = "MATCH (q:Question)-[:SolvedBy]->(a:Answer) \
     WHERE q.title IN $titles \
     RETURN q.title AS title, q.tags AS tags, q.view_count AS view_count, \
     q.date AS date, a.content AS content";

/// Fetch every question that has a stored embedding, optionally capped.
pub async fn fetch_title_candidates(
    graph: &dyn GraphStore,
    limit: Option<usize>,
) -> Result<Vec<ScoredTitle>, GraphError> {
    let rows = match limit {
        Some(limit) => {
            let cypher = format!("{TITLE_CANDIDATES_QUERY} LIMIT $limit");
            graph
                .query(&cypher, serde_json::json!({ "limit": limit }))
                .await?
        }
        None => graph.query(TITLE_CANDIDATES_QUERY, serde_json::json!({})).await?,
    };

    rows.iter()
        .map(|row| {
            Ok(ScoredTitle::new(
                get_str(row, "title")?,
                get_embedding(row, "embedding")?,
            ))
        })
        .collect()
}

/// Fetch one row per question -> answer edge for the given titles.
pub async fn fetch_answer_paths(
    graph: &dyn GraphStore,
    titles: &[String],
) -> Result<Vec<AnswerPath>, GraphError> {
    let rows = graph
        .query(ANSWER_PATHS_QUERY, serde_json::json!({ "titles": titles }))
        .await?;

    rows.iter().map(decode_answer_path).collect()
}

fn decode_answer_path(row: &Row) -> Result<AnswerPath, GraphError> {
    Ok(AnswerPath {
        question: QuestionNode {
            title: get_str(row, "title")?,
            tags: get_str(row, "tags")?,
            view_count: get_i64(row, "view_count")?,
            date: get_str(row, "date")?,
        },
        answer: AnswerNode {
            content: get_str(row, "content")?,
        },
    })
}

// ─── Field accessors ─────────────────────────────────────

fn get_field<'a>(row: &'a Row, field: &str) -> Result<&'a Value, GraphError> {
    match row.get(field) {
        Some(Value::Null) | None => Err(GraphError::missing(field)),
        Some(v) => Ok(v),
    }
}

fn get_str(row: &Row, field: &str) -> Result<String, GraphError> {
    get_field(row, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GraphError::wrong_type(field, "a string"))
}

fn get_i64(row: &Row, field: &str) -> Result<i64, GraphError> {
    get_field(row, field)?
        .as_i64()
        .ok_or_else(|| GraphError::wrong_type(field, "an integer"))
}

fn get_embedding(row: &Row, field: &str) -> Result<Vec<f32>, GraphError> {
    let values = get_field(row, field)?
        .as_array()
        .ok_or_else(|| GraphError::wrong_type(field, "a list of numbers"))?;

    values
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| GraphError::wrong_type(field, "a list of numbers"))
        })
        .collect()
}
