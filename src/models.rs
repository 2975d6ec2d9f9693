use serde::{Deserialize, Serialize};

/// Question metadata as stored in the graph. Written by ingestion, read-only here.
///
/// The node also carries a precomputed title embedding; that property is only
/// read by the title search and lands in [`ScoredTitle`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionNode {
    pub title: String,
    pub tags: String,
    pub view_count: i64,
    pub date: String,
}

/// An answer node, reached from a question via `SolvedBy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerNode {
    pub content: String,
}

/// A candidate title with its embedding, scored against the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTitle {
    pub text: String,
    pub embedding: Vec<f32>,
    /// Cosine similarity to the query embedding; None until computed
    pub similarity: Option<f32>,
}

impl ScoredTitle {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
            similarity: None,
        }
    }

    /// Similarity used for ranking; unscored titles count as 0.0.
    pub fn score(&self) -> f32 {
        self.similarity.unwrap_or(0.0)
    }
}

/// One row of the question -> answer traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerPath {
    pub question: QuestionNode,
    pub answer: AnswerNode,
}

/// Everything known about one matched question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeItem {
    pub title: String,
    pub tags: String,
    pub view_count: i64,
    pub date: String,
    /// Answer texts in traversal order; never empty
    pub answers: Vec<String>,
}

/// A single chat turn sent to the completion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response body of `GET /query/{query}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Response body of `GET /api/schema`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub schema: String,
}

/// Query string of `GET /api/schema`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaParams {
    #[serde(default)]
    pub refresh: bool,
}
