//! Classify -> retrieve -> assemble -> synthesize.

use std::sync::Arc;

use anyhow::Result;

use crate::config::{RetrievalConfig, RetrievalMode};
use crate::graph::GraphStore;
use crate::llm::classify::is_trend_query;
use crate::llm::embeddings::EmbeddingService;
use crate::llm::retry::ChatClient;
use crate::llm::synthesize::{synthesize, ContextOptions};
use crate::search::knowledge::get_knowledge;
use crate::search::titles::search_titles;

/// Returned when no stored question is similar enough to the query.
pub const NO_KNOWLEDGE_ANSWER: &str = "Fail to get related information in knowledge graph.";

/// The question-answering pipeline. Holds no per-query state, so one instance
/// serves concurrent requests.
#[derive(Clone)]
pub struct Pipeline {
    graph: Arc<dyn GraphStore>,
    embedder: Arc<dyn EmbeddingService>,
    llm: ChatClient,
    retrieval: RetrievalConfig,
}

impl Pipeline {
    pub fn new(
        graph: Arc<dyn GraphStore>,
        embedder: Arc<dyn EmbeddingService>,
        llm: ChatClient,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            graph,
            embedder,
            llm,
            retrieval,
        }
    }

    fn mode(&self, is_trend: bool) -> RetrievalMode {
        if is_trend {
            self.retrieval.trend
        } else {
            self.retrieval.normal
        }
    }

    fn context_options(&self, is_trend: bool) -> ContextOptions {
        if is_trend {
            ContextOptions::metadata()
        } else {
            ContextOptions {
                include_metadata: self.retrieval.normal_includes_metadata,
                ..ContextOptions::answers()
            }
        }
    }

    /// Answer a natural-language question from the knowledge graph.
    pub async fn answer(&self, query: &str) -> Result<String> {
        tracing::info!("Received query: {query}");

        let is_trend = is_trend_query(&self.llm, query).await?;
        let mode = self.mode(is_trend);

        let titles = search_titles(
            self.embedder.as_ref(),
            self.graph.as_ref(),
            query,
            mode.top,
            mode.threshold,
            self.retrieval.candidate_limit,
        )
        .await?;
        if titles.is_empty() {
            tracing::info!("No related questions found");
            return Ok(NO_KNOWLEDGE_ANSWER.to_string());
        }
        tracing::info!("Found {} related question(s) in knowledge graph", titles.len());

        let knowledge = get_knowledge(self.graph.as_ref(), &titles).await?;

        let answer = synthesize(&self.llm, query, &knowledge, self.context_options(is_trend)).await?;
        tracing::info!("Answer: {}", answer.replace('\n', " "));
        Ok(answer)
    }
}
