use anyhow::Result;

use super::vector::{rank_titles, score_titles};
use crate::graph::{fetch_title_candidates, GraphStore};
use crate::llm::embeddings::EmbeddingService;

/// Find up to `top` stored question titles more similar than
/// `similarity_threshold` to `query`.
///
/// Every question with an embedding is scanned linearly; `limit` caps how many
/// are fetched from the graph.
pub async fn search_titles(
    embedder: &dyn EmbeddingService,
    graph: &dyn GraphStore,
    query: &str,
    top: usize,
    similarity_threshold: f32,
    limit: Option<usize>,
) -> Result<Vec<String>> {
    let query_embedding = embedder.embed(query).await?;
    tracing::info!("Generated embedding for query: {query}");

    let mut candidates = fetch_title_candidates(graph, limit).await?;
    tracing::info!("Fetched {} question candidates from graph database", candidates.len());
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    score_titles(&mut candidates, &query_embedding);
    tracing::debug!("Scored all candidate titles; keeping at most {top}");

    Ok(rank_titles(candidates, top, similarity_threshold))
}
