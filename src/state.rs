use std::sync::Arc;

use crate::config::Config;
use crate::graph::{GraphStore, Neo4jGraph};
use crate::llm::completion::HttpCompletion;
use crate::llm::embeddings::HttpEmbedder;
use crate::llm::retry::{ChatClient, RetryPolicy};
use crate::pipeline::Pipeline;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub graph: Arc<dyn GraphStore>,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Wire the pipeline from already-built services.
    pub fn from_parts(config: Config, graph: Arc<dyn GraphStore>, pipeline: Pipeline) -> Self {
        Self {
            config,
            graph,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Build the HTTP clients and connect to the graph database.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let graph: Arc<dyn GraphStore> =
            Arc::new(Neo4jGraph::connect(http_client.clone(), config.graph.clone()).await?);

        if let Err(e) = graph.schema(true).await {
            tracing::warn!("Could not load graph schema: {e}");
        }

        let embedder = Arc::new(HttpEmbedder::new(http_client.clone(), config.llm.clone()));
        let completion = Arc::new(HttpCompletion::new(http_client, config.llm.clone()));
        let llm = ChatClient::new(completion, RetryPolicy::from(&config.retry));

        let pipeline = Pipeline::new(graph.clone(), embedder, llm, config.retrieval.clone());
        Ok(Self::from_parts(config, graph, pipeline))
    }
}
