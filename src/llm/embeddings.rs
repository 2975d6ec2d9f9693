use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Maximum characters sent to the embedding API.
const MAX_EMBED_CHARS: usize = 8_000;

/// Converts text into a fixed-length vector.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedding service backed by the configured LLM provider.
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpEmbedder {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl EmbeddingService for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        embed_single(&self.client, &self.config, text).await
    }
}

/// Truncate `text` to at most `MAX_EMBED_CHARS`, splitting on a UTF-8 char boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Generate the embedding for a single text.
pub async fn embed_single(
    client: &reqwest::Client,
    config: &LlmConfig,
    text: &str,
) -> Result<Vec<f32>> {
    let input = vec![truncate_for_embedding(text).to_string()];

    let results = match config.provider.as_str() {
        "ollama" => embed_ollama(client, config, input).await?,
        "openai" => embed_openai(client, config, input).await?,
        other => anyhow::bail!("Unknown LLM provider: {other}"),
    };

    results.into_iter().next().context("No embedding returned")
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

async fn embed_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    input: Vec<String>,
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/api/embed", config.base_url);

    let req = OllamaEmbedRequest {
        model: config.embedding_model.clone(),
        input,
        truncate: true,
    };

    let resp = client
        .post(&url)
        .json(&req)
        .send()
        .await
        .context("Failed to call Ollama embed API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama embed API returned {status}: {body}");
    }

    let body: OllamaEmbedResponse = resp
        .json()
        .await
        .context("Failed to parse Ollama embed response")?;

    Ok(body.embeddings)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Vec<f32>,
}

async fn embed_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    input: Vec<String>,
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/v1/embeddings", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiEmbedRequest {
        model: config.embedding_model.clone(),
        input,
    };

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await
        .context("Failed to call OpenAI embed API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI embed API returned {status}: {body}");
    }

    let body: OpenAiEmbedResponse = resp
        .json()
        .await
        .context("Failed to parse OpenAI embed response")?;

    Ok(body.data.into_iter().map(|d| d.embedding).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(provider: &str, base_url: String) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            base_url,
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_for_embedding("How do I exit vim?"), "How do I exit vim?");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let text = "é".repeat(MAX_EMBED_CHARS);
        let truncated = truncate_for_embedding(&text);
        assert!(truncated.len() <= MAX_EMBED_CHARS);
        assert!(truncated.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn test_openai_embedding_parsed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/embeddings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"embedding":[0.25,-0.5,1.0]}]}"#)
            .create_async()
            .await;

        let embedder = HttpEmbedder::new(reqwest::Client::new(), config_for("openai", server.url()));
        let embedding = embedder.embed("query").await.unwrap();
        assert_eq!(embedding, vec![0.25, -0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_ollama_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/embed")
            .with_status(500)
            .with_body("model not loaded")
            .create_async()
            .await;

        let embedder = HttpEmbedder::new(reqwest::Client::new(), config_for("ollama", server.url()));
        let err = embedder.embed("query").await.unwrap_err();
        assert!(err.to_string().contains("model not loaded"));
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let embedder = HttpEmbedder::new(
            reqwest::Client::new(),
            config_for("cohere", "http://127.0.0.1:1".to_string()),
        );
        assert!(embedder.embed("query").await.is_err());
    }
}
