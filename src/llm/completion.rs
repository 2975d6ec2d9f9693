use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::CompletionError;
use crate::models::ChatMessage;

/// Turns a message list into generated text. One blocking call per invocation.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// Non-streaming chat completions from Ollama or an OpenAI-compatible API.
pub struct HttpCompletion {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpCompletion {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CompletionService for HttpCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        tracing::info!("Waiting for response from {}", self.config.chat_model);
        let response = match self.config.provider.as_str() {
            "ollama" => call_ollama(&self.client, &self.config, messages).await?,
            "openai" => call_openai(&self.client, &self.config, messages).await?,
            other => {
                return Err(CompletionError::Permanent(format!(
                    "Unknown LLM provider: {other}"
                )))
            }
        };
        tracing::info!("Received response from {}", self.config.chat_model);
        Ok(response)
    }
}

/// Map an unsuccessful HTTP status to a completion error. Auth failures,
/// malformed or oversized requests and unknown models will fail the same way
/// on every attempt; everything else is assumed to be temporary.
fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    match status.as_u16() {
        401 | 403 => CompletionError::Permanent("The provided API key is invalid".to_string()),
        400 | 404 | 413 | 422 => CompletionError::Permanent(format!("{status}: {body}")),
        _ => CompletionError::Transient(format!("{status}: {body}")),
    }
}

fn transport_error(provider: &str, e: reqwest::Error) -> CompletionError {
    CompletionError::Transient(format!("Failed to call {provider} chat API: {e}"))
}

async fn read_error(resp: reqwest::Response) -> CompletionError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    classify_status(status, &body)
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

async fn call_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: &[ChatMessage],
) -> Result<String, CompletionError> {
    let url = format!("{}/api/chat", config.base_url);

    let req = OllamaChatRequest {
        model: &config.chat_model,
        messages,
        stream: false,
        options: OllamaOptions {
            temperature: config.temperature,
        },
    };

    let resp = client
        .post(&url)
        .json(&req)
        .send()
        .await
        .map_err(|e| transport_error("Ollama", e))?;

    if !resp.status().is_success() {
        return Err(read_error(resp).await);
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .map_err(|e| CompletionError::Transient(format!("Failed to parse Ollama response: {e}")))?;
    Ok(body.message.content)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

async fn call_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: &[ChatMessage],
) -> Result<String, CompletionError> {
    let url = format!("{}/v1/chat/completions", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiChatRequest {
        model: &config.chat_model,
        messages,
        temperature: config.temperature,
    };

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await
        .map_err(|e| transport_error("OpenAI", e))?;

    if !resp.status().is_success() {
        return Err(read_error(resp).await);
    }

    let body: OpenAiChatResponse = resp
        .json()
        .await
        .map_err(|e| CompletionError::Transient(format!("Failed to parse OpenAI response: {e}")))?;
    Ok(body
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion_for(provider: &str, base_url: String) -> HttpCompletion {
        HttpCompletion::new(
            reqwest::Client::new(),
            LlmConfig {
                provider: provider.to_string(),
                base_url,
                api_key: Some("sk-test".to_string()),
                ..LlmConfig::default()
            },
        )
    }

    #[test]
    fn test_classify_auth_failure_is_permanent() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "");
        assert_eq!(
            err,
            CompletionError::Permanent("The provided API key is invalid".to_string())
        );
    }

    #[test]
    fn test_classify_context_length_is_permanent() {
        let err = classify_status(StatusCode::BAD_REQUEST, "maximum context length exceeded");
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("maximum context length"));
    }

    #[test]
    fn test_classify_rate_limit_and_server_errors_are_transient() {
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS, "").is_retryable());
        assert!(classify_status(StatusCode::BAD_GATEWAY, "").is_retryable());
        assert!(classify_status(StatusCode::INTERNAL_SERVER_ERROR, "").is_retryable());
    }

    #[tokio::test]
    async fn test_openai_completion_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"NO"}}]}"#)
            .create_async()
            .await;

        let llm = completion_for("openai", server.url());
        let answer = llm.complete(&[ChatMessage::user("hi")]).await.unwrap();

        mock.assert_async().await;
        assert_eq!(answer, "NO");
    }

    #[tokio::test]
    async fn test_ollama_completion_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .match_body(mockito::Matcher::PartialJsonString(r#"{"stream":false}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":{"role":"assistant","content":"YES"},"done":true}"#)
            .create_async()
            .await;

        let llm = completion_for("ollama", server.url());
        assert_eq!(llm.complete(&[ChatMessage::user("hi")]).await.unwrap(), "YES");
    }

    #[tokio::test]
    async fn test_server_error_maps_to_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let llm = completion_for("openai", server.url());
        let err = llm.complete(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
