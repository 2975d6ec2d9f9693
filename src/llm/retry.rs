//! Bounded retry for completion calls, plus the chat client that applies it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use super::completion::CompletionService;
use crate::config::RetryConfig;
use crate::error::CompletionError;
use crate::models::ChatMessage;

/// Longest wait between two attempts.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Retries an operation while it fails with a retryable error.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    /// Delay multiplier between attempts; 1.0 keeps the delay fixed
    pub backoff: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_millis(config.delay_ms),
            backoff: config.backoff,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
            backoff: 1.0,
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    /// Capped at `MAX_RETRY_DELAY`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let factor = self.backoff.max(0.0).powi(exponent);
        Duration::try_from_secs_f64(self.delay.as_secs_f64() * factor)
            .map_or(MAX_RETRY_DELAY, |d| d.min(MAX_RETRY_DELAY))
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, CompletionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CompletionError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let wait = self.delay_after(attempt);
                    tracing::warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "Retrying LLM call: {e}"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Completion service with retry, returning permanent failures as text.
#[derive(Clone)]
pub struct ChatClient {
    service: Arc<dyn CompletionService>,
    policy: RetryPolicy,
}

impl ChatClient {
    pub fn new(service: Arc<dyn CompletionService>, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    /// Send `prompt` as a single user message.
    pub async fn query(&self, prompt: &str) -> Result<String> {
        self.query_messages(&[ChatMessage::user(prompt)]).await
    }

    /// Send a message list. A permanent failure comes back as an
    /// `"Error: ..."` string so the caller still gets an answer; an exhausted
    /// transient failure is an `Err`.
    pub async fn query_messages(&self, messages: &[ChatMessage]) -> Result<String> {
        let service = &self.service;
        match self.policy.run(|| service.complete(messages)).await {
            Ok(text) => Ok(text),
            Err(CompletionError::Permanent(msg)) => {
                tracing::error!("Error: {msg}");
                Ok(format!("Error: {msg}"))
            }
            Err(e) => Err(anyhow::anyhow!(e)),
        }
    }
}
