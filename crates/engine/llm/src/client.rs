//! HTTP client for the two-stage generation flow

use std::time::Duration;

use reqwest::Client;
use structure::Structure;

use crate::error::{ApiError, Result};
use crate::prompt;
use crate::types::{ChatRequest, ChatResponse};

/// Default OpenRouter-compatible endpoint
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default per-request deadline (seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of extra attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Chat completions client driving the two generation stages.
///
/// Stage one turns a short description into a plain-text blueprint;
/// stage two turns the blueprint into a [`Structure`], with the response
/// format pinned to a JSON object.
///
/// Transient failures (5xx, timeout, connection) are retried with an
/// exponential `2^attempt` seconds delay, up to the configured number of
/// extra attempts. Auth, throttling, and parse failures are not retried.
pub struct GeneratorClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    max_retries: u32,
}

impl GeneratorClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Point at a different OpenRouter-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of extra attempts for transient failures
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Stage one: expand a short description into a blueprint.
    ///
    /// The facing name lets the plan put the entrance on the wall the
    /// requester is looking at.
    pub async fn generate_plan(&self, description: &str, facing_name: &str) -> Result<String> {
        tracing::debug!(model = %self.model, description, "planning request");
        let request = ChatRequest::new(
            &self.model,
            prompt::planning_prompt(),
            prompt::planning_user_prompt(description, facing_name),
            false,
        );
        self.send_with_retry(&request).await
    }

    /// Stage two: turn a blueprint into a parsed structure description.
    pub async fn generate_structure(&self, blueprint: &str, max_blocks: u32) -> Result<Structure> {
        tracing::debug!(model = %self.model, "building request");
        let request = ChatRequest::new(
            &self.model,
            prompt::building_prompt(blueprint, max_blocks),
            prompt::building_user_prompt(),
            true,
        );
        let content = self.send_with_retry(&request).await?;
        serde_json::from_str(&content)
            .map_err(|e| ApiError::Parse(format!("invalid structure JSON: {e}")))
    }

    async fn send_with_retry(&self, request: &ChatRequest) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.send(request).await {
                Ok(content) => return Ok(content),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        %err,
                        attempt = attempt + 1,
                        max = self.max_retries,
                        delay_secs = delay.as_secs(),
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("X-Title", "Voxelforge")
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.timeout.as_secs())
                } else if e.is_connect() {
                    ApiError::Network(format!("failed to connect to {}", self.base_url))
                } else {
                    ApiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => ApiError::Authentication,
                429 => ApiError::RateLimited,
                code if code >= 500 => ApiError::Server(format!("HTTP {code}")),
                code => ApiError::Network(format!("HTTP {code}")),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        body.into_content()
    }
}

/// Exponential backoff: 1s, 2s, 4s, ...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(10))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        // Capped so a misconfigured retry count cannot sleep for hours
        assert_eq!(backoff_delay(30), Duration::from_secs(1024));
    }

    #[test]
    fn test_builder_configuration() {
        let client = GeneratorClient::new("key", "some/model")
            .with_base_url("http://localhost:8080/v1/")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);

        assert_eq!(client.base_url, "http://localhost:8080/v1");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.max_retries, 0);
    }
}
