/// Ollama HTTP client implementation.
///
/// This module provides `OllamaClient`, a blocking `LanguageModel` backed by
/// the Ollama `/api/generate` endpoint, along with its builder.
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::completion::{CompletionRequest, LanguageModel, LlmError};

/// Backoff schedule between attempts: 1s, 2s, 4s.
const DEFAULT_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// Builder for constructing `OllamaClient` instances.
///
/// # Examples
///
/// ```
/// use noteqa::llm::OllamaClientBuilder;
///
/// let client = OllamaClientBuilder::new()
///     .base_url("http://localhost:11434")
///     .model("llama3.1:8b")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "llama3.1:8b");
/// ```
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    retry_delays: Option<Vec<Duration>>,
}

impl OllamaClientBuilder {
    /// Creates a new `OllamaClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for the Ollama API (e.g., "http://localhost:11434").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name used for every completion.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the delays slept between retries of transient failures.
    pub fn retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = Some(delays);
        self
    }

    /// Builds the `OllamaClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, `OLLAMA_HOST` is used, falling back to
    /// `http://localhost:11434`. If `model()` was not called, `OLLAMA_MODEL`
    /// is used, falling back to an empty string (rejected by `ensure_ready`).
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<OllamaClient, LlmError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
        };

        let model = match self.model {
            Some(m) => m,
            None => std::env::var("OLLAMA_MODEL").unwrap_or_default(),
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| LlmError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(LlmError::Network)?;

        Ok(OllamaClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            retry_delays: self
                .retry_delays
                .unwrap_or_else(|| DEFAULT_RETRY_DELAYS.to_vec()),
        })
    }
}

/// Synchronous HTTP client for the Ollama generate API.
///
/// Construct it with `OllamaClientBuilder`.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    retry_delays: Vec<Duration>,
}

impl OllamaClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "num_predict": request.max_tokens,
                "temperature": request.temperature,
            }
        })
    }
}

impl LanguageModel for OllamaClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = self.generate_url();
        let body = self.request_body(request);

        retry_with_backoff(&self.retry_delays, || {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .map_err(classify_transport_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(LlmError::Http {
                    status: status.as_u16(),
                });
            }

            let json: serde_json::Value = response.json().map_err(classify_transport_error)?;
            extract_response_text(&json)
        })
    }

    fn ensure_ready(&self) -> Result<(), LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::NotConfigured(
                "no model set (use --model or OLLAMA_MODEL)".to_string(),
            ));
        }
        Ok(())
    }
}

fn classify_transport_error(error: reqwest::Error) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout(error)
    } else {
        LlmError::Network(error)
    }
}

/// Pulls the generated text out of an `/api/generate` response body.
fn extract_response_text(json: &serde_json::Value) -> Result<String, LlmError> {
    if let Some(message) = json.get("error").and_then(|v| v.as_str()) {
        return Err(LlmError::Api {
            message: message.to_string(),
        });
    }

    json.get("response")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| LlmError::Api {
            message: "Missing 'response' field in API response".to_string(),
        })
}

/// Retries an operation, sleeping for each entry of `delays` between attempts.
///
/// Only transient errors (network, timeout, HTTP 5xx) are retried; the first
/// non-transient error is returned immediately. After the schedule is
/// exhausted the last error is returned.
pub fn retry_with_backoff<F, T>(delays: &[Duration], mut f: F) -> Result<T, LlmError>
where
    F: FnMut() -> Result<T, LlmError>,
{
    let mut last_error = match f() {
        Ok(result) => return Ok(result),
        Err(e) if !should_retry(&e) => return Err(e),
        Err(e) => e,
    };

    for (attempt, delay) in delays.iter().enumerate() {
        debug!(attempt = attempt + 1, error = %last_error, "retrying LLM call");
        thread::sleep(*delay);

        match f() {
            Ok(result) => return Ok(result),
            Err(e) if !should_retry(&e) => return Err(e),
            Err(e) => last_error = e,
        }
    }

    Err(last_error)
}

/// Returns `true` for transient errors (HTTP 5xx, network errors, timeouts).
fn should_retry(error: &LlmError) -> bool {
    match error {
        LlmError::Network(_) | LlmError::Timeout(_) => true,
        LlmError::Http { status } => (500..600).contains(status),
        LlmError::Serialization(_)
        | LlmError::Api { .. }
        | LlmError::InvalidUrl(_)
        | LlmError::NotConfigured(_) => false,
    }
}
