use thiserror::Error;

/// Errors that can occur when calling the language model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Errors reported by the serving endpoint itself
    #[error("LLM API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The client is missing configuration it needs before any call
    #[error("LLM client not configured: {0}")]
    NotConfigured(String),
}

/// One prompt plus its decoding limits.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// A request at temperature 0, the setting both pipeline stages use.
    pub fn deterministic(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature: 0.0,
        }
    }
}

/// Outcome of one model invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Non-blank text, already trimmed.
    Text(String),
    /// The call succeeded but produced nothing usable.
    Empty,
    /// The call failed; carries the rendered error.
    Failure(String),
}

/// Text-completion capability.
///
/// Implementations make a blocking request/response call; timeouts belong
/// to the implementation. Nothing guarantees that the returned text follows
/// the format the prompt asked for.
pub trait LanguageModel: Send + Sync {
    /// Generates a completion for the request.
    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Checks that the client can be used at all. Called once per stage.
    fn ensure_ready(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

/// Calls the model and folds the result into a `Completion`.
pub fn invoke(model: &dyn LanguageModel, request: &CompletionRequest) -> Completion {
    match model.complete(request) {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Completion::Empty
            } else {
                Completion::Text(trimmed.to_string())
            }
        }
        Err(e) => Completion::Failure(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    struct FixedModel(Result<&'static str, u16>);

    impl LanguageModel for FixedModel {
        fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            self.0
                .map(str::to_string)
                .map_err(|status| LlmError::Http { status })
        }
    }

    #[test]
    fn invoke_trims_text() {
        let request = CompletionRequest::deterministic("prompt", 10);
        let completion = invoke(&FixedModel(Ok("  Yes \n")), &request);
        assert_eq!(completion, Completion::Text("Yes".to_string()));
    }

    #[test]
    fn invoke_maps_blank_text_to_empty() {
        let request = CompletionRequest::deterministic("prompt", 10);
        assert_eq!(invoke(&FixedModel(Ok("   ")), &request), Completion::Empty);
        assert_eq!(invoke(&FixedModel(Ok("")), &request), Completion::Empty);
    }

    #[test]
    fn invoke_maps_errors_to_failure() {
        let request = CompletionRequest::deterministic("prompt", 10);
        let completion = invoke(&FixedModel(Err(503)), &request);
        assert_eq!(
            completion,
            Completion::Failure("HTTP error: status 503".to_string())
        );
    }

    #[test]
    fn deterministic_request_uses_zero_temperature() {
        let request = CompletionRequest::deterministic("p", 500);
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, 500);
    }

    #[test]
    fn serialization_error_keeps_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = LlmError::Serialization(json_error);

        assert!(error.to_string().contains("Serialization error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn default_ensure_ready_is_ok() {
        assert!(FixedModel(Ok("x")).ensure_ready().is_ok());
    }
}
