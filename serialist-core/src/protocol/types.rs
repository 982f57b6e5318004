//! Core protocol types for text generation
//!
//! The design keeps a single request shape for every provider; adapters are
//! responsible for translating it into their own wire format. Results are a
//! closed success/failure union so that callers can always render text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default sampling temperature for every generation call
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Upper bound accepted by every supported provider
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Default completion budget for a generation call
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Kind of generation call, used to pick the per-call timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// Long-form generation (synopsis, episode, style conversion)
    #[default]
    Generation,
    /// Summary compression
    Summary,
}

impl CallKind {
    /// Default timeout for this call kind
    pub fn default_timeout(&self) -> Duration {
        match self {
            CallKind::Generation => Duration::from_secs(60),
            CallKind::Summary => Duration::from_secs(30),
        }
    }
}

/// A single generation request
///
/// Built once per call; the `with_*` methods consume the request so a value
/// that has been handed to an adapter is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Opaque prompt text
    pub prompt: String,

    /// Caller-facing model identifier (e.g. "xai", "claude-3-opus")
    pub model_id: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,

    /// Call kind (selects the timeout)
    #[serde(default)]
    pub call_kind: CallKind,
}

impl GenerationRequest {
    /// Create a request with default parameters
    pub fn new(prompt: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            call_kind: CallKind::Generation,
        }
    }

    /// Set the completion budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature, clamped into the supported range
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = if temperature.is_nan() {
            DEFAULT_TEMPERATURE
        } else {
            temperature.clamp(0.0, MAX_TEMPERATURE)
        };
        self
    }

    /// Set the call kind
    pub fn with_call_kind(mut self, call_kind: CallKind) -> Self {
        self.call_kind = call_kind;
        self
    }

    /// Copy of this request addressed to a different model id
    pub fn for_model(&self, model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..self.clone()
        }
    }
}

/// Failure classification carried by [`GenerationResult::Failure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing credential for the selected provider
    Config,
    /// Model identifier not recognized (recovered by fallback, never surfaced)
    UnsupportedModel,
    /// Non-200 status or an unusable response body
    ProviderHttp,
    /// Connection failure or timeout
    ProviderTransport,
    /// Summary request failed (recovered by truncation, never surfaced)
    Summarization,
    /// Process-wide request limit reached
    Throttled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config_error",
            ErrorKind::UnsupportedModel => "unsupported_model",
            ErrorKind::ProviderHttp => "provider_http_error",
            ErrorKind::ProviderTransport => "provider_transport_error",
            ErrorKind::Summarization => "summarization_failure",
            ErrorKind::Throttled => "throttled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    /// Generated text
    Success { text: String },
    /// Classified failure with a human-readable message
    Failure { kind: ErrorKind, message: String },
}

impl GenerationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Failure kind, if this is a failure
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Generated text, if this is a success
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Render the result as display text.
    ///
    /// Failures become their message, so downstream consumers always receive
    /// a string. This is the errors-as-content contract of the public facade.
    pub fn into_text(self) -> String {
        match self {
            Self::Success { text } => text,
            Self::Failure { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("Write something", "xai");
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(request.call_kind, CallKind::Generation);
    }

    #[test]
    fn test_temperature_is_clamped() {
        let hot = GenerationRequest::new("p", "xai").with_temperature(3.5);
        assert_eq!(hot.temperature, MAX_TEMPERATURE);

        let cold = GenerationRequest::new("p", "xai").with_temperature(-1.0);
        assert_eq!(cold.temperature, 0.0);

        let nan = GenerationRequest::new("p", "xai").with_temperature(f32::NAN);
        assert_eq!(nan.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_call_kind_timeouts() {
        assert_eq!(CallKind::Generation.default_timeout(), Duration::from_secs(60));
        assert!(CallKind::Summary.default_timeout() < CallKind::Generation.default_timeout());
    }

    #[test]
    fn test_result_into_text() {
        assert_eq!(GenerationResult::success("story").into_text(), "story");

        let failure = GenerationResult::failure(ErrorKind::ProviderHttp, "Error: 500 - boom");
        assert_eq!(failure.error_kind(), Some(ErrorKind::ProviderHttp));
        assert_eq!(failure.into_text(), "Error: 500 - boom");
    }

    #[test]
    fn test_result_serialization_is_tagged() {
        let json = serde_json::to_value(GenerationResult::failure(ErrorKind::Config, "x")).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "config");
    }
}
