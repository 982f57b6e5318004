//! Provider error types and handling

use crate::protocol::{ErrorKind, GenerationResult};
use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur when interacting with text-generation providers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No API key configured for the provider
    #[error("{provider} API key not configured")]
    MissingApiKey { provider: String },

    /// Provider answered with a non-success status
    #[error("Error: {status} - {body}")]
    Http { status: u16, body: String },

    /// Network or connection error
    #[error("API call error: {message}")]
    Transport { message: String },

    /// Per-call deadline elapsed
    #[error("API call error: request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Status 200 but the body was not JSON or lacked the text path
    #[error("API call error: malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    /// Process-wide request limit reached
    #[error("Rate limit exceeded ({limit} requests). Please try again later.")]
    Throttled { limit: u64 },
}

impl ProviderError {
    /// Classification used in [`GenerationResult::Failure`]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey { .. } => ErrorKind::Config,
            Self::Http { .. } | Self::MalformedResponse { .. } => ErrorKind::ProviderHttp,
            Self::Transport { .. } | Self::Timeout { .. } => ErrorKind::ProviderTransport,
            Self::Throttled { .. } => ErrorKind::Throttled,
        }
    }

    /// HTTP status carried by the error, when there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ProviderError> for GenerationResult {
    fn from(err: ProviderError) -> Self {
        GenerationResult::failure(err.kind(), err.to_string())
    }
}
