//! Provider adapters, model routing and retry
//!
//! One adapter per provider translates a [`GenerationRequest`] into that
//! provider's wire format. The [`ModelRouter`] picks the adapter for a model id
//! and [`RetryPolicy`] wraps the call in bounded, fixed-delay retries.
//!
//! [`GenerationRequest`]: crate::protocol::GenerationRequest

pub mod adapter;
pub mod anthropic;
pub mod connection;
pub mod deepseek;
pub mod error;
pub mod gemini;
pub mod json_transform;
pub mod openai;
pub mod rate_limit;
pub mod retry;
pub mod routing;
pub mod spec;
pub mod xai;

pub use adapter::ProviderAdapter;
pub use connection::ProviderConnection;
pub use error::{ProviderError, ProviderResult};
pub use rate_limit::RequestCounter;
pub use retry::{RetryPolicy, RetryResult};
pub use routing::{ModelRouter, ModelRouterBuilder, ResolvedModel, RoutingError};
pub use spec::{ModelEntry, ProviderKind, ProviderSpec, DEFAULT_MODEL_ID};

// Re-export concrete providers
pub use anthropic::AnthropicAdapter;
pub use deepseek::DeepSeekAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAIAdapter;
pub use xai::XAiAdapter;
