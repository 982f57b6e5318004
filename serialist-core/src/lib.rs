//! Serialist Core Library
//!
//! This crate provides the generation orchestration core for serialized fiction:
//! provider adapters, model routing, retry, prompt assembly, summary compression
//! and the episode chain that keeps each request's context bounded.

pub mod config;
pub mod http;
pub mod protocol;
pub mod providers;
pub mod story;

pub use protocol::{CallKind, ErrorKind, GenerationRequest, GenerationResult};
pub use providers::{ModelRouter, ProviderAdapter, ProviderError, RequestCounter, RetryPolicy};
pub use story::{
    Episode, EpisodeChain, PromptBuilder, PromptKind, StoryError, StoryGenerator, StoryState,
    SummaryCompressor,
};

/// Returns the version of the Serialist Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
