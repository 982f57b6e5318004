//! Anthropic adapter
//!
//! Uses the Messages API: key in `x-api-key`, a pinned `anthropic-version`
//! header, and a mandatory `max_tokens` field.

use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::connection::ProviderConnection;
use crate::providers::spec::{ProviderKind, ProviderSpec};
use async_trait::async_trait;

/// Anthropic provider implementation
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    connection: ProviderConnection,
}

impl AnthropicAdapter {
    pub fn new(connection: ProviderConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn spec(&self) -> &'static ProviderSpec {
        ProviderKind::Anthropic.spec()
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.connection.execute(self, request).await
    }
}
