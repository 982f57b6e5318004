//! xAI (Grok) adapter
//!
//! Serves both `xai` (Grok-2) and `grok-3` through the OpenAI-compatible chat
//! completions endpoint.

use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::connection::ProviderConnection;
use crate::providers::spec::{ProviderKind, ProviderSpec};
use async_trait::async_trait;

/// xAI provider implementation
#[derive(Debug, Clone)]
pub struct XAiAdapter {
    connection: ProviderConnection,
}

impl XAiAdapter {
    pub fn new(connection: ProviderConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ProviderAdapter for XAiAdapter {
    fn spec(&self) -> &'static ProviderSpec {
        ProviderKind::XAi.spec()
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.connection.execute(self, request).await
    }
}
