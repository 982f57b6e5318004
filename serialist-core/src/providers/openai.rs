//! OpenAI adapter

use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::connection::ProviderConnection;
use crate::providers::spec::{ProviderKind, ProviderSpec};
use async_trait::async_trait;

/// OpenAI provider implementation
#[derive(Debug, Clone)]
pub struct OpenAIAdapter {
    connection: ProviderConnection,
}

impl OpenAIAdapter {
    pub fn new(connection: ProviderConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIAdapter {
    fn spec(&self) -> &'static ProviderSpec {
        ProviderKind::OpenAI.spec()
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.connection.execute(self, request).await
    }
}
