//! Google Gemini adapter
//!
//! The model is part of the URL and the prompt travels as a single text part,
//! together with generation limits and the safety thresholds.

use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::connection::ProviderConnection;
use crate::providers::spec::{ProviderKind, ProviderSpec};
use async_trait::async_trait;

/// Gemini provider implementation
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    connection: ProviderConnection,
}

impl GeminiAdapter {
    pub fn new(connection: ProviderConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn spec(&self) -> &'static ProviderSpec {
        ProviderKind::Gemini.spec()
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.connection.execute(self, request).await
    }
}
