//! DeepSeek adapter
//!
//! Chat-completions compatible. Every request carries a system message naming
//! the assistant and today's date; the base URL can be redirected through
//! `DEEPSEEK_API_BASE`.

use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::connection::ProviderConnection;
use crate::providers::spec::{ProviderKind, ProviderSpec};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};

/// System message sent ahead of the prompt on `date`
pub fn date_system_message(date: NaiveDate) -> String {
    format!(
        "This assistant is DeepSeek Chat, created by DeepSeek. Today is {}.",
        date.format("%B %-d")
    )
}

/// DeepSeek provider implementation
#[derive(Debug, Clone)]
pub struct DeepSeekAdapter {
    connection: ProviderConnection,
}

impl DeepSeekAdapter {
    pub fn new(connection: ProviderConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ProviderAdapter for DeepSeekAdapter {
    fn spec(&self) -> &'static ProviderSpec {
        ProviderKind::DeepSeek.spec()
    }

    fn system_message(&self) -> Option<String> {
        Some(date_system_message(Local::now().date_naive()))
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.connection.execute(self, request).await
    }
}
