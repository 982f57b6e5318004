//! Bounded episode summaries
//!
//! Short texts are their own summary. Longer ones are summarized by the model,
//! and when that fails the text is cut to the threshold instead, so
//! summarizing never fails and never exceeds the configured bound.

use crate::config::SummarySettings;
use crate::protocol::{CallKind, ErrorKind, GenerationRequest, GenerationResult};
use crate::providers::{ModelRouter, ProviderSpec, RetryPolicy};
use crate::story::prompt::{PromptBuilder, PromptFields, PromptKind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Produces the recap handed from one episode to the next
#[derive(Debug, Clone)]
pub struct SummaryCompressor {
    router: Arc<ModelRouter>,
    retry: RetryPolicy,
    builder: PromptBuilder,
    settings: SummarySettings,
    temperature: f32,
}

impl SummaryCompressor {
    pub fn new(router: Arc<ModelRouter>, retry: RetryPolicy, settings: SummarySettings) -> Self {
        Self {
            router,
            retry,
            builder: PromptBuilder::new(),
            settings,
            temperature: crate::protocol::DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn settings(&self) -> &SummarySettings {
        &self.settings
    }

    /// Summarize `text` with `model_id`; never fails
    pub async fn summarize(&self, text: &str, model_id: &str) -> String {
        let length = text.chars().count();
        if length <= self.settings.threshold_chars {
            debug!("Text of {} chars is within threshold; used as its own summary", length);
            return text.to_string();
        }

        let prompt = self
            .builder
            .build(PromptKind::Summary, &PromptFields::for_text(text));
        let request = GenerationRequest::new(prompt, model_id)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(ProviderSpec::temperature_for(model_id, self.temperature))
            .with_call_kind(CallKind::Summary);

        match self.router.generate(&request, &self.retry).await {
            GenerationResult::Success { text: summary } if !summary.trim().is_empty() => {
                let summary = self.clamp(summary.trim());
                info!(
                    "Summarized {} chars into {} chars",
                    length,
                    summary.chars().count()
                );
                summary
            }
            GenerationResult::Success { .. } => {
                warn!(
                    kind = %ErrorKind::Summarization,
                    "Summary came back empty; truncating instead"
                );
                self.truncate(text)
            }
            GenerationResult::Failure { kind, message } => {
                warn!(
                    kind = %ErrorKind::Summarization,
                    cause = %kind,
                    "Summary request failed ({}); truncating instead",
                    message
                );
                self.truncate(text)
            }
        }
    }

    /// The first `threshold` characters of `text` followed by the ellipsis
    pub fn truncate(&self, text: &str) -> String {
        let mut out: String = text.chars().take(self.settings.threshold_chars).collect();
        out.push_str(&self.settings.ellipsis);
        out
    }

    fn clamp(&self, summary: &str) -> String {
        if summary.chars().count() <= self.settings.max_summary_chars() {
            summary.to_string()
        } else {
            self.truncate(summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderAdapter, ProviderKind, ProviderSpec};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedAdapter {
        result: GenerationResult,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ProviderAdapter for FixedAdapter {
        fn spec(&self) -> &'static ProviderSpec {
            ProviderKind::XAi.spec()
        }

        fn build_body(&self, request: &GenerationRequest, _api_model: &str) -> Value {
            json!({"prompt": request.prompt})
        }

        async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
            assert_eq!(request.call_kind, CallKind::Summary);
            assert_eq!(request.max_tokens, 400);
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn compressor(result: GenerationResult) -> (SummaryCompressor, Arc<FixedAdapter>) {
        let adapter = Arc::new(FixedAdapter {
            result,
            calls: AtomicU32::new(0),
        });
        let router = ModelRouter::builder()
            .adapter(adapter.clone())
            .build()
            .unwrap();
        let compressor = SummaryCompressor::new(
            Arc::new(router),
            RetryPolicy::no_retry(),
            SummarySettings::default(),
        );
        (compressor, adapter)
    }

    #[tokio::test]
    async fn test_short_text_is_identity() {
        let (compressor, adapter) = compressor(GenerationResult::success("unused"));
        let text = "短い".repeat(150);
        assert_eq!(compressor.summarize(&text, "xai").await, text);
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_long_text_is_summarized() {
        let (compressor, adapter) = compressor(GenerationResult::success("  A met B.  "));
        let summary = compressor.summarize(&"x".repeat(301), "xai").await;
        assert_eq!(summary, "A met B.");
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_truncates_by_characters() {
        let (compressor, _) = compressor(GenerationResult::failure(
            ErrorKind::ProviderTransport,
            "API call error: connection refused",
        ));
        let text = "あ".repeat(400);
        let summary = compressor.summarize(&text, "xai").await;
        assert_eq!(summary, format!("{}...", "あ".repeat(300)));
        assert_eq!(summary.chars().count(), 303);
    }

    #[tokio::test]
    async fn test_empty_summary_truncates() {
        let (compressor, _) = compressor(GenerationResult::success("   "));
        let summary = compressor.summarize(&"y".repeat(500), "xai").await;
        assert_eq!(summary, format!("{}...", "y".repeat(300)));
    }

    #[tokio::test]
    async fn test_overlong_summary_is_clamped() {
        let (compressor, _) = compressor(GenerationResult::success("z".repeat(1000)));
        let summary = compressor.summarize(&"y".repeat(500), "xai").await;
        assert_eq!(summary.chars().count(), compressor.settings().max_summary_chars());
    }
}
