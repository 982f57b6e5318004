//! Provider adapter trait
//!
//! An adapter turns one [`GenerationRequest`] into exactly one outbound call
//! and reports the outcome as a [`GenerationResult`]. Adapters never retry;
//! that is the job of [`RetryPolicy`](crate::providers::RetryPolicy).

use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::json_transform;
use crate::providers::spec::{ProviderKind, ProviderSpec};
use async_trait::async_trait;
use serde_json::Value;

/// Core trait implemented by every text-generation provider
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Static descriptor of the provider behind this adapter
    fn spec(&self) -> &'static ProviderSpec;

    /// Provider name used in logs and error messages
    fn name(&self) -> &'static str {
        self.spec().display_name
    }

    fn kind(&self) -> ProviderKind {
        self.spec().kind
    }

    /// System instruction sent ahead of every prompt, if the provider wants one
    fn system_message(&self) -> Option<String> {
        None
    }

    /// Build the JSON body for a request addressed to `api_model`.
    ///
    /// The layout follows the descriptor's [`BodyShape`](crate::providers::spec::BodyShape).
    fn build_body(&self, request: &GenerationRequest, api_model: &str) -> Value {
        json_transform::build_body(
            self.spec().body_shape,
            request,
            api_model,
            self.system_message().as_deref(),
        )
    }

    /// Perform one generation call
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProviderSettings, TimeoutSettings};
    use crate::http::HttpClient;
    use crate::providers::{
        AnthropicAdapter, DeepSeekAdapter, GeminiAdapter, OpenAIAdapter, ProviderConnection,
        XAiAdapter,
    };

    fn connection() -> ProviderConnection {
        ProviderConnection::new(
            HttpClient::new().unwrap(),
            &ProviderSettings::default(),
            TimeoutSettings::default(),
        )
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("Write episode one", "xai").with_max_tokens(1500)
    }

    #[test]
    fn test_body_layout_follows_descriptor() {
        let xai = XAiAdapter::new(connection()).build_body(&request(), "grok-2-1212");
        assert_eq!(xai["model"], "grok-2-1212");
        assert_eq!(xai["messages"][0]["role"], "user");

        let openai = OpenAIAdapter::new(connection()).build_body(&request(), "gpt-4o");
        assert_eq!(openai["messages"].as_array().unwrap().len(), 1);

        let anthropic =
            AnthropicAdapter::new(connection()).build_body(&request(), "claude-3-opus-20240229");
        assert_eq!(anthropic["max_tokens"], 1500);
        assert!(anthropic.get("system").is_none());

        let gemini = GeminiAdapter::new(connection())
            .build_body(&request(), "gemini-2.5-pro-preview-03-25");
        assert_eq!(gemini["contents"][0]["parts"][0]["text"], "Write episode one");
        assert!(gemini.get("model").is_none());
    }

    #[test]
    fn test_only_deepseek_sends_a_system_message() {
        assert!(XAiAdapter::new(connection()).system_message().is_none());
        assert!(GeminiAdapter::new(connection()).system_message().is_none());

        let deepseek = DeepSeekAdapter::new(connection());
        let body = deepseek.build_body(&request(), "deepseek-chat");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][0]["content"].as_str(),
            deepseek.system_message().as_deref()
        );
    }
}
