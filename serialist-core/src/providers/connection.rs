//! Immutable connection state shared by every adapter

use crate::config::{ApiKey, GeneratorConfig, ProviderSettings, TimeoutSettings};
use crate::http::{HttpClient, RequestOptions};
use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::json_transform::extract_text;
use crate::providers::spec::ProviderKind;
use tracing::{debug, info, warn};

/// Credentials, endpoint and HTTP client for one provider
#[derive(Debug, Clone)]
pub struct ProviderConnection {
    http: HttpClient,
    api_key: Option<ApiKey>,
    base_url: Option<String>,
    timeouts: TimeoutSettings,
}

impl ProviderConnection {
    pub fn new(http: HttpClient, settings: &ProviderSettings, timeouts: TimeoutSettings) -> Self {
        Self {
            http,
            api_key: settings.api_key().cloned(),
            base_url: settings.base_url().map(str::to_string),
            timeouts,
        }
    }

    /// Connection for `kind` using the provider section of `config`
    pub fn from_config(kind: ProviderKind, config: &GeneratorConfig, http: HttpClient) -> Self {
        Self::new(http, config.providers.get(kind), config.timeouts.clone())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Run one call for `adapter` and fold the outcome into a result
    pub async fn execute<A>(&self, adapter: &A, request: &GenerationRequest) -> GenerationResult
    where
        A: ProviderAdapter + ?Sized,
    {
        match self.call(adapter, request).await {
            Ok(text) => {
                info!(
                    "{} returned {} characters",
                    adapter.name(),
                    text.chars().count()
                );
                GenerationResult::success(text)
            }
            Err(err) => {
                warn!("{} call failed: {}", adapter.name(), err);
                err.into()
            }
        }
    }

    async fn call<A>(&self, adapter: &A, request: &GenerationRequest) -> ProviderResult<String>
    where
        A: ProviderAdapter + ?Sized,
    {
        let spec = adapter.spec();
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider: spec.display_name.to_string(),
            })?;

        let api_model = match spec.api_model(&request.model_id) {
            Some(name) => name,
            None => {
                let fallback = spec.models[0].api_name;
                debug!(
                    "{} does not serve '{}', sending as {}",
                    spec.display_name, request.model_id, fallback
                );
                fallback
            }
        };

        let url = spec.url(self.base_url(), api_model);
        let headers = spec.headers(api_key.expose());
        let body = adapter.build_body(request, api_model);
        let options = RequestOptions::new(request.call_kind)
            .with_timeout(self.timeouts.for_call(request.call_kind));

        debug!(
            "Dispatching {:?} call to {} model={} prompt_chars={} max_tokens={}",
            request.call_kind,
            spec.display_name,
            api_model,
            request.prompt.chars().count(),
            request.max_tokens
        );

        let response = self
            .http
            .post_json(spec.display_name, &url, &headers, &body, &options)
            .await?;

        extract_text(spec.display_name, &response, spec.text_path)
    }
}
