//! Model routing with deterministic fallback
//!
//! The router maps a caller-facing model id to the adapter serving it. An id
//! it does not recognize is never an error: it is logged and replaced by the
//! configured default, so a generation call always has somewhere to go.

use crate::config::GeneratorConfig;
use crate::http::HttpClient;
use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::anthropic::AnthropicAdapter;
use crate::providers::connection::ProviderConnection;
use crate::providers::deepseek::DeepSeekAdapter;
use crate::providers::error::ProviderError;
use crate::providers::gemini::GeminiAdapter;
use crate::providers::openai::OpenAIAdapter;
use crate::providers::retry::RetryPolicy;
use crate::providers::spec::{ModelEntry, ProviderKind, ProviderSpec, DEFAULT_MODEL_ID};
use crate::providers::xai::XAiAdapter;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while assembling a router
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("default model '{0}' is not a recognized model id")]
    UnknownDefaultModel(String),

    #[error("no adapter registered for default model '{model}' ({provider})")]
    MissingDefaultAdapter { model: String, provider: ProviderKind },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The outcome of resolving a model id
#[derive(Clone)]
pub struct ResolvedModel {
    /// Model id the caller asked for
    pub requested: String,

    /// Model id that will actually be used
    pub model_id: String,

    /// Model entry for the effective id
    pub entry: &'static ModelEntry,

    /// Adapter that serves the effective id
    pub adapter: Arc<dyn ProviderAdapter>,
}

impl ResolvedModel {
    /// Whether the requested id was replaced by the default
    pub fn fell_back(&self) -> bool {
        self.requested != self.model_id
    }
}

impl fmt::Debug for ResolvedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedModel")
            .field("requested", &self.requested)
            .field("model_id", &self.model_id)
            .field("provider", &self.adapter.kind())
            .finish()
    }
}

/// Maps model ids to provider adapters
///
/// Immutable once built; share it between sessions with an `Arc`.
pub struct ModelRouter {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
    default_entry: &'static ModelEntry,
    default_adapter: Arc<dyn ProviderAdapter>,
}

impl ModelRouter {
    pub fn builder() -> ModelRouterBuilder {
        ModelRouterBuilder::new()
    }

    /// Router with one HTTP adapter per provider, configured from `config`
    ///
    /// Providers without an API key are still registered; calls to them
    /// report the missing key as a failure.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, RoutingError> {
        let http = HttpClient::with_connect_timeout(config.timeouts.connect())?;
        let connection = |kind| ProviderConnection::from_config(kind, config, http.clone());

        let router = Self::builder()
            .adapter(Arc::new(XAiAdapter::new(connection(ProviderKind::XAi))))
            .adapter(Arc::new(OpenAIAdapter::new(connection(ProviderKind::OpenAI))))
            .adapter(Arc::new(AnthropicAdapter::new(connection(
                ProviderKind::Anthropic,
            ))))
            .adapter(Arc::new(GeminiAdapter::new(connection(ProviderKind::Gemini))))
            .adapter(Arc::new(DeepSeekAdapter::new(connection(
                ProviderKind::DeepSeek,
            ))))
            .default_model(config.default_model.clone())
            .build()?;

        info!(
            "Model router ready: default={} configured={:?}",
            router.default_model(),
            config.configured_providers()
        );
        Ok(router)
    }

    /// Model id substituted for unrecognized ids
    pub fn default_model(&self) -> &'static str {
        self.default_entry.id
    }

    /// Whether `model_id` is recognized and has an adapter
    pub fn is_supported(&self, model_id: &str) -> bool {
        ProviderSpec::find_model(model_id)
            .map(|(kind, _)| self.adapters.contains_key(&kind))
            .unwrap_or(false)
    }

    /// Resolve a model id, falling back to the default when unrecognized
    pub fn resolve(&self, model_id: &str) -> ResolvedModel {
        if let Some((kind, entry)) = ProviderSpec::find_model(model_id) {
            if let Some(adapter) = self.adapters.get(&kind) {
                return ResolvedModel {
                    requested: model_id.to_string(),
                    model_id: entry.id.to_string(),
                    entry,
                    adapter: Arc::clone(adapter),
                };
            }
            warn!(
                "No adapter registered for model '{}' ({}); using default '{}'",
                model_id,
                kind,
                self.default_model()
            );
        } else {
            warn!(
                "Unsupported model '{}' requested; using default '{}'",
                model_id,
                self.default_model()
            );
        }

        ResolvedModel {
            requested: model_id.to_string(),
            model_id: self.default_entry.id.to_string(),
            entry: self.default_entry,
            adapter: Arc::clone(&self.default_adapter),
        }
    }

    /// Generate text for `request`, retrying failures under `policy`
    ///
    /// Never fails: an exhausted retry returns the last failure as a result.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        policy: &RetryPolicy,
    ) -> GenerationResult {
        let resolved = self.resolve(&request.model_id);
        let routed = request.for_model(resolved.model_id.clone());

        debug!(
            "Routing {:?} request for '{}' to {}",
            routed.call_kind,
            routed.model_id,
            resolved.adapter.name()
        );

        let adapter = resolved.adapter.as_ref();
        let routed = &routed;
        policy.with_retry(move || adapter.generate(routed)).await
    }

    /// Recognized models whose provider has an adapter, in registration order
    pub fn supported_models(&self) -> Vec<&'static ModelEntry> {
        ProviderKind::ALL
            .iter()
            .filter(|kind| self.adapters.contains_key(*kind))
            .flat_map(|kind| kind.spec().models.iter())
            .collect()
    }

    /// Human-readable label for a model id (the default's label when unrecognized)
    pub fn display_name(&self, model_id: &str) -> &'static str {
        ProviderSpec::find_model(model_id)
            .map(|(_, entry)| entry.display_name)
            .unwrap_or(self.default_entry.display_name)
    }

    /// Wire model name that a request for `model_id` will use
    pub fn api_model(&self, model_id: &str) -> &'static str {
        self.resolve(model_id).entry.api_name
    }
}

impl fmt::Debug for ModelRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<ProviderKind> = self.adapters.keys().copied().collect();
        providers.sort_by_key(|kind| ProviderKind::ALL.iter().position(|k| k == kind));
        f.debug_struct("ModelRouter")
            .field("default_model", &self.default_model())
            .field("providers", &providers)
            .finish()
    }
}

/// Builder for [`ModelRouter`]
pub struct ModelRouterBuilder {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
    default_model: String,
}

impl ModelRouterBuilder {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            default_model: DEFAULT_MODEL_ID.to_string(),
        }
    }

    /// Register an adapter; a later adapter for the same provider replaces it
    pub fn adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    /// Set the fallback model id
    pub fn default_model(mut self, model_id: impl Into<String>) -> Self {
        self.default_model = model_id.into();
        self
    }

    pub fn build(self) -> Result<ModelRouter, RoutingError> {
        let (kind, entry) = ProviderSpec::find_model(&self.default_model)
            .ok_or_else(|| RoutingError::UnknownDefaultModel(self.default_model.clone()))?;

        let default_adapter = match self.adapters.get(&kind) {
            Some(adapter) => Arc::clone(adapter),
            None => {
                return Err(RoutingError::MissingDefaultAdapter {
                    model: self.default_model,
                    provider: kind,
                })
            }
        };

        Ok(ModelRouter {
            adapters: self.adapters,
            default_entry: entry,
            default_adapter,
        })
    }
}

impl Default for ModelRouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
