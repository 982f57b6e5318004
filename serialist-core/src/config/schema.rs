//! Configuration schema structures with serde support

use super::env::non_empty_var;
use super::error::{ValidationError, ValidationErrorKind};
use super::secrets::ApiKey;
use crate::protocol::{CallKind, DEFAULT_TEMPERATURE, MAX_TEMPERATURE};
use crate::providers::spec::{ProviderKind, DEFAULT_MODEL_ID};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Schema version understood by this crate
pub const CONFIG_VERSION: &str = "0.1";

/// Root configuration structure for Serialist
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Schema version (required - no default)
    pub version: String,

    /// Model id substituted for unrecognized model ids
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Per-provider credentials and endpoints
    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub timeouts: TimeoutSettings,

    #[serde(default)]
    pub summary: SummarySettings,

    #[serde(default)]
    pub generation: GenerationSettings,

    #[serde(default)]
    pub throttle: ThrottleSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            default_model: default_model(),
            providers: ProvidersConfig::default(),
            retry: RetrySettings::default(),
            timeouts: TimeoutSettings::default(),
            summary: SummarySettings::default(),
            generation: GenerationSettings::default(),
            throttle: ThrottleSettings::default(),
        }
    }
}

/// Credentials and endpoint override for one provider
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// API key (supports environment variable interpolation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<ApiKey>,

    /// Base URL override; the provider's public endpoint is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderSettings {
    pub fn with_api_key(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: None,
        }
    }

    /// The API key, if one is set and non-blank
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref().filter(|key| !key.is_blank())
    }

    /// The base URL override, if one is set and non-blank
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Provider settings keyed by provider
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub xai: ProviderSettings,
    #[serde(default)]
    pub openai: ProviderSettings,
    #[serde(default)]
    pub anthropic: ProviderSettings,
    #[serde(default)]
    pub gemini: ProviderSettings,
    #[serde(default)]
    pub deepseek: ProviderSettings,
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::XAi => &self.xai,
            ProviderKind::OpenAI => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::DeepSeek => &self.deepseek,
        }
    }

    pub fn get_mut(&mut self, kind: ProviderKind) -> &mut ProviderSettings {
        match kind {
            ProviderKind::XAi => &mut self.xai,
            ProviderKind::OpenAI => &mut self.openai,
            ProviderKind::Anthropic => &mut self.anthropic,
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::DeepSeek => &mut self.deepseek,
        }
    }
}

/// Retry settings: bounded attempts with a fixed delay
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySettings {
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Per-call deadlines
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutSettings {
    #[serde(default = "default_generation_secs")]
    pub generation_secs: u64,

    #[serde(default = "default_summary_secs")]
    pub summary_secs: u64,

    #[serde(default = "default_connect_secs")]
    pub connect_secs: u64,
}

impl TimeoutSettings {
    /// Deadline for a call of the given kind
    pub fn for_call(&self, call_kind: CallKind) -> Duration {
        match call_kind {
            CallKind::Generation => Duration::from_secs(self.generation_secs),
            CallKind::Summary => Duration::from_secs(self.summary_secs),
        }
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            generation_secs: default_generation_secs(),
            summary_secs: default_summary_secs(),
            connect_secs: default_connect_secs(),
        }
    }
}

/// Summary compression settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SummarySettings {
    /// Texts at or below this many characters are their own summary
    #[serde(default = "default_threshold_chars")]
    pub threshold_chars: usize,

    /// Completion budget for the summary request
    #[serde(default = "default_summary_max_tokens")]
    pub max_tokens: u32,

    /// Marker appended to truncated summaries
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
}

impl SummarySettings {
    /// Longest summary the compressor will ever return, in characters
    pub fn max_summary_chars(&self) -> usize {
        self.threshold_chars + self.ellipsis.chars().count()
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            threshold_chars: default_threshold_chars(),
            max_tokens: default_summary_max_tokens(),
            ellipsis: default_ellipsis(),
        }
    }
}

/// Generation parameters per prompt kind
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationSettings {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_synopsis_max_tokens")]
    pub synopsis_max_tokens: u32,

    #[serde(default = "default_episode_max_tokens")]
    pub episode_max_tokens: u32,

    #[serde(default = "default_style_max_tokens")]
    pub style_max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            synopsis_max_tokens: default_synopsis_max_tokens(),
            episode_max_tokens: default_episode_max_tokens(),
            style_max_tokens: default_style_max_tokens(),
        }
    }
}

/// Coarse process-wide throttling
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThrottleSettings {
    /// Maximum generation calls for the process; unlimited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<u64>,
}

impl GeneratorConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads one API key per provider plus `DEEPSEEK_API_BASE`. Missing keys
    /// leave the provider unconfigured.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for kind in ProviderKind::ALL {
            let settings = config.providers.get_mut(kind);
            settings.api_key = non_empty_var(kind.spec().api_key_env).map(ApiKey::new);
        }
        config.providers.deepseek.base_url = non_empty_var("DEEPSEEK_API_BASE");
        config
    }

    /// Providers that have a usable API key
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.providers.get(*kind).api_key().is_some())
            .collect()
    }

    /// Validate field ranges
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != CONFIG_VERSION {
            return Err(ValidationError::new(
                "version",
                ValidationErrorKind::UnsupportedVersion {
                    expected: CONFIG_VERSION.to_string(),
                    found: self.version.clone(),
                },
            ));
        }

        if self.default_model.trim().is_empty() {
            return Err(ValidationError::missing("default_model"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ValidationError::out_of_range(
                "retry.max_attempts",
                "at least one attempt is required",
            ));
        }

        let temperature = self.generation.temperature;
        if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(ValidationError::out_of_range(
                "generation.temperature",
                format!("{} is outside 0.0..={}", temperature, MAX_TEMPERATURE),
            ));
        }

        if self.summary.threshold_chars == 0 {
            return Err(ValidationError::out_of_range(
                "summary.threshold_chars",
                "threshold must be at least one character",
            ));
        }

        for (field, secs) in [
            ("timeouts.generation_secs", self.timeouts.generation_secs),
            ("timeouts.summary_secs", self.timeouts.summary_secs),
            ("timeouts.connect_secs", self.timeouts.connect_secs),
        ] {
            if secs == 0 {
                return Err(ValidationError::out_of_range(field, "timeout must be positive"));
            }
        }

        Ok(())
    }
}

fn default_model() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2_000
}

fn default_generation_secs() -> u64 {
    60
}

fn default_summary_secs() -> u64 {
    30
}

fn default_connect_secs() -> u64 {
    10
}

fn default_threshold_chars() -> usize {
    300
}

fn default_summary_max_tokens() -> u32 {
    400
}

fn default_ellipsis() -> String {
    "...".to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_synopsis_max_tokens() -> u32 {
    1500
}

fn default_episode_max_tokens() -> u32 {
    2000
}

fn default_style_max_tokens() -> u32 {
    2000
}
