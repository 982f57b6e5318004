//! Static provider descriptors
//!
//! Each provider is described once: where to send requests, how to
//! authenticate, which body shape it expects and where the generated text sits
//! in its response. The descriptors are read-only; only the base URL can be
//! overridden from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Model id used when a caller names an unrecognized model
pub const DEFAULT_MODEL_ID: &str = "xai";

/// Supported text-generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    XAi,
    OpenAI,
    Anthropic,
    Gemini,
    DeepSeek,
}

impl ProviderKind {
    /// Every provider, in registration order
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::XAi,
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::DeepSeek,
    ];

    /// Configuration key for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::XAi => "xai",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    /// The static descriptor for this provider
    pub fn spec(&self) -> &'static ProviderSpec {
        match self {
            ProviderKind::XAi => &XAI,
            ProviderKind::OpenAI => &OPENAI,
            ProviderKind::Anthropic => &ANTHROPIC,
            ProviderKind::Gemini => &GEMINI,
            ProviderKind::DeepSeek => &DEEPSEEK,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().display_name)
    }
}

/// How a provider expects its API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// Key in a dedicated header (e.g. `x-api-key`)
    Header(&'static str),
}

/// Request body layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// OpenAI-style `messages` list
    ChatMessages,
    /// Anthropic Messages API: `max_tokens` is mandatory
    AnthropicMessages,
    /// Gemini-style single prompt split into `contents[].parts[]`
    PromptParts,
}

/// One step of a JSON path into a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

/// A caller-facing model id and the provider's name for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelEntry {
    /// Identifier callers pass in `GenerationRequest::model_id`
    pub id: &'static str,
    /// Model name sent on the wire
    pub api_name: &'static str,
    /// Human-readable label
    pub display_name: &'static str,
    /// Temperature this model is always sampled at, in place of the configured one
    pub temperature: Option<f32>,
}

/// Static description of one provider
#[derive(Debug)]
pub struct ProviderSpec {
    pub kind: ProviderKind,
    pub display_name: &'static str,
    /// Environment variable holding the API key
    pub api_key_env: &'static str,
    pub default_base_url: &'static str,
    /// Path appended to the base URL; `{model}` is replaced by the API model name
    pub endpoint_path: &'static str,
    pub auth: AuthScheme,
    /// Headers sent with every request besides auth and content type
    pub extra_headers: &'static [(&'static str, &'static str)],
    pub body_shape: BodyShape,
    pub text_path: &'static [PathSegment],
    pub models: &'static [ModelEntry],
}

const CHAT_TEXT_PATH: &[PathSegment] = &[
    PathSegment::Key("choices"),
    PathSegment::Index(0),
    PathSegment::Key("message"),
    PathSegment::Key("content"),
];

static XAI: ProviderSpec = ProviderSpec {
    kind: ProviderKind::XAi,
    display_name: "xAI",
    api_key_env: "XAI_API_KEY",
    default_base_url: "https://api.x.ai/v1",
    endpoint_path: "/chat/completions",
    auth: AuthScheme::Bearer,
    extra_headers: &[],
    body_shape: BodyShape::ChatMessages,
    text_path: CHAT_TEXT_PATH,
    models: &[
        ModelEntry {
            id: "xai",
            api_name: "grok-2-1212",
            display_name: "xAI Grok-2",
            temperature: None,
        },
        ModelEntry {
            id: "grok-3",
            api_name: "grok-3-1212",
            display_name: "xAI Grok-3",
            temperature: None,
        },
    ],
};

static OPENAI: ProviderSpec = ProviderSpec {
    kind: ProviderKind::OpenAI,
    display_name: "OpenAI",
    api_key_env: "OPENAI_API_KEY",
    default_base_url: "https://api.openai.com/v1",
    endpoint_path: "/chat/completions",
    auth: AuthScheme::Bearer,
    extra_headers: &[],
    body_shape: BodyShape::ChatMessages,
    text_path: CHAT_TEXT_PATH,
    models: &[ModelEntry {
        id: "gpt-4o",
        api_name: "gpt-4o",
        display_name: "OpenAI GPT-4o",
        temperature: Some(0.8),
    }],
};

static ANTHROPIC: ProviderSpec = ProviderSpec {
    kind: ProviderKind::Anthropic,
    display_name: "Anthropic",
    api_key_env: "ANTHROPIC_API_KEY",
    default_base_url: "https://api.anthropic.com/v1",
    endpoint_path: "/messages",
    auth: AuthScheme::Header("x-api-key"),
    extra_headers: &[("anthropic-version", "2023-06-01")],
    body_shape: BodyShape::AnthropicMessages,
    text_path: &[
        PathSegment::Key("content"),
        PathSegment::Index(0),
        PathSegment::Key("text"),
    ],
    models: &[ModelEntry {
        id: "claude-3-opus",
        api_name: "claude-3-opus-20240229",
        display_name: "Anthropic Claude 3 Opus",
        temperature: None,
    }],
};

static GEMINI: ProviderSpec = ProviderSpec {
    kind: ProviderKind::Gemini,
    display_name: "Gemini",
    api_key_env: "GEMINI_API_KEY",
    default_base_url: "https://generativelanguage.googleapis.com/v1beta",
    endpoint_path: "/models/{model}:generateContent",
    auth: AuthScheme::Header("x-goog-api-key"),
    extra_headers: &[],
    body_shape: BodyShape::PromptParts,
    text_path: &[
        PathSegment::Key("candidates"),
        PathSegment::Index(0),
        PathSegment::Key("content"),
        PathSegment::Key("parts"),
        PathSegment::Index(0),
        PathSegment::Key("text"),
    ],
    models: &[ModelEntry {
        id: "gemini",
        api_name: "gemini-2.5-pro-preview-03-25",
        display_name: "Google Gemini 2.5 Pro",
        temperature: None,
    }],
};

static DEEPSEEK: ProviderSpec = ProviderSpec {
    kind: ProviderKind::DeepSeek,
    display_name: "DeepSeek",
    api_key_env: "DEEPSEEK_API_KEY",
    default_base_url: "https://api.deepseek.com/v1",
    endpoint_path: "/chat/completions",
    auth: AuthScheme::Bearer,
    extra_headers: &[],
    body_shape: BodyShape::ChatMessages,
    text_path: CHAT_TEXT_PATH,
    models: &[ModelEntry {
        id: "deepseek-v3",
        api_name: "deepseek-chat",
        display_name: "DeepSeek V3",
        temperature: None,
    }],
};

impl ProviderSpec {
    /// Look up a recognized model id across all providers
    pub fn find_model(model_id: &str) -> Option<(ProviderKind, &'static ModelEntry)> {
        ProviderKind::ALL.into_iter().find_map(|kind| {
            kind.spec()
                .models
                .iter()
                .find(|entry| entry.id == model_id)
                .map(|entry| (kind, entry))
        })
    }

    /// Sampling temperature for `model_id`, or `default` when the model has none
    pub fn temperature_for(model_id: &str, default: f32) -> f32 {
        Self::find_model(model_id)
            .and_then(|(_, entry)| entry.temperature)
            .unwrap_or(default)
    }

    /// Wire model name for a model id this provider serves
    pub fn api_model(&self, model_id: &str) -> Option<&'static str> {
        self.models
            .iter()
            .find(|entry| entry.id == model_id)
            .map(|entry| entry.api_name)
    }

    /// Full request URL for a model, using `base_url` when given
    pub fn url(&self, base_url: Option<&str>, api_model: &str) -> String {
        let base = base_url.unwrap_or(self.default_base_url).trim_end_matches('/');
        let path = self.endpoint_path.replace("{model}", api_model);
        format!("{}{}", base, path)
    }

    /// Auth and provider-specific headers for a request
    pub fn headers(&self, api_key: &str) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(1 + self.extra_headers.len());
        match self.auth {
            AuthScheme::Bearer => {
                headers.push(("Authorization".to_string(), format!("Bearer {}", api_key)))
            }
            AuthScheme::Header(name) => headers.push((name.to_string(), api_key.to_string())),
        }
        headers.extend(
            self.extra_headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpt4o_samples_hotter() {
        assert_eq!(ProviderSpec::temperature_for("gpt-4o", 0.7), 0.8);
        assert_eq!(ProviderSpec::temperature_for("xai", 0.7), 0.7);
        assert_eq!(ProviderSpec::temperature_for("deepseek-v3", 0.3), 0.3);
        assert_eq!(ProviderSpec::temperature_for("no-such-model", 0.5), 0.5);
    }

    #[test]
    fn test_find_model() {
        let (kind, entry) = ProviderSpec::find_model("claude-3-opus").unwrap();
        assert_eq!(kind, ProviderKind::Anthropic);
        assert_eq!(entry.api_name, "claude-3-opus-20240229");

        let (kind, entry) = ProviderSpec::find_model("grok-3").unwrap();
        assert_eq!(kind, ProviderKind::XAi);
        assert_eq!(entry.api_name, "grok-3-1212");

        assert!(ProviderSpec::find_model("gpt-5").is_none());
        assert!(ProviderSpec::find_model(DEFAULT_MODEL_ID).is_some());
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            ProviderKind::XAi.spec().url(None, "grok-2-1212"),
            "https://api.x.ai/v1/chat/completions"
        );
        assert_eq!(
            ProviderKind::Gemini.spec().url(None, "gemini-2.5-pro-preview-03-25"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro-preview-03-25:generateContent"
        );
        assert_eq!(
            ProviderKind::DeepSeek
                .spec()
                .url(Some("http://localhost:8080/v1/"), "deepseek-chat"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_headers() {
        let anthropic = ProviderKind::Anthropic.spec().headers("sk-ant");
        assert!(anthropic.contains(&("x-api-key".to_string(), "sk-ant".to_string())));
        assert!(anthropic.contains(&("anthropic-version".to_string(), "2023-06-01".to_string())));

        let openai = ProviderKind::OpenAI.spec().headers("sk-test");
        assert_eq!(
            openai,
            vec![("Authorization".to_string(), "Bearer sk-test".to_string())]
        );
    }

    #[test]
    fn test_model_ids_are_unique() {
        let mut ids: Vec<&str> = ProviderKind::ALL
            .iter()
            .flat_map(|kind| kind.spec().models.iter().map(|m| m.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
