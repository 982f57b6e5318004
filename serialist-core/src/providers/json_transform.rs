//! JSON body construction and response text extraction
//!
//! Builds the three request body shapes from a [`GenerationRequest`] and walks
//! provider responses down to the generated text.

use crate::protocol::GenerationRequest;
use crate::providers::error::ProviderError;
use crate::providers::spec::{BodyShape, PathSegment};
use serde_json::{json, Value};

/// Safety categories sent with every Gemini request
const GEMINI_SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const GEMINI_SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// Build a request body in the given shape
pub fn build_body(
    shape: BodyShape,
    request: &GenerationRequest,
    api_model: &str,
    system: Option<&str>,
) -> Value {
    match shape {
        BodyShape::ChatMessages => chat_messages_body(request, api_model, system),
        BodyShape::AnthropicMessages => anthropic_messages_body(request, api_model, system),
        BodyShape::PromptParts => prompt_parts_body(request),
    }
}

/// OpenAI-style chat completion body
pub fn chat_messages_body(
    request: &GenerationRequest,
    api_model: &str,
    system: Option<&str>,
) -> Value {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(json!({"role": "system", "content": system}));
    }
    messages.push(json!({"role": "user", "content": request.prompt}));

    json!({
        "model": api_model,
        "messages": messages,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    })
}

/// Anthropic Messages API body
///
/// The system prompt is a top-level field rather than a message.
pub fn anthropic_messages_body(
    request: &GenerationRequest,
    api_model: &str,
    system: Option<&str>,
) -> Value {
    let mut body = json!({
        "model": api_model,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
        "messages": [
            {"role": "user", "content": request.prompt}
        ],
    });
    if let Some(system) = system {
        body["system"] = json!(system);
    }
    body
}

/// Gemini `generateContent` body
///
/// The model is addressed in the URL, so it does not appear in the body.
pub fn prompt_parts_body(request: &GenerationRequest) -> Value {
    let safety_settings: Vec<Value> = GEMINI_SAFETY_CATEGORIES
        .iter()
        .map(|category| json!({"category": category, "threshold": GEMINI_SAFETY_THRESHOLD}))
        .collect();

    json!({
        "contents": [
            {"role": "user", "parts": [{"text": request.prompt}]}
        ],
        "generationConfig": {
            "temperature": request.temperature,
            "maxOutputTokens": request.max_tokens,
        },
        "safetySettings": safety_settings,
    })
}

/// Walk `path` into `response` and return the string found there
pub fn extract_text(
    provider: &str,
    response: &Value,
    path: &[PathSegment],
) -> Result<String, ProviderError> {
    let mut current = response;
    for segment in path {
        let next = match segment {
            PathSegment::Key(key) => current.get(*key),
            PathSegment::Index(index) => current.get(*index),
        };
        current = next.ok_or_else(|| ProviderError::MalformedResponse {
            provider: provider.to_string(),
            message: format!("missing {} in response", describe_path(path)),
        })?;
    }

    current
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::MalformedResponse {
            provider: provider.to_string(),
            message: format!("{} is not a string", describe_path(path)),
        })
}

/// Render a path as `choices[0].message.content`
pub fn describe_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => out.push_str(&format!("[{}]", index)),
        }
    }
    out
}
