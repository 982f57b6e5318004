//! HTTP error mapping utilities

use crate::providers::ProviderError;
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

/// Map a non-success status and its body to a [`ProviderError`]
///
/// The raw body is kept as-is: it is shown to the reader when retries run out.
pub fn map_http_error(status: StatusCode, body: Option<String>, request_id: Uuid) -> ProviderError {
    let body = body.unwrap_or_default();
    tracing::debug!(
        status = status.as_u16(),
        detail = extract_error_message(&body).as_deref().unwrap_or(""),
        %request_id,
        "Mapped provider error response"
    );

    ProviderError::Http {
        status: status.as_u16(),
        body,
    }
}

/// Extract a human-readable message from a JSON error body
pub fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;

    // OpenAI/Anthropic/xAI/DeepSeek: { "error": { "message": "..." } }
    // Gemini: { "error": { "code": 400, "message": "...", "status": "..." } }
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
    {
        return Some(message.to_string());
    }

    if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }

    json.get("error")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_keeps_body() {
        let err = map_http_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("upstream exploded".to_string()),
            Uuid::new_v4(),
        );
        assert_eq!(
            err,
            ProviderError::Http {
                status: 500,
                body: "upstream exploded".to_string()
            }
        );
    }

    #[test]
    fn test_map_http_error_without_body() {
        let err = map_http_error(StatusCode::UNAUTHORIZED, None, Uuid::new_v4());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Error: 401 - ");
    }

    #[test]
    fn test_extract_error_message_formats() {
        let nested = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#;
        assert_eq!(extract_error_message(nested).as_deref(), Some("Invalid API key"));

        let flat = r#"{"message": "overloaded"}"#;
        assert_eq!(extract_error_message(flat).as_deref(), Some("overloaded"));

        let plain = r#"{"error": "bad request"}"#;
        assert_eq!(extract_error_message(plain).as_deref(), Some("bad request"));

        assert_eq!(extract_error_message("<html>oops</html>"), None);
    }
}
