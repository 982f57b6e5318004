//! Configuration validation utilities

use super::error::{ValidationError, ValidationErrorKind};
use super::schema::GeneratorConfig;
use crate::providers::spec::{ProviderKind, ProviderSpec};
use regex::Regex;
use tracing::warn;
use url::Url;

/// Configuration validator with rules that need more than field ranges
pub struct ConfigValidator {
    /// Pattern for keys that were left as literal placeholders
    placeholder_pattern: Regex,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            placeholder_pattern: Regex::new(r"^\$\{[^}]*\}$").expect("valid placeholder pattern"),
        }
    }

    /// Validate a configuration with extended rules
    pub fn validate(&self, config: &GeneratorConfig) -> Result<(), ValidationError> {
        config.validate()?;

        self.validate_default_model(config)?;
        self.validate_providers(config)?;

        Ok(())
    }

    /// The default model must be one the router can serve
    fn validate_default_model(&self, config: &GeneratorConfig) -> Result<(), ValidationError> {
        if ProviderSpec::find_model(&config.default_model).is_none() {
            let supported = ProviderKind::ALL
                .iter()
                .flat_map(|kind| kind.spec().models.iter().map(|m| m.id));
            return Err(ValidationError::unknown_model(
                "default_model",
                config.default_model.clone(),
                supported,
            ));
        }
        Ok(())
    }

    /// Base URLs must parse; keys that still look like placeholders are reported
    fn validate_providers(&self, config: &GeneratorConfig) -> Result<(), ValidationError> {
        for kind in ProviderKind::ALL {
            let settings = config.providers.get(kind);
            let field = kind.as_str();

            if let Some(base_url) = settings.base_url() {
                let parsed = Url::parse(base_url).map_err(|e| {
                    ValidationError::new(
                        format!("providers.{}.base_url", field),
                        ValidationErrorKind::InvalidUrl {
                            message: e.to_string(),
                        },
                    )
                })?;

                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ValidationError::new(
                        format!("providers.{}.base_url", field),
                        ValidationErrorKind::InvalidUrl {
                            message: format!("unsupported scheme '{}'", parsed.scheme()),
                        },
                    )
                    .with_hint("only http and https endpoints are supported"));
                }
            }

            if let Some(key) = settings.api_key() {
                if self.placeholder_pattern.is_match(key.expose()) {
                    warn!(
                        "providers.{}.api_key still holds an uninterpolated placeholder",
                        field
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ProviderSettings;

    #[test]
    fn test_default_config_is_valid() {
        let validator = ConfigValidator::new();
        assert!(validator.validate(&GeneratorConfig::default()).is_ok());
    }

    #[test]
    fn test_unknown_default_model_rejected() {
        let config = GeneratorConfig {
            default_model: "llama-70b".to_string(),
            ..Default::default()
        };
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "default_model");
        assert!(matches!(err.kind, ValidationErrorKind::UnknownModel { .. }));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = GeneratorConfig::default();
        config.providers.deepseek = ProviderSettings {
            api_key: None,
            base_url: Some("not a url".to_string()),
        };
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "providers.deepseek.base_url");
        assert!(matches!(err.kind, ValidationErrorKind::InvalidUrl { .. }));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = GeneratorConfig::default();
        config.providers.openai.base_url = Some("ftp://example.com".to_string());
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "providers.openai.base_url");
        assert!(err.hint.is_some());
    }
}
