//! Configuration errors
//!
//! Loading fails in one of three places: reading the file, parsing it, or
//! validating the parsed values. Validation errors carry the dotted path of
//! the offending field so a bad generator config points straight at the line
//! to fix.

use thiserror::Error;

/// Why a generator configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read generator config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("generator config '{path}' is malformed (line {}, column {}): {message}",
            .line.map_or_else(|| "?".to_string(), |l| l.to_string()),
            .column.map_or_else(|| "?".to_string(), |c| c.to_string()))]
    Parse {
        path: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A parsed value that the generator cannot run with
#[derive(Debug, Error)]
#[error("invalid generator config at '{field_path}': {kind}{}", hint_suffix(.hint))]
pub struct ValidationError {
    /// Dotted path of the field, e.g. `providers.deepseek.base_url`
    pub field_path: String,
    pub kind: ValidationErrorKind,
    /// How to fix it, when that is not obvious from the kind
    pub hint: Option<String>,
}

#[derive(Debug, Error)]
pub enum ValidationErrorKind {
    #[error("a value is required")]
    Missing,

    #[error("'{model}' is not a known model id (known: {supported})")]
    UnknownModel { model: String, supported: String },

    #[error("{message}")]
    OutOfRange { message: String },

    #[error("not a usable endpoint: {message}")]
    InvalidUrl { message: String },

    #[error("schema version {found} is not supported (expected {expected})")]
    UnsupportedVersion { expected: String, found: String },
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_deref()
        .map(|h| format!(" ({})", h))
        .unwrap_or_default()
}

impl ValidationError {
    pub fn new(field_path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            field_path: field_path.into(),
            kind,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn missing(field_path: impl Into<String>) -> Self {
        Self::new(field_path, ValidationErrorKind::Missing)
    }

    pub fn out_of_range(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            field_path,
            ValidationErrorKind::OutOfRange {
                message: message.into(),
            },
        )
    }

    /// `model` is not in any provider's model table
    pub fn unknown_model<'a>(
        field_path: impl Into<String>,
        model: impl Into<String>,
        supported: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::new(
            field_path,
            ValidationErrorKind::UnknownModel {
                model: model.into(),
                supported: supported.into_iter().collect::<Vec<_>>().join(", "),
            },
        )
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = ValidationError::unknown_model("default_model", "llama", ["xai", "gpt-4o"]);
        assert_eq!(
            err.to_string(),
            "invalid generator config at 'default_model': 'llama' is not a known model id (known: xai, gpt-4o)"
        );

        let err = ValidationError::missing("default_model").with_hint("use \"xai\" for Grok");
        assert!(err.to_string().ends_with("a value is required (use \"xai\" for Grok)"));
    }

    #[test]
    fn test_parse_error_without_location() {
        let err = ConfigError::Parse {
            path: "serialist.yaml".to_string(),
            line: None,
            column: None,
            message: "unexpected end of stream".to_string(),
        };
        assert!(err.to_string().contains("(line ?, column ?)"));
    }
}
