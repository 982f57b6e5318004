//! Environment variable interpolation for configuration

use regex::Regex;
use std::env;
use std::sync::LazyLock;
use tracing::warn;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var pattern"));

/// Interpolate `${VAR}` references in a configuration string.
///
/// Unset variables interpolate to an empty string. A provider whose key comes
/// out empty is simply unconfigured, which is reported per call rather than
/// failing the whole load.
pub fn interpolate_env_vars(content: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    warn!("Environment variable '{}' is not set; using empty value", var_name);
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Names of the `${VAR}` references in a configuration string
pub fn referenced_env_vars(content: &str) -> Vec<String> {
    ENV_VAR_PATTERN
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Read an environment variable, treating blank values as unset
pub fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_env_vars() {
        env::set_var("SERIALIST_TEST_VAR", "test_value");

        let content = "api_key: ${SERIALIST_TEST_VAR}";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "api_key: test_value");

        env::remove_var("SERIALIST_TEST_VAR");
    }

    #[test]
    fn test_missing_env_var_becomes_empty() {
        let content = "api_key: \"${SERIALIST_MISSING_VAR}\"";
        assert_eq!(interpolate_env_vars(content), "api_key: \"\"");
    }

    #[test]
    fn test_multiple_env_vars() {
        env::set_var("SERIALIST_VAR1", "value1");
        env::set_var("SERIALIST_VAR2", "value2");

        let content = "key1: ${SERIALIST_VAR1}, key2: ${SERIALIST_VAR2}";
        assert_eq!(interpolate_env_vars(content), "key1: value1, key2: value2");
        assert_eq!(
            referenced_env_vars(content),
            vec!["SERIALIST_VAR1".to_string(), "SERIALIST_VAR2".to_string()]
        );

        env::remove_var("SERIALIST_VAR1");
        env::remove_var("SERIALIST_VAR2");
    }

    #[test]
    fn test_non_empty_var() {
        env::set_var("SERIALIST_BLANK_VAR", "   ");
        assert_eq!(non_empty_var("SERIALIST_BLANK_VAR"), None);
        env::remove_var("SERIALIST_BLANK_VAR");
    }
}
