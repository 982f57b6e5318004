//! Configuration module for Serialist
//!
//! Provider credentials, retry and timeout settings, summary bounds and
//! generation defaults. Configurations load from YAML or JSON files with
//! `${VAR}` interpolation, or straight from the process environment.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::{interpolate_env_vars, referenced_env_vars};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{
    GenerationSettings, GeneratorConfig, ProviderSettings, ProvidersConfig, RetrySettings,
    SummarySettings, ThrottleSettings, TimeoutSettings, CONFIG_VERSION,
};
pub use secrets::ApiKey;
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a generator config, picking the format from the file extension.
///
/// `.json` files parse as JSON, anything else as YAML.
pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<GeneratorConfig> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_from_json(path),
        _ => load_from_yaml(path),
    }
}

pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<GeneratorConfig> {
    let path = path.as_ref();
    let source = read_interpolated(path)?;
    let config = serde_yaml::from_str(&source).map_err(|e| {
        let location = e.location();
        parse_error(
            path,
            location.as_ref().map(|l| l.line()),
            location.as_ref().map(|l| l.column()),
            e,
        )
    })?;
    accept(path, config)
}

pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<GeneratorConfig> {
    let path = path.as_ref();
    let source = read_interpolated(path)?;
    let config = serde_json::from_str(&source)
        .map_err(|e| parse_error(path, Some(e.line()), Some(e.column()), e))?;
    accept(path, config)
}

/// File contents with `${VAR}` references already substituted
fn read_interpolated(path: &Path) -> ConfigResult<String> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(env::interpolate_env_vars(&raw))
}

fn parse_error(
    path: &Path,
    line: Option<usize>,
    column: Option<usize>,
    err: impl std::fmt::Display,
) -> ConfigError {
    ConfigError::Parse {
        path: path.display().to_string(),
        line,
        column,
        message: err.to_string(),
    }
}

fn accept(path: &Path, config: GeneratorConfig) -> ConfigResult<GeneratorConfig> {
    ConfigValidator::new().validate(&config)?;
    debug!(path = %path.display(), ?config, "Generator config loaded");
    Ok(config)
}
