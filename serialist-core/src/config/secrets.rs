//! Provider API keys
//!
//! The generator config is logged at debug level, so keys must never reach a
//! formatter. `ApiKey` only hands out its value through [`ApiKey::expose`],
//! which is called once per request when the auth header is built.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building auth headers only
    pub fn expose(&self) -> &str {
        self.0.trim()
    }

    /// Blank keys (e.g. an unset `${VAR}`) count as no key at all
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            f.write_str("ApiKey(<blank>)")
        } else {
            f.write_str("ApiKey(***)")
        }
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
