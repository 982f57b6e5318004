//! Outbound HTTP for provider calls
//!
//! One pooled [`HttpClient`] is shared by every adapter. Each call carries
//! its own [`RequestOptions`] so summary requests can time out sooner than
//! episode drafts.

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::{extract_error_message, map_http_error};

use crate::protocol::CallKind;
use std::time::Duration;
use uuid::Uuid;

/// Per-call settings, sent as `X-Request-ID` and used as the deadline
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub call_kind: CallKind,
    pub request_id: Uuid,
    pub timeout: Duration,
}

impl RequestOptions {
    /// Fresh request id, with the call kind's stock timeout
    pub fn new(call_kind: CallKind) -> Self {
        Self {
            call_kind,
            request_id: Uuid::new_v4(),
            timeout: call_kind.default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
