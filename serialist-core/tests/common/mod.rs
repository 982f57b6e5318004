//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use serialist_core::protocol::{GenerationRequest, GenerationResult};
use serialist_core::providers::{ProviderAdapter, ProviderKind, ProviderSpec};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Adapter that replays scripted results and records every request it sees
pub struct ScriptedAdapter {
    kind: ProviderKind,
    script: Mutex<VecDeque<GenerationResult>>,
    fallback: GenerationResult,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedAdapter {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            script: Mutex::new(VecDeque::new()),
            fallback: GenerationResult::success("default text"),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue results returned in order; once drained, `fallback` is returned
    pub fn with_script<I>(self, results: I) -> Self
    where
        I: IntoIterator<Item = GenerationResult>,
    {
        self.script.lock().unwrap().extend(results);
        self
    }

    pub fn with_fallback(mut self, result: GenerationResult) -> Self {
        self.fallback = result;
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn spec(&self) -> &'static ProviderSpec {
        self.kind.spec()
    }

    fn build_body(&self, request: &GenerationRequest, api_model: &str) -> Value {
        json!({"model": api_model, "prompt": request.prompt})
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Install a test subscriber once; respects `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
