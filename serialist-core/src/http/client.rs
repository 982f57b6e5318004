//! Pooled reqwest client for provider calls

use crate::http::error::map_http_error;
use crate::http::RequestOptions;
use crate::providers::ProviderError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Generation responses are a few KB; anything past this is not a completion
const BODY_LIMIT: usize = 4 * 1024 * 1024;

const USER_AGENT: &str = concat!("serialist/", env!("CARGO_PKG_VERSION"));

const IDLE_CONNECTIONS_PER_PROVIDER: usize = 4;

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    body_limit: usize,
}

impl HttpClient {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_connect_timeout(Duration::from_secs(10))
    }

    /// Client that gives up on establishing a connection after `connect`.
    ///
    /// The overall deadline is per call, see [`RequestOptions::timeout`].
    pub fn with_connect_timeout(connect: Duration) -> Result<Self, ProviderError> {
        let client = ClientBuilder::new()
            .connect_timeout(connect)
            .pool_max_idle_per_host(IDLE_CONNECTIONS_PER_PROVIDER)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| ProviderError::Transport {
                message: format!("cannot build HTTP client: {}", e),
            })?;

        Ok(Self {
            client: Arc::new(client),
            body_limit: BODY_LIMIT,
        })
    }

    /// Cap on response bodies, checked while the body streams in
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    fn header_map(pairs: &[(String, String)]) -> Result<HeaderMap, ProviderError> {
        let mut map = HeaderMap::with_capacity(pairs.len() + 1);
        map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in pairs {
            let header = HeaderName::from_bytes(name.as_bytes())
                .ok()
                .zip(HeaderValue::from_str(value).ok())
                .ok_or_else(|| ProviderError::Transport {
                    message: format!("header '{}' cannot be sent", name),
                })?;
            map.insert(header.0, header.1);
        }
        Ok(map)
    }

    /// Send one generation request and hand back the decoded JSON body.
    ///
    /// No retries happen here. Any status but 200 becomes [`ProviderError::Http`]
    /// with the raw body, and a 200 body that is not JSON becomes
    /// [`ProviderError::MalformedResponse`].
    pub async fn post_json(
        &self,
        provider: &str,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        options: &RequestOptions,
    ) -> Result<Value, ProviderError> {
        let request_id = options.request_id;
        debug!(provider, %request_id, call = ?options.call_kind, url, "Calling provider");

        let response = self
            .client
            .post(url)
            .timeout(options.timeout)
            .headers(Self::header_map(headers)?)
            .header("X-Request-ID", request_id.to_string())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(provider, %request_id, "Provider unreachable: {}", e);
                transport_error(&e, options)
            })?;

        // Only a plain 200 carries a completion
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.ok();
            warn!(provider, %request_id, %status, "Provider rejected the request");
            return Err(map_http_error(status, body, request_id));
        }

        let text = self.read_body(provider, response, options).await?;
        let json = serde_json::from_str::<Value>(&text).map_err(|e| {
            warn!(provider, %request_id, "Provider sent a non-JSON body: {}", e);
            ProviderError::MalformedResponse {
                provider: provider.to_string(),
                message: format!("body is not JSON: {}", e),
            }
        })?;

        info!(provider, %request_id, bytes = text.len(), "Provider answered");
        Ok(json)
    }

    async fn read_body(
        &self,
        provider: &str,
        mut response: Response,
        options: &RequestOptions,
    ) -> Result<String, ProviderError> {
        let too_large = |size: usize| ProviderError::MalformedResponse {
            provider: provider.to_string(),
            message: format!("body of {} bytes is over the {} byte limit", size, self.body_limit),
        };

        if let Some(declared) = response.content_length() {
            if declared as usize > self.body_limit {
                return Err(too_large(declared as usize));
            }
        }

        // Chunked bodies carry no length up front
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| transport_error(&e, options))?
        {
            let size = body.len() + chunk.len();
            if size > self.body_limit {
                return Err(too_large(size));
            }
            body.extend_from_slice(&chunk);
        }

        String::from_utf8(body).map_err(|e| ProviderError::MalformedResponse {
            provider: provider.to_string(),
            message: format!("body is not UTF-8: {}", e),
        })
    }
}

fn transport_error(err: &reqwest::Error, options: &RequestOptions) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            seconds: options.timeout.as_secs(),
        }
    } else if err.is_connect() {
        ProviderError::Transport {
            message: format!("Connection failed: {}", err),
        }
    } else {
        ProviderError::Transport {
            message: err.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}
