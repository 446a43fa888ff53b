//! Outbound HTTP transport with per-call deadlines.
//!
//! # Responsibilities
//! - Issue one GET or JSON POST and parse the JSON body
//! - Enforce the caller's timeout by dropping the in-flight request
//! - Map failures into `ProviderError` instead of panicking
//!
//! Never retries. Callers own endpoint fallback because only they know
//! whether the next endpoint in an ordered list is worth trying.

use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::observability::metrics;
use crate::provider::types::{DecodeError, ProviderResult, TransportError};

/// A single-shot JSON transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and parse the body as JSON.
    async fn get_json(&self, url: &str, deadline: Duration) -> ProviderResult<Value>;

    /// POST `body` as JSON to `url` and parse the response as JSON.
    async fn post_json(&self, url: &str, body: &Value, deadline: Duration)
        -> ProviderResult<Value>;
}

/// `reqwest`-backed transport shared by every strategy.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dust-scanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self { client }
    }

    async fn execute(
        &self,
        kind: &'static str,
        request: reqwest::RequestBuilder,
        deadline: Duration,
    ) -> ProviderResult<Value> {
        let start = Instant::now();
        let result = match timeout(deadline, Self::send(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(deadline.as_millis() as u64).into()),
        };
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_provider_call(kind, outcome, start);
        result
    }

    async fn send(request: reqwest::RequestBuilder) -> ProviderResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()).into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()).into())
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, deadline: Duration) -> ProviderResult<Value> {
        self.execute("get", self.client.get(url), deadline).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        deadline: Duration,
    ) -> ProviderResult<Value> {
        self.execute("post", self.client.post(url).json(body), deadline)
            .await
    }
}
