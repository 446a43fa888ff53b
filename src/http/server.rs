//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the API handlers
//! - Wire up middleware (CORS, timeout, request ID, tracing)
//! - Serve on a bound listener until the shutdown signal fires

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::aggregator::Aggregator;
use crate::config::ScannerConfig;
use crate::http::handlers;
use crate::http::middleware::cors::cors_middleware;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::provider::{HttpTransport, Transport};
use crate::solana::SolanaCollector;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ScannerConfig>,
    pub aggregator: Arc<Aggregator>,
    pub solana: Arc<SolanaCollector>,
}

impl AppState {
    pub fn new(config: ScannerConfig, transport: Arc<dyn Transport>) -> Self {
        let config = Arc::new(config);
        let aggregator = Arc::new(Aggregator::new(config.clone(), transport.clone()));
        let solana = Arc::new(SolanaCollector::new(
            config.solana.clone(),
            config.timeouts.clone(),
            transport,
        ));
        Self {
            config,
            aggregator,
            solana,
        }
    }
}

/// HTTP server for the scanner API.
pub struct HttpServer {
    router: Router,
    config: Arc<ScannerConfig>,
}

impl HttpServer {
    /// Create a server that talks to the real upstream APIs.
    pub fn new(config: ScannerConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a server over a caller-supplied transport.
    pub fn with_transport(config: ScannerConfig, transport: Arc<dyn Transport>) -> Self {
        let state = AppState::new(config, transport);
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ScannerConfig, state: AppState) -> Router {
        let cors = Arc::new(config.cors.clone());
        Router::new()
            .route("/api/evm-tokens", get(handlers::evm_tokens))
            .route("/api/tokens", get(handlers::solana_tokens))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(middleware::from_fn_with_state(cors, cors_middleware))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
            .layer(TraceLayer::new_for_http())
    }

    /// A clone of the router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            chains = self.config.chains.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChainDescriptor, ProviderKind};
    use crate::provider::mock::MockTransport;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn server(mock: Arc<MockTransport>) -> HttpServer {
        HttpServer::with_transport(ScannerConfig::default(), mock)
    }

    async fn get(router: Router, uri: &str, origin: Option<&str>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(origin) = origin {
            request = request.header(header::ORIGIN, origin);
        }
        let response = router.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_invalid_evm_address_makes_no_calls() {
        let mock = Arc::new(MockTransport::new());
        let router = server(mock.clone()).router();

        let (status, _, body) = get(router.clone(), "/api/evm-tokens?addr=not-an-address", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "valid EVM address required"}));

        let (status, _, _) = get(router, "/api/evm-tokens", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_solana_address_makes_no_calls() {
        let mock = Arc::new(MockTransport::new());
        let router = server(mock.clone()).router();

        let (status, _, body) = get(router.clone(), "/api/tokens?addr=not-an-address", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid address"}));

        let (status, _, body) = get(router, "/api/tokens", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "addr required"}));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_cors_and_request_id_headers() {
        let router = server(Arc::new(MockTransport::new())).router();
        let (status, headers, body) = get(router, "/health", Some("http://localhost:5173")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET");
        assert!(headers.contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_request_timeout_keeps_cors_headers() {
        let mock = Arc::new(MockTransport::new());
        mock.on_get_slow("http://slow", Duration::from_secs(5), |_| Ok(json!([])));

        let mut config = ScannerConfig::default();
        config.listener.request_timeout_secs = 1;
        config.chains = vec![ChainDescriptor {
            name: "Slow".into(),
            slug: "slow".into(),
            provider: ProviderKind::Explorer,
            chain_id: None,
            explorer_url: Some("http://slow".into()),
            rpc_urls: Vec::new(),
            token_index_url: None,
            tokens: Vec::new(),
        }];
        let router = HttpServer::with_transport(config, mock).router();

        let (status, headers, _) = get(
            router,
            "/api/evm-tokens?addr=0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            Some("https://woofi-dustsweep.vercel.app"),
        )
        .await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://woofi-dustsweep.vercel.app"
        );
    }

    #[tokio::test]
    async fn test_total_upstream_failure_is_still_200() {
        // no routes: every chain fails with a network error
        let mock = Arc::new(MockTransport::new());
        let router = server(mock.clone()).router();
        let (status, _, body) = get(
            router,
            "/api/evm-tokens?addr=0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokens"], json!([]));
        assert_eq!(body["source"], "none");
        assert!(body["error"].is_string());
        assert!(mock.calls() > 0);
    }
}
