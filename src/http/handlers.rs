//! API request handlers.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::blockchain::{parse_evm_address, parse_solana_address, InputValidationError};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::tokens::TokenRecord;

#[derive(Debug, Default, Deserialize)]
pub struct AddressQuery {
    pub addr: Option<String>,
}

/// Body of `GET /api/evm-tokens`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvmTokensResponse {
    pub tokens: Vec<TokenRecord>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

fn bad_request(endpoint: &'static str, error: InputValidationError, start: Instant) -> Response {
    metrics::record_request(endpoint, 400, start);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}

pub async fn evm_tokens(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AddressQuery>,
) -> Response {
    const ENDPOINT: &str = "evm-tokens";
    let start = Instant::now();

    let wallet = match parse_evm_address(query.addr.as_deref()) {
        Ok(wallet) => wallet,
        Err(e) => return bad_request(ENDPOINT, e, start),
    };

    tracing::debug!(request_id = %request_id(&headers), wallet = %wallet, "EVM scan requested");
    let result = state.aggregator.scan(wallet).await;

    metrics::record_request(ENDPOINT, 200, start);
    Json(EvmTokensResponse {
        tokens: result.tokens,
        source: result.source,
        error: result.error,
    })
    .into_response()
}

pub async fn solana_tokens(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AddressQuery>,
) -> Response {
    const ENDPOINT: &str = "solana-tokens";
    let start = Instant::now();

    let owner = match parse_solana_address(query.addr.as_deref()) {
        Ok(owner) => owner,
        Err(e) => return bad_request(ENDPOINT, e, start),
    };

    tracing::debug!(request_id = %request_id(&headers), owner = %owner, "Solana scan requested");
    let portfolio = state.solana.collect(&owner).await;

    metrics::record_request(ENDPOINT, 200, start);
    Json(portfolio).into_response()
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
