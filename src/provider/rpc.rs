//! JSON-RPC envelopes over a `Transport`.

use alloy::primitives::{Address, Bytes};
use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::abi::AbiError;
use crate::provider::client::Transport;
use crate::provider::types::{DecodeError, ProviderError, ProviderResult, TransportError};

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// POST one JSON-RPC request and return its `result` member.
pub async fn rpc_call(
    transport: &dyn Transport,
    endpoint: &str,
    method: &str,
    params: Value,
    deadline: Duration,
) -> ProviderResult<Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method,
        params,
    };
    let body = serde_json::to_value(&request).map_err(|e| DecodeError::Json(e.to_string()))?;
    let mut response = transport.post_json(endpoint, &body, deadline).await?;

    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        return Err(ProviderError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    match response.get_mut("result") {
        Some(result) if !result.is_null() => Ok(result.take()),
        _ => Err(DecodeError::Shape("missing result".into()).into()),
    }
}

/// `eth_call` against `latest`; returns the raw return data.
pub async fn eth_call(
    transport: &dyn Transport,
    endpoint: &str,
    to: Address,
    data: &[u8],
    deadline: Duration,
) -> ProviderResult<Bytes> {
    let params = json!([
        { "to": to.to_string(), "data": Bytes::copy_from_slice(data).to_string() },
        "latest"
    ]);
    let result = rpc_call(transport, endpoint, "eth_call", params, deadline).await?;
    let hex = result
        .as_str()
        .ok_or_else(|| DecodeError::Shape("eth_call result is not a string".into()))?;
    Bytes::from_str(hex).map_err(|_| DecodeError::Shape(format!("invalid hex '{}'", hex)).into())
}

/// `eth_call` against each endpoint in order until one answers with data
/// that `decode` accepts.
///
/// Transport failures, RPC errors and undecodable returns (including an
/// empty `0x`) move on to the next endpoint. The first decoded value wins
/// and the remaining endpoints are never queried.
pub async fn eth_call_first<T, F>(
    transport: &dyn Transport,
    endpoints: &[String],
    to: Address,
    data: &[u8],
    deadline: Duration,
    decode: F,
) -> ProviderResult<T>
where
    T: Send,
    F: Fn(&[u8]) -> Result<T, AbiError> + Send + Sync,
{
    let mut last_error: ProviderError =
        TransportError::Network("no RPC endpoints configured".into()).into();

    for (i, endpoint) in endpoints.iter().enumerate() {
        match eth_call(transport, endpoint, to, data, deadline).await {
            Ok(bytes) => match decode(&bytes) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::debug!(endpoint_idx = i, contract = %to, error = %e, "Undecodable eth_call return, trying next endpoint");
                    last_error = DecodeError::from(e).into();
                }
            },
            Err(e) => {
                tracing::debug!(endpoint_idx = i, contract = %to, error = %e, "eth_call failed, trying next endpoint");
                last_error = e;
            }
        }
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockTransport;

    #[tokio::test]
    async fn test_eth_call_returns_bytes() {
        let mock = MockTransport::new();
        mock.on_post("http://rpc", |body| {
            assert_eq!(body["method"], "eth_call");
            assert_eq!(body["params"][1], "latest");
            Ok(json!({"jsonrpc": "2.0", "id": 1, "result": "0x0102"}))
        });

        let bytes = eth_call(&mock, "http://rpc", Address::ZERO, &[0xaa], Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), &[0x01, 0x02]);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_rpc_error_member() {
        let mock = MockTransport::new();
        mock.on_post("http://rpc", |_| {
            Ok(json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "execution reverted"}}))
        });

        let err = rpc_call(&mock, "http://rpc", "eth_call", json!([]), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::Rpc {
                code: -32000,
                message: "execution reverted".into()
            }
        );
    }

    #[tokio::test]
    async fn test_eth_call_first_falls_through() {
        let mock = MockTransport::new();
        mock.on_post("http://a", |_| Ok(json!({"jsonrpc": "2.0", "id": 1, "result": "0x"})));
        mock.on_post("http://b", |_| {
            Ok(json!({"jsonrpc": "2.0", "id": 1, "result": format!("0x{:064x}", 7)}))
        });
        mock.on_post("http://c", |_| panic!("third endpoint must not be queried"));

        let endpoints = vec!["http://a".to_string(), "http://b".to_string(), "http://c".to_string()];
        let value = eth_call_first(
            &mock,
            &endpoints,
            Address::ZERO,
            &[],
            Duration::from_secs(1),
            crate::blockchain::abi::decode_uint,
        )
        .await
        .unwrap();
        assert_eq!(value, alloy::primitives::U256::from(7));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_eth_call_first_without_endpoints() {
        let mock = MockTransport::new();
        let err = eth_call_first(
            &mock,
            &[],
            Address::ZERO,
            &[],
            Duration::from_secs(1),
            crate::blockchain::abi::decode_uint,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_result_is_decode_error() {
        let mock = MockTransport::new();
        mock.on_post("http://rpc", |_| Ok(json!({"jsonrpc": "2.0", "id": 1})));

        let err = rpc_call(&mock, "http://rpc", "getBalance", json!([]), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }
}
