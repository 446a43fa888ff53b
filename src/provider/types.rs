//! Provider error taxonomy.

use thiserror::Error;

use crate::blockchain::abi::AbiError;

/// The request never produced a usable HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request exceeded its deadline and was cancelled.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Connection, TLS or protocol failure.
    #[error("network error: {0}")]
    Network(String),

    /// Response arrived with a status outside 2xx.
    #[error("HTTP status {0}")]
    Status(u16),
}

/// A response arrived but could not be interpreted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(String),

    #[error("unexpected payload shape: {0}")]
    Shape(String),

    #[error("non-numeric value '{0}'")]
    Number(String),

    #[error(transparent)]
    Abi(#[from] AbiError),
}

/// Any failure of a single provider call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// JSON-RPC `error` member.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Transport(TransportError::Timeout(_)) => "timeout",
            ProviderError::Transport(_) => "transport",
            ProviderError::Decode(_) => "decode",
            ProviderError::Rpc { .. } => "rpc",
        }
    }
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::from(TransportError::Timeout(5000));
        assert_eq!(err.to_string(), "request timed out after 5000 ms");
        assert_eq!(err.kind(), "timeout");

        let err = ProviderError::from(TransportError::Status(503));
        assert!(err.to_string().contains("503"));
        assert_eq!(err.kind(), "transport");

        let err = ProviderError::Rpc {
            code: -32000,
            message: "execution reverted".into(),
        };
        assert_eq!(err.kind(), "rpc");
    }
}
