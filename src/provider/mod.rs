//! Provider client subsystem.
//!
//! # Data Flow
//! ```text
//! strategy / collector
//!     → rpc.rs (JSON-RPC envelope, `error` member mapping)
//!     → client.rs (single HTTP call, deadline, status + JSON checks)
//!     → ProviderResult<Value>
//! ```
//!
//! # Design Decisions
//! - Every call carries its own deadline; a timeout is a transport failure
//! - No retries here; endpoint fallback belongs to the caller
//! - `Transport` is a trait so strategies can run against a mock

pub mod client;
pub mod rpc;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use client::{HttpTransport, Transport};
pub use types::{DecodeError, ProviderError, ProviderResult, TransportError};
