//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware stack)
//!     → request.rs (assign / propagate x-request-id)
//!     → middleware/cors.rs (allow-list origin headers)
//!     → handlers.rs (validate addr → aggregator or Solana collector)
//!     → JSON response
//! ```
//!
//! # Design Decisions
//! - Address syntax is checked before any outbound call
//! - Upstream failures never change the status code; they surface in `error`

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
