//! Router middleware.

pub mod cors;

pub use cors::{cors_middleware, resolve_origin};
