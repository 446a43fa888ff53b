//! Multi-chain wallet token-balance scanner.

// Core pipeline
pub mod aggregator;
pub mod blockchain;
pub mod provider;
pub mod solana;
pub mod strategies;
pub mod tokens;

// Service surface
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use aggregator::{AggregationResult, Aggregator};
pub use config::schema::ScannerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use solana::SolanaCollector;
