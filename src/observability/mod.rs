//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, aggregator, strategies, provider client:
//!     → logging.rs (tracing events with structured fields)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape listener
//! ```
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests need no setup
//! - Label values are chain slugs and fixed strings, never wallet addresses

pub mod logging;
pub mod metrics;
