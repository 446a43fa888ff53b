//! Multi-chain aggregation.
//!
//! # Data Flow
//! ```text
//! wallet address
//!     → engine.rs: one strategy per configured chain, all driven by join_all
//!         - each chain bounded by a scan deadline and a panic guard
//!         - failures become an empty chain result plus a report entry
//!     → concatenate in configured chain order
//!     → dedupe by (chain, lower(contract)), first entry wins
//!     → AggregationResult
//! ```
//!
//! # Design Decisions
//! - No spawned tasks: chains are polled from the request task
//! - Configured order, not completion order, decides which duplicate survives
//! - One metadata resolver per scan; nothing is cached across requests

pub mod engine;

pub use engine::{dedupe, AggregationResult, Aggregator, ChainReport};
