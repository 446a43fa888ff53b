//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ScannerConfig (validated, immutable)
//!     → shared via Arc to the aggregator, collector and router
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the chain registry is injected data
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ChainDescriptor, CorsConfig, DiscoveryConfig, KnownToken, ListenerConfig,
    ObservabilityConfig, ProviderKind, ScannerConfig, SolanaConfig, SpamConfig, TimeoutConfig,
};
