//! Solana wallet collector.
//!
//! # Data Flow
//! ```text
//! base58 owner address
//!     → collector.rs: getBalance + getTokenAccountsByOwner (SPL Token and
//!       Token-2022), issued concurrently
//!     → merge token accounts by mint, dust dropped first
//!     → decorate with verified-token index, then DEX-pair lookup batches
//!     → SolanaPortfolio
//! ```
//!
//! # Design Decisions
//! - Independent of the EVM aggregator; shares only the transport and config
//! - Metadata lookups are best effort; an unnamed mint is still reported
//! - RPC failures are reported in-band next to whatever data did arrive

pub mod collector;
pub mod types;

pub use collector::{merge_accounts, SolanaCollector};
pub use types::{SolanaPortfolio, SolanaTokenRecord, TokenAccount};
