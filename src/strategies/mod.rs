//! Per-chain balance discovery strategies.
//!
//! # Data Flow
//! ```text
//! ChainDescriptor.provider
//!     → strategy_for() selects one of:
//!         - explorer.rs  (one bulk GET, then metadata, dust, spam)
//!         - known.rs     (balanceOf per curated token, endpoint fallback)
//!         - discovery.rs (curated ∪ token index, batched balanceOf probes)
//!     → Vec<CandidateToken> handed back to the aggregator
//! ```
//!
//! # Design Decisions
//! - Strategies are stateless; everything request-scoped lives in `ScanContext`
//! - A strategy may fail; the aggregator turns failures into empty results
//! - Only the explorer path runs the spam policy (RPC inputs are curated)

pub mod discovery;
pub mod explorer;
pub mod known;

use alloy::primitives::Address;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ChainDescriptor, DiscoveryConfig, ProviderKind, TimeoutConfig};
use crate::provider::{ProviderError, Transport};
use crate::tokens::{CandidateToken, MetadataResolver, SpamPolicy};

pub use discovery::DiscoveryStrategy;
pub use explorer::ExplorerStrategy;
pub use known::KnownTokenStrategy;

/// Errors that abort one chain's scan.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("chain '{chain}' has no {missing} configured")]
    Misconfigured { chain: String, missing: &'static str },
}

/// Request-scoped inputs shared by every strategy.
pub struct ScanContext<'a> {
    pub wallet: Address,
    pub chain: &'a ChainDescriptor,
    pub transport: &'a dyn Transport,
    pub resolver: &'a MetadataResolver,
    pub spam: &'a SpamPolicy,
    pub timeouts: &'a TimeoutConfig,
}

/// Produces candidate balances for one chain.
#[async_trait]
pub trait ChainStrategy: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn discover(&self, ctx: &ScanContext<'_>) -> Result<Vec<CandidateToken>, StrategyError>;
}

/// Strategy for a configured provider kind.
pub fn strategy_for(kind: ProviderKind, discovery: &DiscoveryConfig) -> Box<dyn ChainStrategy> {
    match kind {
        ProviderKind::Explorer => Box::new(ExplorerStrategy::new(discovery.batch_size)),
        ProviderKind::RpcKnown => Box::new(KnownTokenStrategy),
        ProviderKind::RpcDiscovery => Box::new(DiscoveryStrategy::new(discovery.batch_size)),
    }
}
