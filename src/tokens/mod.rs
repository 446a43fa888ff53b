//! Token model, normalization, metadata and spam classification.
//!
//! # Data Flow
//! ```text
//! strategy payload / RPC return
//!     → metadata.rs (symbol, name, decimals; memoized per request)
//!     → balance.rs (raw / 10^decimals, dust filter)
//!     → model.rs (CandidateToken)
//!     → spam.rs (explorer path only)
//!     → model.rs (TokenRecord)
//! ```

pub mod balance;
pub mod metadata;
pub mod model;
pub mod spam;

pub use balance::{normalize_balance, passes_dust, scale_u256};
pub use metadata::{IndexedToken, MetadataResolver};
pub use model::{
    CandidateToken, ResolvedMetadata, TokenMetadata, TokenRecord, DEFAULT_DECIMALS,
    DUST_THRESHOLD, UNKNOWN_SYMBOL,
};
pub use spam::{SpamPolicy, SpamReason};
