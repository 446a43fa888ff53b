//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the scanner.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::registry;

/// Root configuration for the scanner service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Per-call timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Cross-origin allow-list.
    pub cors: CorsConfig,

    /// Spam classifier thresholds and pattern lists.
    pub spam: SpamConfig,

    /// Discovery strategy limits.
    pub discovery: DiscoveryConfig,

    /// Solana collector endpoints.
    pub solana: SolanaConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// EVM chain registry, scanned in this order.
    pub chains: Vec<ChainDescriptor>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            cors: CorsConfig::default(),
            spam: SpamConfig::default(),
            discovery: DiscoveryConfig::default(),
            solana: SolanaConfig::default(),
            observability: ObservabilityConfig::default(),
            chains: registry::default_chains(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// How a chain's balances are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// One bulk "token balances for address" explorer request.
    Explorer,
    /// `balanceOf` probes against the curated token list only.
    RpcKnown,
    /// Curated list merged with an external token index, probed in batches.
    RpcDiscovery,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Explorer => "explorer",
            ProviderKind::RpcKnown => "rpc-known",
            ProviderKind::RpcDiscovery => "rpc-discovery",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A curated token on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KnownToken {
    /// Contract address (compared case-insensitively).
    pub address: String,

    pub symbol: String,

    /// Display name; the symbol is shown when absent.
    #[serde(default)]
    pub name: Option<String>,

    pub decimals: u8,
}

impl KnownToken {
    pub fn new(address: &str, symbol: &str, decimals: u8) -> Self {
        Self {
            address: address.to_lowercase(),
            symbol: symbol.to_string(),
            name: None,
            decimals,
        }
    }

    /// Display name, falling back to the symbol.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

/// Immutable description of one EVM chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainDescriptor {
    /// Display name (e.g. "Ethereum").
    pub name: String,

    /// Short identifier (e.g. "ethereum").
    pub slug: String,

    /// Balance discovery strategy.
    pub provider: ProviderKind,

    /// EVM chain id, used to filter multi-chain token indexes.
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Explorer base URL for the bulk balances endpoint.
    #[serde(default)]
    pub explorer_url: Option<String>,

    /// RPC endpoints, tried in order.
    #[serde(default)]
    pub rpc_urls: Vec<String>,

    /// External token index (token-list JSON).
    #[serde(default)]
    pub token_index_url: Option<String>,

    /// Curated token list.
    #[serde(default)]
    pub tokens: Vec<KnownToken>,
}

impl ChainDescriptor {
    /// Look up a curated token by address, case-insensitively.
    pub fn known_token(&self, address: &str) -> Option<&KnownToken> {
        self.tokens
            .iter()
            .find(|t| t.address.eq_ignore_ascii_case(address))
    }
}

/// Timeout configuration for outbound calls, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Explorer bulk balance request.
    pub explorer_ms: u64,

    /// Single `eth_call`.
    pub rpc_ms: u64,

    /// Token index fetch.
    pub token_index_ms: u64,

    /// Solana RPC request.
    pub solana_rpc_ms: u64,

    /// Solana metadata lookups.
    pub solana_metadata_ms: u64,

    /// Upper bound for one chain's whole scan.
    pub chain_scan_ms: u64,
}

impl TimeoutConfig {
    pub fn explorer(&self) -> Duration {
        Duration::from_millis(self.explorer_ms)
    }

    pub fn rpc(&self) -> Duration {
        Duration::from_millis(self.rpc_ms)
    }

    pub fn token_index(&self) -> Duration {
        Duration::from_millis(self.token_index_ms)
    }

    pub fn solana_rpc(&self) -> Duration {
        Duration::from_millis(self.solana_rpc_ms)
    }

    pub fn solana_metadata(&self) -> Duration {
        Duration::from_millis(self.solana_metadata_ms)
    }

    pub fn chain_scan(&self) -> Duration {
        Duration::from_millis(self.chain_scan_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            explorer_ms: 10_000,
            rpc_ms: 5_000,
            token_index_ms: 8_000,
            solana_rpc_ms: 8_000,
            solana_metadata_ms: 8_000,
            chain_scan_ms: 45_000,
        }
    }
}

/// Cross-origin allow-list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins matched by prefix; the first entry is the fallback.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://arthurdex.com".to_string(),
                "https://woofi-dustsweep.vercel.app".to_string(),
                "http://localhost".to_string(),
            ],
        }
    }
}

/// Spam classifier tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpamConfig {
    /// Substrings marking an embedded URL or domain.
    pub url_patterns: Vec<String>,

    /// Phishing bait phrases.
    pub phishing_phrases: Vec<String>,

    /// Flag `$1,000`-style amounts in the display name.
    pub flag_dollar_amounts: bool,

    /// Flag Cyrillic homoglyphs in symbol or name.
    pub flag_cyrillic: bool,

    /// Position value (USD) above which a priced token is spam.
    pub max_position_usd: f64,

    /// Balance above which an unpriced token is spam.
    pub max_unpriced_balance: f64,
}

impl Default for SpamConfig {
    fn default() -> Self {
        let url_patterns = [
            "http:", "https:", "www.", ".com", ".io", ".xyz", ".cc", ".top", ".app", ".org",
            ".net", ".icu", ".finance", ".markets", ".promo",
        ];
        let phishing_phrases = ["claim", "airdrop", "bridge for", "visit ", "access "];
        Self {
            url_patterns: url_patterns.iter().map(|s| s.to_string()).collect(),
            phishing_phrases: phishing_phrases.iter().map(|s| s.to_string()).collect(),
            flag_dollar_amounts: true,
            flag_cyrillic: true,
            max_position_usd: 10_000_000.0,
            max_unpriced_balance: 1_000_000.0,
        }
    }
}

/// Discovery strategy limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Maximum addresses taken from a token index.
    pub max_index_tokens: usize,

    /// Concurrent `balanceOf` calls per batch.
    pub batch_size: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_index_tokens: 100,
            batch_size: 20,
        }
    }
}

/// Solana collector endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SolanaConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: String,

    /// Verified-token index; mints are appended comma-separated.
    pub token_index_url: String,

    /// DEX-pair lookup; mints are appended comma-separated.
    pub dex_lookup_url: String,

    /// Mints per DEX-pair lookup.
    pub dex_batch_size: usize,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            token_index_url: "https://tokens.jup.ag/tokens?tags=verified,community,unknown&mint="
                .to_string(),
            dex_lookup_url: "https://api.dexscreener.com/tokens/v1/solana/".to_string(),
            dex_batch_size: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
