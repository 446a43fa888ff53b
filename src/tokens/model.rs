//! Token records flowing through the aggregation pipeline.

use serde::{Deserialize, Serialize};

use crate::config::{ChainDescriptor, KnownToken};

/// Balances below this are dust and never reported.
pub const DUST_THRESHOLD: f64 = 0.000_001;

/// Decimals assumed when no source reports them.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Symbol reported when no source resolves one.
pub const UNKNOWN_SYMBOL: &str = "UNK";

/// Partially known token metadata from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u8>,
    pub logo_url: Option<String>,
}

impl TokenMetadata {
    /// Symbol and decimals are known; later tiers are skipped.
    pub fn is_complete(&self) -> bool {
        self.symbol.is_some() && self.decimals.is_some()
    }

    /// Fill only the fields still missing.
    pub fn fill_from(&mut self, other: &TokenMetadata) {
        if self.symbol.is_none() {
            self.symbol = other.symbol.clone();
        }
        if self.name.is_none() {
            self.name = other.name.clone();
        }
        if self.decimals.is_none() {
            self.decimals = other.decimals;
        }
        if self.logo_url.is_none() {
            self.logo_url = other.logo_url.clone();
        }
    }

    /// Apply defaults for anything no tier resolved.
    pub fn finish(self) -> ResolvedMetadata {
        let symbol = self.symbol.unwrap_or_else(|| UNKNOWN_SYMBOL.to_string());
        let name = self.name.unwrap_or_else(|| symbol.clone());
        ResolvedMetadata {
            symbol,
            name,
            decimals: self.decimals.unwrap_or(DEFAULT_DECIMALS),
            logo_url: self.logo_url,
        }
    }
}

impl From<&KnownToken> for TokenMetadata {
    fn from(token: &KnownToken) -> Self {
        Self {
            symbol: Some(token.symbol.clone()),
            name: Some(token.display_name().to_string()),
            decimals: Some(token.decimals),
            logo_url: None,
        }
    }
}

/// Metadata with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub logo_url: Option<String>,
}

/// A balance found by a strategy, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateToken {
    /// Lower-cased contract address.
    pub contract_address: String,
    /// Raw integer balance as reported.
    pub raw_balance: String,
    /// Human-scaled balance.
    pub balance: f64,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    /// USD price per token, when the source supplies one.
    pub exchange_rate: Option<f64>,
    /// Token standard tag, e.g. "ERC-20".
    pub token_type: Option<String>,
    pub icon_url: Option<String>,
}

impl CandidateToken {
    pub fn new(
        contract_address: &str,
        raw_balance: String,
        balance: f64,
        metadata: ResolvedMetadata,
    ) -> Self {
        Self {
            contract_address: contract_address.to_lowercase(),
            raw_balance,
            balance,
            decimals: metadata.decimals,
            symbol: metadata.symbol,
            name: metadata.name,
            exchange_rate: None,
            token_type: None,
            icon_url: metadata.logo_url,
        }
    }

    /// Attach chain identity for output.
    pub fn into_record(self, chain: &ChainDescriptor) -> TokenRecord {
        TokenRecord {
            symbol: self.symbol,
            name: self.name,
            chain: chain.name.clone(),
            chain_slug: chain.slug.clone(),
            balance: self.balance,
            contract_address: self.contract_address,
            decimals: self.decimals,
            logo_url: self.icon_url,
        }
    }
}

/// One token balance in the EVM response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub symbol: String,
    pub name: String,
    pub chain: String,
    pub chain_slug: String,
    pub balance: f64,
    pub contract_address: String,
    pub decimals: u8,
    pub logo_url: Option<String>,
}

impl TokenRecord {
    /// Deduplication key: chain plus lower-cased contract.
    pub fn dedup_key(&self) -> (String, String) {
        (self.chain.clone(), self.contract_address.to_lowercase())
    }
}
