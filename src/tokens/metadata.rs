//! Token metadata resolution.
//!
//! # Resolution order
//! 1. Fields already present in the bulk explorer payload
//! 2. The chain's curated token list
//! 3. The chain's external token index (best effort)
//! 4. Raw `decimals()` / `symbol()` contract calls
//!
//! Each tier only fills fields still missing; once symbol and decimals are
//! known no further tier is consulted. A resolver lives for one request and
//! memoizes both resolved metadata and fetched token indexes. Memo entries
//! are created before the first lookup starts, so concurrent callers for the
//! same key wait on one fetch instead of racing their own.

use alloy::primitives::Address;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::blockchain::abi;
use crate::config::{ChainDescriptor, TimeoutConfig};
use crate::provider::rpc::eth_call_first;
use crate::provider::{DecodeError, ProviderResult, Transport};
use crate::tokens::model::{ResolvedMetadata, TokenMetadata};

/// One entry of an external token index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedToken {
    /// Lower-cased contract address.
    pub address: String,
    pub metadata: TokenMetadata,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    #[serde(rename = "chainId")]
    chain_id: Option<u64>,
    address: String,
    symbol: Option<String>,
    name: Option<String>,
    decimals: Option<u8>,
    #[serde(rename = "logoURI")]
    logo_uri: Option<String>,
}

/// Parse a token-list document (`{"tokens": [...]}`) or a bare array.
///
/// Malformed entries and entries for other chains are skipped; at most
/// `limit` entries are kept.
pub fn parse_token_index(
    payload: Value,
    chain_id: Option<u64>,
    limit: usize,
) -> Result<Vec<IndexedToken>, DecodeError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("tokens") {
            Some(Value::Array(items)) => items,
            _ => return Err(DecodeError::Shape("token index has no tokens array".into())),
        },
        _ => return Err(DecodeError::Shape("token index is not a list".into())),
    };

    let tokens = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<IndexEntry>(item).ok())
        .filter(|entry| match (entry.chain_id, chain_id) {
            (Some(listed), Some(wanted)) => listed == wanted,
            _ => true,
        })
        .filter(|entry| Address::from_str(&entry.address).is_ok())
        .take(limit)
        .map(|entry| IndexedToken {
            address: entry.address.to_lowercase(),
            metadata: TokenMetadata {
                symbol: entry.symbol.filter(|s| !s.trim().is_empty()),
                name: entry.name.filter(|s| !s.trim().is_empty()),
                decimals: entry.decimals,
                logo_url: entry.logo_uri,
            },
        })
        .collect();

    Ok(tokens)
}

/// Per-request metadata resolver.
pub struct MetadataResolver {
    transport: Arc<dyn Transport>,
    timeouts: TimeoutConfig,
    max_index_tokens: usize,
    resolved: DashMap<(String, String), Arc<OnceCell<ResolvedMetadata>>>,
    indexes: DashMap<String, Arc<OnceCell<Arc<Vec<IndexedToken>>>>>,
}

impl MetadataResolver {
    pub fn new(transport: Arc<dyn Transport>, timeouts: TimeoutConfig, max_index_tokens: usize) -> Self {
        Self {
            transport,
            timeouts,
            max_index_tokens,
            resolved: DashMap::new(),
            indexes: DashMap::new(),
        }
    }

    /// The chain's token index; empty when unconfigured or unreachable.
    pub async fn token_index(&self, chain: &ChainDescriptor) -> Arc<Vec<IndexedToken>> {
        let cell = self.indexes.entry(chain.slug.clone()).or_default().clone();
        cell.get_or_init(|| self.load_index(chain)).await.clone()
    }

    async fn load_index(&self, chain: &ChainDescriptor) -> Arc<Vec<IndexedToken>> {
        let tokens = match &chain.token_index_url {
            Some(url) => match self.fetch_index(url, chain.chain_id).await {
                Ok(tokens) => {
                    tracing::debug!(chain = %chain.slug, count = tokens.len(), "Token index loaded");
                    tokens
                }
                Err(e) => {
                    tracing::warn!(chain = %chain.slug, error = %e, "Token index unavailable");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Arc::new(tokens)
    }

    async fn fetch_index(&self, url: &str, chain_id: Option<u64>) -> ProviderResult<Vec<IndexedToken>> {
        let payload = self.transport.get_json(url, self.timeouts.token_index()).await?;
        Ok(parse_token_index(payload, chain_id, self.max_index_tokens)?)
    }

    /// Resolve symbol, name and decimals for `address` on `chain`.
    pub async fn resolve(
        &self,
        chain: &ChainDescriptor,
        address: &str,
        embedded: TokenMetadata,
    ) -> ResolvedMetadata {
        let key = (chain.slug.clone(), address.to_lowercase());
        let cell = self.resolved.entry(key).or_default().clone();
        cell.get_or_init(|| self.lookup(chain, address, embedded))
            .await
            .clone()
    }

    async fn lookup(&self, chain: &ChainDescriptor, address: &str, embedded: TokenMetadata) -> ResolvedMetadata {
        let lowered = address.to_lowercase();
        let mut metadata = embedded;

        if !metadata.is_complete() {
            if let Some(known) = chain.known_token(address) {
                metadata.fill_from(&TokenMetadata::from(known));
            }
        }

        if !metadata.is_complete() && chain.token_index_url.is_some() {
            let index = self.token_index(chain).await;
            if let Some(entry) = index.iter().find(|t| t.address == lowered) {
                metadata.fill_from(&entry.metadata);
            }
        }

        if !metadata.is_complete() && !chain.rpc_urls.is_empty() {
            self.read_contract(chain, address, &mut metadata).await;
        }

        metadata.finish()
    }

    async fn read_contract(&self, chain: &ChainDescriptor, address: &str, metadata: &mut TokenMetadata) {
        let Ok(contract) = Address::from_str(address) else {
            return;
        };
        let transport = self.transport.as_ref();
        let deadline = self.timeouts.rpc();

        let need_decimals = metadata.decimals.is_none();
        let need_symbol = metadata.symbol.is_none();
        let decimals_call = abi::decimals_calldata();
        let symbol_call = abi::symbol_calldata();
        let decimals = async {
            if !need_decimals {
                return None;
            }
            eth_call_first(transport, &chain.rpc_urls, contract, &decimals_call, deadline, abi::decode_u8)
                .await
                .ok()
        };
        let symbol = async {
            if !need_symbol {
                return None;
            }
            eth_call_first(transport, &chain.rpc_urls, contract, &symbol_call, deadline, abi::decode_string)
                .await
                .ok()
        };
        let (decimals, symbol) = tokio::join!(decimals, symbol);

        if need_decimals && decimals.is_none() {
            tracing::debug!(chain = %chain.slug, contract = %address, "decimals() unresolved, assuming 18");
        }
        metadata.fill_from(&TokenMetadata {
            symbol,
            decimals,
            ..Default::default()
        });
    }
}
