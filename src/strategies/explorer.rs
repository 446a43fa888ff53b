//! Bulk token balances from a Blockscout-compatible explorer.

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ProviderKind;
use crate::observability::metrics;
use crate::provider::{DecodeError, ProviderError};
use crate::strategies::{ChainStrategy, ScanContext, StrategyError};
use crate::tokens::{normalize_balance, passes_dust, CandidateToken, TokenMetadata};

/// Token standards that are never fungible balances.
const NON_FUNGIBLE: [&str; 3] = ["ERC-721", "ERC-1155", "ERC-404"];

/// Explorers emit some numeric fields as strings and some as numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(serde_json::Number),
}

impl Loose {
    fn text(&self) -> String {
        match self {
            Loose::Text(s) => s.trim().to_string(),
            Loose::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ExplorerToken {
    address_hash: Option<String>,
    address: Option<String>,
    symbol: Option<String>,
    name: Option<String>,
    decimals: Option<Loose>,
    #[serde(rename = "type")]
    token_type: Option<String>,
    exchange_rate: Option<Loose>,
    icon_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalanceEntry {
    #[serde(default)]
    token: ExplorerToken,
    value: Option<Loose>,
}

impl BalanceEntry {
    fn contract(&self) -> Option<String> {
        self.token
            .address_hash
            .as_deref()
            .or(self.token.address.as_deref())
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_lowercase)
    }

    fn raw_value(&self) -> Option<String> {
        self.value
            .as_ref()
            .map(Loose::text)
            .filter(|v| !v.is_empty() && v.chars().any(|c| c != '0'))
    }

    fn is_non_fungible(&self) -> bool {
        self.token
            .token_type
            .as_deref()
            .is_some_and(|t| NON_FUNGIBLE.contains(&t))
    }

    fn embedded_metadata(&self) -> TokenMetadata {
        let present = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        TokenMetadata {
            symbol: present(&self.token.symbol),
            name: present(&self.token.name),
            decimals: self.token.decimals.as_ref().and_then(|d| d.text().parse().ok()),
            logo_url: present(&self.token.icon_url),
        }
    }

    fn exchange_rate(&self) -> Option<f64> {
        self.token
            .exchange_rate
            .as_ref()
            .and_then(|r| r.text().parse::<f64>().ok())
            .filter(|r| r.is_finite())
    }
}

/// Split the payload into entries, dropping ones that do not decode.
fn parse_entries(payload: Value) -> Result<Vec<BalanceEntry>, DecodeError> {
    let Value::Array(items) = payload else {
        return Err(DecodeError::Shape("token-balances payload is not an array".into()));
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// One GET returns every token the explorer has indexed for the wallet.
///
/// Entries that still need metadata are resolved at most `concurrency` at a
/// time, in payload order.
#[derive(Debug, Clone, Copy)]
pub struct ExplorerStrategy {
    concurrency: usize,
}

impl ExplorerStrategy {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    async fn candidate(&self, ctx: &ScanContext<'_>, entry: BalanceEntry) -> Option<CandidateToken> {
        if entry.is_non_fungible() {
            return None;
        }
        let raw = entry.raw_value()?;
        let contract = entry.contract()?;

        let metadata = ctx
            .resolver
            .resolve(ctx.chain, &contract, entry.embedded_metadata())
            .await;

        let Some(balance) = normalize_balance(&raw, metadata.decimals) else {
            tracing::debug!(chain = %ctx.chain.slug, contract = %contract, raw = %raw, "Unparseable balance, skipping");
            return None;
        };
        if !passes_dust(balance) {
            return None;
        }

        let mut candidate = CandidateToken::new(&contract, raw, balance, metadata);
        candidate.exchange_rate = entry.exchange_rate();
        candidate.token_type = entry.token.token_type;
        Some(candidate)
    }
}

#[async_trait]
impl ChainStrategy for ExplorerStrategy {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Explorer
    }

    async fn discover(&self, ctx: &ScanContext<'_>) -> Result<Vec<CandidateToken>, StrategyError> {
        let chain = ctx.chain;
        let base = chain
            .explorer_url
            .as_deref()
            .ok_or_else(|| StrategyError::Misconfigured {
                chain: chain.slug.clone(),
                missing: "explorer URL",
            })?;
        let url = format!(
            "{}/api/v2/addresses/{}/token-balances",
            base.trim_end_matches('/'),
            ctx.wallet
        );

        let payload = ctx.transport.get_json(&url, ctx.timeouts.explorer()).await?;
        let entries = parse_entries(payload).map_err(ProviderError::from)?;
        let listed = entries.len();

        let candidates: Vec<_> = stream::iter(entries.into_iter().map(|entry| self.candidate(ctx, entry)))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut tokens = Vec::new();
        for candidate in candidates.into_iter().flatten() {
            if let Some(reason) = ctx.spam.classify(&candidate) {
                tracing::debug!(
                    chain = %chain.slug,
                    contract = %candidate.contract_address,
                    symbol = %candidate.symbol,
                    reason = %reason,
                    "Filtered spam token"
                );
                metrics::record_spam_filtered(&chain.slug);
                continue;
            }
            tokens.push(candidate);
        }

        tracing::debug!(chain = %chain.slug, listed, kept = tokens.len(), "Explorer balances processed");
        Ok(tokens)
    }
}
