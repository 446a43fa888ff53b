//! Token discovery for chains without an indexer.
//!
//! Candidate addresses come from the curated list plus the chain's token
//! index. Each is probed with `balanceOf` in sequential batches so a large
//! index cannot flood a public RPC endpoint.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use futures_util::future::join_all;
use std::collections::HashSet;
use std::str::FromStr;

use crate::config::ProviderKind;
use crate::strategies::known::{probe_balance, settle};
use crate::strategies::{ChainStrategy, ScanContext, StrategyError};
use crate::tokens::{passes_dust, scale_u256, CandidateToken, TokenMetadata};

#[derive(Debug, Clone, Copy)]
pub struct DiscoveryStrategy {
    batch_size: usize,
}

impl DiscoveryStrategy {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Curated addresses first, then index addresses, case-insensitively unique.
    async fn candidate_addresses(&self, ctx: &ScanContext<'_>) -> Vec<(String, Address)> {
        let index = ctx.resolver.token_index(ctx.chain).await;

        let mut seen = HashSet::new();
        ctx.chain
            .tokens
            .iter()
            .map(|t| t.address.to_lowercase())
            .chain(index.iter().map(|t| t.address.clone()))
            .filter(|a| seen.insert(a.clone()))
            .filter_map(|a| Address::from_str(&a).ok().map(|parsed| (a, parsed)))
            .collect()
    }
}

#[async_trait]
impl ChainStrategy for DiscoveryStrategy {
    fn kind(&self) -> ProviderKind {
        ProviderKind::RpcDiscovery
    }

    async fn discover(&self, ctx: &ScanContext<'_>) -> Result<Vec<CandidateToken>, StrategyError> {
        let chain = ctx.chain;
        if chain.rpc_urls.is_empty() {
            return Err(StrategyError::Misconfigured {
                chain: chain.slug.clone(),
                missing: "RPC endpoints",
            });
        }

        let addresses = self.candidate_addresses(ctx).await;
        let mut probes = Vec::with_capacity(addresses.len());
        for batch in addresses.chunks(self.batch_size) {
            let balances = join_all(batch.iter().map(|(_, contract)| probe_balance(ctx, *contract))).await;
            probes.extend(
                batch
                    .iter()
                    .zip(balances)
                    .map(|((address, _), balance)| balance.map(|b| (address.clone(), b))),
            );
        }
        let held: Vec<(String, U256)> = settle(probes)?
            .into_iter()
            .filter(|(_, balance)| !balance.is_zero())
            .collect();

        tracing::debug!(chain = %chain.slug, probed = addresses.len(), held = held.len(), "Discovery probes finished");

        let tokens = join_all(held.into_iter().map(|(address, raw)| async move {
            let metadata = ctx.resolver.resolve(chain, &address, TokenMetadata::default()).await;
            let balance = scale_u256(raw, metadata.decimals);
            passes_dust(balance).then(|| CandidateToken::new(&address, raw.to_string(), balance, metadata))
        }))
        .await;

        Ok(tokens.into_iter().flatten().collect())
    }
}
