//! `balanceOf` probes for a chain's curated token list.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use futures_util::future::join_all;
use std::str::FromStr;

use crate::blockchain::abi;
use crate::config::{KnownToken, ProviderKind};
use crate::provider::rpc::eth_call_first;
use crate::provider::ProviderResult;
use crate::strategies::{ChainStrategy, ScanContext, StrategyError};
use crate::tokens::{passes_dust, scale_u256, CandidateToken, TokenMetadata};

/// Query `balanceOf(wallet)` on `token`, walking the chain's endpoints.
///
/// The first endpoint that answers with a decodable word decides the
/// balance, zero included.
pub(crate) async fn probe_balance(ctx: &ScanContext<'_>, token: Address) -> ProviderResult<U256> {
    let calldata = abi::balance_of_calldata(ctx.wallet);
    let result = eth_call_first(
        ctx.transport,
        &ctx.chain.rpc_urls,
        token,
        &calldata,
        ctx.timeouts.rpc(),
        abi::decode_uint,
    )
    .await;
    if let Err(e) = &result {
        tracing::debug!(chain = %ctx.chain.slug, contract = %token, error = %e, "balanceOf failed on every endpoint");
    }
    result
}

/// Keep the successful probes; fail only when there were probes and none
/// of them succeeded, which means the chain is unreachable.
pub(crate) fn settle<T>(results: Vec<ProviderResult<T>>) -> Result<Vec<T>, StrategyError> {
    let mut ok = Vec::with_capacity(results.len());
    let mut last_error = None;
    for result in results {
        match result {
            Ok(value) => ok.push(value),
            Err(e) => last_error = Some(e),
        }
    }
    match last_error {
        Some(e) if ok.is_empty() => Err(e.into()),
        _ => Ok(ok),
    }
}

/// Curated tokens only; metadata comes straight from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownTokenStrategy;

impl KnownTokenStrategy {
    async fn check(&self, ctx: &ScanContext<'_>, token: &KnownToken) -> ProviderResult<Option<CandidateToken>> {
        let Ok(contract) = Address::from_str(&token.address) else {
            return Ok(None);
        };
        let raw = probe_balance(ctx, contract).await?;
        if raw.is_zero() {
            return Ok(None);
        }

        let balance = scale_u256(raw, token.decimals);
        if !passes_dust(balance) {
            return Ok(None);
        }
        let metadata = TokenMetadata::from(token).finish();
        Ok(Some(CandidateToken::new(&token.address, raw.to_string(), balance, metadata)))
    }
}

#[async_trait]
impl ChainStrategy for KnownTokenStrategy {
    fn kind(&self) -> ProviderKind {
        ProviderKind::RpcKnown
    }

    async fn discover(&self, ctx: &ScanContext<'_>) -> Result<Vec<CandidateToken>, StrategyError> {
        if ctx.chain.rpc_urls.is_empty() {
            return Err(StrategyError::Misconfigured {
                chain: ctx.chain.slug.clone(),
                missing: "RPC endpoints",
            });
        }

        let results = join_all(ctx.chain.tokens.iter().map(|token| self.check(ctx, token))).await;
        Ok(settle(results)?.into_iter().flatten().collect())
    }
}
