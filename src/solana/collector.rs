//! Native SOL and SPL token balances for one owner.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{SolanaConfig, TimeoutConfig};
use crate::provider::rpc::rpc_call;
use crate::provider::{DecodeError, ProviderResult, Transport};
use crate::solana::types::{
    DexPair, IndexedMint, SolanaPortfolio, SolanaTokenRecord, TokenAccount, DEFAULT_MINT_DECIMALS,
    LAMPORTS_PER_SOL, SPL_TOKEN_PROGRAM, TOKEN_2022_PROGRAM,
};
use crate::tokens::passes_dust;

/// Token accounts returned for one program.
struct AccountBatch {
    /// Every account the RPC listed, parseable or not.
    listed: usize,
    accounts: Vec<TokenAccount>,
}

/// Sum accounts per mint in first-seen order; dust accounts are dropped
/// before merging and the first account's decimals are kept.
pub fn merge_accounts(accounts: impl IntoIterator<Item = TokenAccount>) -> Vec<SolanaTokenRecord> {
    let mut merged: Vec<SolanaTokenRecord> = Vec::new();
    let mut by_mint: HashMap<String, usize> = HashMap::new();

    for account in accounts {
        if !passes_dust(account.ui_amount) {
            continue;
        }
        match by_mint.get(&account.mint) {
            Some(&i) => merged[i].amount += account.ui_amount,
            None => {
                by_mint.insert(account.mint.clone(), merged.len());
                merged.push(SolanaTokenRecord {
                    mint: account.mint,
                    amount: account.ui_amount,
                    decimals: account.decimals.unwrap_or(DEFAULT_MINT_DECIMALS),
                    symbol: None,
                    name: None,
                    img: None,
                });
            }
        }
    }

    merged
}

fn as_array(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

fn apply_index(tokens: &mut [SolanaTokenRecord], payload: Value) -> usize {
    let mut applied = 0;
    for entry in as_array(payload)
        .into_iter()
        .filter_map(|v| serde_json::from_value::<IndexedMint>(v).ok())
    {
        if let Some(token) = tokens.iter_mut().find(|t| t.mint == entry.address) {
            token.symbol = entry.symbol;
            token.name = entry.name;
            token.img = entry.logo_uri;
            applied += 1;
        }
    }
    applied
}

fn apply_dex_pairs(tokens: &mut [SolanaTokenRecord], payload: Value) {
    for base in as_array(payload)
        .into_iter()
        .filter_map(|v| serde_json::from_value::<DexPair>(v).ok())
        .filter_map(|pair| pair.base_token)
    {
        let Some(address) = base.address.as_deref() else {
            continue;
        };
        if let Some(token) = tokens
            .iter_mut()
            .find(|t| t.mint == address && t.symbol.is_none())
        {
            token.symbol = base.symbol;
            token.name = base.name;
        }
    }
}

/// Collects a Solana wallet's holdings.
pub struct SolanaCollector {
    config: SolanaConfig,
    timeouts: TimeoutConfig,
    transport: Arc<dyn Transport>,
}

impl SolanaCollector {
    pub fn new(config: SolanaConfig, timeouts: TimeoutConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            timeouts,
            transport,
        }
    }

    /// Balances for `owner`, which must already be a validated address.
    pub async fn collect(&self, owner: &str) -> SolanaPortfolio {
        let start = Instant::now();
        let (balance, legacy, token_2022) = tokio::join!(
            self.sol_balance(owner),
            self.token_accounts(owner, SPL_TOKEN_PROGRAM),
            self.token_accounts(owner, TOKEN_2022_PROGRAM),
        );

        let mut failures = Vec::new();
        let sol_balance = balance.unwrap_or_else(|e| {
            failures.push(format!("getBalance: {}", e));
            0.0
        });

        let mut total_accounts = 0;
        let mut accounts = Vec::new();
        for (program, result) in [("spl-token", legacy), ("token-2022", token_2022)] {
            match result {
                Ok(batch) => {
                    total_accounts += batch.listed;
                    accounts.extend(batch.accounts);
                }
                Err(e) => failures.push(format!("{} accounts: {}", program, e)),
            }
        }

        let mut tokens = merge_accounts(accounts);
        self.decorate(&mut tokens).await;

        let error = (!failures.is_empty()).then(|| failures.join("; "));
        if let Some(error) = &error {
            tracing::warn!(owner = %owner, error = %error, "Solana RPC queries failed");
        }
        tracing::info!(
            owner = %owner,
            tokens = tokens.len(),
            total_accounts,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Solana scan complete"
        );

        SolanaPortfolio {
            sol_balance,
            tokens,
            total_accounts,
            error,
        }
    }

    async fn sol_balance(&self, owner: &str) -> ProviderResult<f64> {
        let result = rpc_call(
            self.transport.as_ref(),
            &self.config.rpc_url,
            "getBalance",
            json!([owner]),
            self.timeouts.solana_rpc(),
        )
        .await?;
        let lamports = result
            .get("value")
            .and_then(Value::as_u64)
            .ok_or_else(|| DecodeError::Shape("getBalance value is not an integer".into()))?;
        Ok(lamports as f64 / LAMPORTS_PER_SOL)
    }

    async fn token_accounts(&self, owner: &str, program: &str) -> ProviderResult<AccountBatch> {
        let params = json!([owner, { "programId": program }, { "encoding": "jsonParsed" }]);
        let mut result = rpc_call(
            self.transport.as_ref(),
            &self.config.rpc_url,
            "getTokenAccountsByOwner",
            params,
            self.timeouts.solana_rpc(),
        )
        .await?;

        let Some(Value::Array(items)) = result.get_mut("value").map(Value::take) else {
            return Err(DecodeError::Shape("getTokenAccountsByOwner value is not an array".into()).into());
        };
        let listed = items.len();
        let accounts = items.into_iter().filter_map(TokenAccount::from_keyed).collect();
        Ok(AccountBatch { listed, accounts })
    }

    /// Names from the verified index, then DEX pairs for what is left.
    async fn decorate(&self, tokens: &mut [SolanaTokenRecord]) {
        if tokens.is_empty() {
            return;
        }
        let deadline = self.timeouts.solana_metadata();

        let mints: Vec<&str> = tokens.iter().map(|t| t.mint.as_str()).collect();
        let url = format!("{}{}", self.config.token_index_url, mints.join(","));
        match self.transport.get_json(&url, deadline).await {
            Ok(payload) => {
                let applied = apply_index(tokens, payload);
                tracing::debug!(mints = tokens.len(), applied, "Verified-token index applied");
            }
            Err(e) => tracing::warn!(error = %e, "Verified-token index unavailable"),
        }

        let unnamed: Vec<String> = tokens
            .iter()
            .filter(|t| t.symbol.is_none())
            .map(|t| t.mint.clone())
            .collect();
        for batch in unnamed.chunks(self.config.dex_batch_size.max(1)) {
            let url = format!("{}{}", self.config.dex_lookup_url, batch.join(","));
            match self.transport.get_json(&url, deadline).await {
                Ok(payload) => apply_dex_pairs(tokens, payload),
                Err(e) => tracing::warn!(mints = batch.len(), error = %e, "DEX-pair lookup failed"),
            }
        }
    }
}
