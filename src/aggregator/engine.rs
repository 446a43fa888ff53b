//! Concurrent per-chain scans merged into one token list.

use alloy::primitives::Address;
use futures_util::future::join_all;
use futures_util::FutureExt;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;

use crate::config::{ChainDescriptor, ProviderKind, ScannerConfig};
use crate::observability::metrics;
use crate::provider::Transport;
use crate::strategies::{strategy_for, ScanContext};
use crate::tokens::{CandidateToken, MetadataResolver, SpamPolicy, TokenRecord};

/// Outcome of one chain's scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainReport {
    pub chain: String,
    pub provider: ProviderKind,
    pub found: usize,
    pub error: Option<String>,
}

/// Merged result of a multi-chain scan.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    pub tokens: Vec<TokenRecord>,
    /// Provider kinds that contributed tokens, e.g. `explorer+rpc-known`.
    pub source: String,
    pub reports: Vec<ChainReport>,
    /// Set only when every configured chain failed.
    pub error: Option<String>,
}

/// Keep the first record for each `(chain, lower(contract))`.
pub fn dedupe(records: Vec<TokenRecord>) -> Vec<TokenRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.dedup_key()))
        .collect()
}

fn source_label(kinds: &[ProviderKind]) -> String {
    if kinds.is_empty() {
        return "none".to_string();
    }
    kinds.iter().map(|k| k.as_str()).collect::<Vec<_>>().join("+")
}

/// Runs every configured chain for a wallet.
pub struct Aggregator {
    config: Arc<ScannerConfig>,
    transport: Arc<dyn Transport>,
    spam: SpamPolicy,
}

impl Aggregator {
    pub fn new(config: Arc<ScannerConfig>, transport: Arc<dyn Transport>) -> Self {
        let spam = SpamPolicy::new(&config.spam);
        Self {
            config,
            transport,
            spam,
        }
    }

    pub async fn scan(&self, wallet: Address) -> AggregationResult {
        let start = Instant::now();
        let resolver = MetadataResolver::new(
            self.transport.clone(),
            self.config.timeouts.clone(),
            self.config.discovery.max_index_tokens,
        );

        let chains = &self.config.chains;
        let outcomes = join_all(chains.iter().map(|chain| self.scan_chain(chain, wallet, &resolver))).await;

        let mut records = Vec::new();
        let mut reports = Vec::with_capacity(chains.len());
        let mut contributors = Vec::new();
        for (chain, outcome) in chains.iter().zip(outcomes) {
            let report = match outcome {
                Ok(tokens) => {
                    if !tokens.is_empty() && !contributors.contains(&chain.provider) {
                        contributors.push(chain.provider);
                    }
                    let found = tokens.len();
                    records.extend(tokens.into_iter().map(|t| t.into_record(chain)));
                    ChainReport {
                        chain: chain.slug.clone(),
                        provider: chain.provider,
                        found,
                        error: None,
                    }
                }
                Err(error) => ChainReport {
                    chain: chain.slug.clone(),
                    provider: chain.provider,
                    found: 0,
                    error: Some(error),
                },
            };
            reports.push(report);
        }

        let tokens = dedupe(records);
        let failed = reports.iter().filter(|r| r.error.is_some()).count();
        let error = (!reports.is_empty() && failed == reports.len())
            .then(|| "every chain scan failed".to_string());

        tracing::info!(
            wallet = %wallet,
            chains = reports.len(),
            failed,
            tokens = tokens.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Wallet scan complete"
        );

        AggregationResult {
            tokens,
            source: source_label(&contributors),
            reports,
            error,
        }
    }

    /// One chain under its deadline and panic guard; never fails the scan.
    async fn scan_chain(
        &self,
        chain: &ChainDescriptor,
        wallet: Address,
        resolver: &MetadataResolver,
    ) -> Result<Vec<CandidateToken>, String> {
        let strategy = strategy_for(chain.provider, &self.config.discovery);
        let ctx = ScanContext {
            wallet,
            chain,
            transport: self.transport.as_ref(),
            resolver,
            spam: &self.spam,
            timeouts: &self.config.timeouts,
        };

        let deadline = self.config.timeouts.chain_scan();
        let guarded = AssertUnwindSafe(strategy.discover(&ctx)).catch_unwind();
        let (outcome, result) = match timeout(deadline, guarded).await {
            Ok(Ok(Ok(tokens))) => ("ok", Ok(tokens)),
            Ok(Ok(Err(e))) => ("error", Err(e.to_string())),
            Ok(Err(_)) => ("panic", Err("strategy panicked".to_string())),
            Err(_) => (
                "timeout",
                Err(format!("chain scan timed out after {} ms", deadline.as_millis())),
            ),
        };

        match &result {
            Ok(tokens) => {
                tracing::debug!(chain = %chain.slug, provider = %chain.provider, found = tokens.len(), "Chain scanned");
            }
            Err(e) => {
                tracing::warn!(chain = %chain.slug, provider = %chain.provider, error = %e, "Chain scan failed");
            }
        }
        metrics::record_chain_scan(&chain.slug, outcome, result.as_ref().map_or(0, Vec::len));

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KnownToken, TimeoutConfig};
    use crate::provider::mock::MockTransport;
    use crate::provider::TransportError;
    use serde_json::{json, Value};
    use std::time::Duration;

    const WALLET: Address = Address::new([0x42; 20]);
    const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

    fn explorer_chain(slug: &str) -> ChainDescriptor {
        ChainDescriptor {
            name: slug.to_uppercase(),
            slug: slug.into(),
            provider: ProviderKind::Explorer,
            chain_id: None,
            explorer_url: Some(format!("http://{}", slug)),
            rpc_urls: Vec::new(),
            token_index_url: None,
            tokens: Vec::new(),
        }
    }

    fn known_chain(slug: &str) -> ChainDescriptor {
        ChainDescriptor {
            name: slug.to_uppercase(),
            slug: slug.into(),
            provider: ProviderKind::RpcKnown,
            chain_id: None,
            explorer_url: None,
            rpc_urls: vec![format!("http://{}-rpc", slug)],
            token_index_url: None,
            tokens: vec![KnownToken::new(USDC, "USDC", 6)],
        }
    }

    fn usdc_entry(address: &str, value: &str) -> Value {
        json!({
            "token": {"address_hash": address, "symbol": "USDC", "name": "USD Coin", "decimals": "6", "type": "ERC-20", "exchange_rate": "1.0"},
            "value": value
        })
    }

    fn config(chains: Vec<ChainDescriptor>) -> Arc<ScannerConfig> {
        Arc::new(ScannerConfig {
            chains,
            timeouts: TimeoutConfig {
                chain_scan_ms: 200,
                ..TimeoutConfig::default()
            },
            ..ScannerConfig::default()
        })
    }

    fn record(chain: &str, contract: &str, balance: f64) -> TokenRecord {
        TokenRecord {
            symbol: "T".into(),
            name: "T".into(),
            chain: chain.into(),
            chain_slug: chain.to_lowercase(),
            balance,
            contract_address: contract.into(),
            decimals: 18,
            logo_url: None,
        }
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let merged = dedupe(vec![
            record("Base", "0xaa", 1.0),
            record("Base", "0xAA", 2.0),
            record("Ethereum", "0xaa", 3.0),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].balance, 1.0);
        assert_eq!(merged[1].chain, "Ethereum");
    }

    #[test]
    fn test_source_label() {
        assert_eq!(source_label(&[]), "none");
        assert_eq!(
            source_label(&[ProviderKind::Explorer, ProviderKind::RpcKnown]),
            "explorer+rpc-known"
        );
    }

    #[tokio::test]
    async fn test_failing_chains_do_not_hide_others() {
        let mock = Arc::new(MockTransport::new());
        mock.on_get("http://good", |_| Ok(json!([usdc_entry(USDC, "2000000")])));
        mock.on_get("http://down", |_| Err(TransportError::Status(503).into()));
        mock.on_get_slow("http://slow", Duration::from_secs(5), |_| Ok(json!([])));
        mock.on_post("http://broken-rpc", |_| panic!("malformed upstream"));

        let chains = vec![
            explorer_chain("down"),
            explorer_chain("slow"),
            known_chain("broken"),
            explorer_chain("good"),
        ];
        let result = Aggregator::new(config(chains), mock).scan(WALLET).await;

        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.tokens[0].chain_slug, "good");
        assert_eq!(result.tokens[0].balance, 2.0);
        assert_eq!(result.source, "explorer");
        assert!(result.error.is_none());

        let errors: Vec<_> = result.reports.iter().map(|r| r.error.clone()).collect();
        assert!(errors[0].as_deref().unwrap().contains("503"));
        assert!(errors[1].as_deref().unwrap().contains("timed out"));
        assert_eq!(errors[2].as_deref(), Some("strategy panicked"));
        assert!(errors[3].is_none());
        assert_eq!(result.reports[3].found, 1);
    }

    #[tokio::test]
    async fn test_duplicates_collapse_in_chain_order() {
        let mock = Arc::new(MockTransport::new());
        mock.on_get("http://base", |_| {
            Ok(json!([
                usdc_entry(USDC, "1000000"),
                usdc_entry(&USDC.to_uppercase().replace("0X", "0x"), "9000000")
            ]))
        });
        mock.on_post("http://mantle-rpc", |_| {
            Ok(json!({"jsonrpc": "2.0", "id": 1, "result": format!("0x{:064x}", 4_000_000)}))
        });

        let result = Aggregator::new(config(vec![explorer_chain("base"), known_chain("mantle")]), mock)
            .scan(WALLET)
            .await;

        assert_eq!(result.tokens.len(), 2);
        assert_eq!(result.tokens[0].chain, "BASE");
        assert_eq!(result.tokens[0].balance, 1.0);
        assert_eq!(result.tokens[1].chain, "MANTLE");
        assert_eq!(result.tokens[1].balance, 4.0);
        assert_eq!(result.source, "explorer+rpc-known");
    }

    #[tokio::test]
    async fn test_total_failure_sets_error() {
        let mock = Arc::new(MockTransport::new());
        let result = Aggregator::new(config(vec![explorer_chain("a"), explorer_chain("b")]), mock)
            .scan(WALLET)
            .await;
        assert!(result.tokens.is_empty());
        assert_eq!(result.source, "none");
        assert!(result.error.is_some());
    }
}
