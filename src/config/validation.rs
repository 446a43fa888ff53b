//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check each chain carries what its provider kind needs
//! - Validate value ranges (timeouts > 0, thresholds > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ScannerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

use crate::config::schema::{ProviderKind, ScannerConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate chain slug '{0}'")]
    DuplicateSlug(String),

    #[error("chain '{0}' uses the explorer provider but has no explorer_url")]
    MissingExplorer(String),

    #[error("chain '{0}' uses an RPC provider but has no rpc_urls")]
    MissingRpc(String),

    #[error("chain '{0}' has no curated tokens to probe")]
    NoKnownTokens(String),

    #[error("chain '{chain}' has invalid URL '{url}'")]
    InvalidUrl { chain: String, url: String },

    #[error("chain '{chain}' has invalid token address '{address}'")]
    InvalidTokenAddress { chain: String, address: String },

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("cors.allowed_origins must not be empty")]
    EmptyAllowList,

    #[error("spam threshold '{0}' must be positive")]
    InvalidThreshold(&'static str),

    #[error("discovery.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

fn check_url(chain: &str, url: &str, errors: &mut Vec<ValidationError>) {
    if url::Url::parse(url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            chain: chain.to_string(),
            url: url.to_string(),
        });
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ScannerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut slugs = HashSet::new();

    for chain in &config.chains {
        if !slugs.insert(chain.slug.as_str()) {
            errors.push(ValidationError::DuplicateSlug(chain.slug.clone()));
        }

        match chain.provider {
            ProviderKind::Explorer => match &chain.explorer_url {
                Some(url) => check_url(&chain.slug, url, &mut errors),
                None => errors.push(ValidationError::MissingExplorer(chain.slug.clone())),
            },
            ProviderKind::RpcKnown | ProviderKind::RpcDiscovery => {
                if chain.rpc_urls.is_empty() {
                    errors.push(ValidationError::MissingRpc(chain.slug.clone()));
                }
                if chain.provider == ProviderKind::RpcKnown && chain.tokens.is_empty() {
                    errors.push(ValidationError::NoKnownTokens(chain.slug.clone()));
                }
            }
        }

        for url in chain.rpc_urls.iter().chain(chain.token_index_url.iter()) {
            check_url(&chain.slug, url, &mut errors);
        }

        for token in &chain.tokens {
            if Address::from_str(&token.address).is_err() {
                errors.push(ValidationError::InvalidTokenAddress {
                    chain: chain.slug.clone(),
                    address: token.address.clone(),
                });
            }
        }
    }

    let t = &config.timeouts;
    for (name, value) in [
        ("explorer_ms", t.explorer_ms),
        ("rpc_ms", t.rpc_ms),
        ("token_index_ms", t.token_index_ms),
        ("solana_rpc_ms", t.solana_rpc_ms),
        ("solana_metadata_ms", t.solana_metadata_ms),
        ("chain_scan_ms", t.chain_scan_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }

    if !(config.spam.max_position_usd > 0.0) {
        errors.push(ValidationError::InvalidThreshold("max_position_usd"));
    }
    if !(config.spam.max_unpriced_balance > 0.0) {
        errors.push(ValidationError::InvalidThreshold("max_unpriced_balance"));
    }

    if config.discovery.batch_size == 0 {
        errors.push(ValidationError::ZeroLimit("batch_size"));
    }
    if config.solana.dex_batch_size == 0 {
        errors.push(ValidationError::ZeroLimit("dex_batch_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
