//! Wallet address syntax checks, performed before any network I/O.

use alloy::primitives::Address;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static EVM_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("static regex"));

static SOLANA_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("static regex"));

/// Malformed wallet address in a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputValidationError {
    #[error("valid EVM address required")]
    InvalidEvmAddress,

    #[error("addr required")]
    MissingAddress,

    #[error("invalid address")]
    InvalidSolanaAddress,
}

/// Parse a `0x`-prefixed, 40-hex-digit EVM address. Checksums are not enforced.
pub fn parse_evm_address(input: Option<&str>) -> Result<Address, InputValidationError> {
    let input = input.ok_or(InputValidationError::InvalidEvmAddress)?;
    if !EVM_ADDRESS.is_match(input) {
        return Err(InputValidationError::InvalidEvmAddress);
    }
    Address::from_str(input).map_err(|_| InputValidationError::InvalidEvmAddress)
}

/// Check a base58 Solana address of 32 to 44 characters.
pub fn parse_solana_address(input: Option<&str>) -> Result<String, InputValidationError> {
    let input = input
        .filter(|s| !s.is_empty())
        .ok_or(InputValidationError::MissingAddress)?;
    if !SOLANA_ADDRESS.is_match(input) {
        return Err(InputValidationError::InvalidSolanaAddress);
    }
    Ok(input.to_string())
}
