//! ERC-20 calldata encoding and raw return-data decoding.
//!
//! Decoding is done by hand on fixed 32-byte words so that malformed
//! returns from non-standard tokens can fall back instead of failing.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use thiserror::Error;

const WORD: usize = 32;

sol! {
    function balanceOf(address owner) external view returns (uint256);
    function decimals() external view returns (uint8);
    function symbol() external view returns (string);
}

/// Errors decoding raw contract return data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("empty return data")]
    Empty,

    #[error("return data too short: {0} bytes")]
    Short(usize),

    #[error("value does not fit in {0}")]
    Overflow(&'static str),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

/// Calldata for `balanceOf(owner)`.
pub fn balance_of_calldata(owner: Address) -> Vec<u8> {
    balanceOfCall { owner }.abi_encode()
}

/// Calldata for `decimals()`.
pub fn decimals_calldata() -> Vec<u8> {
    decimalsCall {}.abi_encode()
}

/// Calldata for `symbol()`.
pub fn symbol_calldata() -> Vec<u8> {
    symbolCall {}.abi_encode()
}

/// Decode the first word as an unsigned integer.
pub fn decode_uint(data: &[u8]) -> Result<U256, AbiError> {
    match data.len() {
        0 => Err(AbiError::Empty),
        n if n < WORD => Err(AbiError::Short(n)),
        _ => Ok(U256::from_be_slice(&data[..WORD])),
    }
}

/// Decode a `uint8` return such as `decimals()`.
pub fn decode_u8(data: &[u8]) -> Result<u8, AbiError> {
    let value = decode_uint(data)?;
    if value > U256::from(u8::MAX) {
        return Err(AbiError::Overflow("u8"));
    }
    Ok(value.to::<u8>())
}

/// Decode a `string` return, falling back to a NUL-padded `bytes32`.
pub fn decode_string(data: &[u8]) -> Result<String, AbiError> {
    decode_dynamic_string(data).or_else(|_| decode_bytes32_string(data))
}

fn word_as_usize(word: &[u8]) -> Option<usize> {
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return None;
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD - 8..WORD]);
    usize::try_from(u64::from_be_bytes(tail)).ok()
}

fn non_empty(s: &str) -> Result<String, AbiError> {
    let trimmed = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        Err(AbiError::Empty)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Offset word, then a 32-byte length word, then that many bytes.
fn decode_dynamic_string(data: &[u8]) -> Result<String, AbiError> {
    if data.is_empty() {
        return Err(AbiError::Empty);
    }
    if data.len() < 2 * WORD {
        return Err(AbiError::Short(data.len()));
    }

    let offset = word_as_usize(&data[..WORD]).ok_or(AbiError::Overflow("usize"))?;
    let len_end = offset.checked_add(WORD).ok_or(AbiError::Overflow("usize"))?;
    if len_end > data.len() {
        return Err(AbiError::Short(data.len()));
    }

    let len = word_as_usize(&data[offset..len_end]).ok_or(AbiError::Overflow("usize"))?;
    let end = len_end.checked_add(len).ok_or(AbiError::Overflow("usize"))?;
    if end > data.len() {
        return Err(AbiError::Short(data.len()));
    }

    let s = std::str::from_utf8(&data[len_end..end]).map_err(|_| AbiError::InvalidUtf8)?;
    non_empty(s)
}

/// First 32 bytes as a fixed-size string (pre-standard tokens such as MKR).
fn decode_bytes32_string(data: &[u8]) -> Result<String, AbiError> {
    match data.len() {
        0 => Err(AbiError::Empty),
        n if n < WORD => Err(AbiError::Short(n)),
        _ => {
            let s = std::str::from_utf8(&data[..WORD]).map_err(|_| AbiError::InvalidUtf8)?;
            non_empty(s)
        }
    }
}
