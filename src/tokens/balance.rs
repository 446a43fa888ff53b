//! Raw integer balance to human-scaled value.

use alloy::primitives::U256;

use crate::tokens::model::DUST_THRESHOLD;

fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse().unwrap_or(f64::NAN)
}

/// Scale an exact integer balance by `10^decimals`.
///
/// Integer and fractional parts are converted separately so that values
/// representable in `f64` come out exact.
pub fn scale_u256(raw: U256, decimals: u8) -> f64 {
    let divisor = 10f64.powi(decimals as i32);
    match U256::from(10u8).checked_pow(U256::from(decimals)) {
        Some(scale) => u256_to_f64(raw / scale) + u256_to_f64(raw % scale) / divisor,
        None => u256_to_f64(raw) / divisor,
    }
}

/// Scale a decimal string balance; integer parsing first, float second.
///
/// Returns `None` when the value is not numeric or not finite.
pub fn normalize_balance(raw: &str, decimals: u8) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let balance = match U256::from_str_radix(raw, 10) {
        Ok(value) => scale_u256(value, decimals),
        Err(_) => raw.parse::<f64>().ok()? / 10f64.powi(decimals as i32),
    };
    balance.is_finite().then_some(balance)
}

/// Finite, non-negative and at least the dust threshold.
pub fn passes_dust(balance: f64) -> bool {
    balance.is_finite() && balance >= DUST_THRESHOLD
}
