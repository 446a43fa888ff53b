//! Solana records and RPC payload shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Legacy SPL Token program.
pub const SPL_TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Token-2022 program.
pub const TOKEN_2022_PROGRAM: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Decimals assumed when a token account omits them.
pub const DEFAULT_MINT_DECIMALS: u8 = 6;

/// One mint held by the wallet, summed over all its token accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolanaTokenRecord {
    pub mint: String,
    pub amount: f64,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

/// Response body of the Solana endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaPortfolio {
    pub sol_balance: f64,
    pub tokens: Vec<SolanaTokenRecord>,
    pub total_accounts: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single parsed token account.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccount {
    pub mint: String,
    pub ui_amount: f64,
    pub decimals: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct KeyedAccount {
    account: AccountBody,
}

#[derive(Debug, Deserialize)]
struct AccountBody {
    data: AccountData,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    parsed: ParsedAccount,
}

#[derive(Debug, Deserialize)]
struct ParsedAccount {
    info: AccountInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    mint: String,
    token_amount: TokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenAmount {
    ui_amount_string: Option<String>,
    ui_amount: Option<f64>,
    decimals: Option<u8>,
}

impl TokenAccount {
    /// Read a `jsonParsed` keyed account; `None` when the shape is off.
    pub fn from_keyed(value: Value) -> Option<Self> {
        let keyed: KeyedAccount = serde_json::from_value(value).ok()?;
        let info = keyed.account.data.parsed.info;
        let amount = &info.token_amount;
        let ui_amount = amount
            .ui_amount_string
            .as_deref()
            .and_then(|s| s.parse::<f64>().ok())
            .or(amount.ui_amount)
            .filter(|a| a.is_finite())
            .unwrap_or(0.0);
        Some(Self {
            mint: info.mint,
            ui_amount,
            decimals: amount.decimals,
        })
    }
}

/// Verified-token index entry.
#[derive(Debug, Deserialize)]
pub(crate) struct IndexedMint {
    pub address: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DexPair {
    #[serde(rename = "baseToken")]
    pub base_token: Option<DexToken>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DexToken {
    pub address: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
}
