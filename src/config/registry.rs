//! Built-in chain registry.
//!
//! Used when the config file does not declare `[[chains]]`. Explorer chains
//! use Blockscout instances; chains without one fall back to curated tokens
//! probed over public RPC.

use crate::config::schema::{ChainDescriptor, KnownToken, ProviderKind};

fn explorer(name: &str, slug: &str, chain_id: u64, explorer_url: &str) -> ChainDescriptor {
    ChainDescriptor {
        name: name.to_string(),
        slug: slug.to_string(),
        provider: ProviderKind::Explorer,
        chain_id: Some(chain_id),
        explorer_url: Some(explorer_url.to_string()),
        rpc_urls: Vec::new(),
        token_index_url: None,
        tokens: Vec::new(),
    }
}

fn curated(
    name: &str,
    slug: &str,
    chain_id: u64,
    rpc_urls: &[&str],
    tokens: Vec<KnownToken>,
) -> ChainDescriptor {
    ChainDescriptor {
        name: name.to_string(),
        slug: slug.to_string(),
        provider: ProviderKind::RpcKnown,
        chain_id: Some(chain_id),
        explorer_url: None,
        rpc_urls: rpc_urls.iter().map(|s| s.to_string()).collect(),
        token_index_url: None,
        tokens,
    }
}

/// Default EVM chains in scan order.
pub fn default_chains() -> Vec<ChainDescriptor> {
    vec![
        explorer("Ethereum", "ethereum", 1, "https://eth.blockscout.com"),
        explorer("Arbitrum", "arbitrum", 42161, "https://arbitrum.blockscout.com"),
        explorer("Base", "base", 8453, "https://base.blockscout.com"),
        explorer("Optimism", "optimism", 10, "https://optimism.blockscout.com"),
        explorer("Polygon", "polygon", 137, "https://polygon.blockscout.com"),
        explorer("BSC", "bsc", 56, "https://bsc.blockscout.com"),
        explorer("Blast", "blast", 81457, "https://blast.blockscout.com"),
        curated(
            "Mantle",
            "mantle",
            5000,
            &["https://rpc.mantle.xyz"],
            vec![
                KnownToken::new("0x09bc4e0d864854c6afb6eb9a9cdf58ac190d0df9", "USDC", 6),
                KnownToken::new("0x201eba5cc46d216ce6dc03f6a759e8e766e956ae", "USDT", 6),
                KnownToken::new("0x78c1b0c915c4faa5fffa6cabf0219da63d7f4cb8", "WMNT", 18),
            ],
        ),
        curated(
            "Merlin",
            "merlinchain",
            4200,
            &["https://rpc.merlinchain.io"],
            vec![
                KnownToken::new("0x480e158395cc5b41e5584347c495584ca2caf78d", "MERL", 8),
                KnownToken::new("0xb880fd278198bd590252621d4cd071b1842e9bcd", "M-BTC", 18),
                KnownToken::new("0x5c46bff4b38dc1eae09c5bac65f31a150b940064", "MERL", 18),
            ],
        ),
    ]
}
