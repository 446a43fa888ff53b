//! Spam and scam token heuristics.
//!
//! A pure policy over a classified candidate. Pattern lists and value
//! thresholds come from `[spam]` config so they can be tuned without
//! touching the strategies.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::config::SpamConfig;
use crate::tokens::model::CandidateToken;

static DOLLAR_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[\d,]+").expect("static regex"));

/// Why a token was classified as spam.
#[derive(Debug, Clone, PartialEq)]
pub enum SpamReason {
    UrlPattern(String),
    PhishingPhrase(String),
    DollarAmount,
    Homoglyph,
    /// Position value above the priced-token ceiling.
    ExcessiveValue(f64),
    /// No price and a balance above the unpriced ceiling.
    UnpricedSupply(f64),
}

impl fmt::Display for SpamReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpamReason::UrlPattern(p) => write!(f, "url pattern '{}'", p),
            SpamReason::PhishingPhrase(p) => write!(f, "phishing phrase '{}'", p),
            SpamReason::DollarAmount => f.write_str("dollar amount in name"),
            SpamReason::Homoglyph => f.write_str("cyrillic homoglyph"),
            SpamReason::ExcessiveValue(v) => write!(f, "position value {:.0} USD", v),
            SpamReason::UnpricedSupply(b) => write!(f, "unpriced balance {:.0}", b),
        }
    }
}

/// Configured spam classifier.
#[derive(Debug, Clone)]
pub struct SpamPolicy {
    url_patterns: Vec<String>,
    phishing_phrases: Vec<String>,
    flag_dollar_amounts: bool,
    flag_cyrillic: bool,
    max_position_usd: f64,
    max_unpriced_balance: f64,
}

impl SpamPolicy {
    pub fn new(config: &SpamConfig) -> Self {
        let lower = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| s.to_lowercase())
                .collect()
        };
        Self {
            url_patterns: lower(&config.url_patterns),
            phishing_phrases: lower(&config.phishing_phrases),
            flag_dollar_amounts: config.flag_dollar_amounts,
            flag_cyrillic: config.flag_cyrillic,
            max_position_usd: config.max_position_usd,
            max_unpriced_balance: config.max_unpriced_balance,
        }
    }

    /// First matching reason, or `None` for a legitimate token.
    pub fn classify(&self, token: &CandidateToken) -> Option<SpamReason> {
        let symbol = token.symbol.trim();
        let name = token.name.trim();
        let combined = format!("{} {}", symbol, name).to_lowercase();

        if let Some(p) = self.url_patterns.iter().find(|p| combined.contains(p.as_str())) {
            return Some(SpamReason::UrlPattern(p.clone()));
        }
        if let Some(p) = self
            .phishing_phrases
            .iter()
            .find(|p| combined.contains(p.as_str()))
        {
            return Some(SpamReason::PhishingPhrase(p.clone()));
        }
        if self.flag_dollar_amounts && DOLLAR_AMOUNT.is_match(name) {
            return Some(SpamReason::DollarAmount);
        }
        if self.flag_cyrillic && symbol.chars().chain(name.chars()).any(is_cyrillic) {
            return Some(SpamReason::Homoglyph);
        }

        match token.exchange_rate {
            Some(rate) if rate > 0.0 => {
                let value = token.balance * rate;
                if value > self.max_position_usd {
                    return Some(SpamReason::ExcessiveValue(value));
                }
            }
            Some(_) => {}
            None => {
                if token.balance > self.max_unpriced_balance {
                    return Some(SpamReason::UnpricedSupply(token.balance));
                }
            }
        }

        None
    }

    pub fn is_spam(&self, token: &CandidateToken) -> bool {
        self.classify(token).is_some()
    }
}

impl Default for SpamPolicy {
    fn default() -> Self {
        Self::new(&SpamConfig::default())
    }
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(symbol: &str, name: &str, balance: f64, rate: Option<f64>) -> CandidateToken {
        CandidateToken {
            contract_address: "0xabc".into(),
            raw_balance: "0".into(),
            balance,
            decimals: 6,
            symbol: symbol.into(),
            name: name.into(),
            exchange_rate: rate,
            token_type: Some("ERC-20".into()),
            icon_url: None,
        }
    }

    #[test]
    fn test_phishing_airdrop_is_spam() {
        let policy = SpamPolicy::default();
        let t = token("USDC", "FreeClaim.xyz Airdrop", 100.0, None);
        assert!(policy.is_spam(&t));
        assert_eq!(policy.classify(&t), Some(SpamReason::UrlPattern(".xyz".into())));
    }

    #[test]
    fn test_legitimate_token() {
        let policy = SpamPolicy::default();
        assert!(!policy.is_spam(&token("USDC", "USD Coin", 100.0, Some(1.0))));
    }

    #[test]
    fn test_phrases_and_names() {
        let policy = SpamPolicy::default();
        assert!(matches!(
            policy.classify(&token("REWARD", "Visit site to collect", 1.0, Some(1.0))),
            Some(SpamReason::PhishingPhrase(_))
        ));
        assert_eq!(
            policy.classify(&token("GIFT", "$5,000 Gift", 1.0, Some(1.0))),
            Some(SpamReason::DollarAmount)
        );
        // Cyrillic 'С' standing in for Latin 'C'
        assert_eq!(
            policy.classify(&token("USD\u{0421}", "USD Coin", 1.0, Some(1.0))),
            Some(SpamReason::Homoglyph)
        );
    }

    #[test]
    fn test_value_thresholds() {
        let policy = SpamPolicy::default();
        assert!(matches!(
            policy.classify(&token("PEPE2", "Pepe Two", 20_000_000.0, Some(1.0))),
            Some(SpamReason::ExcessiveValue(_))
        ));
        assert!(matches!(
            policy.classify(&token("FAKE", "Fake Token", 2_000_000.0, None)),
            Some(SpamReason::UnpricedSupply(_))
        ));
        // large unpriced but below the ceiling
        assert!(!policy.is_spam(&token("DUST", "Dust Token", 500_000.0, None)));
        // zero rate disables the value checks
        assert!(!policy.is_spam(&token("ZERO", "Zero Rate", 5_000_000.0, Some(0.0))));
    }

    #[test]
    fn test_thresholds_are_tunable() {
        let config = SpamConfig {
            max_unpriced_balance: 10.0,
            phishing_phrases: Vec::new(),
            ..SpamConfig::default()
        };
        let policy = SpamPolicy::new(&config);
        assert!(policy.is_spam(&token("MID", "Mid Token", 11.0, None)));
        assert!(!policy.is_spam(&token("CLAIM", "Claimable", 1.0, Some(1.0))));
    }
}
