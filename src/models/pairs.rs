//! Crypto trading-pair directory and symbol classification.
//!
//! Every entry point that takes a symbol (quotes, historicals, order
//! placement) first classifies it: if `<SYMBOL>USD` is a known pair the
//! symbol trades on the crypto venue, otherwise it is treated as an equity.

use std::collections::HashMap;

use super::primitives::Symbol;

/// Pairs tradable on the crypto venue, keyed by `<SYMBOL>USD`.
const BUILTIN_PAIRS: &[(&str, &str)] = &[
    ("BTCUSD", "3d961844-d360-45fc-989b-f6fca761d511"),
    ("ETHUSD", "76637d50-c702-4ed1-bcb5-5b0732a81f48"),
    ("LTCUSD", "383280b1-ff53-43fc-9c84-f01afd0989cd"),
    ("BCHUSD", "2f2b77c4-e426-4271-ae49-18d5cb296d3a"),
    ("BSVUSD", "086a8f9f-6c39-43fa-ac9f-57952f4a1ba6"),
    ("ETCUSD", "7b577ce3-489d-4269-9408-796a0d1abb3a"),
    ("DOGEUSD", "1ef78e1b-049b-4f12-90e5-555dcf2fe204"),
];

/// A crypto trading pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CryptoPair {
    /// Pair symbol, e.g. `BTCUSD`
    pub symbol: String,
    /// Provider-internal pair identifier
    pub id: String,
}

/// Where a symbol trades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Market {
    /// Listed equity
    Equity(Symbol),
    /// Crypto pair
    Crypto(CryptoPair),
}

impl Market {
    /// Returns `true` for crypto pairs.
    pub fn is_crypto(&self) -> bool {
        matches!(self, Market::Crypto(_))
    }
}

/// Directory mapping `<SYMBOL>USD` to provider pair identifiers.
///
/// # Example
///
/// ```
/// use robinhood_rs::models::{CryptoPairs, Market};
///
/// let pairs = CryptoPairs::default();
/// assert!(pairs.classify("btc").is_crypto());
/// assert!(!pairs.classify("AAPL").is_crypto());
/// ```
#[derive(Debug, Clone)]
pub struct CryptoPairs {
    pairs: HashMap<String, String>,
}

impl Default for CryptoPairs {
    fn default() -> Self {
        BUILTIN_PAIRS.iter().copied().collect()
    }
}

impl CryptoPairs {
    /// An empty directory: every symbol classifies as an equity.
    pub fn empty() -> Self {
        Self {
            pairs: HashMap::new(),
        }
    }

    /// Add or replace a pair.
    pub fn with_pair(mut self, pair_symbol: impl AsRef<str>, id: impl Into<String>) -> Self {
        self.pairs
            .insert(pair_symbol.as_ref().to_uppercase(), id.into());
        self
    }

    /// Look up a pair by its `<SYMBOL>USD` key.
    pub fn get(&self, pair_symbol: &str) -> Option<CryptoPair> {
        let key = pair_symbol.to_uppercase();
        self.pairs.get(&key).map(|id| CryptoPair {
            symbol: key,
            id: id.clone(),
        })
    }

    /// Classify a bare symbol.
    pub fn classify(&self, symbol: impl AsRef<str>) -> Market {
        let symbol = Symbol::new(symbol);
        match self.get(&symbol.usd_pair()) {
            Some(pair) => Market::Crypto(pair),
            None => Market::Equity(symbol),
        }
    }

    /// Number of known pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no pairs are known.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for CryptoPairs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CryptoPairs::empty(), |pairs, (k, v)| pairs.with_pair(k, v))
    }
}
