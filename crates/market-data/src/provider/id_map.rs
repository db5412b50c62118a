//! Bidirectional symbol ↔ provider-id tables.
//!
//! Providers keep one map for coins and one for quote currencies and use them
//! to implement the id translation methods of [`QuoteProvider`](super::QuoteProvider).

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::str::FromStr;

use crate::errors::{AnycoinError, Result};
use crate::models::{CoinSymbol, QuoteSymbol};

/// Symbol ↔ id lookup table owned by a single provider.
#[derive(Clone, Debug)]
pub struct IdMap<S> {
    provider: &'static str,
    by_symbol: HashMap<S, String>,
    by_id: HashMap<String, S>,
}

impl<S> IdMap<S>
where
    S: Copy + Eq + Hash,
{
    pub fn new<I, T>(provider: &'static str, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        T: Into<String>,
    {
        let mut by_symbol = HashMap::new();
        let mut by_id = HashMap::new();
        for (symbol, id) in entries {
            let id = id.into();
            by_id.insert(id.clone(), symbol);
            by_symbol.insert(symbol, id);
        }
        Self {
            provider,
            by_symbol,
            by_id,
        }
    }

    /// Parse a `{"<symbol>": "<provider id>"}` JSON object.
    ///
    /// Every key must name a known symbol.
    pub fn from_json(provider: &'static str, json: &str) -> Result<Self>
    where
        S: FromStr<Err = AnycoinError>,
    {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)
            .map_err(|e| AnycoinError::Config(format!("{} id table: {}", provider, e)))?;
        let entries = raw
            .into_iter()
            .map(|(symbol, id)| {
                symbol
                    .parse::<S>()
                    .map(|s| (s, id))
                    .map_err(|e| AnycoinError::Config(format!("{} id table: {}", provider, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(provider, entries))
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    pub fn id_of(&self, symbol: S) -> Option<&str> {
        self.by_symbol.get(&symbol).map(String::as_str)
    }

    pub fn symbol_of(&self, id: &str) -> Option<S> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl IdMap<CoinSymbol> {
    pub fn coin_id(&self, coin: CoinSymbol) -> Result<&str> {
        self.id_of(coin).ok_or_else(|| AnycoinError::CoinNotSupported {
            provider: self.provider.to_string(),
            symbol: coin.to_string(),
        })
    }

    pub fn coin_symbol(&self, id: &str) -> Result<CoinSymbol> {
        self.symbol_of(id).ok_or_else(|| AnycoinError::CoinIdNotSupported {
            provider: self.provider.to_string(),
            id: id.to_string(),
        })
    }
}

impl IdMap<QuoteSymbol> {
    pub fn quote_id(&self, quote: QuoteSymbol) -> Result<&str> {
        self.id_of(quote).ok_or_else(|| AnycoinError::QuoteNotSupported {
            provider: self.provider.to_string(),
            symbol: quote.to_string(),
        })
    }

    pub fn quote_symbol(&self, id: &str) -> Result<QuoteSymbol> {
        self.symbol_of(id).ok_or_else(|| AnycoinError::QuoteIdNotSupported {
            provider: self.provider.to_string(),
            id: id.to_string(),
        })
    }
}
