use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::symbol::{CoinSymbol, QuoteSymbol};
use super::types::{ProviderId, QuoteValue};
use crate::errors::{AnycoinError, Result};
use crate::provider::QuoteProvider;

/// Price of one coin in one quote currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRow {
    /// 1 coin = `quote` units of the quote currency
    pub quote: QuoteValue,
}

/// All quotes returned for a single coin.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRow {
    pub quotes: BTreeMap<QuoteSymbol, QuoteRow>,
}

/// Result of one successful provider call.
///
/// A value, not an entity: it is built once per provider response, may be
/// stored in the cache, and is never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteSet {
    /// Quotes keyed by coin, then by quote currency
    pub coins: BTreeMap<CoinSymbol, CoinRow>,

    /// Provider that produced the quotes (COINGECKO, COINMARKETCAP, etc.)
    pub provider: ProviderId,

    /// Untouched provider payload, kept for diagnostics
    pub raw_data: serde_json::Value,
}

impl QuoteSet {
    /// Create an empty quote set for a provider response
    pub fn new(provider: impl Into<ProviderId>, raw_data: serde_json::Value) -> Self {
        Self {
            coins: BTreeMap::new(),
            provider: provider.into(),
            raw_data,
        }
    }

    /// Builder-style insert, mostly useful for providers and tests
    pub fn with_quote(mut self, coin: CoinSymbol, quote: QuoteSymbol, value: Decimal) -> Self {
        self.insert(coin, quote, value);
        self
    }

    pub fn insert(&mut self, coin: CoinSymbol, quote: QuoteSymbol, value: Decimal) {
        self.coins
            .entry(coin)
            .or_default()
            .quotes
            .insert(quote, QuoteRow { quote: value });
    }

    /// Build a quote set from provider-native ids.
    ///
    /// Every coin id and quote id is translated back to a symbol through the
    /// provider. A single untranslatable id fails the whole build; partial
    /// quote sets are never produced.
    pub fn from_provider_rows<P, R, C, Qs, Q>(
        provider: &P,
        rows: R,
        raw_data: serde_json::Value,
    ) -> Result<Self>
    where
        P: QuoteProvider + ?Sized,
        R: IntoIterator<Item = (C, Qs)>,
        C: AsRef<str>,
        Qs: IntoIterator<Item = (Q, Decimal)>,
        Q: AsRef<str>,
    {
        let mut set = Self::new(provider.id(), serde_json::Value::Null);
        for (coin_id, quotes) in rows {
            let coin = provider.symbol_by_coin_id(coin_id.as_ref())?;
            let row = set.coins.entry(coin).or_default();
            for (quote_id, value) in quotes {
                let quote = provider.symbol_by_quote_id(quote_id.as_ref())?;
                row.quotes.insert(quote, QuoteRow { quote: value });
            }
        }
        set.raw_data = raw_data;
        Ok(set)
    }

    /// Rate of `coin` in `quote`.
    pub fn rate(&self, coin: CoinSymbol, quote: QuoteSymbol) -> Result<Decimal> {
        self.coins
            .get(&coin)
            .and_then(|row| row.quotes.get(&quote))
            .map(|row| row.quote)
            .ok_or_else(|| AnycoinError::MissingQuote {
                coin: coin.to_string(),
                quote: quote.to_string(),
            })
    }

    /// Check that the set holds exactly the requested coin × quote pairs.
    ///
    /// A missing pair fails with [`AnycoinError::MissingQuote`], an extra coin
    /// or quote currency with [`AnycoinError::UnrequestedSymbol`].
    pub fn ensure_complete(&self, coins: &[CoinSymbol], quotes_in: &[QuoteSymbol]) -> Result<()> {
        for coin in coins {
            for quote in quotes_in {
                self.rate(*coin, *quote)?;
            }
        }

        for (coin, row) in &self.coins {
            if !coins.contains(coin) {
                return Err(AnycoinError::UnrequestedSymbol {
                    symbol: coin.to_string(),
                });
            }
            if let Some(quote) = row.quotes.keys().find(|q| !quotes_in.contains(*q)) {
                return Err(AnycoinError::UnrequestedSymbol {
                    symbol: quote.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Raw payload is left out, it can be large.
impl fmt::Display for QuoteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuoteSet(provider={}, coins={{", self.provider)?;
        for (i, (coin, row)) in self.coins.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {{", coin)?;
            for (j, (quote, value)) in row.quotes.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", quote, value.quote)?;
            }
            f.write_str("}")?;
        }
        f.write_str("})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample() -> QuoteSet {
        QuoteSet::new("COINMARKETCAP", json!({"data": {"1": {}}}))
            .with_quote(CoinSymbol::Btc, QuoteSymbol::Usd, dec!(6602.60701122))
            .with_quote(CoinSymbol::Btc, QuoteSymbol::Eur, dec!(6000.1))
    }

    #[test]
    fn test_rate_lookup() {
        let set = sample();
        assert_eq!(
            set.rate(CoinSymbol::Btc, QuoteSymbol::Usd).unwrap(),
            dec!(6602.60701122)
        );
        assert_eq!(
            set.rate(CoinSymbol::Eth, QuoteSymbol::Usd).unwrap_err(),
            AnycoinError::MissingQuote {
                coin: "eth".to_string(),
                quote: "usd".to_string()
            }
        );
    }

    #[test]
    fn test_ensure_complete() {
        let set = sample();
        assert!(set
            .ensure_complete(&[CoinSymbol::Btc], &[QuoteSymbol::Usd, QuoteSymbol::Eur])
            .is_ok());
        assert!(set
            .ensure_complete(&[CoinSymbol::Btc], &[QuoteSymbol::Brl])
            .is_err());
    }

    #[test]
    fn test_ensure_complete_rejects_unrequested_coin() {
        let set = sample().with_quote(CoinSymbol::Eth, QuoteSymbol::Usd, dec!(3500));
        assert_eq!(
            set.ensure_complete(&[CoinSymbol::Btc], &[QuoteSymbol::Usd, QuoteSymbol::Eur])
                .unwrap_err(),
            AnycoinError::UnrequestedSymbol {
                symbol: "eth".to_string()
            }
        );
    }

    #[test]
    fn test_ensure_complete_rejects_unrequested_quote() {
        let set = sample();
        assert_eq!(
            set.ensure_complete(&[CoinSymbol::Btc], &[QuoteSymbol::Usd])
                .unwrap_err(),
            AnycoinError::UnrequestedSymbol {
                symbol: "eur".to_string()
            }
        );
    }

    #[test]
    fn test_serialized_shape() {
        let set = QuoteSet::new("COINMARKETCAP", json!({"status": {"error_code": 0}}))
            .with_quote(CoinSymbol::Btc, QuoteSymbol::Usd, dec!(6602.60701122));

        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(
            value,
            json!({
                "coins": {"btc": {"quotes": {"usd": {"quote": "6602.60701122"}}}},
                "provider": "COINMARKETCAP",
                "raw_data": {"status": {"error_code": 0}},
            })
        );
    }

    #[test]
    fn test_json_keeps_full_precision() {
        let set = QuoteSet::new("COINGECKO", json!({}))
            .with_quote(CoinSymbol::Doge, QuoteSymbol::Usd, dec!(0.32769167949926686));
        let text = serde_json::to_string(&set).unwrap();
        let back: QuoteSet = serde_json::from_str(&text).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_display_hides_raw_data() {
        let shown = sample().to_string();
        assert_eq!(
            shown,
            "QuoteSet(provider=COINMARKETCAP, coins={btc: {usd: 6602.60701122, eur: 6000.1}})"
        );
        assert!(!shown.contains("data"));
    }
}
