//! Amount conversion between coins and quote currencies.
//!
//! Every quote is read as "1 coin = X quote units". The four conversion
//! paths pick which quotes to fetch from that convention:
//!
//! | from  | to    | fetched                          | result                          |
//! |-------|-------|----------------------------------|---------------------------------|
//! | coin  | quote | `[from]` in `[to]`               | `amount * from/to`              |
//! | coin  | coin  | `[from, to]` in `[USD]`          | `amount * from/USD / to/USD`    |
//! | quote | coin  | `[to]` in `[from]`               | `amount / to/from`              |
//! | quote | quote | `[USDT]` in `[from, to]`         | `amount / USDT/from * USDT/to`  |
//!
//! Every multiplication and division is rounded to 28 significant digits,
//! half to even.

use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{AnycoinError, Result};
use crate::models::{Asset, CoinSymbol, QuoteSymbol};
use crate::registry::ProviderRegistry;

/// Quote currency used as the pivot between two coins.
pub const REFERENCE_QUOTE: QuoteSymbol = QuoteSymbol::Usd;

/// Coin used as the pivot between two quote currencies.
pub const REFERENCE_COIN: CoinSymbol = CoinSymbol::Usdt;

/// Significant digits kept after each arithmetic step.
pub const PRECISION: u32 = 28;

fn round_to_precision(value: Decimal) -> Result<Decimal> {
    value
        .round_sf_with_strategy(PRECISION, RoundingStrategy::MidpointNearestEven)
        .ok_or_else(|| AnycoinError::Arithmetic(format!("cannot round {value}")))
}

fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    let product = a
        .checked_mul(b)
        .ok_or_else(|| AnycoinError::Arithmetic(format!("{a} * {b} overflows")))?;
    round_to_precision(product)
}

fn checked_div(a: Decimal, b: Decimal) -> Result<Decimal> {
    if b.is_zero() {
        return Err(AnycoinError::Arithmetic(format!("{a} / {b}: zero rate")));
    }
    let quotient = a
        .checked_div(b)
        .ok_or_else(|| AnycoinError::Arithmetic(format!("{a} / {b} overflows")))?;
    round_to_precision(quotient)
}

/// `amount` coins priced at `coin_in_quote` each.
pub fn coin_to_quote(amount: Decimal, coin_in_quote: Decimal) -> Result<Decimal> {
    checked_mul(amount, coin_in_quote)
}

/// `amount` of one coin expressed in another, both priced in the same quote.
pub fn coin_to_coin(amount: Decimal, from_in_quote: Decimal, to_in_quote: Decimal) -> Result<Decimal> {
    checked_div(checked_mul(amount, from_in_quote)?, to_in_quote)
}

/// How many coins `amount` quote units buy.
pub fn quote_to_coin(amount: Decimal, coin_in_quote: Decimal) -> Result<Decimal> {
    checked_div(amount, coin_in_quote)
}

/// `amount` of one quote currency expressed in another, through a pivot coin
/// priced in both.
pub fn quote_to_quote(
    amount: Decimal,
    pivot_in_from: Decimal,
    pivot_in_to: Decimal,
) -> Result<Decimal> {
    checked_mul(checked_div(amount, pivot_in_from)?, pivot_in_to)
}

impl ProviderRegistry {
    /// Convert `amount` of `from` into `to` with freshly fetched quotes.
    ///
    /// Fetching goes through the registry fallback, so retrieval failures
    /// surface the same way they do for [`get_coin_quotes`](Self::get_coin_quotes).
    pub async fn convert(
        &self,
        amount: Decimal,
        from: impl Into<Asset>,
        to: impl Into<Asset>,
    ) -> Result<Decimal> {
        let (from, to) = (from.into(), to.into());
        debug!("Converting {} {} to {}", amount, from, to);

        match (from, to) {
            (Asset::Coin(coin), Asset::Quote(quote)) => {
                let set = self.get_coin_quotes(&[coin], &[quote]).await?;
                coin_to_quote(amount, set.rate(coin, quote)?)
            }
            (Asset::Coin(from), Asset::Coin(to)) => {
                let set = self
                    .get_coin_quotes(&[from, to], &[REFERENCE_QUOTE])
                    .await?;
                coin_to_coin(
                    amount,
                    set.rate(from, REFERENCE_QUOTE)?,
                    set.rate(to, REFERENCE_QUOTE)?,
                )
            }
            (Asset::Quote(quote), Asset::Coin(coin)) => {
                let set = self.get_coin_quotes(&[coin], &[quote]).await?;
                quote_to_coin(amount, set.rate(coin, quote)?)
            }
            (Asset::Quote(from), Asset::Quote(to)) => {
                let set = self
                    .get_coin_quotes(&[REFERENCE_COIN], &[from, to])
                    .await?;
                quote_to_quote(
                    amount,
                    set.rate(REFERENCE_COIN, from)?,
                    set.rate(REFERENCE_COIN, to)?,
                )
            }
        }
    }

    /// Like [`convert`](Self::convert) with both sides given as symbols,
    /// e.g. `"btc"` or `"usd"`.
    pub async fn convert_symbols(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal> {
        let invalid = || AnycoinError::InvalidConversion {
            from: from.to_string(),
            to: to.to_string(),
        };
        let from_asset: Asset = from.parse().map_err(|_| invalid())?;
        let to_asset: Asset = to.parse().map_err(|_| invalid())?;
        self.convert(amount, from_asset, to_asset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuoteSet;
    use crate::provider::QuoteProvider;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Serves a fixed table and records every request it sees.
    struct TableProvider {
        rates: Vec<(CoinSymbol, QuoteSymbol, Decimal)>,
        requests: Mutex<Vec<(Vec<CoinSymbol>, Vec<QuoteSymbol>)>>,
    }

    impl TableProvider {
        fn new(rates: Vec<(CoinSymbol, QuoteSymbol, Decimal)>) -> Arc<Self> {
            Arc::new(Self {
                rates,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(Vec<CoinSymbol>, Vec<QuoteSymbol>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QuoteProvider for TableProvider {
        fn id(&self) -> &'static str {
            "TABLE"
        }

        async fn get_coin_quotes(
            &self,
            coins: &[CoinSymbol],
            quotes_in: &[QuoteSymbol],
        ) -> Result<QuoteSet> {
            self.requests
                .lock()
                .unwrap()
                .push((coins.to_vec(), quotes_in.to_vec()));
            let mut set = QuoteSet::new("TABLE", json!({}));
            for (coin, quote, rate) in &self.rates {
                if coins.contains(coin) && quotes_in.contains(quote) {
                    set.insert(*coin, *quote, *rate);
                }
            }
            Ok(set)
        }

        fn coin_id_by_symbol(&self, coin: CoinSymbol) -> Result<&str> {
            Ok(coin.value())
        }

        fn symbol_by_coin_id(&self, id: &str) -> Result<CoinSymbol> {
            id.parse()
        }

        fn quote_id_by_symbol(&self, quote: QuoteSymbol) -> Result<&str> {
            Ok(quote.value())
        }

        fn symbol_by_quote_id(&self, id: &str) -> Result<QuoteSymbol> {
            id.parse()
        }
    }

    fn registry_over(provider: &Arc<TableProvider>) -> ProviderRegistry {
        ProviderRegistry::new(vec![Arc::clone(provider) as Arc<dyn QuoteProvider>]).unwrap()
    }

    #[tokio::test]
    async fn test_coin_to_quote() {
        let provider = TableProvider::new(vec![(
            CoinSymbol::Ltc,
            QuoteSymbol::Usd,
            dec!(127.41098851451477),
        )]);
        let registry = registry_over(&provider);

        let result = registry
            .convert(dec!(1.2), CoinSymbol::Ltc, QuoteSymbol::Usd)
            .await
            .unwrap();

        assert_eq!(result, dec!(152.893186217417724));
        assert_eq!(
            provider.requests(),
            vec![(vec![CoinSymbol::Ltc], vec![QuoteSymbol::Usd])]
        );
    }

    #[tokio::test]
    async fn test_coin_to_coin() {
        let provider = TableProvider::new(vec![
            (CoinSymbol::Bnb, QuoteSymbol::Usd, dec!(675.2103782980719)),
            (CoinSymbol::Ltc, QuoteSymbol::Usd, dec!(127.41098851451477)),
        ]);
        let registry = registry_over(&provider);

        let result = registry
            .convert(dec!(2.55), CoinSymbol::Bnb, CoinSymbol::Ltc)
            .await
            .unwrap();

        assert_eq!(result, dec!(13.51364183524826778891989760));
        assert_eq!(
            provider.requests(),
            vec![(vec![CoinSymbol::Bnb, CoinSymbol::Ltc], vec![QuoteSymbol::Usd])]
        );
    }

    #[tokio::test]
    async fn test_quote_to_coin() {
        let provider = TableProvider::new(vec![(
            CoinSymbol::Doge,
            QuoteSymbol::Usd,
            dec!(0.32769167949926686),
        )]);
        let registry = registry_over(&provider);

        let result = registry
            .convert(dec!(3.23), QuoteSymbol::Usd, CoinSymbol::Doge)
            .await
            .unwrap();

        assert_eq!(result, dec!(9.856826407480469560449673338));
        assert_eq!(
            provider.requests(),
            vec![(vec![CoinSymbol::Doge], vec![QuoteSymbol::Usd])]
        );
    }

    #[tokio::test]
    async fn test_quote_to_quote() {
        let provider = TableProvider::new(vec![
            (CoinSymbol::Usdt, QuoteSymbol::Usd, dec!(0.999743929278962)),
            (CoinSymbol::Usdt, QuoteSymbol::Brl, dec!(5.835382003285947)),
        ]);
        let registry = registry_over(&provider);

        let result = registry
            .convert(dec!(100), QuoteSymbol::Usd, QuoteSymbol::Brl)
            .await
            .unwrap();

        assert_eq!(result, dec!(583.6876656499986822275017460));
        assert_eq!(
            provider.requests(),
            vec![(vec![CoinSymbol::Usdt], vec![QuoteSymbol::Usd, QuoteSymbol::Brl])]
        );
    }

    #[tokio::test]
    async fn test_convert_symbols_parses_both_sides() {
        let provider = TableProvider::new(vec![(CoinSymbol::Btc, QuoteSymbol::Eur, dec!(50000))]);
        let registry = registry_over(&provider);

        let result = registry
            .convert_symbols(dec!(0.5), "BTC", "eur")
            .await
            .unwrap();
        assert_eq!(result, dec!(25000));
    }

    #[tokio::test]
    async fn test_convert_symbols_rejects_unknown_side() {
        let provider = TableProvider::new(Vec::new());
        let registry = registry_over(&provider);

        let err = registry
            .convert_symbols(dec!(1), "btc", "gold")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AnycoinError::InvalidConversion {
                from: "btc".to_string(),
                to: "gold".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Invalid conversion from btc to gold");
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_rate_exhausts_providers() {
        let provider = TableProvider::new(Vec::new());
        let registry = registry_over(&provider);

        let err = registry
            .convert(dec!(1), CoinSymbol::Eth, QuoteSymbol::Rub)
            .await
            .unwrap_err();
        assert!(matches!(err, AnycoinError::AllProvidersFailed { .. }));
    }

    #[test]
    fn test_zero_rate_is_an_arithmetic_error() {
        assert!(matches!(
            quote_to_coin(dec!(10), Decimal::ZERO),
            Err(AnycoinError::Arithmetic(_))
        ));
        assert!(matches!(
            coin_to_coin(dec!(10), dec!(2), Decimal::ZERO),
            Err(AnycoinError::Arithmetic(_))
        ));
    }

    #[test]
    fn test_overflow_is_an_arithmetic_error() {
        assert!(matches!(
            coin_to_quote(Decimal::MAX, dec!(2)),
            Err(AnycoinError::Arithmetic(_))
        ));
    }

    #[test]
    fn test_steps_round_to_28_significant_digits() {
        let value = quote_to_coin(dec!(1), dec!(3)).unwrap();
        assert_eq!(value, dec!(0.3333333333333333333333333333));

        // 2/3 ends in ...6666 and rounds up to ...6667.
        let value = quote_to_coin(dec!(2), dec!(3)).unwrap();
        assert_eq!(value, dec!(0.6666666666666666666666666667));
    }

    #[test]
    fn test_pure_formulas() {
        assert_eq!(coin_to_quote(dec!(2), dec!(3.5)).unwrap(), dec!(7.0));
        assert_eq!(coin_to_coin(dec!(3), dec!(10), dec!(5)).unwrap(), dec!(6));
        assert_eq!(quote_to_coin(dec!(9), dec!(3)).unwrap(), dec!(3));
        assert_eq!(quote_to_quote(dec!(10), dec!(2), dec!(4)).unwrap(), dec!(20));
    }
}
