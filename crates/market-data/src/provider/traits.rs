//! Quote provider trait definitions.
//!
//! This module defines the core `QuoteProvider` trait that all upstream
//! quote sources must implement.

use async_trait::async_trait;

use crate::errors::{AnycoinError, Result};
use crate::models::{CoinSymbol, QuoteSet, QuoteSymbol};

/// Provider-native ids for one quote request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Provider ids of the requested coins, in request order
    pub coin_ids: Vec<String>,
    /// Provider ids of the requested quote currencies, in request order
    pub quote_ids: Vec<String>,
}

/// Trait for quote providers.
///
/// Implement this trait to add support for a new upstream source. The
/// registry asks providers in the order they were registered and falls back
/// to the next one whenever a call fails with a retrieval-class error.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use anycoin_market_data::provider::{IdMap, QuoteProvider};
///
/// struct MyProvider {
///     coins: IdMap<CoinSymbol>,
///     quotes: IdMap<QuoteSymbol>,
/// }
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn get_coin_quotes(
///         &self,
///         coins: &[CoinSymbol],
///         quotes_in: &[QuoteSymbol],
///     ) -> Result<QuoteSet> {
///         let request = self.resolve_request(coins, quotes_in)?;
///         // ... call the API with request.coin_ids / request.quote_ids
///     }
///
///     // ... implement the id translation methods with the IdMaps
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "COINGECKO", "COINMARKETCAP", etc.
    /// Used for logging, diagnostics, and as the `provider` of quote sets.
    fn id(&self) -> &'static str;

    /// Fetch the latest quotes of `coins` priced in `quotes_in`.
    ///
    /// Any retrieval problem (network, non-success status, malformed
    /// response, unsupported symbol) must surface as
    /// [`AnycoinError::GetCoinQuotes`] so the registry can fall back.
    async fn get_coin_quotes(
        &self,
        coins: &[CoinSymbol],
        quotes_in: &[QuoteSymbol],
    ) -> Result<QuoteSet>;

    /// Provider id for a coin symbol.
    ///
    /// Fails with [`AnycoinError::CoinNotSupported`] when the provider has
    /// no mapping.
    fn coin_id_by_symbol(&self, coin: CoinSymbol) -> Result<&str>;

    /// Coin symbol for a provider id.
    ///
    /// Fails with [`AnycoinError::CoinIdNotSupported`].
    fn symbol_by_coin_id(&self, id: &str) -> Result<CoinSymbol>;

    /// Provider id for a quote currency.
    ///
    /// Fails with [`AnycoinError::QuoteNotSupported`].
    fn quote_id_by_symbol(&self, quote: QuoteSymbol) -> Result<&str>;

    /// Quote currency for a provider id.
    ///
    /// Fails with [`AnycoinError::QuoteIdNotSupported`].
    fn symbol_by_quote_id(&self, id: &str) -> Result<QuoteSymbol>;

    /// Translate a whole request into provider ids.
    ///
    /// Not-supported failures are reported as retrieval errors, matching
    /// the contract of [`get_coin_quotes`](Self::get_coin_quotes).
    fn resolve_request(
        &self,
        coins: &[CoinSymbol],
        quotes_in: &[QuoteSymbol],
    ) -> Result<ResolvedRequest> {
        let as_retrieval = |e: AnycoinError| {
            if e.is_not_supported() {
                AnycoinError::retrieval(self.id(), e.to_string())
            } else {
                e
            }
        };

        let coin_ids = coins
            .iter()
            .map(|coin| self.coin_id_by_symbol(*coin).map(str::to_string))
            .collect::<Result<Vec<_>>>()
            .map_err(as_retrieval)?;
        let quote_ids = quotes_in
            .iter()
            .map(|quote| self.quote_id_by_symbol(*quote).map(str::to_string))
            .collect::<Result<Vec<_>>>()
            .map_err(as_retrieval)?;

        Ok(ResolvedRequest {
            coin_ids,
            quote_ids,
        })
    }
}
