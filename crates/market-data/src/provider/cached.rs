//! Caching decorator for quote providers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::traits::QuoteProvider;
use crate::cache::{cache_key_for_coin_quotes, QuoteCache};
use crate::errors::{AnycoinError, Result};
use crate::models::{CoinSymbol, QuoteSet, QuoteSymbol};

/// Wraps a provider so quote fetches go through a [`QuoteCache`].
///
/// Keys only depend on the requested symbols, so providers sharing one
/// `QuoteCache` also share its entries. Only sets holding exactly the
/// requested pairs are stored; anything else fails uncached so the next
/// provider gets its turn.
pub struct CachedProvider<P> {
    inner: P,
    cache: Arc<QuoteCache>,
    ttl: Option<Duration>,
}

impl<P: QuoteProvider> CachedProvider<P> {
    /// `ttl: None` keeps entries until the store evicts them.
    pub fn new(inner: P, cache: Arc<QuoteCache>, ttl: Option<Duration>) -> Self {
        Self { inner, cache, ttl }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cache(&self) -> &Arc<QuoteCache> {
        &self.cache
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}

#[async_trait]
impl<P: QuoteProvider> QuoteProvider for CachedProvider<P> {
    fn id(&self) -> &'static str {
        self.inner.id()
    }

    async fn get_coin_quotes(
        &self,
        coins: &[CoinSymbol],
        quotes_in: &[QuoteSymbol],
    ) -> Result<QuoteSet> {
        let key = cache_key_for_coin_quotes(coins, quotes_in)?;
        self.cache
            .get_or_compute(&key, self.ttl, || async move {
                let set = self.inner.get_coin_quotes(coins, quotes_in).await?;
                set.ensure_complete(coins, quotes_in)?;
                Ok::<_, AnycoinError>(set)
            })
            .await
    }

    fn coin_id_by_symbol(&self, coin: CoinSymbol) -> Result<&str> {
        self.inner.coin_id_by_symbol(coin)
    }

    fn symbol_by_coin_id(&self, id: &str) -> Result<CoinSymbol> {
        self.inner.symbol_by_coin_id(id)
    }

    fn quote_id_by_symbol(&self, quote: QuoteSymbol) -> Result<&str> {
        self.inner.quote_id_by_symbol(quote)
    }

    fn symbol_by_quote_id(&self, id: &str) -> Result<QuoteSymbol> {
        self.inner.symbol_by_quote_id(id)
    }
}
