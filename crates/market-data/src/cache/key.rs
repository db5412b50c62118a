use crate::errors::{AnycoinError, Result};
use crate::models::{CoinSymbol, QuoteSymbol};

/// Cache key for a `get_coin_quotes` call.
///
/// Order-preserving: `[btc, ltc] × [usd, eur]` gives
/// `"coins:btc,ltc;quotes_in:usd,eur"`, and a different request order gives a
/// different key.
pub fn cache_key_for_coin_quotes(coins: &[CoinSymbol], quotes_in: &[QuoteSymbol]) -> Result<String> {
    if coins.is_empty() || quotes_in.is_empty() {
        return Err(AnycoinError::EmptyRequest);
    }

    let coins = coins.iter().map(|c| c.value()).collect::<Vec<_>>().join(",");
    let quotes = quotes_in.iter().map(|q| q.value()).collect::<Vec<_>>().join(",");
    Ok(format!("coins:{};quotes_in:{}", coins, quotes))
}
