use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::symbol::{CoinSymbol, QuoteSymbol};
use crate::errors::AnycoinError;

/// Either side of a conversion: a coin or a quote currency.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "symbol", rename_all = "snake_case")]
pub enum Asset {
    Coin(CoinSymbol),
    Quote(QuoteSymbol),
}

impl Asset {
    /// Wire value of the wrapped symbol.
    pub fn value(self) -> &'static str {
        match self {
            Self::Coin(coin) => coin.value(),
            Self::Quote(quote) => quote.value(),
        }
    }

    /// Display name of the wrapped symbol.
    pub fn name(self) -> &'static str {
        match self {
            Self::Coin(coin) => coin.name(),
            Self::Quote(quote) => quote.name(),
        }
    }
}

impl From<CoinSymbol> for Asset {
    fn from(coin: CoinSymbol) -> Self {
        Self::Coin(coin)
    }
}

impl From<QuoteSymbol> for Asset {
    fn from(quote: QuoteSymbol) -> Self {
        Self::Quote(quote)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Coins are tried first; the coin and quote value sets are disjoint.
impl FromStr for Asset {
    type Err = AnycoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(coin) = s.parse::<CoinSymbol>() {
            return Ok(Self::Coin(coin));
        }
        s.parse::<QuoteSymbol>()
            .map(Self::Quote)
            .map_err(|_| AnycoinError::UnknownSymbol(s.to_string()))
    }
}
