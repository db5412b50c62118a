//! Closed sets of coin and quote-currency symbols.
//!
//! Each variant carries a lowercase wire value (used in cache keys, provider
//! tables and serialized quote sets) and a human readable name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AnycoinError;

macro_rules! symbol_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($value:literal, $display:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every known symbol, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Lowercase wire value, e.g. `"btc"`.
            pub fn value(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Display name, e.g. `"Bitcoin"`.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $display,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.value())
            }
        }

        impl FromStr for $name {
            type Err = AnycoinError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                match needle.as_str() {
                    $($value => Ok($name::$variant),)+
                    _ => Err(AnycoinError::UnknownSymbol(s.to_string())),
                }
            }
        }
    };
}

symbol_table! {
    /// A tradeable cryptographic asset.
    pub enum CoinSymbol {
        Btc => ("btc", "Bitcoin"),
        Eth => ("eth", "Ethereum"),
        Xrp => ("xrp", "XRP"),
        Usdt => ("usdt", "Tether"),
        Sol => ("sol", "Solana"),
        Bnb => ("bnb", "BNB"),
        Doge => ("doge", "Dogecoin"),
        Usdc => ("usdc", "USDC"),
        Ada => ("ada", "Cardano"),
        Trx => ("trx", "Tron"),
        Avax => ("avax", "Avalanche"),
        Ton => ("ton", "Toncoin"),
        Not => ("not", "Notcoin"),
        Shib => ("shib", "Shiba Inu"),
        Dot => ("dot", "Polkadot"),
        Ltc => ("ltc", "Litecoin"),
        Bch => ("bch", "Bitcoin Cash"),
        Pepe => ("pepe", "Pepe"),
        Pol => ("pol", "Polygon"),
    }
}

symbol_table! {
    /// A fiat / reference currency that coins are priced in.
    pub enum QuoteSymbol {
        Usd => ("usd", "United States Dollar"),
        Eur => ("eur", "Euro"),
        Brl => ("brl", "Brazilian Real"),
        Rub => ("rub", "Russian ruble"),
        Bdt => ("bdt", "Bangladeshi taka"),
    }
}
