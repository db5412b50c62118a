//! Anycoin Market Data Crate
//!
//! This crate fetches latest crypto quotes from interchangeable providers
//! and converts amounts between coins and fiat quote currencies.
//!
//! # Overview
//!
//! The market data crate supports:
//! - A closed set of coins and quote currencies
//! - Ordered provider fallback with attempt diagnostics
//! - Amount conversion along four coin/quote paths
//! - A single-flight cache deduplicating concurrent identical requests
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |     Caller       | --> | ProviderRegistry |  (fallback + conversion)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  CachedProvider  |  (optional, per provider)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   QuoteCache     |  (single-flight over a CacheStore)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  QuoteProvider   |  (CoinGecko, CoinMarketCap, etc.)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    QuoteSet      |  (coin -> quote -> value)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CoinSymbol`] / [`QuoteSymbol`] - Supported coins and quote currencies
//! - [`Asset`] - Either side of a conversion
//! - [`QuoteSet`] - Quotes returned by one provider
//! - [`ProviderRegistry`] - Ordered fallback and conversion
//! - [`QuoteCache`] - Single-flight cache coordinator
//!
//! # Example
//!
//! ```ignore
//! let config = AnycoinConfig::from_env()?;
//! let cache = Arc::new(config.build_cache());
//! let registry = ProviderRegistry::new(vec![
//!     Arc::new(CachedProvider::new(coingecko, cache.clone(), config.cache_ttl())),
//!     Arc::new(CachedProvider::new(coinmarketcap, cache, config.cache_ttl())),
//! ])?;
//!
//! let usd = registry.convert(dec!(1.2), CoinSymbol::Ltc, QuoteSymbol::Usd).await?;
//! ```

pub mod cache;
pub mod config;
pub mod convert;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

// Re-export all public types from models
pub use models::{
    Asset, CoinRow, CoinSymbol, ProviderId, QuoteRow, QuoteSet, QuoteSymbol, QuoteValue,
};

// Re-export cache types
pub use cache::{cache_key_for_coin_quotes, CacheStore, MemoryCacheStore, QuoteCache};

pub use config::AnycoinConfig;
pub use convert::{REFERENCE_COIN, REFERENCE_QUOTE};
pub use errors::{AnycoinError, Result, RetryClass};

// Re-export provider types
pub use provider::{CachedProvider, IdMap, QuoteProvider, ResolvedRequest};

// Re-export registry types
pub use registry::{FetchDiagnostics, ProviderAttempt, ProviderRegistry};
