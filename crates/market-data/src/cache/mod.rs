//! Quote caching.
//!
//! - `key` - Deterministic cache keys for quote requests
//! - `store` - Pluggable serialized key/value backends ([`CacheStore`], [`MemoryCacheStore`])
//! - `single_flight` - The [`QuoteCache`] coordinator deduplicating concurrent fetches

mod key;
mod single_flight;
mod store;

pub use key::cache_key_for_coin_quotes;
pub use single_flight::QuoteCache;
pub use store::{CacheStore, MemoryCacheStore, DEFAULT_MAX_CAPACITY};
