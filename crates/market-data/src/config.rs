//! Cache configuration read from the environment.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cache::{MemoryCacheStore, QuoteCache, DEFAULT_MAX_CAPACITY};
use crate::errors::{AnycoinError, Result};

pub const ENV_CACHE_TTL_SECS: &str = "ANYCOIN_CACHE_TTL_SECS";
pub const ENV_CACHE_MAX_CAPACITY: &str = "ANYCOIN_CACHE_MAX_CAPACITY";

/// Default time-to-live of cached quote sets.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnycoinConfig {
    /// `None` keeps cached quotes until evicted.
    pub cache_ttl_secs: Option<u64>,
    pub cache_max_capacity: u64,
}

impl Default for AnycoinConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: Some(DEFAULT_CACHE_TTL_SECS),
            cache_max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl AnycoinConfig {
    /// Load from process environment, reading a `.env` file first if present.
    ///
    /// - `ANYCOIN_CACHE_TTL_SECS`: seconds, or `none` to disable expiry
    /// - `ANYCOIN_CACHE_MAX_CAPACITY`: maximum cached entries
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CACHE_TTL_SECS) {
            let raw = raw.trim();
            config.cache_ttl_secs = if raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_u64(ENV_CACHE_TTL_SECS, raw)?)
            };
        }
        if let Some(raw) = lookup(ENV_CACHE_MAX_CAPACITY) {
            config.cache_max_capacity = parse_u64(ENV_CACHE_MAX_CAPACITY, raw.trim())?;
        }

        debug!("Loaded anycoin config: {:?}", config);
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// A fresh in-memory [`QuoteCache`] sized by this config.
    pub fn build_cache(&self) -> QuoteCache {
        QuoteCache::new(Arc::new(MemoryCacheStore::with_capacity(
            self.cache_max_capacity,
        )))
    }
}

fn parse_u64(name: &str, raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|e| AnycoinError::Config(format!("{name}={raw:?}: {e}")))
}
