//! Provider registry for orchestrating quote providers.
//!
//! The registry owns an ordered provider list and handles:
//! - Request validation before any provider is called
//! - Fallback to the next provider on retrieval failures
//! - Completeness checks on returned quote sets

use std::borrow::Cow;
use std::sync::Arc;

use log::{debug, info, warn};

use super::FetchDiagnostics;
use crate::errors::{AnycoinError, Result, RetryClass};
use crate::models::{CoinSymbol, ProviderId, QuoteSet, QuoteSymbol};
use crate::provider::QuoteProvider;

/// Provider registry for orchestrating quote fetching.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl ProviderRegistry {
    /// Create a new provider registry.
    ///
    /// Providers are tried in the given order. An empty list is rejected
    /// with [`AnycoinError::NoProviders`].
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>) -> Result<Self> {
        if providers.is_empty() {
            return Err(AnycoinError::NoProviders);
        }
        Ok(Self { providers })
    }

    /// Get the list of registered providers, in trial order.
    pub fn providers(&self) -> &[Arc<dyn QuoteProvider>] {
        &self.providers
    }

    /// Fetch quotes of `coins` in `quotes_in` from the first provider that
    /// can serve them.
    pub async fn get_coin_quotes(
        &self,
        coins: &[CoinSymbol],
        quotes_in: &[QuoteSymbol],
    ) -> Result<QuoteSet> {
        let (result, _) = self
            .get_coin_quotes_with_diagnostics(coins, quotes_in)
            .await;
        result
    }

    /// Fetch quotes and return the attempt log alongside the result.
    ///
    /// Tries providers in order:
    /// 1. Fetch quotes
    /// 2. Check every requested pair is present
    /// 3. On failure, try next provider based on retry class
    pub async fn get_coin_quotes_with_diagnostics(
        &self,
        coins: &[CoinSymbol],
        quotes_in: &[QuoteSymbol],
    ) -> (Result<QuoteSet>, FetchDiagnostics) {
        let mut diagnostics = FetchDiagnostics::new();

        if coins.is_empty() || quotes_in.is_empty() {
            return (Err(AnycoinError::EmptyRequest), diagnostics);
        }

        for provider in &self.providers {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());

            debug!(
                "Fetching quotes for {:?} in {:?} from provider '{}'",
                coins, quotes_in, provider_id
            );

            let outcome = provider
                .get_coin_quotes(coins, quotes_in)
                .await
                .and_then(|set| set.ensure_complete(coins, quotes_in).map(|()| set));

            match outcome {
                Ok(set) => {
                    info!("Successfully fetched quotes from '{}'", provider_id);
                    diagnostics.record_success(provider_id);
                    return (Ok(set), diagnostics);
                }
                Err(e) => match e.retry_class() {
                    RetryClass::Never => {
                        // Terminal error - don't try other providers
                        info!(
                            "Terminal error from '{}': {}, not retrying",
                            provider_id, e
                        );
                        diagnostics.record_error(provider_id, e.to_string());
                        return (Err(e), diagnostics);
                    }
                    RetryClass::NextProvider => {
                        warn!(
                            "Provider '{}' failed with {}, trying next provider",
                            provider_id, e
                        );
                        diagnostics.record_error(provider_id, e.to_string());
                    }
                },
            }
        }

        let attempts = diagnostics.summary();
        warn!("All quote providers failed: {}", attempts);
        (Err(AnycoinError::AllProvidersFailed { attempts }), diagnostics)
    }
}
