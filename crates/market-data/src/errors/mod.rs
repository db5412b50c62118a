//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`AnycoinError`]: The error enum for all quote, cache and conversion operations
//! - [`RetryClass`]: Classification for determining fallback behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching, caching or converting quotes.
///
/// Errors are `Clone` because a single in-flight computation hands its
/// outcome to every caller waiting on the same cache key.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which the provider registry
/// uses to decide between falling back and aborting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnycoinError {
    /// The registry was constructed without any provider.
    #[error("At least one quote provider is required")]
    NoProviders,

    /// A configuration value could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A quote request named no coins or no quote currencies.
    #[error("A quote request needs at least one coin and one quote currency")]
    EmptyRequest,

    /// The provider could not retrieve quotes (network failure, non-success
    /// status, malformed response).
    #[error("Error retrieving coin quotes from {provider}: {message}")]
    GetCoinQuotes {
        /// The provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The provider has no id for this coin symbol.
    #[error("Coin {symbol} not supported by {provider}")]
    CoinNotSupported { provider: String, symbol: String },

    /// The provider returned a coin id that maps to no known symbol.
    #[error("Coin with id {id} not supported by {provider}")]
    CoinIdNotSupported { provider: String, id: String },

    /// The provider has no id for this quote currency.
    #[error("Quote {symbol} not supported by {provider}")]
    QuoteNotSupported { provider: String, symbol: String },

    /// The provider returned a quote id that maps to no known symbol.
    #[error("Quote with id {id} not supported by {provider}")]
    QuoteIdNotSupported { provider: String, id: String },

    /// A requested coin/quote pair is absent from a quote set.
    #[error("Missing quote for {coin} in {quote}")]
    MissingQuote { coin: String, quote: String },

    /// A quote set holds a coin or quote currency that was not requested.
    #[error("Quote set contains unrequested symbol {symbol}")]
    UnrequestedSymbol { symbol: String },

    /// Every provider was tried and every one failed with a retrieval error.
    #[error("Unable to get quote through any service ({attempts})")]
    AllProvidersFailed {
        /// Per-provider attempt summary
        attempts: String,
    },

    /// The pair of conversion sides is not a supported combination.
    #[error("Invalid conversion from {from} to {to}")]
    InvalidConversion { from: String, to: String },

    /// A string did not name any known coin or quote currency.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Decimal arithmetic failed (division by a zero rate, overflow).
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// The cache coordinator could not deliver a result.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl AnycoinError {
    /// Returns the retry classification for this error.
    ///
    /// Only retrieval-class failures are retried by falling back to the next
    /// provider:
    ///
    /// - [`RetryClass::NextProvider`]: retrieval errors, unsupported symbols,
    ///   incomplete or over-full provider payloads
    /// - [`RetryClass::Never`]: everything else
    ///
    /// # Examples
    ///
    /// ```
    /// use anycoin_market_data::errors::{AnycoinError, RetryClass};
    ///
    /// let error = AnycoinError::GetCoinQuotes {
    ///     provider: "COINGECKO".to_string(),
    ///     message: "HTTP 503".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::NextProvider);
    ///
    /// let error = AnycoinError::NoProviders;
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::GetCoinQuotes { .. }
            | Self::CoinNotSupported { .. }
            | Self::CoinIdNotSupported { .. }
            | Self::QuoteNotSupported { .. }
            | Self::QuoteIdNotSupported { .. }
            | Self::MissingQuote { .. }
            | Self::UnrequestedSymbol { .. } => RetryClass::NextProvider,

            Self::NoProviders
            | Self::Config(_)
            | Self::EmptyRequest
            | Self::AllProvidersFailed { .. }
            | Self::InvalidConversion { .. }
            | Self::UnknownSymbol(_)
            | Self::Arithmetic(_)
            | Self::Cache(_) => RetryClass::Never,
        }
    }

    /// Builds a retrieval error for `provider`.
    pub fn retrieval(provider: &str, message: impl Into<String>) -> Self {
        Self::GetCoinQuotes {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Whether this error is one of the provider "not supported" variants.
    pub fn is_not_supported(&self) -> bool {
        matches!(
            self,
            Self::CoinNotSupported { .. }
                | Self::CoinIdNotSupported { .. }
                | Self::QuoteNotSupported { .. }
                | Self::QuoteIdNotSupported { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnycoinError>;
