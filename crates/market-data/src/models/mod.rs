//! Market data models
//!
//! This module contains the core data types for quote operations:
//! - `types` - Type aliases for common identifiers (ProviderId, QuoteValue)
//! - `symbol` - Closed coin and quote-currency symbol sets (CoinSymbol, QuoteSymbol)
//! - `asset` - Either side of a conversion (Asset)
//! - `quote` - Quote data structures (QuoteSet, CoinRow, QuoteRow)

mod asset;
mod quote;
mod symbol;
mod types;

pub use asset::Asset;
pub use quote::{CoinRow, QuoteRow, QuoteSet};
pub use symbol::{CoinSymbol, QuoteSymbol};
pub use types::{ProviderId, QuoteValue};
