//! Quote provider abstractions.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all upstream sources implement
//! - `IdMap`, the symbol to provider-id table providers translate with
//! - `CachedProvider`, a decorator routing fetches through a `QuoteCache`
//!
//! Concrete HTTP providers live outside this crate. They only need to
//! implement [`QuoteProvider`] to plug into the registry.

mod cached;
mod id_map;
mod traits;

pub use cached::CachedProvider;
pub use id_map::IdMap;
pub use traits::{QuoteProvider, ResolvedRequest};
