//! Provider registry module.
//!
//! This module provides orchestration for quote providers, including:
//! - Ordered provider fallback
//! - Attempt diagnostics
//! - Amount conversion on top of fetched quotes (see [`crate::convert`])

mod diagnostics;
mod registry;

pub use diagnostics::{FetchDiagnostics, ProviderAttempt};
pub use registry::ProviderRegistry;
