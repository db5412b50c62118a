//! Attempt tracking for provider fallback diagnostics.

use crate::models::ProviderId;

/// Record of a single provider attempt during a fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderAttempt {
    pub provider_id: ProviderId,
    pub error: Option<String>,
    pub success: bool,
}

/// Ordered log of provider attempts for one fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    pub fn record_error(&mut self, provider_id: ProviderId, error: String) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            error: Some(error),
            success: false,
        });
    }

    pub fn record_success(&mut self, provider_id: ProviderId) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            error: None,
            success: true,
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| {
                if a.success {
                    format!("{}: SUCCESS", a.provider_id)
                } else if let Some(err) = &a.error {
                    format!("{}: ERROR ({})", a.provider_id, err)
                } else {
                    format!("{}: UNKNOWN", a.provider_id)
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Check if any provider succeeded.
    pub fn has_success(&self) -> bool {
        self.attempts.iter().any(|a| a.success)
    }

    /// Get all errors.
    pub fn errors(&self) -> Vec<(&ProviderId, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_ref().map(|e| (&a.provider_id, e.as_str())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    #[test]
    fn test_diagnostics_summary() {
        let mut diag = FetchDiagnostics::new();
        diag.record_error(Cow::Borrowed("COINMARKETCAP"), "HTTP 401".to_string());
        diag.record_success(Cow::Borrowed("COINGECKO"));

        assert_eq!(
            diag.summary(),
            "COINMARKETCAP: ERROR (HTTP 401) -> COINGECKO: SUCCESS"
        );
    }

    #[test]
    fn test_has_success() {
        let mut diag = FetchDiagnostics::new();
        diag.record_error(Cow::Borrowed("A"), "Timeout".to_string());
        assert!(!diag.has_success());

        diag.record_success(Cow::Borrowed("B"));
        assert!(diag.has_success());
    }

    #[test]
    fn test_errors() {
        let mut diag = FetchDiagnostics::new();
        diag.record_error(Cow::Borrowed("A"), "first".to_string());
        diag.record_error(Cow::Borrowed("B"), "second".to_string());
        diag.record_success(Cow::Borrowed("C"));

        let errors = diag.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].1, "second");
    }
}
