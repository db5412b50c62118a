/// Classification for fallback policy.
///
/// Used by the provider registry to decide whether a failed provider call
/// should hand the request to the next provider in the chain.
///
/// # Behavior Summary
///
/// | Class | Try Next Provider? |
/// |-------|-------------------|
/// | `Never` | No, the error is returned to the caller |
/// | `NextProvider` | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - configuration problems, bad input, or terminal failure.
    /// Asking another provider would not change the outcome.
    Never,

    /// Try the next provider.
    ///
    /// Used when this provider could not produce the quotes (network failure,
    /// non-success response, unsupported symbol, incomplete payload) but
    /// another provider might succeed. The same provider is never asked twice.
    NextProvider,
}
