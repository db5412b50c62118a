use std::borrow::Cow;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// Reference-currency rate (price of one coin in one quote currency)
pub type QuoteValue = rust_decimal::Decimal;
