//! Rate provider port for base-asset fiat spot rates.
//!
//! Providers are tried sequentially in a fixed priority order; the first
//! positive rate wins. A cooldown skip is part of normal operation, not a
//! true failure, and callers must be able to tell the two apart.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why a provider produced no rate this cycle.
#[derive(Error, Debug)]
pub enum RateError {
    /// The provider was attempted too recently; no network access happened.
    #[error("provider in cooldown for another {remaining_ms} ms")]
    Cooldown { remaining_ms: i64 },

    #[error("http: {0}")]
    Http(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("non-positive rate: {0}")]
    NonPositive(Decimal),

    #[error("store: {0}")]
    Store(String),
}

impl RateError {
    /// Cooldown skips are expected and logged at a lower level than real
    /// failures.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Cooldown { .. })
    }
}

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// A single source for the base asset's EUR spot rate.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Provider name for logging and cooldown bookkeeping.
    fn name(&self) -> &'static str;

    /// Fetch the current EUR rate for one unit of the base asset.
    ///
    /// Implementations must return `Err` for non-positive rates so a
    /// broken upstream can never poison the composed price.
    async fn fetch_eur_rate(&self) -> Result<Decimal, RateError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn cooldown_is_a_skip() {
        assert!(RateError::Cooldown { remaining_ms: 10 }.is_skip());
        assert!(!RateError::Http("502".into()).is_skip());
        assert!(!RateError::NonPositive(dec!(0)).is_skip());
    }
}
