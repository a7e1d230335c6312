//! Scripted fakes for the rate provider and DEX quoter ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::port::outbound::dex::{QuoteError, SwapQuoter};
use crate::port::outbound::rates::{RateError, RateProvider};

enum ProviderBehavior {
    Ok(Decimal),
    HttpError,
    NonPositive,
}

/// A rate provider with a fixed scripted behavior and a call counter.
///
/// The counter records *inner* calls, so wrapping in a cooldown gate lets
/// tests assert that skipped attempts never reach the provider.
pub struct ScriptedProvider {
    name: &'static str,
    behavior: ProviderBehavior,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn always_ok(name: &'static str, rate: Decimal) -> Self {
        Self {
            name,
            behavior: ProviderBehavior::Ok(rate),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn always_err(name: &'static str) -> Self {
        Self {
            name,
            behavior: ProviderBehavior::HttpError,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn always_nonpositive(name: &'static str) -> Self {
        Self {
            name,
            behavior: ProviderBehavior::NonPositive,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the call counter.
    #[must_use]
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl RateProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_eur_rate(&self) -> Result<Decimal, RateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ProviderBehavior::Ok(rate) => Ok(*rate),
            ProviderBehavior::HttpError => Err(RateError::Http("scripted failure".into())),
            ProviderBehavior::NonPositive => Err(RateError::NonPositive(Decimal::ZERO)),
        }
    }
}

enum QuoterBehavior {
    Ok(Decimal),
    NoLiquidity,
    HttpError,
}

/// A DEX quoter with a fixed outcome.
pub struct FixedQuoter {
    behavior: QuoterBehavior,
    calls: Arc<AtomicUsize>,
}

impl FixedQuoter {
    #[must_use]
    pub fn ok(base_per_token: Decimal) -> Self {
        Self {
            behavior: QuoterBehavior::Ok(base_per_token),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn no_liquidity() -> Self {
        Self {
            behavior: QuoterBehavior::NoLiquidity,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn http_error() -> Self {
        Self {
            behavior: QuoterBehavior::HttpError,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl SwapQuoter for FixedQuoter {
    async fn base_per_token(&self) -> Result<Decimal, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            QuoterBehavior::Ok(rate) => Ok(*rate),
            QuoterBehavior::NoLiquidity => Err(QuoteError::NoLiquidity),
            QuoterBehavior::HttpError => Err(QuoteError::Http("scripted failure".into())),
        }
    }
}
