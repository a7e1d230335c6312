//! Cooldown decorator for rate providers.
//!
//! Cooldown bookkeeping lives here, not in the providers: each provider
//! only knows how to fetch, and the gate decides whether it may.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use crate::port::outbound::rates::{RateError, RateProvider};
use crate::port::outbound::store::{Clock, KeyValueStore};

fn cooldown_key(provider: &str) -> String {
    format!("rate_cooldown:{provider}")
}

/// Wraps a provider and skips it while its last attempt is within the
/// cooldown window.
///
/// The attempt timestamp is written *before* the inner call, so a failing
/// call still arms the cooldown.
pub struct CooldownGate<P> {
    inner: P,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    window_ms: i64,
}

impl<P: RateProvider> CooldownGate<P> {
    pub fn new(
        inner: P,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        window: Duration,
    ) -> Self {
        Self {
            inner,
            store,
            clock,
            window_ms: window.as_millis() as i64,
        }
    }

    fn last_attempt_ms(&self, key: &str) -> Result<Option<i64>, RateError> {
        let raw = self
            .store
            .get(key)
            .map_err(|e| RateError::Store(e.to_string()))?;
        Ok(raw.and_then(|value| value.parse::<i64>().ok()))
    }
}

#[async_trait]
impl<P: RateProvider> RateProvider for CooldownGate<P> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch_eur_rate(&self) -> Result<Decimal, RateError> {
        let key = cooldown_key(self.name());
        let now = self.clock.now_ms();

        if let Some(last) = self.last_attempt_ms(&key)? {
            let elapsed = now - last;
            if elapsed >= 0 && elapsed < self.window_ms {
                let remaining_ms = self.window_ms - elapsed;
                debug!(
                    provider = self.name(),
                    remaining_ms, "Skipping provider in cooldown"
                );
                return Err(RateError::Cooldown { remaining_ms });
            }
        }

        self.store
            .put(&key, &now.to_string())
            .map_err(|e| RateError::Store(e.to_string()))?;

        self.inner.fetch_eur_rate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::rates::ScriptedProvider;
    use crate::testkit::store::{ManualClock, MemoryStore};
    use rust_decimal_macros::dec;

    fn gate(
        provider: ScriptedProvider,
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
    ) -> CooldownGate<ScriptedProvider> {
        CooldownGate::new(provider, store, clock, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn second_attempt_within_window_is_skipped_without_a_call() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_000_000));
        let provider = ScriptedProvider::always_ok("scripted", dec!(3000));
        let calls = provider.call_counter();
        let gate = gate(provider, Arc::clone(&store), Arc::clone(&clock));

        assert!(gate.fetch_eur_rate().await.is_ok());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        clock.advance_ms(10_000);
        let second = gate.fetch_eur_rate().await;
        assert!(matches!(second, Err(RateError::Cooldown { .. })));
        // The inner provider must not have been called again.
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn attempt_after_window_goes_through() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_000_000));
        let provider = ScriptedProvider::always_ok("scripted", dec!(3000));
        let calls = provider.call_counter();
        let gate = gate(provider, Arc::clone(&store), Arc::clone(&clock));

        assert!(gate.fetch_eur_rate().await.is_ok());
        clock.advance_ms(30_000);
        assert!(gate.fetch_eur_rate().await.is_ok());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failing_call_still_arms_the_cooldown() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(5_000_000));
        let provider = ScriptedProvider::always_err("scripted");
        let calls = provider.call_counter();
        let gate = gate(provider, Arc::clone(&store), Arc::clone(&clock));

        assert!(matches!(
            gate.fetch_eur_rate().await,
            Err(RateError::Http(_))
        ));

        clock.advance_ms(5_000);
        assert!(matches!(
            gate.fetch_eur_rate().await,
            Err(RateError::Cooldown { .. })
        ));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn garbage_timestamp_does_not_block_the_provider() {
        let store = Arc::new(MemoryStore::new());
        store.put("rate_cooldown:scripted", "not-a-number").unwrap();
        let clock = Arc::new(ManualClock::new(1_000));
        let provider = ScriptedProvider::always_ok("scripted", dec!(2950));
        let gate = gate(provider, Arc::clone(&store), clock);

        assert!(gate.fetch_eur_rate().await.is_ok());
        // Timestamp is repaired on the way through.
        assert_eq!(
            store.get("rate_cooldown:scripted").unwrap().as_deref(),
            Some("1000")
        );
    }
}
