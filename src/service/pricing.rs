//! Two-stage EUR price resolution with durable caching.
//!
//! Stage A resolves the base asset's EUR rate through the provider chain;
//! stage B asks the DEX quoter how much base asset one fan token fetches.
//! The composed price is persisted on success and the cache (then a hard
//! default) backs every failure path, so a resolution cycle always ends in
//! a displayable value.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::PricingConfig;
use crate::domain::price::{format_eur, Provenance, ResolvedPrice, StoredQuote};
use crate::port::outbound::dex::{QuoteError, SwapQuoter};
use crate::port::outbound::rates::RateProvider;
use crate::port::outbound::store::{Clock, KeyValueStore};

/// Fixed store key for the persisted quote.
pub const PRICE_QUOTE_KEY: &str = "price_quote";

/// Resolution policy derived from [`PricingConfig`].
#[derive(Debug, Clone)]
pub struct PricingSettings {
    /// Hard fallback EUR rate for the base asset.
    pub default_base_rate: Decimal,
    /// Cache age trusted at startup hydration.
    pub hydrate_max_age: Duration,
    /// Cache age trusted when recomputing a EUR value from cached
    /// components.
    pub compose_max_age: Duration,
}

impl From<&PricingConfig> for PricingSettings {
    fn from(config: &PricingConfig) -> Self {
        Self {
            default_base_rate: config.default_base_rate_eur,
            hydrate_max_age: Duration::from_secs(config.hydrate_max_age_hours * 60 * 60),
            compose_max_age: Duration::from_secs(config.compose_max_age_hours * 60 * 60),
        }
    }
}

/// The price resolution engine.
///
/// Never returns an error to its caller: every cycle terminates in a
/// [`ResolvedPrice`] carrying a provenance tag and an optional status
/// note.
pub struct PriceEngine {
    providers: Vec<Box<dyn RateProvider>>,
    quoter: Box<dyn SwapQuoter>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    settings: PricingSettings,
}

impl PriceEngine {
    pub fn new(
        providers: Vec<Box<dyn RateProvider>>,
        quoter: Box<dyn SwapQuoter>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: PricingSettings,
    ) -> Self {
        Self {
            providers,
            quoter,
            store,
            clock,
            settings,
        }
    }

    /// The persisted quote, if one exists and parses.
    #[must_use]
    pub fn cached_quote(&self) -> Option<StoredQuote> {
        let raw = match self.store.get(PRICE_QUOTE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "Failed to read price cache");
                return None;
            }
        };
        match serde_json::from_str::<StoredQuote>(&raw) {
            Ok(quote) => Some(quote),
            Err(err) => {
                warn!(error = %err, "Discarding unparseable price cache");
                None
            }
        }
    }

    /// Startup hydration: the cached quote, but only while younger than
    /// the hydration window.
    #[must_use]
    pub fn hydrate(&self) -> Option<StoredQuote> {
        let quote = self.cached_quote()?;
        let now = self.clock.now_ms();
        if quote.is_fresh(now, self.settings.hydrate_max_age) {
            debug!(age_secs = quote.age(now).as_secs(), "Hydrated price cache");
            Some(quote)
        } else {
            debug!(
                age_secs = quote.age(now).as_secs(),
                "Price cache too stale to hydrate"
            );
            None
        }
    }

    /// Stage A: base-asset EUR rate through the provider chain.
    ///
    /// First positive live rate wins, rounded to 2 decimal places. Falls
    /// back to the cached rate, then the configured default.
    async fn resolve_base_rate(&self) -> (Decimal, Provenance) {
        for provider in &self.providers {
            match provider.fetch_eur_rate().await {
                Ok(rate) => {
                    let rounded = rate.round_dp(2);
                    info!(provider = provider.name(), rate = %rounded, "Base rate resolved");
                    return (rounded, Provenance::Live);
                }
                Err(err) if err.is_skip() => {
                    debug!(provider = provider.name(), "Provider skipped: {err}");
                }
                Err(err) => {
                    warn!(provider = provider.name(), error = %err, "Provider failed");
                }
            }
        }

        if let Some(quote) = self.cached_quote() {
            if quote.base_rate > Decimal::ZERO {
                info!(rate = %quote.base_rate, "Base rate from cache");
                return (quote.base_rate, Provenance::Cached);
            }
        }

        info!(rate = %self.settings.default_base_rate, "Base rate from hard default");
        (self.settings.default_base_rate, Provenance::Default)
    }

    /// Stage B: base asset per fan token from the DEX quoter, cached
    /// value as the only fallback.
    async fn resolve_base_per_token(&self) -> (Option<Decimal>, Provenance, Option<String>) {
        let failure = match self.quoter.base_per_token().await {
            Ok(rate) => return (Some(rate), Provenance::Live, None),
            Err(QuoteError::NoLiquidity) => "quote: no liquidity available".to_string(),
            Err(err) => {
                warn!(error = %err, "DEX quote failed");
                format!("quote: {err}")
            }
        };

        if let Some(quote) = self.cached_quote() {
            if quote.base_per_token > Decimal::ZERO {
                info!("Token rate from cache");
                return (Some(quote.base_per_token), Provenance::Cached, None);
            }
        }

        (None, Provenance::Default, Some(failure))
    }

    /// Run one full resolution cycle.
    pub async fn resolve(&self) -> ResolvedPrice {
        let (base_rate, base_source) = self.resolve_base_rate().await;
        let (base_per_token, token_source, status) = self.resolve_base_per_token().await;

        let Some(token_rate) = base_per_token else {
            return ResolvedPrice {
                price_per_token: None,
                base_per_token: None,
                base_rate,
                provenance: base_source,
                status,
            };
        };

        let price_per_token = token_rate * base_rate;

        // Persist only when this cycle produced a fresh quote; refreshing
        // the timestamp from cached components would fake freshness.
        if token_source == Provenance::Live && base_rate > Decimal::ZERO {
            let quote = StoredQuote {
                base_per_token: token_rate,
                price_per_token,
                base_rate,
                resolved_at_ms: self.clock.now_ms(),
            };
            match serde_json::to_string(&quote) {
                Ok(serialized) => {
                    if let Err(err) = self.store.put(PRICE_QUOTE_KEY, &serialized) {
                        warn!(error = %err, "Failed to persist price cache");
                    }
                }
                Err(err) => warn!(error = %err, "Failed to serialize price cache"),
            }
        }

        ResolvedPrice {
            price_per_token: Some(price_per_token),
            base_per_token: Some(token_rate),
            base_rate,
            provenance: base_source.weakest(token_source),
            status: None,
        }
    }

    /// EUR value of a fan-token balance, formatted to two decimals.
    ///
    /// Uses the supplied price when present, otherwise recomputes from
    /// cached components while they are within the composition window.
    /// Degrades to `"0.00"`, never an error.
    #[must_use]
    pub fn eur_value(&self, balance: Decimal, price_per_token: Option<Decimal>) -> String {
        if balance <= Decimal::ZERO {
            return "0.00".into();
        }

        if let Some(price) = price_per_token.filter(|p| *p > Decimal::ZERO) {
            return format_eur(balance * price);
        }

        if let Some(quote) = self.cached_quote() {
            let now = self.clock.now_ms();
            if quote.is_fresh(now, self.settings.compose_max_age)
                && quote.base_per_token > Decimal::ZERO
                && quote.base_rate > Decimal::ZERO
            {
                return format_eur(balance * quote.base_per_token * quote.base_rate);
            }
        }

        "0.00".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::rates::{FixedQuoter, ScriptedProvider};
    use crate::testkit::store::{ManualClock, MemoryStore};
    use rust_decimal_macros::dec;

    fn settings() -> PricingSettings {
        PricingSettings::from(&crate::config::PricingConfig::default())
    }

    fn engine_with(
        providers: Vec<Box<dyn RateProvider>>,
        quoter: FixedQuoter,
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
    ) -> PriceEngine {
        PriceEngine::new(providers, Box::new(quoter), store, clock, settings())
    }

    #[tokio::test]
    async fn all_providers_down_no_cache_yields_default() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let engine = engine_with(
            vec![
                Box::new(ScriptedProvider::always_err("a")),
                Box::new(ScriptedProvider::always_err("b")),
            ],
            FixedQuoter::no_liquidity(),
            store,
            clock,
        );

        let price = engine.resolve().await;
        assert_eq!(price.base_rate, dec!(3000));
        assert_eq!(price.provenance, Provenance::Default);
        assert!(price.price_per_token.is_none());
        assert!(price.status.is_some());
    }

    #[tokio::test]
    async fn first_successful_provider_wins() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let second = ScriptedProvider::always_ok("second", dec!(2800));
        let second_calls = second.call_counter();
        let engine = engine_with(
            vec![
                Box::new(ScriptedProvider::always_ok("first", dec!(2913.456))),
                Box::new(second),
            ],
            FixedQuoter::ok(dec!(0.0001)),
            store,
            clock,
        );

        let price = engine.resolve().await;
        // First provider wins and its rate is rounded to 2 dp.
        assert_eq!(price.base_rate, dec!(2913.46));
        // Later providers are never attempted.
        assert_eq!(second_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(price.provenance, Provenance::Live);
    }

    #[tokio::test]
    async fn live_resolution_persists_composed_quote() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(10_000));
        let engine = engine_with(
            vec![Box::new(ScriptedProvider::always_ok("spot", dec!(3000)))],
            FixedQuoter::ok(dec!(0.0001)),
            Arc::clone(&store),
            clock,
        );

        let price = engine.resolve().await;
        assert_eq!(price.price_per_token, Some(dec!(0.30)));

        let cached = engine.cached_quote().expect("quote persisted");
        assert_eq!(cached.resolved_at_ms, 10_000);
        assert_eq!(
            cached.price_per_token,
            cached.base_per_token * cached.base_rate
        );
    }

    #[tokio::test]
    async fn cache_backs_both_stages_when_sources_fail() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(50_000));
        // Warm the cache with one live cycle.
        let engine = engine_with(
            vec![Box::new(ScriptedProvider::always_ok("spot", dec!(3000)))],
            FixedQuoter::ok(dec!(0.0002)),
            Arc::clone(&store),
            Arc::clone(&clock),
        );
        engine.resolve().await;

        // Now everything is down.
        let broken = engine_with(
            vec![Box::new(ScriptedProvider::always_err("spot"))],
            FixedQuoter::no_liquidity(),
            Arc::clone(&store),
            clock,
        );
        let price = broken.resolve().await;

        assert_eq!(price.provenance, Provenance::Cached);
        assert_eq!(price.price_per_token, Some(dec!(0.60)));
        assert!(price.status.is_none());
    }

    #[tokio::test]
    async fn cached_fallback_does_not_refresh_the_timestamp() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_000));
        let engine = engine_with(
            vec![Box::new(ScriptedProvider::always_ok("spot", dec!(3000)))],
            FixedQuoter::ok(dec!(0.0002)),
            Arc::clone(&store),
            Arc::clone(&clock),
        );
        engine.resolve().await;

        clock.advance_ms(100_000);
        let broken = engine_with(
            vec![Box::new(ScriptedProvider::always_err("spot"))],
            FixedQuoter::no_liquidity(),
            Arc::clone(&store),
            clock,
        );
        broken.resolve().await;

        assert_eq!(broken.cached_quote().unwrap().resolved_at_ms, 1_000);
    }

    #[tokio::test]
    async fn hydrate_honors_staleness_window() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let engine = engine_with(
            vec![Box::new(ScriptedProvider::always_ok("spot", dec!(3000)))],
            FixedQuoter::ok(dec!(0.0001)),
            Arc::clone(&store),
            Arc::clone(&clock),
        );
        engine.resolve().await;

        assert!(engine.hydrate().is_some());

        // Just shy of six hours is still fresh.
        clock.advance_ms(6 * 60 * 60 * 1000 - 1);
        assert!(engine.hydrate().is_some());

        clock.advance_ms(2);
        assert!(engine.hydrate().is_none());
    }

    #[tokio::test]
    async fn eur_value_formats_and_degrades() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let engine = engine_with(
            vec![Box::new(ScriptedProvider::always_err("spot"))],
            FixedQuoter::no_liquidity(),
            Arc::clone(&store),
            Arc::clone(&clock),
        );

        // No price anywhere.
        assert_eq!(engine.eur_value(dec!(0), None), "0.00");
        assert_eq!(engine.eur_value(dec!(12.34), None), "0.00");

        // Direct price wins.
        assert_eq!(engine.eur_value(dec!(10), Some(dec!(0.305))), "3.05");

        // Cached components back the computation within 24 h.
        let warm = engine_with(
            vec![Box::new(ScriptedProvider::always_ok("spot", dec!(3000)))],
            FixedQuoter::ok(dec!(0.0001)),
            Arc::clone(&store),
            Arc::clone(&clock),
        );
        warm.resolve().await;
        assert_eq!(engine.eur_value(dec!(10), None), "3.00");

        // But not once the cache ages out.
        clock.advance_ms(24 * 60 * 60 * 1000 + 1);
        assert_eq!(engine.eur_value(dec!(10), None), "0.00");
    }

    #[tokio::test]
    async fn non_positive_provider_rate_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let engine = engine_with(
            vec![
                Box::new(ScriptedProvider::always_nonpositive("zero")),
                Box::new(ScriptedProvider::always_ok("good", dec!(2500))),
            ],
            FixedQuoter::ok(dec!(0.0001)),
            store,
            clock,
        );

        let price = engine.resolve().await;
        assert_eq!(price.base_rate, dec!(2500));
        assert!(price.base_rate > Decimal::ZERO);
    }
}
