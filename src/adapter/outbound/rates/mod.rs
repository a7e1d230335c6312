//! Base-asset EUR rate providers and the cooldown decorator.
//!
//! Three providers exist, tried in fixed priority order:
//!
//! - [`CoinGecko`] — direct EUR spot price
//! - [`CryptoCompare`] — direct EUR spot price
//! - [`Binance`] — derived from the ETH/USDT and EUR/USDT pairs
//!
//! Each is wrapped in a [`CooldownGate`] so a provider attempted within
//! the cooldown window is skipped without network access.

mod binance;
mod coingecko;
mod cooldown;
mod cryptocompare;

pub use binance::Binance;
pub use coingecko::CoinGecko;
pub use cooldown::CooldownGate;
pub use cryptocompare::CryptoCompare;

use std::sync::Arc;
use std::time::Duration;

use crate::port::outbound::rates::RateProvider;
use crate::port::outbound::store::{Clock, KeyValueStore};

/// Build the default provider chain, each behind a cooldown gate.
///
/// The returned order is the resolution priority order.
pub fn gated_default_providers(
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    cooldown: Duration,
    http_timeout: Duration,
) -> Vec<Box<dyn RateProvider>> {
    vec![
        Box::new(CooldownGate::new(
            CoinGecko::new(http_timeout),
            Arc::clone(&store),
            Arc::clone(&clock),
            cooldown,
        )),
        Box::new(CooldownGate::new(
            CryptoCompare::new(http_timeout),
            Arc::clone(&store),
            Arc::clone(&clock),
            cooldown,
        )),
        Box::new(CooldownGate::new(
            Binance::new(http_timeout),
            store,
            clock,
            cooldown,
        )),
    ]
}

/// Shared reqwest client construction for the spot-price providers.
fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Failed to build HTTP client, using defaults");
            reqwest::Client::new()
        })
}
