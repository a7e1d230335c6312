//! Binance derived-rate provider.
//!
//! Binance quotes no ETH/EUR pair directly; the rate is derived from
//! ETH/USDT divided by EUR/USDT.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::build_http_client;
use crate::port::outbound::rates::{RateError, RateProvider};

const BINANCE_TICKER_URL: &str = "https://api.binance.com/api/v3/ticker/price";

#[derive(Debug, Deserialize)]
struct TickerPrice {
    /// Binance renders prices as strings.
    price: String,
}

impl TickerPrice {
    fn rate(&self) -> Result<Decimal, RateError> {
        self.price
            .parse::<Decimal>()
            .map_err(|e| RateError::Malformed(format!("bad ticker price '{}': {e}", self.price)))
    }
}

/// EUR rate for ETH derived from two Binance ticker pairs.
pub struct Binance {
    http: reqwest::Client,
    url: String,
}

impl Binance {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
            url: BINANCE_TICKER_URL.into(),
        }
    }

    /// Override the endpoint, for tests against a local server.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    async fn ticker(&self, symbol: &str) -> Result<TickerPrice, RateError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        let response = response
            .error_for_status()
            .map_err(|e| RateError::Http(e.to_string()))?;
        response
            .json()
            .await
            .map_err(|e| RateError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl RateProvider for Binance {
    fn name(&self) -> &'static str {
        "binance"
    }

    async fn fetch_eur_rate(&self) -> Result<Decimal, RateError> {
        let (eth_usdt, eur_usdt) =
            tokio::try_join!(self.ticker("ETHUSDT"), self.ticker("EURUSDT"))?;

        let eth_usdt = eth_usdt.rate()?;
        let eur_usdt = eur_usdt.rate()?;

        if eth_usdt <= Decimal::ZERO || eur_usdt <= Decimal::ZERO {
            return Err(RateError::NonPositive(eth_usdt.min(eur_usdt)));
        }

        // (USDT per ETH) / (USDT per EUR) = EUR per ETH
        let rate = eth_usdt / eur_usdt;
        debug!(rate = %rate, "Binance derived EUR rate");
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_string_prices() {
        let ticker: TickerPrice = serde_json::from_str(r#"{"price":"3424.51000000"}"#).unwrap();
        assert_eq!(ticker.rate().unwrap(), dec!(3424.51));
    }

    #[test]
    fn rejects_garbage_prices() {
        let ticker = TickerPrice {
            price: "n/a".into(),
        };
        assert!(matches!(ticker.rate(), Err(RateError::Malformed(_))));
    }

    #[test]
    fn pair_division_yields_eur() {
        // 3400 USDT/ETH over 1.08 USDT/EUR
        let rate = dec!(3400) / dec!(1.08);
        assert!(rate > dec!(3148) && rate < dec!(3149));
    }
}
