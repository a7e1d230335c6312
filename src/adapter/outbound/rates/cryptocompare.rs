//! CryptoCompare spot-price provider.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::build_http_client;
use crate::port::outbound::rates::{RateError, RateProvider};

const CRYPTOCOMPARE_URL: &str = "https://min-api.cryptocompare.com/data/price?fsym=ETH&tsyms=EUR";

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(rename = "EUR")]
    eur: Option<Decimal>,
}

/// EUR spot price for ETH from CryptoCompare.
pub struct CryptoCompare {
    http: reqwest::Client,
    url: String,
}

impl CryptoCompare {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
            url: CRYPTOCOMPARE_URL.into(),
        }
    }

    /// Override the endpoint, for tests against a local server.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl RateProvider for CryptoCompare {
    fn name(&self) -> &'static str {
        "cryptocompare"
    }

    async fn fetch_eur_rate(&self) -> Result<Decimal, RateError> {
        let response = self.http.get(&self.url).send().await?;
        let response = response
            .error_for_status()
            .map_err(|e| RateError::Http(e.to_string()))?;

        let body: PriceResponse = response
            .json()
            .await
            .map_err(|e| RateError::Malformed(e.to_string()))?;

        let rate = body
            .eur
            .ok_or_else(|| RateError::Malformed("missing EUR field".into()))?;

        if rate <= Decimal::ZERO {
            return Err(RateError::NonPositive(rate));
        }

        debug!(rate = %rate, "CryptoCompare EUR rate");
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_price_payload() {
        let body: PriceResponse = serde_json::from_str(r#"{"EUR":2890.1}"#).unwrap();
        assert_eq!(body.eur.unwrap().to_string(), "2890.1");
    }

    #[test]
    fn missing_eur_is_none() {
        let body: PriceResponse = serde_json::from_str(r#"{"USD":3100.0}"#).unwrap();
        assert!(body.eur.is_none());
    }
}
