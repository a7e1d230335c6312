//! CoinGecko spot-price provider.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::build_http_client;
use crate::port::outbound::rates::{RateError, RateProvider};

const COINGECKO_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=ethereum&vs_currencies=eur";

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    ethereum: Option<EurQuote>,
}

#[derive(Debug, Deserialize)]
struct EurQuote {
    eur: Option<Decimal>,
}

/// EUR spot price for ETH from CoinGecko's simple-price endpoint.
pub struct CoinGecko {
    http: reqwest::Client,
    url: String,
}

impl CoinGecko {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
            url: COINGECKO_URL.into(),
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
impl RateProvider for CoinGecko {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    async fn fetch_eur_rate(&self) -> Result<Decimal, RateError> {
        let response = self.http.get(&self.url).send().await?;
        let response = response
            .error_for_status()
            .map_err(|e| RateError::Http(e.to_string()))?;

        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| RateError::Malformed(e.to_string()))?;

        let rate = body
            .ethereum
            .and_then(|quote| quote.eur)
            .ok_or_else(|| RateError::Malformed("missing ethereum.eur field".into()))?;

        if rate <= Decimal::ZERO {
            return Err(RateError::NonPositive(rate));
        }

        debug!(rate = %rate, "CoinGecko EUR rate");
        Ok(rate)
    }
}
