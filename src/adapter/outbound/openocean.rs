//! OpenOcean swap-quote adapter.
//!
//! Asks the aggregator how much native base asset one whole fan token
//! fetches. The `outAmount` comes back in wei and is scaled by the base
//! asset's 18 decimals.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::port::outbound::dex::{QuoteError, SwapQuoter};

/// Native-asset pseudo address used by the aggregator.
const NATIVE_ASSET_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Base-asset decimals (native ETH).
const BASE_ASSET_DECIMALS: u32 = 18;

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    data: Option<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(rename = "outAmount")]
    out_amount: Option<String>,
}

/// Swap quoter backed by the OpenOcean v3 quote endpoint.
pub struct OpenOceanQuoter {
    http: reqwest::Client,
    base_url: String,
    token_address: String,
    gas_price: String,
}

impl OpenOceanQuoter {
    #[must_use]
    pub fn new(base_url: String, token_address: String, gas_price: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Failed to build HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self {
            http,
            base_url,
            token_address,
            gas_price,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.network.dex_quote_url.clone(),
            config.tokens.fan.address.clone(),
            config.pricing.quote_gas_price.clone(),
            Duration::from_millis(config.network.http_timeout_ms),
        )
    }

    fn scale_out_amount(out_amount: &str) -> Result<Decimal, QuoteError> {
        let wei = out_amount
            .parse::<Decimal>()
            .map_err(|e| QuoteError::Malformed(format!("bad outAmount '{out_amount}': {e}")))?;
        Ok(wei / Decimal::from(10u64.pow(BASE_ASSET_DECIMALS)))
    }
}

#[async_trait]
impl SwapQuoter for OpenOceanQuoter {
    async fn base_per_token(&self) -> Result<Decimal, QuoteError> {
        let url = format!("{}/quote", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("inTokenAddress", self.token_address.as_str()),
                ("outTokenAddress", NATIVE_ASSET_ADDRESS),
                ("amount", "1"),
                ("gasPrice", self.gas_price.as_str()),
            ])
            .send()
            .await?;
        let response = response
            .error_for_status()
            .map_err(|e| QuoteError::Http(e.to_string()))?;

        let body: QuoteResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::Malformed(e.to_string()))?;

        let out_amount = body
            .data
            .and_then(|data| data.out_amount)
            .ok_or(QuoteError::NoLiquidity)?;

        if out_amount == "0" {
            return Err(QuoteError::NoLiquidity);
        }

        let rate = Self::scale_out_amount(&out_amount)?;
        if rate <= Decimal::ZERO {
            return Err(QuoteError::NoLiquidity);
        }

        debug!(base_per_token = %rate, "DEX quote resolved");
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn out_amount_scales_by_eighteen_decimals() {
        // 120_000_000_000_000 wei = 0.00012 ETH
        let rate = OpenOceanQuoter::scale_out_amount("120000000000000").unwrap();
        assert_eq!(rate, dec!(0.00012));
    }

    #[test]
    fn garbage_out_amount_is_malformed() {
        assert!(matches!(
            OpenOceanQuoter::scale_out_amount("lots"),
            Err(QuoteError::Malformed(_))
        ));
    }

    #[test]
    fn parses_quote_envelope() {
        let body: QuoteResponse =
            serde_json::from_str(r#"{"data":{"outAmount":"120000000000000"}}"#).unwrap();
        assert_eq!(
            body.data.unwrap().out_amount.as_deref(),
            Some("120000000000000")
        );

        let empty: QuoteResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.data.is_none());
    }
}
