//! Token balance adapter backed by the thirdweb Insight indexer.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::domain::token::parse_raw_balance;
use crate::error::Result;
use crate::port::outbound::balances::BalanceFetcher;

#[derive(Debug, Deserialize)]
struct TokensResponse {
    data: Option<Vec<TokenRow>>,
}

#[derive(Debug, Deserialize)]
struct TokenRow {
    balance: Option<String>,
}

/// Balance fetcher for ERC-20 tokens via the indexer's `/v1/tokens`
/// endpoint.
pub struct InsightBalances {
    http: reqwest::Client,
    base_url: String,
    chain_id: u64,
    client_id: Option<String>,
}

impl InsightBalances {
    #[must_use]
    pub fn new(
        base_url: String,
        chain_id: u64,
        client_id: Option<String>,
        timeout: Duration,
    ) -> Self {
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
            chain_id,
            client_id,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.network.insight_url.clone(),
            config.network.chain_id,
            config.insight_client_id.clone(),
            Duration::from_millis(config.network.http_timeout_ms),
        )
    }
}

#[async_trait]
impl BalanceFetcher for InsightBalances {
    async fn token_balance(&self, token: &str, owner: &str) -> Result<u128> {
        let url = format!("{}/v1/tokens", self.base_url);
        let chain_id = self.chain_id.to_string();

        let mut request = self.http.get(&url).query(&[
            ("chain_id", chain_id.as_str()),
            ("token_address", token),
            ("owner_address", owner),
            ("include_native", "true"),
            ("include_spam", "false"),
            ("limit", "50"),
            ("metadata", "false"),
        ]);
        if let Some(client_id) = &self.client_id {
            request = request.header("x-client-id", client_id);
        }

        let response = request.send().await?.error_for_status()?;
        let body: TokensResponse = response.json().await?;

        let raw = body
            .data
            .and_then(|rows| rows.into_iter().next())
            .and_then(|row| row.balance)
            .unwrap_or_else(|| "0".into());

        let balance = parse_raw_balance(&raw);
        debug!(token, owner, balance, "Indexer balance");
        Ok(balance)
    }
}
