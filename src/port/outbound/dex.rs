//! DEX quoting port.
//!
//! The fan token has no direct fiat quote; its price is derived from how
//! much base asset one token fetches on a swap aggregator.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    /// The aggregator answered but reported no route or a zero output.
    #[error("no liquidity available for the pair")]
    NoLiquidity,

    #[error("http: {0}")]
    Http(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Swap-quote source for the fan token against the chain's base asset.
#[async_trait]
pub trait SwapQuoter: Send + Sync {
    /// Base-asset units received for selling exactly one whole fan token.
    async fn base_per_token(&self) -> Result<Decimal, QuoteError>;
}
