//! Token balance port backed by an indexer API.

use async_trait::async_trait;

use crate::error::Result;

/// Raw ERC-20 balance lookups.
#[async_trait]
pub trait BalanceFetcher: Send + Sync {
    /// Base-unit balance of `token` held by `owner`.
    async fn token_balance(&self, token: &str, owner: &str) -> Result<u128>;
}
