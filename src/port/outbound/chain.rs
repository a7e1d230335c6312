//! On-chain read port for the staking pool.
//!
//! All reads are view calls; amounts come back in raw base units and are
//! formatted by the owning token's decimals at the service layer.

use async_trait::async_trait;

use crate::error::Result;

/// Read-only staking pool state for a wallet.
#[async_trait]
pub trait StakingReader: Send + Sync {
    /// Stake-token base units the wallet currently has locked.
    async fn staked_balance(&self, wallet: &str) -> Result<u128>;

    /// Fan-token base units the wallet could claim right now.
    async fn claimable_reward(&self, wallet: &str) -> Result<u128>;

    /// Fan-token base units held by the pool for future rewards.
    async fn reward_pool(&self) -> Result<u128>;
}
