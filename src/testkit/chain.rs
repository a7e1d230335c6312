//! Static fake for the balance and staking read ports.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::port::outbound::balances::BalanceFetcher;
use crate::port::outbound::chain::StakingReader;

/// Fixed balances and staking state, keyed by token address.
#[derive(Default)]
pub struct StaticChain {
    balances: HashMap<String, u128>,
    staked: u128,
    claimable: u128,
    reward_pool: u128,
    failing: bool,
}

impl StaticChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain where every read fails, for degradation tests.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_balance(mut self, token: &str, raw: u128) -> Self {
        self.balances.insert(token.to_string(), raw);
        self
    }

    #[must_use]
    pub fn with_staked(mut self, raw: u128) -> Self {
        self.staked = raw;
        self
    }

    #[must_use]
    pub fn with_claimable(mut self, raw: u128) -> Self {
        self.claimable = raw;
        self
    }

    #[must_use]
    pub fn with_reward_pool(mut self, raw: u128) -> Self {
        self.reward_pool = raw;
        self
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            Err(Error::Chain("scripted failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BalanceFetcher for StaticChain {
    async fn token_balance(&self, token: &str, _owner: &str) -> Result<u128> {
        self.check()?;
        Ok(self.balances.get(token).copied().unwrap_or(0))
    }
}

#[async_trait]
impl StakingReader for StaticChain {
    async fn staked_balance(&self, _wallet: &str) -> Result<u128> {
        self.check()?;
        Ok(self.staked)
    }

    async fn claimable_reward(&self, _wallet: &str) -> Result<u128> {
        self.check()?;
        Ok(self.claimable)
    }

    async fn reward_pool(&self) -> Result<u128> {
        self.check()?;
        Ok(self.reward_pool)
    }
}
