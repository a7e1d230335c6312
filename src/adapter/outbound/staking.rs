//! Read-only staking pool adapter over JSON-RPC.
//!
//! The deployed pool has gone through several interface revisions, so each
//! read tries a fixed priority order of view signatures and falls through
//! on revert or decode failure:
//!
//! - staked balance: `getUserInfo` → `stakes` mapping → `getUserStakeInfo`
//! - claimable reward: `getUserInfo`
//! - reward pool: `getContractInfo` → fan token `balanceOf(pool)`

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use alloy_provider::ProviderBuilder;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::chain::StakingReader;

sol! {
    #[sol(rpc)]
    contract IStakePool {
        function getUserInfo(address user) external view returns (uint256, uint256, uint256, bool, bool);
        function stakes(address user) external view returns (uint256);
        function getUserStakeInfo(address user) external view returns (uint256, uint256, uint256, uint256, bool, uint256, bool);
        function getContractInfo() external view returns (uint256, uint256, uint8, uint256);
    }

    #[sol(rpc)]
    contract IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }
}

fn to_u128(units: U256) -> u128 {
    units.try_into().unwrap_or(u128::MAX)
}

fn parse_address(field: &'static str, raw: &str) -> Result<Address> {
    Address::from_str(raw).map_err(|e| {
        ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}

/// Staking reader backed by typed view calls against the pool contract.
pub struct StakingContractReader {
    rpc_url: url::Url,
    pool: Address,
    reward_token: Address,
}

impl StakingContractReader {
    /// Build a reader from the configured RPC endpoint and contract
    /// addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC URL or either address fails to parse.
    pub fn from_config(config: &Config) -> Result<Self> {
        let rpc_url: url::Url = config.network.rpc_url.parse()?;
        Ok(Self {
            rpc_url,
            pool: parse_address("tokens.staking_contract", &config.tokens.staking_contract)?,
            reward_token: parse_address("tokens.fan.address", &config.tokens.fan.address)?,
        })
    }
}

#[async_trait]
impl StakingReader for StakingContractReader {
    async fn staked_balance(&self, wallet: &str) -> Result<u128> {
        let user = parse_address("wallet", wallet)?;
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let pool = IStakePool::new(self.pool, &provider);

        match pool.getUserInfo(user).call().await {
            Ok(info) => {
                debug!(wallet, "Staked balance via getUserInfo");
                return Ok(to_u128(info._0));
            }
            Err(err) => {
                debug!(wallet, error = %err, "getUserInfo failed, trying stakes mapping");
            }
        }

        match pool.stakes(user).call().await {
            Ok(staked) => {
                debug!(wallet, "Staked balance via stakes mapping");
                return Ok(to_u128(staked));
            }
            Err(err) => {
                debug!(wallet, error = %err, "stakes mapping failed, trying getUserStakeInfo");
            }
        }

        match pool.getUserStakeInfo(user).call().await {
            Ok(info) => {
                debug!(wallet, "Staked balance via getUserStakeInfo");
                Ok(to_u128(info._0))
            }
            Err(err) => {
                warn!(wallet, error = %err, "All staked-balance signatures failed");
                Err(Error::Chain(format!(
                    "staked balance unavailable: {err}"
                )))
            }
        }
    }

    async fn claimable_reward(&self, wallet: &str) -> Result<u128> {
        let user = parse_address("wallet", wallet)?;
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let pool = IStakePool::new(self.pool, &provider);

        let info = pool
            .getUserInfo(user)
            .call()
            .await
            .map_err(|e| Error::Chain(format!("claimable reward unavailable: {e}")))?;
        Ok(to_u128(info._1))
    }

    async fn reward_pool(&self) -> Result<u128> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let pool = IStakePool::new(self.pool, &provider);

        match pool.getContractInfo().call().await {
            Ok(info) => {
                debug!("Reward pool via getContractInfo");
                return Ok(to_u128(info._1));
            }
            Err(err) => {
                debug!(error = %err, "getContractInfo failed, reading token balance of pool");
            }
        }

        let token = IERC20::new(self.reward_token, &provider);
        match token.balanceOf(self.pool).call().await {
            Ok(balance) => Ok(to_u128(balance)),
            Err(err) => {
                warn!(error = %err, "Reward pool fallback failed");
                Err(Error::Chain(format!("reward pool unavailable: {err}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn reader_builds_from_default_config() {
        let config = Config::default();
        assert!(StakingContractReader::from_config(&config).is_ok());
    }

    #[test]
    fn bad_contract_address_is_rejected() {
        let mut config = Config::default();
        config.tokens.staking_contract = "0xnothex".into();
        assert!(StakingContractReader::from_config(&config).is_err());
    }

    #[test]
    fn u256_conversion_saturates() {
        assert_eq!(to_u128(U256::from(42u64)), 42);
        assert_eq!(to_u128(U256::MAX), u128::MAX);
    }
}
