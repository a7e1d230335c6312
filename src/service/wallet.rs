//! Wallet snapshot assembly.
//!
//! Pulls token balances, staking state, and the EUR valuation into one
//! struct for display. Every read degrades to zero on failure; a wallet
//! snapshot is never an error, just possibly a sparse one.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use crate::app::refresh::RefreshTracker;
use crate::config::Config;
use crate::domain::token::TokenSpec;
use crate::port::outbound::balances::BalanceFetcher;
use crate::port::outbound::chain::StakingReader;
use crate::service::pricing::PriceEngine;

/// One fully assembled wallet view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSnapshot {
    pub wallet: String,
    /// Fan token balance, formatted by its decimals.
    pub fan_balance: String,
    /// Stake token balance (integer units).
    pub stake_balance: String,
    /// Stake-token units currently locked in the pool.
    pub staked: String,
    /// Claimable fan-token reward.
    pub claimable: String,
    /// Fan tokens held by the pool for future rewards.
    pub reward_pool: String,
    /// EUR value of the fan balance, two decimals.
    pub fan_eur_value: String,
    /// Refresh sequence this snapshot belongs to.
    pub sequence: u64,
}

pub struct WalletService {
    balances: Arc<dyn BalanceFetcher>,
    staking: Arc<dyn StakingReader>,
    fan_token: TokenSpec,
    stake_token: TokenSpec,
    tracker: RefreshTracker,
}

impl WalletService {
    pub fn new(
        balances: Arc<dyn BalanceFetcher>,
        staking: Arc<dyn StakingReader>,
        config: &Config,
    ) -> Self {
        Self {
            balances,
            staking,
            fan_token: TokenSpec::from(&config.tokens.fan),
            stake_token: TokenSpec::from(&config.tokens.stake),
            tracker: RefreshTracker::new(),
        }
    }

    /// Sequence tracker for callers that need to discard superseded
    /// snapshots.
    #[must_use]
    pub fn tracker(&self) -> &RefreshTracker {
        &self.tracker
    }

    /// Assemble a snapshot for `wallet`.
    ///
    /// Balance and staking reads run concurrently; each failure is logged
    /// and degrades its field to zero rather than failing the snapshot.
    /// `live_price` is the most recently resolved fan-token price, if the
    /// caller has one; otherwise the valuation falls back to the cache.
    pub async fn snapshot(
        &self,
        wallet: &str,
        pricing: &PriceEngine,
        live_price: Option<Decimal>,
    ) -> WalletSnapshot {
        let sequence = self.tracker.begin();

        let (fan_raw, stake_raw, staked_raw, claimable_raw, reward_pool_raw) = tokio::join!(
            self.balances.token_balance(&self.fan_token.address, wallet),
            self.balances
                .token_balance(&self.stake_token.address, wallet),
            self.staking.staked_balance(wallet),
            self.staking.claimable_reward(wallet),
            self.staking.reward_pool(),
        );

        let fan_raw = unwrap_or_zero(fan_raw, "fan balance");
        let stake_raw = unwrap_or_zero(stake_raw, "stake balance");
        let staked_raw = unwrap_or_zero(staked_raw, "staked balance");
        let claimable_raw = unwrap_or_zero(claimable_raw, "claimable reward");
        let reward_pool_raw = unwrap_or_zero(reward_pool_raw, "reward pool");

        let fan_units: Decimal = self.fan_token.to_decimal(fan_raw);
        let fan_eur_value = pricing.eur_value(fan_units, live_price);

        WalletSnapshot {
            wallet: wallet.to_string(),
            fan_balance: self.fan_token.format_units(fan_raw),
            stake_balance: self.stake_token.format_units(stake_raw),
            staked: self.stake_token.format_units(staked_raw),
            claimable: self.fan_token.format_units(claimable_raw),
            reward_pool: self.fan_token.format_units(reward_pool_raw),
            fan_eur_value,
            sequence,
        }
    }
}

fn unwrap_or_zero(result: crate::error::Result<u128>, what: &str) -> u128 {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "Failed to read {what}, degrading to zero");
            0
        }
    }
}
