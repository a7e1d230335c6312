//! Application wiring.
//!
//! [`App::build`] assembles the SQLite store, clock, provider chain, and
//! services from a [`Config`]. The inbound CLI drives the built app; the
//! app itself owns no command loop.

pub mod refresh;

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::outbound::fanbase::WebhookFanbase;
use crate::adapter::outbound::insight::InsightBalances;
use crate::adapter::outbound::openocean::OpenOceanQuoter;
use crate::adapter::outbound::rates::gated_default_providers;
use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteKeyValueStore};
use crate::config::Config;
use crate::error::Result;
use crate::port::outbound::chain::StakingReader;
use crate::port::outbound::store::{Clock, KeyValueStore, SystemClock};
use crate::service::engagement::EngagementService;
use crate::service::pricing::{PriceEngine, PricingSettings};
use crate::service::wallet::WalletService;

/// The assembled application.
pub struct App {
    pub config: Config,
    pub pricing: PriceEngine,
    pub wallet: WalletService,
    pub engagement: EngagementService,
}

impl App {
    /// Wire every adapter and service from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated, or
    /// if a configured address fails to parse.
    pub fn build(config: Config) -> Result<Self> {
        let database_path = config.storage.resolve_database_path();
        if let Some(parent) = database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pool = create_pool(&database_path.to_string_lossy())?;
        run_migrations(&pool)?;

        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::new(pool));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let http_timeout = Duration::from_millis(config.network.http_timeout_ms);
        let providers = gated_default_providers(
            Arc::clone(&store),
            Arc::clone(&clock),
            Duration::from_secs(config.pricing.provider_cooldown_secs),
            http_timeout,
        );
        let pricing = PriceEngine::new(
            providers,
            Box::new(OpenOceanQuoter::from_config(&config)),
            Arc::clone(&store),
            Arc::clone(&clock),
            PricingSettings::from(&config.pricing),
        );

        let staking = build_staking_reader(&config)?;
        let wallet = WalletService::new(
            Arc::new(InsightBalances::from_config(&config)),
            staking,
            &config,
        );

        let engagement =
            EngagementService::new(Arc::new(WebhookFanbase::from_config(&config)), store);

        Ok(Self {
            config,
            pricing,
            wallet,
            engagement,
        })
    }
}

#[cfg(feature = "onchain")]
fn build_staking_reader(config: &Config) -> Result<Arc<dyn StakingReader>> {
    use crate::adapter::outbound::staking::StakingContractReader;
    Ok(Arc::new(StakingContractReader::from_config(config)?))
}

#[cfg(not(feature = "onchain"))]
fn build_staking_reader(_config: &Config) -> Result<Arc<dyn StakingReader>> {
    Ok(Arc::new(DisabledStaking))
}

/// Stand-in reader when the `onchain` feature is off; every read degrades
/// to zero at the service layer.
#[cfg(not(feature = "onchain"))]
struct DisabledStaking;

#[cfg(not(feature = "onchain"))]
#[async_trait::async_trait]
impl StakingReader for DisabledStaking {
    async fn staked_balance(&self, _wallet: &str) -> Result<u128> {
        Err(crate::error::Error::Chain(
            "built without the onchain feature".into(),
        ))
    }

    async fn claimable_reward(&self, _wallet: &str) -> Result<u128> {
        Err(crate::error::Error::Chain(
            "built without the onchain feature".into(),
        ))
    }

    async fn reward_pool(&self) -> Result<u128> {
        Err(crate::error::Error::Chain(
            "built without the onchain feature".into(),
        ))
    }
}
