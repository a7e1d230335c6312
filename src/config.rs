//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for sensitive values like `INSIGHT_CLIENT_ID`.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub tokens: TokensConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Indexer API client id, loaded from `INSIGHT_CLIENT_ID` env var at
    /// runtime (never from the config file).
    #[serde(skip)]
    pub insight_client_id: Option<String>,
}

/// Endpoints for every external collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint for read-only staking calls.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Chain id the token contracts live on.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Token indexer API base URL.
    #[serde(default = "default_insight_url")]
    pub insight_url: String,
    /// DEX aggregator quote API base URL (chain-scoped).
    #[serde(default = "default_dex_quote_url")]
    pub dex_quote_url: String,
    /// Fan verification webhook.
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
    /// Post like/save metrics webhook.
    #[serde(default = "default_metrics_url")]
    pub metrics_url: String,
    /// Reward claim webhook.
    #[serde(default = "default_claim_url")]
    pub claim_url: String,
    /// Per-request HTTP timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

fn default_rpc_url() -> String {
    "https://mainnet.base.org".into()
}

/// Default chain id is Base mainnet (8453).
const fn default_chain_id() -> u64 {
    8453
}

fn default_insight_url() -> String {
    "https://insight.thirdweb.com".into()
}

fn default_dex_quote_url() -> String {
    "https://open-api.openocean.finance/v3/base".into()
}

fn default_verify_url() -> String {
    "https://uuid-check-insta.vercel.app/api/webhook".into()
}

fn default_metrics_url() -> String {
    "https://hook.eu2.make.com/bli0jo4nik0m9r4x9aj76ptktghdzckd".into()
}

fn default_claim_url() -> String {
    "https://hook.eu2.make.com/1c62icx2yngv8v4g6y7k7songq01rblk".into()
}

const fn default_http_timeout_ms() -> u64 {
    5_000
}

/// A single ERC-20 token as the indexer and formatter see it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    pub address: String,
    pub decimals: u32,
    pub symbol: String,
}

/// Token contracts tracked by the wallet snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct TokensConfig {
    /// Tradeable fan reward token.
    #[serde(default = "default_fan_token")]
    pub fan: TokenEntry,
    /// Integer stake token.
    #[serde(default = "default_stake_token")]
    pub stake: TokenEntry,
    /// Staking pool contract address.
    #[serde(default = "default_staking_contract")]
    pub staking_contract: String,
}

fn default_fan_token() -> TokenEntry {
    TokenEntry {
        address: "0x69eFD833288605f320d77eB2aB99DDE62919BbC1".into(),
        decimals: 2,
        symbol: "FAN".into(),
    }
}

fn default_stake_token() -> TokenEntry {
    TokenEntry {
        address: "0x6F1fFd03106B27781E86b33Df5dBB734ac9DF4bb".into(),
        decimals: 0,
        symbol: "CREW".into(),
    }
}

fn default_staking_contract() -> String {
    "0xe85b32a44b9eD3ecf8bd331FED46fbdAcDBc9940".into()
}

/// Price resolution policy knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Minimum interval between attempts to the same rate provider.
    #[serde(default = "default_provider_cooldown_secs")]
    pub provider_cooldown_secs: u64,
    /// Maximum cache age trusted at startup hydration.
    #[serde(default = "default_hydrate_max_age_hours")]
    pub hydrate_max_age_hours: u64,
    /// Maximum cache age trusted when recomputing a EUR value from
    /// individually cached components.
    #[serde(default = "default_compose_max_age_hours")]
    pub compose_max_age_hours: u64,
    /// Hard fallback EUR rate for the base asset when every provider fails
    /// and no cache exists.
    #[serde(default = "default_base_rate_eur")]
    pub default_base_rate_eur: Decimal,
    /// Gas price hint forwarded to the DEX quote endpoint.
    #[serde(default = "default_quote_gas_price")]
    pub quote_gas_price: String,
}

const fn default_provider_cooldown_secs() -> u64 {
    30
}

const fn default_hydrate_max_age_hours() -> u64 {
    6
}

const fn default_compose_max_age_hours() -> u64 {
    24
}

fn default_base_rate_eur() -> Decimal {
    Decimal::from(3000)
}

fn default_quote_gas_price() -> String {
    "0.001".into()
}

/// Cadences for the watch loop.
///
/// Balances are cheap and refresh fast; fiat rates are externally
/// rate-limited and refresh slow.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_balance_interval_secs")]
    pub balance_interval_secs: u64,
    #[serde(default = "default_price_interval_secs")]
    pub price_interval_secs: u64,
}

const fn default_balance_interval_secs() -> u64 {
    30
}

const fn default_price_interval_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path. Defaults to `greenroom.db` under the platform
    /// data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the effective database path.
    #[must_use]
    pub fn resolve_database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("greenroom")
            .join("greenroom.db")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            insight_url: default_insight_url(),
            dex_quote_url: default_dex_quote_url(),
            verify_url: default_verify_url(),
            metrics_url: default_metrics_url(),
            claim_url: default_claim_url(),
            http_timeout_ms: default_http_timeout_ms(),
        }
    }
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            fan: default_fan_token(),
            stake: default_stake_token(),
            staking_contract: default_staking_contract(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            provider_cooldown_secs: default_provider_cooldown_secs(),
            hydrate_max_age_hours: default_hydrate_max_age_hours(),
            compose_max_age_hours: default_compose_max_age_hours(),
            default_base_rate_eur: default_base_rate_eur(),
            quote_gas_price: default_quote_gas_price(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            balance_interval_secs: default_balance_interval_secs(),
            price_interval_secs: default_price_interval_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            tokens: TokensConfig::default(),
            pricing: PricingConfig::default(),
            refresh: RefreshConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            insight_client_id: std::env::var("INSIGHT_CLIENT_ID").ok(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        // Load the indexer client id from the environment (never from the
        // config file for security)
        config.insight_client_id = std::env::var("INSIGHT_CLIENT_ID").ok();

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.network.rpc_url.is_empty() {
            return Err(ConfigError::MissingField { field: "rpc_url" }.into());
        }
        if self.network.verify_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "verify_url",
            }
            .into());
        }
        for (field, address) in [
            ("tokens.fan.address", &self.tokens.fan.address),
            ("tokens.stake.address", &self.tokens.stake.address),
            ("tokens.staking_contract", &self.tokens.staking_contract),
        ] {
            if !address.starts_with("0x") || address.len() != 42 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("'{address}' is not a 0x-prefixed 20-byte address"),
                }
                .into());
            }
        }
        if self.pricing.default_base_rate_eur <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "default_base_rate_eur",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.refresh.balance_interval_secs == 0 || self.refresh.price_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh",
                reason: "intervals must be non-zero".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_cadences_match_policy() {
        let config = Config::default();
        assert_eq!(config.refresh.balance_interval_secs, 30);
        assert_eq!(config.refresh.price_interval_secs, 300);
        assert_eq!(config.pricing.provider_cooldown_secs, 30);
    }

    #[test]
    fn database_path_override_wins() {
        let storage = StorageConfig {
            database_path: Some(PathBuf::from("/tmp/custom.db")),
        };
        assert_eq!(
            storage.resolve_database_path(),
            PathBuf::from("/tmp/custom.db")
        );
    }
}
