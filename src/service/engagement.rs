//! Engagement use cases: profile lookup, the like+save boost flow, and
//! reward claims.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::engagement::{BoostOutcome, ClaimRequest, FanProfile, PostMetrics};
use crate::domain::token::WalletAddress;
use crate::error::{ClaimError, EngagementError, Result};
use crate::port::outbound::fanbase::FanbaseGateway;
use crate::port::outbound::store::KeyValueStore;

/// Fixed store keys for the boost baseline counters.
pub const LIKE_BASELINE_KEY: &str = "boost_like_baseline";
pub const SAVE_BASELINE_KEY: &str = "boost_save_baseline";

pub struct EngagementService {
    gateway: Arc<dyn FanbaseGateway>,
    store: Arc<dyn KeyValueStore>,
}

impl EngagementService {
    pub fn new(gateway: Arc<dyn FanbaseGateway>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { gateway, store }
    }

    /// Look up a verified fan.
    pub async fn load_profile(&self, fan_id: &str) -> Result<FanProfile> {
        self.gateway.verify_fan(fan_id).await
    }

    /// The recorded boost baseline, if both counters are present.
    pub fn stored_baseline(&self) -> Result<Option<PostMetrics>> {
        let likes = self.store.get(LIKE_BASELINE_KEY)?;
        let saves = self.store.get(SAVE_BASELINE_KEY)?;
        match (likes, saves) {
            (Some(likes), Some(saves)) => {
                let likes = likes.parse::<i64>();
                let saves = saves.parse::<i64>();
                match (likes, saves) {
                    (Ok(likes), Ok(saves)) => Ok(Some(PostMetrics { likes, saves })),
                    _ => {
                        warn!("Discarding unparseable boost baseline");
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// Step one of the boost flow: record the post's current counters as
    /// the baseline.
    pub async fn record_baseline(&self, fan_id: &str) -> Result<PostMetrics> {
        let metrics = self.gateway.post_metrics(fan_id).await?;
        self.store
            .put(LIKE_BASELINE_KEY, &metrics.likes.to_string())?;
        self.store
            .put(SAVE_BASELINE_KEY, &metrics.saves.to_string())?;
        info!(
            likes = metrics.likes,
            saves = metrics.saves,
            "Boost baseline recorded"
        );
        Ok(metrics)
    }

    /// Step two: fetch the counters again and compare against the
    /// baseline recorded earlier.
    pub async fn verify_boost(&self, fan_id: &str) -> Result<BoostOutcome> {
        let baseline = self
            .stored_baseline()?
            .ok_or(EngagementError::NoBaseline)?;
        let current = self.gateway.post_metrics(fan_id).await?;
        let outcome = BoostOutcome { baseline, current };
        info!(
            confirmed = outcome.confirmed(),
            likes = current.likes,
            saves = current.saves,
            "Boost verification"
        );
        Ok(outcome)
    }

    /// Submit a mining reward claim for a verified fan.
    ///
    /// The wallet is validated before any network access; a malformed
    /// address blocks the claim. A successful claim wipes the local store
    /// so stale baselines cannot leak into the next campaign.
    pub async fn submit_claim(
        &self,
        fan_id: &str,
        wallet_raw: &str,
        profile: &FanProfile,
    ) -> Result<String> {
        let wallet = WalletAddress::parse(wallet_raw).map_err(|e| ClaimError::InvalidWallet {
            reason: e.to_string(),
        })?;

        let request = ClaimRequest {
            fan_id: fan_id.to_string(),
            wallet,
            username: profile.username.trim_start_matches('@').trim().to_string(),
            mining_power: profile.mining_power,
        };

        let response = self.gateway.submit_claim(&request).await?;
        if response.accepted {
            if let Err(err) = self.store.clear() {
                warn!(error = %err, "Failed to clear store after claim");
            }
            let message = response
                .message
                .unwrap_or_else(|| "claim accepted".to_string());
            info!(fan_id, "Claim accepted");
            Ok(message)
        } else {
            Err(ClaimError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            }
            .into())
        }
    }
}
