//! Fanbase webhook port: verification, post metrics, and reward claims.

use async_trait::async_trait;

use crate::domain::engagement::{ClaimRequest, FanProfile, PostMetrics};
use crate::error::Result;

/// Outcome reported by the claim webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimResponse {
    pub accepted: bool,
    pub message: Option<String>,
}

/// The campaign backend as the services see it.
#[async_trait]
pub trait FanbaseGateway: Send + Sync {
    /// Look up a verified fan by campaign id.
    async fn verify_fan(&self, fan_id: &str) -> Result<FanProfile>;

    /// Current like/save counters of the tracked post.
    async fn post_metrics(&self, fan_id: &str) -> Result<PostMetrics>;

    /// Submit a mining reward claim.
    async fn submit_claim(&self, claim: &ClaimRequest) -> Result<ClaimResponse>;
}
