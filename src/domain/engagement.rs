//! Fan engagement domain types: verified profiles, EXP sources, post
//! metrics, and the boost/claim flows built on them.

use rust_decimal::Decimal;

use crate::domain::token::WalletAddress;

/// Per-platform EXP sources behind a fan's total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpBreakdown {
    pub instagram: i64,
    pub tiktok: i64,
    pub facebook: i64,
    pub stream: i64,
    pub live_bonus: i64,
}

/// Engagement flags reported by the verification webhook for the tracked
/// post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngagementChecks {
    pub liked: bool,
    pub commented: bool,
    pub storied: bool,
    pub saved: bool,
}

impl EngagementChecks {
    /// How many of the four checks are satisfied.
    #[must_use]
    pub fn completed(&self) -> u8 {
        [self.liked, self.commented, self.storied, self.saved]
            .into_iter()
            .filter(|flag| *flag)
            .count() as u8
    }
}

/// A verified fan as returned by the verification webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct FanProfile {
    pub username: String,
    pub image_url: Option<String>,
    pub total_exp: i64,
    pub breakdown: ExpBreakdown,
    pub mining_power: Decimal,
    pub checks: EngagementChecks,
    pub wallet: Option<WalletAddress>,
}

/// Like/save counters for the tracked post at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostMetrics {
    pub likes: i64,
    pub saves: i64,
}

/// Before/after metrics pair from the like+save boost flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostOutcome {
    pub baseline: PostMetrics,
    pub current: PostMetrics,
}

impl BoostOutcome {
    /// The boost counts only when both counters strictly increased.
    #[must_use]
    pub fn confirmed(&self) -> bool {
        self.current.likes > self.baseline.likes && self.current.saves > self.baseline.saves
    }
}

/// Payload submitted to the claim webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRequest {
    pub fan_id: String,
    pub wallet: WalletAddress,
    pub username: String,
    pub mining_power: Decimal,
}
