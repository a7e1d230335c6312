//! Webhook adapter for the campaign backend.
//!
//! Three endpoints: fan verification, post like/save metrics, and reward
//! claim submission. The webhooks are loosely typed (numbers arrive as
//! strings, flags as `"true"`/`"false"`), so every field goes through the
//! coercion helpers below.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::domain::engagement::{
    ClaimRequest, EngagementChecks, ExpBreakdown, FanProfile, PostMetrics,
};
use crate::domain::token::WalletAddress;
use crate::error::Result;
use crate::port::outbound::fanbase::{ClaimResponse, FanbaseGateway};

/// Coerce a JSON value that may be a number or a numeric string.
fn as_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .or_else(|_| s.trim().parse::<f64>().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn as_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(|f| Decimal::try_from(f).ok())
            .unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => s.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Flags arrive as the string `"true"` from this backend, but accept real
/// booleans too.
fn as_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

fn as_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn profile_from_payload(payload: &Value) -> FanProfile {
    let field = |name: &str| payload.get(name);

    FanProfile {
        username: as_string(field("username")).unwrap_or_else(|| "User".into()),
        image_url: as_string(field("image")),
        total_exp: as_i64(field("expTotal")),
        breakdown: ExpBreakdown {
            instagram: as_i64(field("expInstagram")),
            tiktok: as_i64(field("expTiktok")),
            facebook: as_i64(field("expFacebook")),
            stream: as_i64(field("expStream")),
            live_bonus: as_i64(field("liveNFTBonus")),
        },
        mining_power: as_decimal(field("miningpower")),
        checks: EngagementChecks {
            liked: as_flag(field("liked")),
            commented: as_flag(field("commented")),
            storied: as_flag(field("story")),
            saved: as_flag(field("saved")),
        },
        wallet: as_string(field("wallet")).and_then(|raw| WalletAddress::parse(&raw).ok()),
    }
}

#[derive(Debug, Deserialize)]
struct ClaimReply {
    status: Option<String>,
    success: Option<bool>,
    claimed: Option<bool>,
    message: Option<String>,
}

impl ClaimReply {
    fn accepted(&self) -> bool {
        self.status.as_deref() == Some("success")
            || self.success == Some(true)
            || self.claimed == Some(true)
    }
}

/// HTTP gateway for the campaign webhooks.
pub struct WebhookFanbase {
    http: reqwest::Client,
    verify_url: String,
    metrics_url: String,
    claim_url: String,
}

impl WebhookFanbase {
    #[must_use]
    pub fn new(
        verify_url: String,
        metrics_url: String,
        claim_url: String,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Failed to build HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self {
            http,
            verify_url,
            metrics_url,
            claim_url,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.network.verify_url.clone(),
            config.network.metrics_url.clone(),
            config.network.claim_url.clone(),
            Duration::from_millis(config.network.http_timeout_ms),
        )
    }
}

#[async_trait]
impl FanbaseGateway for WebhookFanbase {
    async fn verify_fan(&self, fan_id: &str) -> Result<FanProfile> {
        let response = self
            .http
            .post(&self.verify_url)
            .json(&json!({ "uuid": fan_id }))
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        let profile = profile_from_payload(&payload);
        debug!(fan_id, total_exp = profile.total_exp, "Verified fan");
        Ok(profile)
    }

    async fn post_metrics(&self, fan_id: &str) -> Result<PostMetrics> {
        let response = self
            .http
            .get(&self.metrics_url)
            .query(&[("uuid", fan_id)])
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        let metrics = PostMetrics {
            likes: as_i64(payload.get("likes")),
            saves: as_i64(payload.get("saves")),
        };
        debug!(fan_id, likes = metrics.likes, saves = metrics.saves, "Post metrics");
        Ok(metrics)
    }

    async fn submit_claim(&self, claim: &ClaimRequest) -> Result<ClaimResponse> {
        let response = self
            .http
            .post(&self.claim_url)
            .json(&json!({
                "uuid": claim.fan_id,
                "wallet": claim.wallet.as_str(),
                "username": claim.username,
                "miningpower": claim.mining_power,
            }))
            .send()
            .await?
            .error_for_status()?;

        let reply: ClaimReply = response.json().await?;
        Ok(ClaimResponse {
            accepted: reply.accepted(),
            message: reply.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn profile_coerces_string_numbers_and_flags() {
        let payload = json!({
            "username": "front_row_42",
            "image": "https://cdn.example/42.png",
            "expTotal": "2210",
            "expInstagram": 900,
            "expTiktok": "310",
            "miningpower": "1.5",
            "liked": "true",
            "commented": false,
            "story": "false",
            "saved": "true",
            "wallet": "0xe85b32a44b9eD3ecf8bd331FED46fbdAcDBc9940"
        });

        let profile = profile_from_payload(&payload);
        assert_eq!(profile.username, "front_row_42");
        assert_eq!(profile.total_exp, 2210);
        assert_eq!(profile.breakdown.instagram, 900);
        assert_eq!(profile.breakdown.tiktok, 310);
        assert_eq!(profile.breakdown.facebook, 0);
        assert_eq!(profile.mining_power, dec!(1.5));
        assert!(profile.checks.liked);
        assert!(!profile.checks.commented);
        assert!(!profile.checks.storied);
        assert!(profile.checks.saved);
        assert!(profile.wallet.is_some());
    }

    #[test]
    fn profile_defaults_on_empty_payload() {
        let profile = profile_from_payload(&json!({}));
        assert_eq!(profile.username, "User");
        assert_eq!(profile.total_exp, 0);
        assert_eq!(profile.checks.completed(), 0);
        assert!(profile.wallet.is_none());
    }

    #[test]
    fn invalid_wallet_in_payload_is_dropped() {
        let profile = profile_from_payload(&json!({ "wallet": "not-a-wallet" }));
        assert!(profile.wallet.is_none());
    }

    #[test]
    fn claim_reply_acceptance_variants() {
        let by_status: ClaimReply =
            serde_json::from_str(r#"{"status":"success","message":"done"}"#).unwrap();
        assert!(by_status.accepted());

        let by_flag: ClaimReply = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(by_flag.accepted());

        let by_claimed: ClaimReply = serde_json::from_str(r#"{"claimed":true}"#).unwrap();
        assert!(by_claimed.accepted());

        let rejected: ClaimReply =
            serde_json::from_str(r#"{"status":"error","message":"no balance"}"#).unwrap();
        assert!(!rejected.accepted());
    }
}
