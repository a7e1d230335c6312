//! Scripted fake for the fanbase webhook port.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::engagement::{ClaimRequest, FanProfile, PostMetrics};
use crate::error::{Error, Result};
use crate::port::outbound::fanbase::{ClaimResponse, FanbaseGateway};

/// A gateway that replays scripted responses and records claims.
pub struct ScriptedGateway {
    profile: Mutex<FanProfile>,
    metrics: Mutex<VecDeque<PostMetrics>>,
    claim_response: Mutex<ClaimResponse>,
    claims: Arc<AtomicUsize>,
    submitted: Arc<Mutex<Vec<ClaimRequest>>>,
}

impl ScriptedGateway {
    #[must_use]
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(FanProfile {
                username: "User".into(),
                image_url: None,
                total_exp: 0,
                breakdown: Default::default(),
                mining_power: Decimal::ZERO,
                checks: Default::default(),
                wallet: None,
            }),
            metrics: Mutex::new(VecDeque::new()),
            claim_response: Mutex::new(ClaimResponse {
                accepted: false,
                message: None,
            }),
            claims: Arc::new(AtomicUsize::new(0)),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn with_profile(self, profile: FanProfile) -> Self {
        *self.profile.lock() = profile;
        self
    }

    /// Queue metrics responses, replayed in order.
    #[must_use]
    pub fn with_metrics(self, metrics: Vec<PostMetrics>) -> Self {
        *self.metrics.lock() = metrics.into();
        self
    }

    #[must_use]
    pub fn with_claim_response(self, response: ClaimResponse) -> Self {
        *self.claim_response.lock() = response;
        self
    }

    /// Shared handle counting claim submissions.
    #[must_use]
    pub fn claim_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.claims)
    }

    /// Shared handle to the recorded claim payloads.
    #[must_use]
    pub fn submitted_claims(&self) -> Arc<Mutex<Vec<ClaimRequest>>> {
        Arc::clone(&self.submitted)
    }
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FanbaseGateway for ScriptedGateway {
    async fn verify_fan(&self, _fan_id: &str) -> Result<FanProfile> {
        Ok(self.profile.lock().clone())
    }

    async fn post_metrics(&self, _fan_id: &str) -> Result<PostMetrics> {
        self.metrics
            .lock()
            .pop_front()
            .ok_or_else(|| Error::Parse("no scripted metrics left".into()))
    }

    async fn submit_claim(&self, claim: &ClaimRequest) -> Result<ClaimResponse> {
        self.claims.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().push(claim.clone());
        Ok(self.claim_response.lock().clone())
    }
}
