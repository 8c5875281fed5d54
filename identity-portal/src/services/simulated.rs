//! Gateway backed by fixture invites and artificial latency.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::{AuthGateway, GatewayError};
use crate::dtos::{LoginForm, RegisterPayload};
use crate::models::{
    InviteValidationResult, RegisterOutcome, SignInOutcome, DHUUD_TENANT_ID,
    GOLF_SAUDI_TENANT_ID,
};

/// Existing Dhuud user: goes straight to login.
pub const EXISTING_USER_CODE: &str = "INVITE-DHUUD-LOGIN";
/// New Golf Saudi user: registration under Golf Saudi branding.
pub const GOLF_SIGNUP_CODE: &str = "INVITE-GOLF-SIGNUP";
/// New Dhuud staff member: registration under Dhuud branding.
pub const DHUUD_STAFF_CODE: &str = "INVITE-DHUUD-STAFF";
/// Always reports an expired link.
pub const EXPIRED_CODE: &str = "expired";

/// Simulated round-trip times. Calls cannot be cancelled once started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub validate_invite: Duration,
    pub register: Duration,
    pub sign_in: Duration,
}

impl SimulatedLatency {
    pub fn none() -> Self {
        Self {
            validate_invite: Duration::ZERO,
            register: Duration::ZERO,
            sign_in: Duration::ZERO,
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self {
            validate_invite: Duration::from_millis(800),
            register: Duration::from_millis(1500),
            sign_in: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone)]
enum InviteFixture {
    Valid(InviteValidationResult),
    Expired,
}

fn invite(
    email: &str,
    tenant_name: &str,
    tenant_id: &str,
    role: &str,
    existing_user: bool,
) -> InviteFixture {
    InviteFixture::Valid(InviteValidationResult {
        valid: true,
        email: email.to_string(),
        tenant_name: tenant_name.to_string(),
        tenant_id: tenant_id.to_string(),
        role: role.to_string(),
        existing_user,
    })
}

fn fixture_invites() -> HashMap<String, InviteFixture> {
    HashMap::from([
        (
            EXISTING_USER_CODE.to_string(),
            invite(
                "admin@dhuud.com",
                "Dhuud Platform",
                DHUUD_TENANT_ID,
                "Super Admin",
                true,
            ),
        ),
        (
            GOLF_SIGNUP_CODE.to_string(),
            invite(
                "consultant@golfsaudi.com",
                "GOLF SAUDI Co.",
                GOLF_SAUDI_TENANT_ID,
                "Safety Officer",
                false,
            ),
        ),
        (
            DHUUD_STAFF_CODE.to_string(),
            invite(
                "new.staff@dhuud.com",
                "Dhuud Platform",
                DHUUD_TENANT_ID,
                "System Administrator",
                false,
            ),
        ),
        (EXPIRED_CODE.to_string(), InviteFixture::Expired),
    ])
}

#[derive(Debug, Clone)]
pub struct SimulatedAuthGateway {
    latency: SimulatedLatency,
    invites: HashMap<String, InviteFixture>,
}

impl SimulatedAuthGateway {
    pub fn new(latency: SimulatedLatency) -> Self {
        tracing::info!(
            validate_ms = latency.validate_invite.as_millis() as u64,
            register_ms = latency.register.as_millis() as u64,
            "Simulated auth gateway initialized"
        );
        Self {
            latency,
            invites: fixture_invites(),
        }
    }

    /// Fixtures without latency, for tests.
    pub fn instant() -> Self {
        Self::new(SimulatedLatency::none())
    }

    async fn delay(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

impl Default for SimulatedAuthGateway {
    fn default() -> Self {
        Self::new(SimulatedLatency::default())
    }
}

#[async_trait]
impl AuthGateway for SimulatedAuthGateway {
    async fn validate_invite(&self, code: &str) -> Result<InviteValidationResult, GatewayError> {
        Self::delay(self.latency.validate_invite).await;

        match self.invites.get(code) {
            Some(InviteFixture::Valid(result)) => Ok(result.clone()),
            Some(InviteFixture::Expired) => Err(GatewayError::ExpiredInvite),
            None => Err(GatewayError::InvalidInvite),
        }
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<RegisterOutcome, GatewayError> {
        Self::delay(self.latency.register).await;

        if payload.code.trim().is_empty() {
            return Err(GatewayError::MissingCode);
        }

        Ok(RegisterOutcome { success: true })
    }

    async fn sign_in(&self, form: &LoginForm) -> Result<SignInOutcome, GatewayError> {
        Self::delay(self.latency.sign_in).await;

        Ok(SignInOutcome {
            email: form.email.clone(),
        })
    }
}
