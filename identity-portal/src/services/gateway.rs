use async_trait::async_trait;

use super::GatewayError;
use crate::dtos::{LoginForm, RegisterPayload};
use crate::models::{InviteValidationResult, RegisterOutcome, SignInOutcome};

/// Network boundary of the portal.
///
/// The flows only see this trait, so the simulated gateway, the HTTP client
/// and test doubles are interchangeable.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn validate_invite(&self, code: &str) -> Result<InviteValidationResult, GatewayError>;

    async fn register(&self, payload: &RegisterPayload) -> Result<RegisterOutcome, GatewayError>;

    async fn sign_in(&self, form: &LoginForm) -> Result<SignInOutcome, GatewayError>;
}
