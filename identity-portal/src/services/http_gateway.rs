use async_trait::async_trait;
use portal_core::observability::TracedClientExt;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use super::{AuthGateway, GatewayError};
use crate::dtos::{LoginForm, RegisterPayload};
use crate::models::{InviteValidationResult, RegisterOutcome, SignInOutcome};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct ValidateInviteRequest<'a> {
    code: &'a str,
}

/// JSON client for a real auth backend.
pub struct HttpAuthGateway {
    client: Client,
    base_url: String,
    api_key: Option<Secret<String>>,
}

impl HttpAuthGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<Secret<String>>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::info!(base_url = %base_url, "HTTP auth gateway initialized");

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` to `path`. Error statuses are decoded from the backend's
    /// `{"error": "..."}` body; `not_found` is used for 404s.
    async fn post<B, T>(&self, path: &str, body: &B, not_found: GatewayError) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.traced_post(&url).json(body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to send POST request to {}: {}", url, e);
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                tracing::error!("Invalid response body from {}: {}", url, e);
                GatewayError::Transport(e.to_string())
            });
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .ok();

        tracing::warn!(%status, url = %url, "Auth backend rejected request");

        Err(match (status, message) {
            (StatusCode::NOT_FOUND, _) => not_found,
            (StatusCode::GONE, _) => GatewayError::ExpiredInvite,
            (s, _) if s.is_server_error() => GatewayError::Transport(format!("upstream status {}", s)),
            (_, Some(message)) => GatewayError::Rejected(message),
            (s, None) => GatewayError::Rejected(format!("Request failed with status {}", s)),
        })
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn validate_invite(&self, code: &str) -> Result<InviteValidationResult, GatewayError> {
        self.post(
            "/invitations/validate",
            &ValidateInviteRequest { code },
            GatewayError::InvalidInvite,
        )
        .await
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<RegisterOutcome, GatewayError> {
        if payload.code.trim().is_empty() {
            return Err(GatewayError::MissingCode);
        }

        self.post("/invitations/register", payload, GatewayError::InvalidInvite)
            .await
    }

    async fn sign_in(&self, form: &LoginForm) -> Result<SignInOutcome, GatewayError> {
        #[derive(Deserialize)]
        struct Ack {}

        let _: Ack = self
            .post(
                "/auth/login",
                form,
                GatewayError::Rejected("Invalid email or password".to_string()),
            )
            .await?;

        Ok(SignInOutcome {
            email: form.email.clone(),
        })
    }
}
