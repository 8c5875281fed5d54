use std::sync::Arc;

use crate::dtos::LoginForm;
use crate::services::AuthGateway;
use crate::store::TenantStore;
use crate::validation::{validate_form, FieldErrors};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Local validation failed; the gateway was not called.
    Invalid(FieldErrors),
    /// The gateway call failed; banner text.
    Failed(String),
    /// Sign-in acknowledged. Nothing is issued beyond this notification.
    Notified(String),
}

/// Login form handling. Holds no state besides its collaborators.
pub struct LoginFlow {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<TenantStore>,
}

impl LoginFlow {
    pub fn new(gateway: Arc<dyn AuthGateway>, store: Arc<TenantStore>) -> Self {
        Self { gateway, store }
    }

    pub async fn submit(&self, form: &LoginForm) -> LoginOutcome {
        if let Err(errors) = validate_form(form) {
            return LoginOutcome::Invalid(errors);
        }

        match self.gateway.sign_in(form).await {
            Ok(ack) => {
                let tenant = self.store.get();
                tracing::info!(tenant_id = %tenant.id, "Login attempt acknowledged");
                LoginOutcome::Notified(format!(
                    "Login attempt for {} on tenant: {}",
                    ack.email, tenant.name
                ))
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "Login attempt failed");
                LoginOutcome::Failed(e.to_string())
            }
        }
    }
}
