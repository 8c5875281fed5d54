use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, Method},
};
use portal_core::error::AppError;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tower_sessions::Session;
use uuid::Uuid;

use super::PortalContext;
use crate::AppState;

/// Session key holding the visitor's portal context id.
pub const PORTAL_ID_KEY: &str = "portal_id";

/// Whether the request can change portal state. Plain cookie-less reads get a
/// detached context so nothing is stored for them.
fn changes_state(parts: &Parts) -> bool {
    parts.method != Method::GET || parts.uri.query().is_some_and(|query| !query.is_empty())
}

/// The current visitor's [`PortalContext`]. It is registered on the first
/// request that can change state.
pub struct PortalSession {
    pub id: Uuid,
    context: Arc<Mutex<PortalContext>>,
}

impl PortalSession {
    pub async fn lock(&self) -> MutexGuard<'_, PortalContext> {
        self.context.lock().await
    }
}

#[async_trait]
impl FromRequestParts<AppState> for PortalSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::SessionError(msg.to_string()))?;

        let existing = session
            .get::<Uuid>(PORTAL_ID_KEY)
            .await
            .map_err(|e| AppError::SessionError(e.to_string()))?;

        let id = match existing {
            Some(id) => id,
            None if !changes_state(parts) => {
                return Ok(Self {
                    id: Uuid::new_v4(),
                    context: state.sessions.detached(),
                });
            }
            None => {
                let id = Uuid::new_v4();
                session
                    .insert(PORTAL_ID_KEY, id)
                    .await
                    .map_err(|e| AppError::SessionError(e.to_string()))?;
                tracing::info!(portal_id = %id, "Started portal session");
                id
            }
        };

        Ok(Self {
            id,
            context: state.sessions.get_or_create(id),
        })
    }
}
