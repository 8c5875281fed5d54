use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use portal_core::error::AppError;
use portal_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::{GatewayMode, GatewaySettings, SessionSettings, Settings};
use crate::flow::FlowPolicy;
use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, login_page},
    registration::{register_page, submit_code, submit_registration},
};
use crate::middleware::metrics::metrics_middleware;
use crate::models::TenantCatalog;
use crate::services::{AuthGateway, HttpAuthGateway, SimulatedAuthGateway};
use crate::session::{ContextFactory, SessionRegistry};
use crate::style::StyleSync;
use crate::AppState;

pub fn build_gateway(settings: &GatewaySettings) -> Result<Arc<dyn AuthGateway>, AppError> {
    match settings.mode {
        GatewayMode::Simulated => {
            tracing::info!("Using simulated auth gateway");
            Ok(Arc::new(SimulatedAuthGateway::new(settings.latency.into())))
        }
        GatewayMode::Http => {
            let base_url = settings.base_url.as_deref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "gateway.base_url is required in http mode"
                ))
            })?;
            let gateway =
                HttpAuthGateway::new(base_url, settings.api_key.clone(), settings.timeout())
                    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
            tracing::info!(base_url = %gateway.base_url(), "Using HTTP auth gateway");
            Ok(Arc::new(gateway))
        }
    }
}

pub fn build_state(settings: &Settings) -> Result<AppState, AppError> {
    let factory = ContextFactory::new(
        build_gateway(&settings.gateway)?,
        Arc::new(TenantCatalog::builtin()),
        StyleSync::new(settings.branding.title_suffix.clone()),
        FlowPolicy {
            enforce_code_length: settings.flow.enforce_code_length,
        },
        &settings.branding.default_tenant_id,
    )?;

    Ok(AppState::new(Arc::new(SessionRegistry::with_max_contexts(
        factory,
        settings.session.max_contexts,
    ))))
}

pub fn build_router(state: AppState, session: &SessionSettings) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(session.cookie_expiry()));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/register", get(register_page).post(submit_registration))
        .route("/register/code", post(submit_code))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
