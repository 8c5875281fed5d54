#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use identity_portal::config::SessionSettings;
use identity_portal::flow::FlowPolicy;
use identity_portal::models::{TenantCatalog, DHUUD_TENANT_ID};
use identity_portal::services::SimulatedAuthGateway;
use identity_portal::session::{ContextFactory, SessionRegistry};
use identity_portal::startup::build_router;
use identity_portal::style::StyleSync;
use identity_portal::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

/// Router plus a cookie jar holding one browser session.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    pub sessions: Arc<SessionRegistry>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(FlowPolicy::default())
    }

    pub fn with_policy(policy: FlowPolicy) -> Self {
        let factory = ContextFactory::new(
            Arc::new(SimulatedAuthGateway::instant()),
            Arc::new(TenantCatalog::builtin()),
            StyleSync::default(),
            policy,
            DHUUD_TENANT_ID,
        )
        .expect("builtin default tenant");
        let sessions = Arc::new(SessionRegistry::new(factory));
        let router = build_router(AppState::new(sessions.clone()), &SessionSettings::default());

        Self {
            router,
            cookie: None,
            sessions,
        }
    }

    /// Same server, fresh browser.
    pub fn new_browser(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
            sessions: self.sessions.clone(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri);
        self.send(request, Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(body.to_string())).await
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
