pub mod config;
pub mod dtos;
pub mod flow;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;
pub mod store;
pub mod style;
pub mod validation;

use session::SessionRegistry;
use std::sync::Arc;

/// Shared application state: the per-visitor portal contexts.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self { sessions }
    }
}
