//! portal-core: Shared infrastructure for the identity portal.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

