//! Gateway implementations and service-level support.

pub mod error;
mod gateway;
mod http_gateway;
pub mod metrics;
pub mod simulated;

pub use error::GatewayError;
pub use gateway::AuthGateway;
pub use http_gateway::HttpAuthGateway;
pub use simulated::{SimulatedAuthGateway, SimulatedLatency};
