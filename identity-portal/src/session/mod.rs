//! Per-visitor portal state: each browser session gets its own tenant
//! store, branded head and flows.

mod context;
mod extract;
mod registry;

pub use context::{ContextFactory, PortalContext};
pub use extract::{PortalSession, PORTAL_ID_KEY};
pub use registry::{spawn_reaper, SessionRegistry, DEFAULT_MAX_CONTEXTS};
