mod tenant_store;

pub use tenant_store::{ListenerId, TenantListener, TenantStore};
