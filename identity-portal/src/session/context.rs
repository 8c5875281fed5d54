use std::sync::{Arc, Mutex, PoisonError};

use portal_core::error::AppError;

use crate::flow::{FlowPolicy, LoginFlow, RegistrationFlow};
use crate::models::{Tenant, TenantCatalog};
use crate::services::AuthGateway;
use crate::store::TenantStore;
use crate::style::{DocumentHead, StyleSync};

/// Everything one visitor's pages depend on: their own tenant store, the
/// head it keeps in sync, and the two flows.
pub struct PortalContext {
    store: Arc<TenantStore>,
    head: Arc<Mutex<DocumentHead>>,
    pub registration: RegistrationFlow,
    pub login: LoginFlow,
}

impl PortalContext {
    pub fn store(&self) -> &Arc<TenantStore> {
        &self.store
    }

    pub fn tenant(&self) -> Arc<Tenant> {
        self.store.get()
    }

    /// Snapshot of the branded page head.
    pub fn head(&self) -> DocumentHead {
        self.head
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Builds a fresh [`PortalContext`] for each new session.
#[derive(Clone)]
pub struct ContextFactory {
    gateway: Arc<dyn AuthGateway>,
    catalog: Arc<TenantCatalog>,
    style: StyleSync,
    policy: FlowPolicy,
    default_tenant: Arc<Tenant>,
}

impl ContextFactory {
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        catalog: Arc<TenantCatalog>,
        style: StyleSync,
        policy: FlowPolicy,
        default_tenant_id: &str,
    ) -> Result<Self, AppError> {
        let default_tenant = catalog.get(default_tenant_id).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!(
                "Default tenant '{}' is not in the tenant catalog",
                default_tenant_id
            ))
        })?;

        Ok(Self {
            gateway,
            catalog,
            style,
            policy,
            default_tenant,
        })
    }

    pub fn build(&self) -> PortalContext {
        let store = Arc::new(TenantStore::new(Arc::clone(&self.default_tenant)));
        let head = Arc::new(Mutex::new(DocumentHead::new()));
        self.style.clone().attach(&store, Arc::clone(&head));

        PortalContext {
            registration: RegistrationFlow::new(
                Arc::clone(&self.gateway),
                Arc::clone(&store),
                Arc::clone(&self.catalog),
                self.policy,
            ),
            login: LoginFlow::new(Arc::clone(&self.gateway), Arc::clone(&store)),
            store,
            head,
        }
    }
}
