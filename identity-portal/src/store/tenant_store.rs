//! Observable holder of the current tenant.
//!
//! One store exists per portal context (per browser session, or per test), so
//! nothing here is process-global. Listeners run synchronously on the thread
//! that changed the tenant, once per change, in registration order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::models::{Tenant, DHUUD_TENANT_ID};

pub type TenantListener = Arc<dyn Fn(&Arc<Tenant>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct TenantStore {
    current: RwLock<Arc<Tenant>>,
    listeners: Mutex<Vec<(ListenerId, TenantListener)>>,
    next_listener_id: AtomicU64,
    dhuud: Arc<Tenant>,
    golf_saudi: Arc<Tenant>,
}

impl TenantStore {
    pub fn new(initial: Arc<Tenant>) -> Self {
        Self {
            current: RwLock::new(initial),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            dhuud: Arc::new(Tenant::dhuud()),
            golf_saudi: Arc::new(Tenant::golf_saudi()),
        }
    }

    /// Store starting at the Dhuud tenant.
    pub fn with_default_tenant() -> Self {
        Self::new(Arc::new(Tenant::dhuud()))
    }

    /// Current tenant. Never absent.
    pub fn get(&self) -> Arc<Tenant> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the current tenant. Listeners are notified only when the new
    /// tenant differs from the old one; returns whether it did.
    pub fn set_tenant(&self, tenant: Arc<Tenant>) -> bool {
        let changed = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let changed = **current != *tenant;
            *current = Arc::clone(&tenant);
            changed
        };

        if changed {
            tracing::info!(tenant_id = %tenant.id, "Tenant changed");
            self.notify(&tenant);
        }
        changed
    }

    /// Switch between the two built-in tenants: Dhuud goes to Golf Saudi,
    /// anything else goes to Dhuud.
    pub fn toggle_tenant(&self) -> Arc<Tenant> {
        let next = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let next = if current.id == DHUUD_TENANT_ID {
                Arc::clone(&self.golf_saudi)
            } else {
                Arc::clone(&self.dhuud)
            };
            *current = Arc::clone(&next);
            next
        };

        tracing::info!(tenant_id = %next.id, "Tenant toggled");
        self.notify(&next);
        next
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Arc<Tenant>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // Listeners are cloned out so they may read the store (or subscribe)
    // without deadlocking.
    fn notify(&self, tenant: &Arc<Tenant>) {
        let listeners: Vec<TenantListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(tenant);
        }
    }
}

impl Default for TenantStore {
    fn default() -> Self {
        Self::with_default_tenant()
    }
}

impl std::fmt::Debug for TenantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantStore")
            .field("current", &self.get().id)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
