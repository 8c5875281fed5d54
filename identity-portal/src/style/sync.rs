use std::sync::{Arc, Mutex, PoisonError};

use super::{StyleError, StyleSurface, PRIMARY_VAR, RING_VAR, SECONDARY_VAR};
use crate::models::Tenant;
use crate::store::{ListenerId, TenantStore};

pub const DEFAULT_TITLE_SUFFIX: &str = "Dhuud Secure";

/// Applies a tenant's branding to a [`StyleSurface`].
///
/// Steps run in order: color variables, favicon, title. A failing step stops
/// the run but earlier writes stay in place. Applying the same tenant twice
/// leaves the surface unchanged.
#[derive(Debug, Clone)]
pub struct StyleSync {
    title_suffix: String,
}

impl StyleSync {
    pub fn new(title_suffix: impl Into<String>) -> Self {
        Self {
            title_suffix: title_suffix.into(),
        }
    }

    pub fn title_for(&self, tenant: &Tenant) -> String {
        format!("{} | {}", tenant.name, self.title_suffix)
    }

    pub fn apply<S>(&self, tenant: &Tenant, surface: &mut S) -> Result<(), StyleError>
    where
        S: StyleSurface + ?Sized,
    {
        surface.set_css_variable(PRIMARY_VAR, &tenant.colors.primary)?;
        surface.set_css_variable(RING_VAR, &tenant.colors.ring)?;
        if let Some(secondary) = &tenant.colors.secondary {
            surface.set_css_variable(SECONDARY_VAR, secondary)?;
        }

        if let Some(icon_url) = &tenant.branding.icon_url {
            if icon_url.trim().to_ascii_lowercase().starts_with("javascript:") {
                return Err(StyleError::UnsafeUrl(icon_url.clone()));
            }
            match surface.icon_link_mut() {
                Some(link) => link.href = icon_url.clone(),
                None => surface.append_icon_link().href = icon_url.clone(),
            }
        }

        if !tenant.name.is_empty() {
            surface.set_title(&self.title_for(tenant))?;
        }

        Ok(())
    }

    /// Apply the store's current tenant now, then again on every change.
    pub fn attach<S>(self, store: &TenantStore, surface: Arc<Mutex<S>>) -> ListenerId
    where
        S: StyleSurface + 'static,
    {
        {
            let mut guard = surface.lock().unwrap_or_else(PoisonError::into_inner);
            self.apply_logged(&store.get(), &mut *guard);
        }

        store.subscribe(move |tenant| {
            let mut guard = surface.lock().unwrap_or_else(PoisonError::into_inner);
            self.apply_logged(tenant, &mut *guard);
        })
    }

    fn apply_logged<S: StyleSurface + ?Sized>(&self, tenant: &Tenant, surface: &mut S) {
        if let Err(e) = self.apply(tenant, surface) {
            tracing::warn!(tenant_id = %tenant.id, error = %e, "Tenant branding partially applied");
        }
    }
}

impl Default for StyleSync {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_SUFFIX)
    }
}
