//! Tenant model - organization-scoped branding profile.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Platform operator tenant, also the default branding.
pub const DHUUD_TENANT_ID: &str = "dhuud-admin";

/// Client organization tenant.
pub const GOLF_SAUDI_TENANT_ID: &str = "golf-saudi";

/// Three dots joined by a white curve forming a "D".
pub const DHUUD_LOGO: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100' fill='none'%3E%3Ccircle cx='25' cy='25' r='12' fill='%237DD3FC' /%3E%3Ccircle cx='25' cy='50' r='12' fill='%230EA5E9' /%3E%3Ccircle cx='25' cy='75' r='12' fill='%231E3A8A' /%3E%3Cpath d='M35 25 H 55 A 25 25 0 0 1 55 75 H 35' stroke='white' stroke-width='10' stroke-linecap='round' stroke-linejoin='round' /%3E%3C/svg%3E";

/// Drilling rig outline, white stroke.
pub const GOLF_SAUDI_LOGO: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24' fill='none' stroke='white' stroke-width='2' stroke-linecap='round' stroke-linejoin='round'%3E%3Cpath d='M12 2v8'/%3E%3Cpath d='m4.93 10.93 1.41 1.41'/%3E%3Cpath d='M2 18h2'/%3E%3Cpath d='M20 18h2'/%3E%3Cpath d='m19.07 10.93-1.41 1.41'/%3E%3Cpath d='M22 22H2'/%3E%3Cpath d='m8 22 4-10 4 10'/%3E%3C/svg%3E";

/// HSL triplets (e.g. `221.2 83.2% 53.3%`) fed into the page color variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantColors {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    pub ring: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantBranding {
    pub logo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub hero_image: String,
}

/// Tenant entity.
///
/// Immutable once built; the store swaps whole tenants rather than patching
/// fields, so it is shared as `Arc<Tenant>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub colors: TenantColors,
    pub branding: TenantBranding,
}

impl Tenant {
    pub fn dhuud() -> Self {
        Self {
            id: DHUUD_TENANT_ID.to_string(),
            name: "Dhuud Platform".to_string(),
            slug: "dhuud".to_string(),
            colors: TenantColors {
                primary: "221.2 83.2% 53.3%".to_string(),
                secondary: Some("210 40% 96.1%".to_string()),
                ring: "221.2 83.2% 53.3%".to_string(),
            },
            branding: TenantBranding {
                logo_url: DHUUD_LOGO.to_string(),
                icon_url: Some(DHUUD_LOGO.to_string()),
                hero_image: "https://picsum.photos/id/1031/1920/1080?grayscale".to_string(),
            },
        }
    }

    pub fn golf_saudi() -> Self {
        Self {
            id: GOLF_SAUDI_TENANT_ID.to_string(),
            name: "GOLF SAUDI Co.".to_string(),
            slug: "golf-saudi".to_string(),
            colors: TenantColors {
                primary: "142.1 76.2% 36.3%".to_string(),
                secondary: Some("142.1 76.2% 96.3%".to_string()),
                ring: "142.1 76.2% 36.3%".to_string(),
            },
            branding: TenantBranding {
                logo_url: GOLF_SAUDI_LOGO.to_string(),
                icon_url: Some(GOLF_SAUDI_LOGO.to_string()),
                hero_image: "https://picsum.photos/id/563/1920/1080".to_string(),
            },
        }
    }
}

/// Known tenants, looked up by id.
#[derive(Debug, Clone, Default)]
pub struct TenantCatalog {
    tenants: HashMap<String, Arc<Tenant>>,
}

impl TenantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the two built-in tenants.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(Tenant::dhuud());
        catalog.insert(Tenant::golf_saudi());
        catalog
    }

    pub fn insert(&mut self, tenant: Tenant) -> Arc<Tenant> {
        let tenant = Arc::new(tenant);
        self.tenants.insert(tenant.id.clone(), Arc::clone(&tenant));
        tenant
    }

    pub fn get(&self, tenant_id: &str) -> Option<Arc<Tenant>> {
        self.tenants.get(tenant_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
