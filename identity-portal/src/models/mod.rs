pub mod invitation;
pub mod tenant;

pub use invitation::{InviteValidationResult, RegisterOutcome, SignInOutcome};
pub use tenant::{
    Tenant, TenantBranding, TenantCatalog, TenantColors, DHUUD_TENANT_ID, GOLF_SAUDI_TENANT_ID,
};
