pub mod app;
pub mod auth;
pub mod metrics;
pub mod registration;

use std::sync::Arc;

use crate::models::Tenant;
use crate::session::PortalContext;
use crate::style::DocumentHead;

/// Branded page head and tenant shared by every page template.
pub struct PageChrome {
    pub head: DocumentHead,
    pub tenant: Arc<Tenant>,
}

impl PageChrome {
    pub fn from_context(context: &PortalContext) -> Self {
        Self {
            head: context.head(),
            tenant: context.tenant(),
        }
    }

    pub fn title(&self) -> &str {
        self.head.title_or(&self.tenant.name)
    }

    pub fn root_style(&self) -> String {
        self.head.root_style()
    }

    pub fn favicon(&self) -> Option<&str> {
        self.head.favicon_href()
    }
}
