//! Tenant branding pushed into the page environment.

mod head;
mod sync;

pub use head::DocumentHead;
pub use sync::{StyleSync, DEFAULT_TITLE_SUFFIX};

use thiserror::Error;

pub const PRIMARY_VAR: &str = "--primary";
pub const SECONDARY_VAR: &str = "--secondary";
pub const RING_VAR: &str = "--ring";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("Invalid CSS variable name: {0}")]
    InvalidVariableName(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidVariableValue { name: String, value: String },

    #[error("Refusing unsafe icon URL: {0}")]
    UnsafeUrl(String),
}

/// `<link>` element in the page head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkElement {
    pub rel: String,
    pub href: String,
}

impl LinkElement {
    pub fn is_icon(&self) -> bool {
        self.rel.split_whitespace().any(|rel| rel == "icon")
    }
}

/// Where branding is written: root color variables, head links and title.
pub trait StyleSurface: Send {
    fn set_css_variable(&mut self, name: &str, value: &str) -> Result<(), StyleError>;

    /// Existing `<link>` whose `rel` contains `icon`.
    fn icon_link_mut(&mut self) -> Option<&mut LinkElement>;

    /// Append a new `<link rel="icon">` and return it.
    fn append_icon_link(&mut self) -> &mut LinkElement;

    fn set_title(&mut self, title: &str) -> Result<(), StyleError>;
}
