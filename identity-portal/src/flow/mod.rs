//! Login and registration state machines.

pub mod login;
pub mod registration;

pub use login::{LoginFlow, LoginOutcome};
pub use registration::{FlowError, FlowPolicy, RegistrationFlow, RegistrationStep};

/// Where the page should go after a flow action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Login,
}

impl Navigation {
    pub fn path(&self) -> Option<&'static str> {
        match self {
            Navigation::Stay => None,
            Navigation::Login => Some("/login"),
        }
    }
}
