pub mod auth;

pub use auth::{InviteCodeForm, LoginForm, RegisterPayload, RegistrationDraft};
