use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::validation::validate_password_complexity;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteCodeForm {
    #[validate(length(min = 5, message = "Code is too short"))]
    pub code: String,
}

#[derive(Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// In-progress registration input. The email is not part of the draft: it
/// comes locked from the invite.
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegistrationDraft {
    #[validate(length(min = 2, message = "First name required"))]
    pub first_name: String,

    #[validate(length(min = 2, message = "Last name required"))]
    pub last_name: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_complexity")
    )]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// Body sent to the gateway to complete a registration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterPayload {
    pub fn new(code: impl Into<String>, draft: RegistrationDraft) -> Self {
        Self {
            code: code.into(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            password: draft.password,
            confirm_password: draft.confirm_password,
        }
    }
}

impl fmt::Debug for RegisterPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterPayload")
            .field("code", &self.code)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_passwords() {
        let draft = RegistrationDraft {
            first_name: "Noura".to_string(),
            last_name: "Saleh".to_string(),
            password: "Abc12345".to_string(),
            confirm_password: "Abc12345".to_string(),
        };

        let rendered = format!("{:?}", draft);
        assert!(rendered.contains("Noura"));
        assert!(!rendered.contains("Abc12345"));

        let payload = RegisterPayload::new("INVITE-GOLF-SIGNUP", draft);
        assert!(!format!("{:?}", payload).contains("Abc12345"));
    }

    #[test]
    fn payload_serializes_camel_case() {
        let payload = RegisterPayload::new(
            "INVITE-GOLF-SIGNUP",
            RegistrationDraft {
                first_name: "Noura".to_string(),
                last_name: "Saleh".to_string(),
                password: "Abc12345".to_string(),
                confirm_password: "Abc12345".to_string(),
            },
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["firstName"], "Noura");
        assert_eq!(json["confirmPassword"], "Abc12345");
        assert_eq!(json["code"], "INVITE-GOLF-SIGNUP");
    }
}
