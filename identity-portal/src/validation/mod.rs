//! Local, pre-network form validation.
//!
//! Forms declare their rules with `validator` derives (see `crate::dtos`);
//! this module holds the custom rules and flattens `ValidationErrors` into
//! per-field messages the templates can show next to each input.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// Password must contain at least one uppercase letter and one digit.
///
/// Length is checked separately by the `length` rule so both messages can be
/// reported for the same field.
pub fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::new("uppercase")
            .with_message(Cow::Borrowed("Must contain uppercase")));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(
            ValidationError::new("digit").with_message(Cow::Borrowed("Must contain number"))
        );
    }

    Ok(())
}

/// Messages keyed by form field name, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// First message for `field`, which is what the form shows.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn all(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors = FieldErrors::new();
        for (field, errors) in errors.field_errors() {
            for error in errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                field_errors.insert(field.to_string(), message);
            }
        }
        field_errors
    }
}

/// Run a form's declared rules, returning per-field messages on failure.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(FieldErrors::from)
}
