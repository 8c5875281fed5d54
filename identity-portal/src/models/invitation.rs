//! Invitation model - outcome of checking an invite code.

use serde::{Deserialize, Serialize};

/// Result of validating an invite code.
///
/// Consumed immediately to pick the next registration step; never stored
/// beyond the flow that asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteValidationResult {
    pub valid: bool,
    pub email: String,
    pub tenant_name: String,
    pub tenant_id: String,
    pub role: String,
    #[serde(rename = "existingUser")]
    pub existing_user: bool,
}

/// Registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOutcome {
    pub success: bool,
}

/// Acknowledgement of a sign-in attempt. No credential is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInOutcome {
    pub email: String,
}
