use thiserror::Error;

/// Failure of a gateway call. `Display` is the banner text shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Invalid invitation code. Please check your link.")]
    InvalidInvite,

    #[error("This invitation link has expired.")]
    ExpiredInvite,

    #[error("Security Error: Code missing.")]
    MissingCode,

    #[error("{0}")]
    Rejected(String),

    #[error("Unable to reach the authentication service. Please try again.")]
    Transport(String),
}

impl GatewayError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidInvite => "invalid",
            GatewayError::ExpiredInvite => "expired",
            GatewayError::MissingCode => "missing_code",
            GatewayError::Rejected(_) => "rejected",
            GatewayError::Transport(_) => "transport",
        }
    }
}
