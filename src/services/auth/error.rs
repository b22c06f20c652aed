use thiserror::Error;

/// Failure taxonomy of the authorization path.
///
/// Everything from `MissingCredential` to `IdentityNotFound` is an
/// authentication-stage failure and is answered with 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no credential provided")]
    MissingCredential,
    #[error("malformed credential")]
    MalformedCredential,
    #[error("invalid credential signature")]
    InvalidSignature,
    #[error("credential expired")]
    Expired,
    #[error("identity not found")]
    IdentityNotFound,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("backend failure: {0}")]
    BackendFailure(String),
}

impl AuthError {
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::MalformedCredential
                | Self::InvalidSignature
                | Self::Expired
                | Self::IdentityNotFound
        )
    }

    /// Reason recorded by the gateway for an unauthenticated request.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredential => "No token provided",
            Self::MalformedCredential | Self::InvalidSignature | Self::Expired => "Invalid token",
            Self::IdentityNotFound => "User not found",
            Self::Forbidden(_) => "Forbidden",
            Self::BackendFailure(_) => "Internal server error",
        }
    }
}
