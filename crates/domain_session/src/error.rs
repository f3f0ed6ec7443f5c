//! Session domain errors

use thiserror::Error;

/// Errors that can occur in the session domain
#[derive(Debug, Error)]
pub enum SessionError {
    /// Login was rejected by the authentication service
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// The refresh call failed; the previous credential remains in effect
    #[error("Credential refresh failed: {0}")]
    RefreshFailed(String),

    /// The credential is malformed or its signature does not verify
    #[error("Invalid credential")]
    InvalidCredential,

    /// The credential has expired
    #[error("Credential expired")]
    CredentialExpired,

    /// The credential lacks a required permission
    #[error("Missing permission: {0}")]
    MissingPermission(String),
}
