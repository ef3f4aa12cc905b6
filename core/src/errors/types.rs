//! Credential and token error types
//!
//! Messages are generic: a caller learns that credentials or a
//! token were rejected, never which check failed.

use thiserror::Error;

/// Credential-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Signup collided with an existing identity (email or name, unspecified)
    #[error("Account already exists")]
    Conflict,

    /// Login failed; unknown email and wrong password are indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Malformed signup input
    #[error("Invalid {field}")]
    InvalidInput { field: String },
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Refresh token not recognized, already used, or not verifiable
    #[error("Invalid refresh token")]
    UnknownToken,

    /// Token lifetime has elapsed
    #[error("Token expired")]
    ExpiredToken,

    /// Access token failed verification
    #[error("Invalid token")]
    InvalidToken,

    /// Signing failed; fatal to the current request only
    #[error("Token signing failed")]
    SigningFailed,
}
