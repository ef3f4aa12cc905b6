//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Duplicate {resource}")]
    Duplicate { resource: String },

    #[error("Repository error: {message}")]
    Repository { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Stable machine-readable code for the boundary layer
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Duplicate { .. } => "CONFLICT",
            DomainError::Repository { .. } => "STORE_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Auth(AuthError::Conflict) => "CONFLICT",
            DomainError::Auth(AuthError::InvalidCredentials) => "INVALID_CREDENTIALS",
            DomainError::Auth(AuthError::InvalidInput { .. }) => "VALIDATION_ERROR",
            DomainError::Token(TokenError::UnknownToken) => "TOKEN_INVALID",
            DomainError::Token(TokenError::ExpiredToken) => "TOKEN_EXPIRED",
            DomainError::Token(TokenError::InvalidToken) => "TOKEN_INVALID",
            DomainError::Token(TokenError::SigningFailed) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error stems from caller input rather than a server fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::Auth(_) | DomainError::Duplicate { .. })
            || matches!(
                self,
                DomainError::Token(
                    TokenError::UnknownToken | TokenError::ExpiredToken | TokenError::InvalidToken
                )
            )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
