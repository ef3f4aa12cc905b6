//! # Tokengate Core
//!
//! Domain layer of the credential and token engine: identities and refresh
//! token records, repository interfaces with in-memory stores, and the
//! services that hash passwords, issue token pairs and rotate refresh tokens.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{Identity, IdentityClaims, RefreshTokenRecord, TokenPair};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{
    IdentityRepository, InMemoryIdentityRepository, InMemoryRefreshTokenRepository,
    RefreshTokenRepository,
};
pub use services::{
    CredentialGateway, CredentialGatewayConfig, JwtSigner, PasswordHasher, PasswordHasherConfig,
    RefreshRotator, TokenIssuer, TokenIssuerConfig, TokenSigner,
};
