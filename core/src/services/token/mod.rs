//! Token services
//!
//! - Token pair issuance and verification
//! - Refresh token rotation, revocation and cleanup
//! - The signing seam and its HS256 implementation

mod config;
mod issuer;
mod rotator;
mod signer;

#[cfg(test)]
mod tests;

pub use config::TokenIssuerConfig;
pub use issuer::TokenIssuer;
pub use rotator::RefreshRotator;
pub use signer::{JwtSigner, TokenSigner};
