//! Business services: password hashing, token issuance and rotation, credentials.

pub mod credential;
pub mod password;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use credential::{CredentialGateway, CredentialGatewayConfig};
pub use password::{PasswordHasher, PasswordHasherConfig};
pub use token::{JwtSigner, RefreshRotator, TokenIssuer, TokenIssuerConfig, TokenSigner};
