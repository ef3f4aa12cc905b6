//! Domain entities representing core business objects.

pub mod identity;
pub mod token;

// Re-export commonly used types
pub use identity::Identity;
pub use token::{
    hash_token, AccessClaims, IdentityClaims, RefreshClaims, RefreshTokenRecord, TokenPair,
    ACCESS_TOKEN_TYPE, REFRESH_TOKEN_TYPE,
};
