//! Repository traits and in-memory stores for identities and refresh tokens.

pub mod identity;
pub mod token;

pub use identity::{IdentityRepository, InMemoryIdentityRepository};
pub use token::{InMemoryRefreshTokenRepository, RefreshTokenRepository};
