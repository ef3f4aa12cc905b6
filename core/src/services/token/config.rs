//! Configuration for the token issuer

use chrono::Duration;
use tg_shared::config::{JwtConfig, Secret};

/// Secrets and lifetimes bound into a [`TokenIssuer`](super::TokenIssuer)
#[derive(Debug, Clone)]
pub struct TokenIssuerConfig {
    /// Secret signing access tokens
    pub access_secret: Secret,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Secret signing refresh tokens
    pub refresh_secret: Secret,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl From<&JwtConfig> for TokenIssuerConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            access_secret: jwt.access_secret.clone(),
            access_ttl: jwt.access_expires.to_duration(),
            refresh_secret: jwt.refresh_secret.clone(),
            refresh_ttl: jwt.refresh_expires.to_duration(),
        }
    }
}
