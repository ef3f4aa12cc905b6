//! Fixtures shared by service tests

use std::sync::Arc;

use chrono::Duration;
use tg_shared::config::Secret;

use crate::domain::entities::identity::Identity;
use crate::repositories::{InMemoryIdentityRepository, InMemoryRefreshTokenRepository};
use crate::services::password::{PasswordHasher, PasswordHasherConfig};
use crate::services::token::{JwtSigner, RefreshRotator, TokenIssuer, TokenIssuerConfig};

pub const ACCESS_SECRET: &str = "YWNjZXNzLXNpZ25pbmcta2V5LTAxMjM0NTY3ODk=";
pub const REFRESH_SECRET: &str = "cmVmcmVzaC1zaWduaW5nLWtleS0wMTIzNDU2Nzg5";

pub type TestRotator = RefreshRotator<InMemoryIdentityRepository, InMemoryRefreshTokenRepository>;

pub fn issuer_config() -> TokenIssuerConfig {
    TokenIssuerConfig {
        access_secret: Secret::new(ACCESS_SECRET),
        access_ttl: Duration::minutes(15),
        refresh_secret: Secret::new(REFRESH_SECRET),
        refresh_ttl: Duration::days(7),
    }
}

pub fn issuer() -> TokenIssuer {
    TokenIssuer::new(JwtSigner::new(), issuer_config())
}

pub fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::new(PasswordHasherConfig::new(1024, 1, 1)).unwrap()
}

/// Stores plus a rotator wired over them
pub struct Harness {
    pub identities: Arc<InMemoryIdentityRepository>,
    pub tokens: Arc<InMemoryRefreshTokenRepository>,
    pub rotator: Arc<TestRotator>,
}

impl Harness {
    pub fn new() -> Self {
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let tokens = Arc::new(InMemoryRefreshTokenRepository::new());
        let rotator = Arc::new(RefreshRotator::new(
            Arc::clone(&identities),
            Arc::clone(&tokens),
            Arc::new(issuer()),
        ));

        Self {
            identities,
            tokens,
            rotator,
        }
    }

    pub async fn stored_identity(&self, name: &str, email: &str) -> Identity {
        use crate::repositories::IdentityRepository;

        let identity = Identity::new(name.to_string(), email.to_string(), "$argon2id$digest".to_string());
        self.identities.create(identity).await.unwrap()
    }
}
