//! Signup and login orchestration

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::TokenPair;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{IdentityRepository, RefreshTokenRepository};
use crate::services::password::PasswordHasher;
use crate::services::token::{JwtSigner, RefreshRotator, TokenSigner};

use super::config::CredentialGatewayConfig;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

/// Front door for credentials.
///
/// Failures never reveal which field collided at signup or whether an
/// account exists at login.
pub struct CredentialGateway<I, R, S = JwtSigner>
where
    I: IdentityRepository,
    R: RefreshTokenRepository,
    S: TokenSigner,
{
    /// Identity store
    identities: Arc<I>,
    /// Issues and records token pairs on login
    rotator: Arc<RefreshRotator<I, R, S>>,
    hasher: PasswordHasher,
    config: CredentialGatewayConfig,
}

impl<I, R, S> CredentialGateway<I, R, S>
where
    I: IdentityRepository,
    R: RefreshTokenRepository,
    S: TokenSigner,
{
    pub fn new(
        identities: Arc<I>,
        rotator: Arc<RefreshRotator<I, R, S>>,
        hasher: PasswordHasher,
        config: CredentialGatewayConfig,
    ) -> Self {
        Self {
            identities,
            rotator,
            hasher,
            config,
        }
    }

    /// Registers a new identity
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - The stored identity, email lowercased, name trimmed
    /// * `Err(AuthError::InvalidInput)` - A field failed validation
    /// * `Err(AuthError::Conflict)` - Email or name already taken
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> DomainResult<Identity> {
        let name = self.validate_name(name)?;
        let email = self.validate_email(email)?;
        self.validate_password(password)?;

        if self
            .identities
            .find_by_email_or_name(&email, &name)
            .await?
            .is_some()
        {
            debug!("Signup rejected, identity already exists");
            return Err(AuthError::Conflict.into());
        }

        let password_hash = self.hasher.hash(password)?;
        let identity = Identity::new(name, email, password_hash);

        let identity = match self.identities.create(identity).await {
            Ok(identity) => identity,
            // Lost a race with a concurrent signup for the same email or name
            Err(DomainError::Duplicate { .. }) => return Err(AuthError::Conflict.into()),
            Err(e) => return Err(e),
        };

        info!(identity_id = %identity.id, "Identity registered");
        Ok(identity)
    }

    /// Authenticates by email and password and issues a new token pair
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - A pair starting a fresh refresh token family
    /// * `Err(AuthError::InvalidCredentials)` - Unknown email or wrong password
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        if password.len() > self.config.max_password_length {
            return Err(AuthError::InvalidCredentials.into());
        }

        let email = normalize_email(email);
        let identity = match self.identities.find_by_email(&email).await? {
            Some(identity) => identity,
            None => {
                self.hasher.verify_dummy(password);
                debug!("Login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.hasher.verify(&identity.password_hash, password) {
            warn!(identity_id = %identity.id, "Login rejected, wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let pair = self.rotator.start_family(&identity).await?;
        info!(identity_id = %identity.id, "Login succeeded");
        Ok(pair)
    }

    fn validate_name(&self, name: &str) -> Result<String, AuthError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > self.config.max_name_length {
            return Err(invalid("name"));
        }
        Ok(name.to_string())
    }

    fn validate_email(&self, email: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);
        if email.chars().count() > self.config.max_email_length || !EMAIL_REGEX.is_match(&email) {
            return Err(invalid("email"));
        }
        Ok(email)
    }

    fn validate_password(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.config.min_password_length
            || password.len() > self.config.max_password_length
        {
            return Err(invalid("password"));
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid(field: &str) -> AuthError {
    AuthError::InvalidInput {
        field: field.to_string(),
    }
}
