//! Token pair issuance

use chrono::{DateTime, Duration, Utc};
use tg_shared::config::JwtConfig;

use crate::domain::entities::token::{
    AccessClaims, IdentityClaims, RefreshClaims, TokenPair, ACCESS_TOKEN_TYPE, REFRESH_TOKEN_TYPE,
};
use crate::errors::{DomainResult, TokenError};

use super::config::TokenIssuerConfig;
use super::signer::{JwtSigner, TokenSigner};

/// Mints access/refresh token pairs.
///
/// Holds no state beyond its configuration; nothing is persisted here.
pub struct TokenIssuer<S: TokenSigner = JwtSigner> {
    signer: S,
    config: TokenIssuerConfig,
}

impl TokenIssuer<JwtSigner> {
    /// Issuer signing HS256 tokens with the validated JWT settings
    pub fn from_config(jwt: &JwtConfig) -> Self {
        Self::new(JwtSigner::new(), TokenIssuerConfig::from(jwt))
    }
}

impl<S: TokenSigner> TokenIssuer<S> {
    pub fn new(signer: S, config: TokenIssuerConfig) -> Self {
        Self { signer, config }
    }

    pub fn config(&self) -> &TokenIssuerConfig {
        &self.config
    }

    /// Issues a pair stamped with the current time
    pub fn issue(&self, identity: &IdentityClaims) -> DomainResult<TokenPair> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a pair as if it were `issued_at`
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Both tokens signed
    /// * `Err(TokenError::SigningFailed)` - Expiry overflowed or a secret was unusable
    pub fn issue_at(
        &self,
        identity: &IdentityClaims,
        issued_at: DateTime<Utc>,
    ) -> DomainResult<TokenPair> {
        let access_expires_at = expiry(issued_at, self.config.access_ttl)?;
        let refresh_expires_at = expiry(issued_at, self.config.refresh_ttl)?;

        let access_claims = AccessClaims::new(identity, issued_at, access_expires_at);
        let access_token = self.signer.sign(&access_claims, &self.config.access_secret)?;

        let refresh_claims = RefreshClaims::new(identity.subject, issued_at, refresh_expires_at);
        let refresh_token = self
            .signer
            .sign(&refresh_claims, &self.config.refresh_secret)?;

        tracing::debug!(
            subject = %identity.subject,
            access_expires_at = %access_expires_at,
            refresh_expires_at = %refresh_expires_at,
            "Issued token pair"
        );

        Ok(TokenPair {
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Verifies an access token and returns its claims
    pub fn verify_access(&self, token: &str) -> DomainResult<AccessClaims> {
        let claims: AccessClaims = self.signer.verify(token, &self.config.access_secret)?;
        if claims.typ != ACCESS_TOKEN_TYPE {
            return Err(TokenError::InvalidToken.into());
        }
        Ok(claims)
    }

    /// Verifies a refresh token and returns its claims
    pub fn verify_refresh(&self, token: &str) -> DomainResult<RefreshClaims> {
        let claims: RefreshClaims = self.signer.verify(token, &self.config.refresh_secret)?;
        if claims.typ != REFRESH_TOKEN_TYPE {
            return Err(TokenError::InvalidToken.into());
        }
        Ok(claims)
    }
}

fn expiry(issued_at: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, TokenError> {
    issued_at
        .checked_add_signed(ttl)
        .ok_or(TokenError::SigningFailed)
}
