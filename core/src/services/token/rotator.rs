//! Refresh token rotation with reuse detection

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::{hash_token, RefreshTokenRecord, TokenPair};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{IdentityRepository, RefreshTokenRepository};

use super::issuer::TokenIssuer;
use super::signer::{JwtSigner, TokenSigner};

/// Exchanges refresh tokens for fresh pairs.
///
/// Every refresh token is single-use. Tokens descending from the same login
/// form a family; presenting an already rotated token revokes the family.
pub struct RefreshRotator<I, R, S = JwtSigner>
where
    I: IdentityRepository,
    R: RefreshTokenRepository,
    S: TokenSigner,
{
    identities: Arc<I>,
    tokens: Arc<R>,
    issuer: Arc<TokenIssuer<S>>,
}

impl<I, R, S> RefreshRotator<I, R, S>
where
    I: IdentityRepository,
    R: RefreshTokenRepository,
    S: TokenSigner,
{
    pub fn new(identities: Arc<I>, tokens: Arc<R>, issuer: Arc<TokenIssuer<S>>) -> Self {
        Self {
            identities,
            tokens,
            issuer,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer<S> {
        &self.issuer
    }

    /// Issues a pair that starts a new family and records its refresh token
    pub async fn start_family(&self, identity: &Identity) -> DomainResult<TokenPair> {
        let now = Utc::now();
        let family_id = Uuid::new_v4();
        let pair = self.issuer.issue_at(&identity.claims(), now)?;

        let stored = self
            .tokens
            .insert(RefreshTokenRecord::for_pair(&pair, identity.id, family_id, now))
            .await?;
        if !stored {
            return Err(DomainError::Internal {
                message: format!("Fresh refresh token family {} is already revoked", family_id),
            });
        }

        debug!(identity_id = %identity.id, family_id = %family_id, "Started refresh token family");
        Ok(pair)
    }

    /// Rotates `token` into a new pair of the same family
    ///
    /// The store is consulted before expiry is judged, so a replayed token is
    /// treated as reuse whether or not it has expired since.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The presented token is now consumed
    /// * `Err(TokenError::UnknownToken)` - Bad signature, unknown, already used,
    ///   lost a race or its family was revoked mid-rotation
    /// * `Err(TokenError::ExpiredToken)` - The token is on record but past its expiry
    pub async fn refresh(&self, token: &str) -> DomainResult<TokenPair> {
        let now = Utc::now();
        let token_hash = hash_token(token);

        let verified = match self.issuer.verify_refresh(token) {
            Ok(claims) => Some(claims),
            Err(DomainError::Token(TokenError::ExpiredToken)) => None,
            Err(_) => {
                debug!("Refresh token failed verification");
                return Err(TokenError::UnknownToken.into());
            }
        };

        let record = match self.tokens.find(&token_hash).await? {
            Some(record) => record,
            None => {
                debug!(expired = verified.is_none(), "Refresh token is not on record");
                return Err(TokenError::UnknownToken.into());
            }
        };

        if record.is_consumed() {
            let revoked = self.tokens.revoke_family(record.family_id, now).await?;
            warn!(
                identity_id = %record.identity_id,
                family_id = %record.family_id,
                revoked,
                "Refresh token reuse detected, family revoked"
            );
            return Err(TokenError::UnknownToken.into());
        }

        let claims = match verified {
            Some(claims) if !record.is_expired_at(now) => claims,
            _ => {
                self.tokens.consume(&token_hash, now).await?;
                return Err(TokenError::ExpiredToken.into());
            }
        };

        if claims.sub != record.identity_id.to_string() {
            self.tokens.revoke_family(record.family_id, now).await?;
            warn!(
                identity_id = %record.identity_id,
                family_id = %record.family_id,
                "Refresh token subject does not match its record, family revoked"
            );
            return Err(TokenError::UnknownToken.into());
        }

        // Consume before the successor exists; a failure past this point leaves the family dead
        if !self.tokens.consume(&token_hash, now).await? {
            debug!(family_id = %record.family_id, "Lost rotation race");
            return Err(TokenError::UnknownToken.into());
        }

        let identity = match self.identities.find_by_id(record.identity_id).await? {
            Some(identity) => identity,
            None => {
                self.tokens.revoke_family(record.family_id, now).await?;
                warn!(
                    identity_id = %record.identity_id,
                    family_id = %record.family_id,
                    "Refresh token owner no longer exists, family revoked"
                );
                return Err(TokenError::UnknownToken.into());
            }
        };

        let pair = self.issuer.issue_at(&identity.claims(), now)?;
        let stored = self
            .tokens
            .insert(RefreshTokenRecord::for_pair(&pair, identity.id, record.family_id, now))
            .await?;
        if !stored {
            warn!(
                identity_id = %identity.id,
                family_id = %record.family_id,
                "Family revoked during rotation, successor discarded"
            );
            return Err(TokenError::UnknownToken.into());
        }

        info!(identity_id = %identity.id, family_id = %record.family_id, "Rotated refresh token");
        Ok(pair)
    }

    /// Revokes a single refresh token
    ///
    /// Returns `true` if the token was live and is now revoked.
    pub async fn revoke(&self, token: &str) -> DomainResult<bool> {
        let revoked = self.tokens.consume(&hash_token(token), Utc::now()).await?;
        debug!(revoked, "Refresh token revocation");
        Ok(revoked)
    }

    /// Revokes every refresh token of an identity
    pub async fn revoke_all(&self, identity_id: Uuid) -> DomainResult<usize> {
        let revoked = self
            .tokens
            .revoke_all_for_identity(identity_id, Utc::now())
            .await?;
        info!(identity_id = %identity_id, revoked, "Revoked all refresh tokens");
        Ok(revoked)
    }

    /// Drops records past their expiry
    pub async fn purge_expired(&self) -> DomainResult<usize> {
        let removed = self.tokens.delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Purged expired refresh tokens");
        }
        Ok(removed)
    }
}
