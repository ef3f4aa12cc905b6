//! Token entities for JWT-based authentication.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// `typ` claim of access tokens
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// `typ` claim of refresh tokens
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Identity attributes a token pair is minted from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Identity id, becomes the `sub` claim
    pub subject: Uuid,
    /// Display name, access token only
    pub name: String,
    /// Email, access token only
    pub email: String,
}

/// Claims structure for access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (identity ID)
    pub sub: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Token type, always `access`
    pub typ: String,
}

impl AccessClaims {
    pub(crate) fn new(identity: &IdentityClaims, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: identity.subject.to_string(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            typ: ACCESS_TOKEN_TYPE.to_string(),
        }
    }

    /// Gets the identity ID from the claims
    pub fn identity_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Claims structure for refresh tokens.
///
/// Carries nothing beyond the subject and bookkeeping claims, so a leaked
/// refresh token discloses no profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (identity ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID, makes every refresh token string unique
    pub jti: String,

    /// Token type, always `refresh`
    pub typ: String,
}

impl RefreshClaims {
    pub(crate) fn new(subject: Uuid, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            typ: REFRESH_TOKEN_TYPE.to_string(),
        }
    }

    /// Gets the identity ID from the claims
    pub fn identity_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Access and refresh token issued together
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// When the access token stops verifying
    pub access_expires_at: DateTime<Utc>,

    /// Signed refresh token
    pub refresh_token: String,

    /// When the refresh token stops verifying
    pub refresh_expires_at: DateTime<Utc>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_token", &"[REDACTED]")
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish()
    }
}

/// Durable record of an issued refresh token.
///
/// Only the SHA-256 hash of the token string is stored. Records issued by
/// successive rotations share a `family_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Hex-encoded SHA-256 of the token string
    pub token_hash: String,

    /// Identity this token belongs to
    pub identity_id: Uuid,

    /// Rotation chain this token belongs to
    pub family_id: Uuid,

    /// Timestamp when the token was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Set once the token has been rotated or revoked
    pub consumed_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Record for the refresh half of a freshly issued pair
    pub fn for_pair(pair: &TokenPair, identity_id: Uuid, family_id: Uuid, issued_at: DateTime<Utc>) -> Self {
        Self {
            token_hash: hash_token(&pair.refresh_token),
            identity_id,
            family_id,
            issued_at,
            expires_at: pair.refresh_expires_at,
            consumed_at: None,
        }
    }

    /// Whether the token has expired as of `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token has been rotated or revoked
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Neither consumed nor expired as of `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_consumed() && !self.is_expired_at(now)
    }

    /// Marks the token as consumed; returns `false` if it already was
    pub fn consume(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_consumed() {
            return false;
        }
        self.consumed_at = Some(at);
        true
    }
}

/// Storage key for a refresh token string
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
