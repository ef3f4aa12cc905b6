//! Tests for token pair issuance and verification

use chrono::{Duration, Utc};
use tg_shared::config::{DurationSpec, JwtConfig, Secret};
use uuid::Uuid;

use crate::domain::entities::token::{IdentityClaims, ACCESS_TOKEN_TYPE, REFRESH_TOKEN_TYPE};
use crate::errors::{DomainError, TokenError};
use crate::services::test_support::{issuer, issuer_config, ACCESS_SECRET, REFRESH_SECRET};
use crate::services::token::{JwtSigner, TokenIssuer, TokenSigner};

fn alice() -> IdentityClaims {
    IdentityClaims {
        subject: Uuid::new_v4(),
        name: "alice".to_string(),
        email: "alice@x.com".to_string(),
    }
}

#[test]
fn test_issue_and_verify_access() {
    let issuer = issuer();
    let identity = alice();

    let pair = issuer.issue(&identity).unwrap();
    let claims = issuer.verify_access(&pair.access_token).unwrap();

    assert_eq!(claims.identity_id().unwrap(), identity.subject);
    assert_eq!(claims.name, "alice");
    assert_eq!(claims.email, "alice@x.com");
    assert_eq!(claims.typ, ACCESS_TOKEN_TYPE);
    assert_eq!(claims.exp - claims.iat, 15 * 60);
    assert_eq!(claims.exp, pair.access_expires_at.timestamp());
}

#[test]
fn test_issue_and_verify_refresh() {
    let issuer = issuer();
    let identity = alice();

    let pair = issuer.issue(&identity).unwrap();
    let claims = issuer.verify_refresh(&pair.refresh_token).unwrap();

    assert_eq!(claims.identity_id().unwrap(), identity.subject);
    assert_eq!(claims.typ, REFRESH_TOKEN_TYPE);
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    assert!(pair.refresh_expires_at > pair.access_expires_at);
}

#[test]
fn test_refresh_token_carries_no_profile_claims() {
    let issuer = issuer();
    let pair = issuer.issue(&alice()).unwrap();

    let raw: serde_json::Value = JwtSigner::new()
        .verify(&pair.refresh_token, &issuer.config().refresh_secret)
        .unwrap();

    assert!(raw.get("email").is_none());
    assert!(raw.get("name").is_none());
    assert!(raw.get("sub").is_some());
}

#[test]
fn test_tokens_are_unique_within_same_second() {
    let issuer = issuer();
    let identity = alice();
    let now = Utc::now();

    let first = issuer.issue_at(&identity, now).unwrap();
    let second = issuer.issue_at(&identity, now).unwrap();

    assert_ne!(first.access_token, second.access_token);
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[test]
fn test_tokens_do_not_cross_verify() {
    let issuer = issuer();
    let pair = issuer.issue(&alice()).unwrap();

    assert_eq!(
        issuer.verify_refresh(&pair.access_token),
        Err(DomainError::Token(TokenError::InvalidToken))
    );
    assert_eq!(
        issuer.verify_access(&pair.refresh_token),
        Err(DomainError::Token(TokenError::InvalidToken))
    );
}

#[test]
fn test_wrong_type_with_right_secret_is_rejected() {
    // Same secret on both sides isolates the `typ` check from the signature check
    let mut config = issuer_config();
    config.refresh_secret = Secret::new(ACCESS_SECRET);
    let issuer = TokenIssuer::new(JwtSigner::new(), config);

    let pair = issuer.issue(&alice()).unwrap();

    assert_eq!(
        issuer.verify_refresh(&pair.access_token),
        Err(DomainError::Token(TokenError::InvalidToken))
    );
}

#[test]
fn test_expired_access_token() {
    let issuer = issuer();
    let pair = issuer
        .issue_at(&alice(), Utc::now() - Duration::hours(1))
        .unwrap();

    assert_eq!(
        issuer.verify_access(&pair.access_token),
        Err(DomainError::Token(TokenError::ExpiredToken))
    );
    // The week-long refresh token is still good
    assert!(issuer.verify_refresh(&pair.refresh_token).is_ok());
}

#[test]
fn test_tampered_token_is_invalid() {
    let issuer = issuer();
    let pair = issuer.issue(&alice()).unwrap();

    let mut tampered = pair.access_token.clone();
    tampered.push('x');

    assert_eq!(
        issuer.verify_access(&tampered),
        Err(DomainError::Token(TokenError::InvalidToken))
    );
    assert_eq!(
        issuer.verify_access("not.a.jwt"),
        Err(DomainError::Token(TokenError::InvalidToken))
    );
}

#[test]
fn test_unusable_secret_fails_signing() {
    let mut config = issuer_config();
    config.access_secret = Secret::new("***not base64***");
    let issuer = TokenIssuer::new(JwtSigner::new(), config);

    assert_eq!(
        issuer.issue(&alice()),
        Err(DomainError::Token(TokenError::SigningFailed))
    );
}

#[test]
fn test_overflowing_expiry_fails_signing() {
    let mut config = issuer_config();
    config.refresh_ttl = Duration::days(300_000 * 365);
    let issuer = TokenIssuer::new(JwtSigner::new(), config);

    assert_eq!(
        issuer.issue(&alice()),
        Err(DomainError::Token(TokenError::SigningFailed))
    );
}

#[test]
fn test_from_config() {
    let jwt = JwtConfig {
        access_secret: Secret::new(ACCESS_SECRET),
        access_expires: DurationSpec::parse("15m").unwrap(),
        refresh_secret: Secret::new(REFRESH_SECRET),
        refresh_expires: DurationSpec::parse("20d").unwrap(),
    };
    let issuer = TokenIssuer::from_config(&jwt);

    assert_eq!(issuer.config().access_ttl, Duration::minutes(15));
    assert_eq!(issuer.config().refresh_ttl, Duration::days(20));

    let pair = issuer.issue(&alice()).unwrap();
    let claims = issuer.verify_refresh(&pair.refresh_token).unwrap();
    assert_eq!(claims.exp - claims.iat, 20 * 24 * 60 * 60);
}
