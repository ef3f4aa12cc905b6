//! End-to-end credential flows over the in-memory stores

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tg_core::domain::entities::token::hash_token;
use tg_core::{
    AuthError, CredentialGateway, CredentialGatewayConfig, DomainError, InMemoryIdentityRepository,
    InMemoryRefreshTokenRepository, PasswordHasher, PasswordHasherConfig, RefreshRotator,
    RefreshTokenRecord, RefreshTokenRepository, TokenError, TokenIssuer,
};
use tg_shared::config::{validate, AppConfig};

type Rotator = RefreshRotator<InMemoryIdentityRepository, InMemoryRefreshTokenRepository>;
type Gateway = CredentialGateway<InMemoryIdentityRepository, InMemoryRefreshTokenRepository>;

struct Engine {
    tokens: Arc<InMemoryRefreshTokenRepository>,
    rotator: Arc<Rotator>,
    gateway: Gateway,
}

fn settings() -> HashMap<String, String> {
    [
        ("JWT_ACCESS_SECRET", "YWNjZXNzLXNpZ25pbmcta2V5LTAxMjM0NTY3ODk="),
        ("JWT_ACCESS_EXPIRES", "15m"),
        ("JWT_REFRESH_SECRET", "cmVmcmVzaC1zaWduaW5nLWtleS0wMTIzNDU2Nzg5"),
        ("JWT_REFRESH_EXPIRES", "20d"),
        ("PORT", "3000"),
        ("DATASTORE_NAME", "tokengate"),
        ("DATASTORE_USER", "gate"),
        ("DATASTORE_PASSWORD", "hunter2"),
        ("APP_ENV", "test"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn engine() -> Engine {
    let config: AppConfig = validate(&settings()).unwrap();

    let identities = Arc::new(InMemoryIdentityRepository::new());
    let tokens = Arc::new(InMemoryRefreshTokenRepository::new());
    let issuer = Arc::new(TokenIssuer::from_config(&config.jwt));
    let rotator = Arc::new(RefreshRotator::new(
        Arc::clone(&identities),
        Arc::clone(&tokens),
        issuer,
    ));
    let hasher = PasswordHasher::new(PasswordHasherConfig::new(1024, 1, 1)).unwrap();
    let gateway = CredentialGateway::new(
        identities,
        Arc::clone(&rotator),
        hasher,
        CredentialGatewayConfig::default(),
    );

    Engine {
        tokens,
        rotator,
        gateway,
    }
}

#[tokio::test]
async fn test_signup_login_refresh_scenario() {
    let engine = engine();

    engine.gateway.signup("alice", "alice@x.com", "pw").await.unwrap();
    assert_eq!(
        engine.gateway.signup("alice", "alice@x.com", "pw").await,
        Err(DomainError::Auth(AuthError::Conflict))
    );

    let pair = engine.gateway.login("alice@x.com", "pw").await.unwrap();
    assert_eq!(
        engine.gateway.login("alice@x.com", "wrong").await,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    );

    let rotated = engine.rotator.refresh(&pair.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, pair.refresh_token);
    assert_eq!(
        engine.rotator.refresh(&pair.refresh_token).await,
        Err(DomainError::Token(TokenError::UnknownToken))
    );
}

#[tokio::test]
async fn test_lifetimes_follow_configuration() {
    let engine = engine();
    engine.gateway.signup("alice", "alice@x.com", "pw").await.unwrap();

    let before = Utc::now();
    let pair = engine.gateway.login("alice@x.com", "pw").await.unwrap();

    let access_ttl = pair.access_expires_at - before;
    let refresh_ttl = pair.refresh_expires_at - before;
    assert!(access_ttl <= Duration::minutes(15) && access_ttl > Duration::minutes(14));
    assert!(refresh_ttl <= Duration::days(20) && refresh_ttl > Duration::days(19));
}

#[tokio::test]
async fn test_concurrent_refresh_yields_exactly_one_pair() {
    let engine = engine();
    engine.gateway.signup("alice", "alice@x.com", "pw").await.unwrap();
    let pair = engine.gateway.login("alice@x.com", "pw").await.unwrap();

    let first = {
        let rotator = Arc::clone(&engine.rotator);
        let token = pair.refresh_token.clone();
        tokio::spawn(async move { rotator.refresh(&token).await })
    };
    let second = {
        let rotator = Arc::clone(&engine.rotator);
        let token = pair.refresh_token.clone();
        tokio::spawn(async move { rotator.refresh(&token).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == DomainError::Token(TokenError::UnknownToken)));
}

#[tokio::test]
async fn test_reuse_of_rotated_token_kills_the_chain() {
    let engine = engine();
    engine.gateway.signup("alice", "alice@x.com", "pw").await.unwrap();

    let original = engine.gateway.login("alice@x.com", "pw").await.unwrap();
    let rotated = engine.rotator.refresh(&original.refresh_token).await.unwrap();

    // An attacker replays the stolen original
    assert!(engine.rotator.refresh(&original.refresh_token).await.is_err());

    assert_eq!(
        engine.rotator.refresh(&rotated.refresh_token).await,
        Err(DomainError::Token(TokenError::UnknownToken))
    );
}

#[tokio::test]
async fn test_expired_refresh_token_is_reported_as_expired() {
    let engine = engine();
    let identity = engine.gateway.signup("alice", "alice@x.com", "pw").await.unwrap();

    let issued_at = Utc::now() - Duration::days(21);
    let pair = engine
        .rotator
        .issuer()
        .issue_at(&identity.claims(), issued_at)
        .unwrap();
    engine
        .tokens
        .insert(RefreshTokenRecord::for_pair(
            &pair,
            identity.id,
            uuid::Uuid::new_v4(),
            issued_at,
        ))
        .await
        .unwrap();

    assert_eq!(
        engine.rotator.refresh(&pair.refresh_token).await,
        Err(DomainError::Token(TokenError::ExpiredToken))
    );
    assert_eq!(
        engine.rotator.issuer().verify_access(&pair.access_token),
        Err(DomainError::Token(TokenError::ExpiredToken))
    );

    let record = engine
        .tokens
        .find(&hash_token(&pair.refresh_token))
        .await
        .unwrap()
        .unwrap();
    assert!(record.is_consumed());
    assert_eq!(engine.rotator.purge_expired().await.unwrap(), 1);
}
