//! Unit tests for the in-memory identity repository

use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::errors::DomainError;
use crate::repositories::identity::{IdentityRepository, InMemoryIdentityRepository};

fn identity(name: &str, email: &str) -> Identity {
    Identity::new(name.to_string(), email.to_string(), "$argon2id$digest".to_string())
}

#[tokio::test]
async fn test_create_and_find() {
    let repo = InMemoryIdentityRepository::new();
    let created = repo.create(identity("alice", "alice@x.com")).await.unwrap();

    let by_id = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(by_id.as_ref().map(|i| i.id), Some(created.id));

    let by_email = repo.find_by_email("alice@x.com").await.unwrap();
    assert_eq!(by_email.map(|i| i.name), Some("alice".to_string()));

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    assert!(repo.find_by_email("bob@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_email_or_name_matches_either_field() {
    let repo = InMemoryIdentityRepository::new();
    repo.create(identity("alice", "alice@x.com")).await.unwrap();

    assert!(repo
        .find_by_email_or_name("other@x.com", "alice")
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .find_by_email_or_name("alice@x.com", "other")
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .find_by_email_or_name("other@x.com", "other")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_create_rejects_duplicates() {
    let repo = InMemoryIdentityRepository::new();
    repo.create(identity("alice", "alice@x.com")).await.unwrap();

    let same_email = repo.create(identity("alice2", "alice@x.com")).await;
    assert!(matches!(same_email, Err(DomainError::Duplicate { .. })));

    let same_name = repo.create(identity("alice", "alice2@x.com")).await;
    assert!(matches!(same_name, Err(DomainError::Duplicate { .. })));

    assert_eq!(repo.len().await, 1);
}
