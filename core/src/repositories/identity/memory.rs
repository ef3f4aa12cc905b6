//! In-memory implementation of IdentityRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::errors::DomainError;

use super::r#trait::IdentityRepository;

/// Identity store backed by a map behind an async lock
#[derive(Clone)]
pub struct InMemoryIdentityRepository {
    identities: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl InMemoryIdentityRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            identities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored identities
    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    /// Whether the repository holds no identities
    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }
}

impl Default for InMemoryIdentityRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_email_or_name(
        &self,
        email: &str,
        name: &str,
    ) -> Result<Option<Identity>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .find(|i| i.email == email || i.name == name)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities.values().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities.get(&id).cloned())
    }

    async fn create(&self, identity: Identity) -> Result<Identity, DomainError> {
        let mut identities = self.identities.write().await;

        // Uniqueness is checked under the write lock so racing signups cannot both land
        if identities
            .values()
            .any(|i| i.email == identity.email || i.name == identity.name)
        {
            return Err(DomainError::Duplicate {
                resource: "identity".to_string(),
            });
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }
}
