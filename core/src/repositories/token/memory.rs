//! In-memory implementation of RefreshTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenRepository;

#[derive(Default)]
struct TokenState {
    records: HashMap<String, RefreshTokenRecord>,
    revoked_families: HashSet<Uuid>,
}

impl TokenState {
    fn revoke_where<F>(&mut self, at: DateTime<Utc>, belongs: F) -> usize
    where
        F: Fn(&RefreshTokenRecord) -> bool,
    {
        let mut revoked = 0;
        for record in self.records.values_mut().filter(|r| belongs(r)) {
            self.revoked_families.insert(record.family_id);
            if record.consume(at) {
                revoked += 1;
            }
        }
        revoked
    }
}

/// Refresh token store backed by a map behind an async lock.
///
/// Every mutation holds the write lock for its whole read-modify-write, which
/// is what makes `consume` a compare-and-mark and lets `insert` see a
/// revocation that landed mid-rotation.
#[derive(Clone)]
pub struct InMemoryRefreshTokenRepository {
    state: Arc<RwLock<TokenState>>,
}

impl InMemoryRefreshTokenRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(TokenState::default())),
        }
    }

    /// Number of stored records, consumed ones included
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Whether the repository holds no records
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }
}

impl Default for InMemoryRefreshTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn find(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state.records.get(token_hash).cloned())
    }

    async fn insert(&self, record: RefreshTokenRecord) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        if state.records.contains_key(&record.token_hash) {
            return Err(DomainError::Duplicate {
                resource: "refresh token".to_string(),
            });
        }
        if state.revoked_families.contains(&record.family_id) {
            return Ok(false);
        }

        state.records.insert(record.token_hash.clone(), record);
        Ok(true)
    }

    async fn consume(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        Ok(state
            .records
            .get_mut(token_hash)
            .map(|record| record.consume(at))
            .unwrap_or(false))
    }

    async fn revoke_family(&self, family_id: Uuid, at: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;
        state.revoked_families.insert(family_id);
        Ok(state.revoke_where(at, |r| r.family_id == family_id))
    }

    async fn revoke_all_for_identity(
        &self,
        identity_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.revoke_where(at, |r| r.identity_id == identity_id))
    }

    async fn find_active_by_identity(
        &self,
        identity_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .records
            .values()
            .filter(|r| r.identity_id == identity_id && r.is_valid_at(now))
            .cloned()
            .collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;
        let TokenState {
            records,
            revoked_families,
        } = &mut *state;

        let before = records.len();
        records.retain(|_, r| !r.is_expired_at(now));

        // A family with no records left can never be rotated again
        let live: HashSet<Uuid> = records.values().map(|r| r.family_id).collect();
        revoked_families.retain(|family| live.contains(family));

        Ok(before - records.len())
    }
}
