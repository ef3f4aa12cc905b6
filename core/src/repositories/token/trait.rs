//! Refresh token repository trait defining the interface for rotation state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository trait for RefreshTokenRecord persistence operations
///
/// Records are keyed by the SHA-256 hash of the token string. Consuming a
/// record marks it rather than deleting it, so a later presentation of the
/// same token can be recognised as reuse.
///
/// # Security Considerations
/// - Only token hashes are ever handed to the store
/// - `consume` must be atomic: of two concurrent calls for the same hash,
///   exactly one returns `true`
/// - A revoked family stays revoked: `insert` must refuse records of a family
///   revoked earlier, even one revoked while the successor was being issued
/// - Expired records should be periodically removed with `delete_expired`
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Find a record by token hash, consumed or not
    async fn find(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Persist a new record unless its family has been revoked
    ///
    /// # Returns
    /// * `Ok(true)` - The record is stored
    /// * `Ok(false)` - The family is revoked; nothing is stored
    /// * `Err(DomainError::Duplicate)` - A record with the same hash exists
    async fn insert(&self, record: RefreshTokenRecord) -> Result<bool, DomainError>;

    /// Mark the record consumed if it is present and not yet consumed
    ///
    /// # Returns
    /// * `Ok(true)` - This call consumed the record
    /// * `Ok(false)` - Absent, or already consumed by someone else
    async fn consume(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Consume every unconsumed record of a rotation family and refuse
    /// future records of it
    ///
    /// # Returns
    /// Number of records newly consumed
    async fn revoke_family(&self, family_id: Uuid, at: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Consume every unconsumed record belonging to an identity and revoke
    /// the families those records belong to
    async fn revoke_all_for_identity(
        &self,
        identity_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<usize, DomainError>;

    /// Records of an identity that are neither consumed nor expired as of `now`
    async fn find_active_by_identity(
        &self,
        identity_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError>;

    /// Remove records whose expiry has passed as of `now`
    ///
    /// # Returns
    /// Number of records removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
