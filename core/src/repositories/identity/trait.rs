//! Identity repository trait defining the interface for account persistence.
//!
//! The store is treated as a key-value store with a handful of lookups.
//! Implementations own uniqueness of email and name.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::errors::DomainError;

/// Repository trait for Identity persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use tg_core::repositories::IdentityRepository;
/// use tg_core::domain::entities::identity::Identity;
/// use tg_core::errors::DomainError;
///
/// struct DocumentIdentityRepository {
///     // datastore client
/// }
///
/// #[async_trait]
/// impl IdentityRepository for DocumentIdentityRepository {
///     async fn find_by_email_or_name(
///         &self,
///         email: &str,
///         name: &str,
///     ) -> Result<Option<Identity>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, DomainError> {
///         Ok(None)
///     }
///
///     async fn create(&self, identity: Identity) -> Result<Identity, DomainError> {
///         Ok(identity)
///     }
/// }
/// ```
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find an identity whose email or display name matches
    ///
    /// # Returns
    /// * `Ok(Some(Identity))` - Either field collides with an existing identity
    /// * `Ok(None)` - Both are free
    /// * `Err(DomainError)` - Store failure
    async fn find_by_email_or_name(
        &self,
        email: &str,
        name: &str,
    ) -> Result<Option<Identity>, DomainError>;

    /// Find an identity by email (already normalized to lowercase)
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError>;

    /// Find an identity by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, DomainError>;

    /// Persist a new identity
    ///
    /// # Returns
    /// * `Ok(Identity)` - The stored identity
    /// * `Err(DomainError::Duplicate)` - Email or name already taken
    /// * `Err(DomainError)` - Store failure
    async fn create(&self, identity: Identity) -> Result<Identity, DomainError>;
}
