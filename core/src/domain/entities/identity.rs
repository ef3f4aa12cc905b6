//! Identity entity representing a registered account.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::IdentityClaims;

/// A registered account.
///
/// The password hash is never serialized outward and never appears in
/// `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across identities, stored lowercase
    pub email: String,

    /// Self-describing password digest
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Timestamp when the identity was created
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Creates a new identity with a fresh id
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Claims carried by tokens issued to this identity
    pub fn claims(&self) -> IdentityClaims {
        IdentityClaims {
            subject: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_creation() {
        let identity = Identity::new(
            "alice".to_string(),
            "alice@x.com".to_string(),
            "$argon2id$v=19$m=4096,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        );

        assert_eq!(identity.name, "alice");
        assert_eq!(identity.claims().subject, identity.id);
        assert_eq!(identity.claims().email, "alice@x.com");
    }

    #[test]
    fn test_debug_redacts_password_hash() {
        let identity = Identity::new(
            "alice".to_string(),
            "alice@x.com".to_string(),
            "$argon2id$secret-digest".to_string(),
        );

        let rendered = format!("{:?}", identity);
        assert!(rendered.contains("alice@x.com"));
        assert!(!rendered.contains("secret-digest"));
    }

    #[test]
    fn test_serialization_skips_password_hash() {
        let identity = Identity::new(
            "alice".to_string(),
            "alice@x.com".to_string(),
            "$argon2id$secret-digest".to_string(),
        );

        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "alice@x.com");
    }
}
