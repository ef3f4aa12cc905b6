//! Password hashing with Argon2id.
//!
//! Digests are PHC strings that embed algorithm, version, parameters and
//! salt, so verification never needs the configuration that produced them.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::{DomainError, DomainResult};

/// Plaintext behind the digest used to equalize unknown-user logins
const DUMMY_PASSWORD: &str = "tokengate-timing-equalizer";

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasherConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub lanes: u32,
}

impl PasswordHasherConfig {
    pub fn new(memory_kib: u32, iterations: u32, lanes: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            lanes,
        }
    }
}

impl Default for PasswordHasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            lanes: Params::DEFAULT_P_COST,
        }
    }
}

/// Hashes and verifies passwords
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_digest: String,
}

impl PasswordHasher {
    /// Builds a hasher, rejecting parameter sets argon2 refuses
    pub fn new(config: PasswordHasherConfig) -> DomainResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.lanes, None)
            .map_err(|e| DomainError::Internal {
                message: format!("Invalid password hashing parameters: {}", e),
            })?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_digest = hash_with(&argon2, DUMMY_PASSWORD)?;

        Ok(Self {
            argon2,
            dummy_digest,
        })
    }

    /// Produces a salted PHC digest of `plaintext`
    pub fn hash(&self, plaintext: &str) -> DomainResult<String> {
        hash_with(&self.argon2, plaintext)
    }

    /// Checks `plaintext` against `digest`.
    ///
    /// Any failure, including a malformed digest, yields `false`.
    pub fn verify(&self, digest: &str, plaintext: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spends one verification's worth of work and always fails
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        // The result is discarded; only the elapsed time matters
        let _ = self.verify(&self.dummy_digest, plaintext);
        false
    }
}

fn hash_with(argon2: &Argon2<'_>, plaintext: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|e| DomainError::Internal {
            message: format!("Password hashing failed: {}", e),
        })
}
