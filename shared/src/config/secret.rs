//! Signing secret wrapper that keeps key material out of logs

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Serializer};

/// Minimum decoded length of a JWT signing secret, in bytes
pub const MIN_SECRET_BYTES: usize = 20;

/// Base64-encoded signing secret.
///
/// `Debug`, `Display` and `Serialize` never reveal the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    encoded: String,
}

impl Secret {
    /// Wrap an encoded secret without validating it
    pub fn new(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// The base64 text as configured
    pub fn expose(&self) -> &str {
        &self.encoded
    }

    /// Decoded key bytes
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.encoded)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}
