//! JWT signing and verification behind a small trait

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tg_shared::config::Secret;

use crate::errors::TokenError;

/// Signs claims into a compact token and verifies them back.
///
/// Expiry travels inside the claims as `exp`; implementations must reject
/// tokens whose `exp` has passed with [`TokenError::ExpiredToken`] and any
/// other failure with [`TokenError::InvalidToken`].
pub trait TokenSigner: Send + Sync {
    fn sign<C: Serialize>(&self, claims: &C, secret: &Secret) -> Result<String, TokenError>;

    fn verify<C: DeserializeOwned>(&self, token: &str, secret: &Secret) -> Result<C, TokenError>;
}

/// HS256 signer backed by `jsonwebtoken`.
///
/// Secrets are base64-encoded and used as their decoded bytes.
#[derive(Debug, Clone)]
pub struct JwtSigner {
    validation: Validation,
}

impl JwtSigner {
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self { validation }
    }
}

impl Default for JwtSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSigner for JwtSigner {
    fn sign<C: Serialize>(&self, claims: &C, secret: &Secret) -> Result<String, TokenError> {
        let key = EncodingKey::from_base64_secret(secret.expose()).map_err(|e| {
            tracing::error!(error = %e, "Signing secret is not valid base64");
            TokenError::SigningFailed
        })?;

        encode(&Header::new(Algorithm::HS256), claims, &key).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode token");
            TokenError::SigningFailed
        })
    }

    fn verify<C: DeserializeOwned>(&self, token: &str, secret: &Secret) -> Result<C, TokenError> {
        let key = DecodingKey::from_base64_secret(secret.expose()).map_err(|e| {
            tracing::error!(error = %e, "Verification secret is not valid base64");
            TokenError::InvalidToken
        })?;

        decode::<C>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::InvalidToken,
            })
    }
}
