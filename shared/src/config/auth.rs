//! JWT signing configuration

use serde::Serialize;

use super::duration::DurationSpec;
use super::secret::Secret;

/// Secrets and lifetimes for the two token kinds.
///
/// Access and refresh tokens never share a secret.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JwtConfig {
    /// Secret signing access tokens (`JWT_ACCESS_SECRET`)
    pub access_secret: Secret,

    /// Access token lifetime (`JWT_ACCESS_EXPIRES`)
    pub access_expires: DurationSpec,

    /// Secret signing refresh tokens (`JWT_REFRESH_SECRET`)
    pub refresh_secret: Secret,

    /// Refresh token lifetime (`JWT_REFRESH_EXPIRES`)
    pub refresh_expires: DurationSpec,
}

