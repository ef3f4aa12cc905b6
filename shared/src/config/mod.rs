//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT secrets and token lifetimes
//! - `datastore` - Document store coordinates
//! - `duration` - Human-readable expiration spans
//! - `environment` - Environment detection and logging configuration
//! - `secret` - Redacting wrapper for key material
//! - `validator` - Fail-complete validation of raw settings

pub mod auth;
pub mod datastore;
pub mod duration;
pub mod environment;
pub mod secret;
pub mod validator;

use once_cell::sync::OnceCell;
use serde::Serialize;
use thiserror::Error;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use datastore::DatastoreConfig;
pub use duration::{DurationError, DurationSpec, DurationUnit};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use secret::Secret;
pub use validator::{collect_settings, keys, validate, ConfigError, ConfigErrors};

static GLOBAL_CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// Returned when a process-wide configuration is already installed
#[derive(Error, Debug)]
#[error("application configuration is already installed")]
pub struct AlreadyInstalled;

/// Validated, immutable application configuration.
///
/// Built once by [`validate`] before any request is served. Components receive
/// it (or the parts they need) explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    /// Environment tag (`APP_ENV`)
    pub environment: Environment,

    /// Port the service listens on (`PORT`)
    pub port: u16,

    /// Token signing configuration
    pub jwt: JwtConfig,

    /// Datastore coordinates
    pub datastore: DatastoreConfig,

    /// Logging defaults for the environment
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Publish this configuration as the process-wide snapshot.
    ///
    /// Succeeds exactly once per process.
    pub fn install(self) -> Result<&'static AppConfig, AlreadyInstalled> {
        GLOBAL_CONFIG.set(self).map_err(|_| AlreadyInstalled)?;
        GLOBAL_CONFIG.get().ok_or(AlreadyInstalled)
    }

    /// The installed snapshot, if any
    pub fn global() -> Option<&'static AppConfig> {
        GLOBAL_CONFIG.get()
    }
}
