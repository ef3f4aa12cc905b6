//! Shared configuration for the tokengate workspace
//!
//! This crate provides the types every other crate reads at startup:
//! - Duration strings such as `"15m"` parsed into [`DurationSpec`]
//! - Fail-complete validation of environment settings into [`AppConfig`]
//! - Redacting wrappers for secrets

pub mod config;

// Re-export commonly used items at crate root
pub use config::{
    collect_settings, validate, AppConfig, ConfigError, ConfigErrors, DatastoreConfig,
    DurationError, DurationSpec, DurationUnit, Environment, JwtConfig, LogFormat,
    LoggingConfig, Secret,
};
