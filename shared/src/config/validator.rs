//! Startup validation of environment-derived settings.
//!
//! Validation is fail-complete: every offending field is reported in a single
//! [`ConfigErrors`] rather than stopping at the first problem.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::auth::JwtConfig;
use super::datastore::{DatastoreConfig, DEFAULT_DATASTORE_HOST, DEFAULT_DATASTORE_PORT};
use super::duration::{DurationError, DurationSpec};
use super::environment::{Environment, LoggingConfig};
use super::secret::{Secret, MIN_SECRET_BYTES};
use super::AppConfig;

/// Setting names
pub mod keys {
    pub const JWT_ACCESS_SECRET: &str = "JWT_ACCESS_SECRET";
    pub const JWT_ACCESS_EXPIRES: &str = "JWT_ACCESS_EXPIRES";
    pub const JWT_REFRESH_SECRET: &str = "JWT_REFRESH_SECRET";
    pub const JWT_REFRESH_EXPIRES: &str = "JWT_REFRESH_EXPIRES";
    pub const PORT: &str = "PORT";
    pub const DATASTORE_HOST: &str = "DATASTORE_HOST";
    pub const DATASTORE_PORT: &str = "DATASTORE_PORT";
    pub const DATASTORE_NAME: &str = "DATASTORE_NAME";
    pub const DATASTORE_USER: &str = "DATASTORE_USER";
    pub const DATASTORE_PASSWORD: &str = "DATASTORE_PASSWORD";
    pub const APP_ENV: &str = "APP_ENV";

    /// Every recognized setting
    pub const ALL: &[&str] = &[
        JWT_ACCESS_SECRET,
        JWT_ACCESS_EXPIRES,
        JWT_REFRESH_SECRET,
        JWT_REFRESH_EXPIRES,
        PORT,
        DATASTORE_HOST,
        DATASTORE_PORT,
        DATASTORE_NAME,
        DATASTORE_USER,
        DATASTORE_PASSWORD,
        APP_ENV,
    ];

    /// Prefixes owned by this service; unknown keys under them are rejected
    pub const RESERVED_PREFIXES: &[&str] = &["JWT_", "DATASTORE_"];
}

/// Lowest port a service may bind without elevated privileges
pub const MIN_PORT: u16 = 1024;

/// Highest valid TCP port
pub const MAX_PORT: u16 = 65535;

/// A single field-level configuration violation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field}: required setting is missing")]
    Missing { field: String },

    #[error("{field}: unknown setting")]
    UnknownKey { field: String },

    #[error("{field}: secret is not valid base64")]
    MalformedSecret { field: String },

    #[error("{field}: secret must decode to at least {min} bytes (got {actual})")]
    WeakSecret {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("{field}: secret must differ from {other}")]
    SharedSecret { field: String, other: String },

    #[error("{field}: {source}")]
    InvalidDuration {
        field: String,
        #[source]
        source: DurationError,
    },

    #[error("{field}: {value:?} is not an integer")]
    NotAnInteger { field: String, value: String },

    #[error("{field}: {value} is outside the allowed range {min}..={max}")]
    PortOutOfRange {
        field: String,
        value: i64,
        min: u16,
        max: u16,
    },

    #[error("{field}: {value:?} is not one of development, production, test")]
    InvalidEnvironment { field: String, value: String },
}

impl ConfigError {
    /// Name of the offending setting
    pub fn field(&self) -> &str {
        match self {
            ConfigError::Missing { field }
            | ConfigError::UnknownKey { field }
            | ConfigError::MalformedSecret { field }
            | ConfigError::WeakSecret { field, .. }
            | ConfigError::SharedSecret { field, .. }
            | ConfigError::InvalidDuration { field, .. }
            | ConfigError::NotAnInteger { field, .. }
            | ConfigError::PortOutOfRange { field, .. }
            | ConfigError::InvalidEnvironment { field, .. } => field,
        }
    }
}

/// Every violation found in one validation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigErrors {
    errors: Vec<ConfigError>,
}

impl ConfigErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Whether any violation names `field`
    pub fn contains_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// Violations grouped by setting name
    pub fn to_field_errors(&self) -> HashMap<String, Vec<String>> {
        let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
        for error in &self.errors {
            field_errors
                .entry(error.field().to_string())
                .or_default()
                .push(error.to_string());
        }
        field_errors
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid setting(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

impl IntoIterator for ConfigErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Keep only the settings this service owns from a process environment
pub fn collect_settings<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(key, _)| {
            keys::ALL.contains(&key.as_str())
                || keys::RESERVED_PREFIXES
                    .iter()
                    .any(|prefix| key.starts_with(prefix))
        })
        .collect()
}

/// Validate a settings map into an [`AppConfig`].
///
/// # Errors
///
/// Returns every violation found: missing or unknown keys, malformed or weak
/// secrets, identical access/refresh secrets, bad durations, ports outside
/// `1024..=65535` and unknown environments.
pub fn validate(raw: &HashMap<String, String>) -> Result<AppConfig, ConfigErrors> {
    let mut errors = ConfigErrors::new();

    let access_secret = secret(raw, keys::JWT_ACCESS_SECRET, &mut errors);
    let access_expires = duration(raw, keys::JWT_ACCESS_EXPIRES, &mut errors);
    let refresh_secret = secret(raw, keys::JWT_REFRESH_SECRET, &mut errors);
    let refresh_expires = duration(raw, keys::JWT_REFRESH_EXPIRES, &mut errors);

    if let (Some(access), Some(refresh)) = (&access_secret, &refresh_secret) {
        if access.decode().ok() == refresh.decode().ok() {
            errors.add(ConfigError::SharedSecret {
                field: keys::JWT_REFRESH_SECRET.to_string(),
                other: keys::JWT_ACCESS_SECRET.to_string(),
            });
        }
    }

    let port = required(raw, keys::PORT, &mut errors).and_then(|value| {
        port_number(keys::PORT, value, &mut errors)
    });

    let datastore_host = optional(raw, keys::DATASTORE_HOST)
        .unwrap_or(DEFAULT_DATASTORE_HOST)
        .to_string();
    let datastore_port = match optional(raw, keys::DATASTORE_PORT) {
        Some(value) => port_number(keys::DATASTORE_PORT, value, &mut errors),
        None => Some(DEFAULT_DATASTORE_PORT),
    };
    let datastore_name = required(raw, keys::DATASTORE_NAME, &mut errors);
    let datastore_user = required(raw, keys::DATASTORE_USER, &mut errors);
    let datastore_password = required(raw, keys::DATASTORE_PASSWORD, &mut errors);

    let environment = required(raw, keys::APP_ENV, &mut errors).and_then(|value| {
        match value.parse::<Environment>() {
            Ok(env) => Some(env),
            Err(_) => {
                errors.add(ConfigError::InvalidEnvironment {
                    field: keys::APP_ENV.to_string(),
                    value: value.to_string(),
                });
                None
            }
        }
    });

    let mut unknown: Vec<&String> = raw
        .keys()
        .filter(|key| !keys::ALL.contains(&key.as_str()))
        .collect();
    unknown.sort();
    for key in unknown {
        errors.add(ConfigError::UnknownKey { field: key.clone() });
    }

    match (
        access_secret,
        access_expires,
        refresh_secret,
        refresh_expires,
        port,
        datastore_port,
        datastore_name,
        datastore_user,
        datastore_password,
        environment,
    ) {
        (
            Some(access_secret),
            Some(access_expires),
            Some(refresh_secret),
            Some(refresh_expires),
            Some(port),
            Some(datastore_port),
            Some(name),
            Some(user),
            Some(password),
            Some(environment),
        ) if errors.is_empty() => Ok(AppConfig {
            environment,
            port,
            jwt: JwtConfig {
                access_secret,
                access_expires,
                refresh_secret,
                refresh_expires,
            },
            datastore: DatastoreConfig {
                host: datastore_host,
                port: datastore_port,
                name: name.to_string(),
                user: user.to_string(),
                password: Secret::new(password),
            },
            logging: LoggingConfig::for_environment(environment),
        }),
        _ => {
            tracing::debug!(violations = errors.len(), "configuration rejected");
            Err(errors)
        }
    }
}

/// Present, non-blank value or `None`
fn optional<'a>(raw: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    raw.get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn required<'a>(
    raw: &'a HashMap<String, String>,
    key: &str,
    errors: &mut ConfigErrors,
) -> Option<&'a str> {
    let value = optional(raw, key);
    if value.is_none() {
        errors.add(ConfigError::Missing {
            field: key.to_string(),
        });
    }
    value
}

fn secret(raw: &HashMap<String, String>, key: &str, errors: &mut ConfigErrors) -> Option<Secret> {
    let secret = Secret::new(required(raw, key, errors)?);
    match secret.decode() {
        Ok(bytes) if bytes.len() >= MIN_SECRET_BYTES => Some(secret),
        Ok(bytes) => {
            errors.add(ConfigError::WeakSecret {
                field: key.to_string(),
                min: MIN_SECRET_BYTES,
                actual: bytes.len(),
            });
            None
        }
        Err(_) => {
            errors.add(ConfigError::MalformedSecret {
                field: key.to_string(),
            });
            None
        }
    }
}

fn duration(
    raw: &HashMap<String, String>,
    key: &str,
    errors: &mut ConfigErrors,
) -> Option<DurationSpec> {
    match DurationSpec::parse(required(raw, key, errors)?) {
        Ok(spec) => Some(spec),
        Err(source) => {
            errors.add(ConfigError::InvalidDuration {
                field: key.to_string(),
                source,
            });
            None
        }
    }
}

fn port_number(key: &str, value: &str, errors: &mut ConfigErrors) -> Option<u16> {
    let parsed = match value.trim().parse::<i64>() {
        Ok(parsed) => parsed,
        Err(_) => {
            errors.add(ConfigError::NotAnInteger {
                field: key.to_string(),
                value: value.to_string(),
            });
            return None;
        }
    };

    if parsed < i64::from(MIN_PORT) || parsed > i64::from(MAX_PORT) {
        errors.add(ConfigError::PortOutOfRange {
            field: key.to_string(),
            value: parsed,
            min: MIN_PORT,
            max: MAX_PORT,
        });
        return None;
    }

    u16::try_from(parsed).ok()
}
