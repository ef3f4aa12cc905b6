//! Human-readable expiration spans such as `"20d"`, `"15 minutes"` or `"1.5h"`.
//!
//! Parsing captures the magnitude and the unit token explicitly, then maps the
//! unit token through a single alias table to a canonical [`DurationUnit`].
//! A bare number without a unit is read as seconds.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Unit applied when the input carries no unit token
pub const DEFAULT_UNIT: DurationUnit = DurationUnit::Second;

/// Shortest accepted span. Token expiry is stamped in whole seconds.
pub const MIN_SPAN_MILLIS: i64 = 1_000;

/// Longest accepted span, 200 000 years. Anything issued today plus this
/// still fits a `chrono` timestamp and a JWT `exp`.
pub const MAX_SPAN_MILLIS: i64 = 200_000 * 31_557_600_000;

/// Magnitude, optional spaces, optional unit token
static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<value>[+-]?(?:\d+)?\.?\d+) *(?P<unit>[A-Za-z]+)?$")
        .expect("duration pattern is a valid regex")
});

/// Every accepted unit alias, lowercase, with its canonical unit
const UNIT_ALIASES: &[(&str, DurationUnit)] = &[
    ("milliseconds", DurationUnit::Millisecond),
    ("millisecond", DurationUnit::Millisecond),
    ("msecs", DurationUnit::Millisecond),
    ("msec", DurationUnit::Millisecond),
    ("ms", DurationUnit::Millisecond),
    ("seconds", DurationUnit::Second),
    ("second", DurationUnit::Second),
    ("secs", DurationUnit::Second),
    ("sec", DurationUnit::Second),
    ("s", DurationUnit::Second),
    ("minutes", DurationUnit::Minute),
    ("minute", DurationUnit::Minute),
    ("mins", DurationUnit::Minute),
    ("min", DurationUnit::Minute),
    ("m", DurationUnit::Minute),
    ("hours", DurationUnit::Hour),
    ("hour", DurationUnit::Hour),
    ("hrs", DurationUnit::Hour),
    ("hr", DurationUnit::Hour),
    ("h", DurationUnit::Hour),
    ("days", DurationUnit::Day),
    ("day", DurationUnit::Day),
    ("d", DurationUnit::Day),
    ("weeks", DurationUnit::Week),
    ("week", DurationUnit::Week),
    ("w", DurationUnit::Week),
    ("years", DurationUnit::Year),
    ("year", DurationUnit::Year),
    ("yrs", DurationUnit::Year),
    ("yr", DurationUnit::Year),
    ("y", DurationUnit::Year),
];

/// Errors produced while parsing a duration string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DurationError {
    #[error("invalid duration format: {value:?} (expected an amount such as \"20d\", \"20 days\", \"15m\", \"1w\")")]
    InvalidFormat { value: String },

    #[error("duration must be strictly positive: {value:?}")]
    NonPositiveMagnitude { value: String },

    #[error("duration is shorter than one second: {value:?}")]
    BelowMinimum { value: String },

    #[error("duration is too large to represent: {value:?}")]
    OutOfRange { value: String },
}

/// Canonical time units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Year,
}

impl DurationUnit {
    /// Resolve a unit token (any accepted alias, any case)
    pub fn from_alias(token: &str) -> Option<Self> {
        let token = token.to_ascii_lowercase();
        UNIT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, unit)| *unit)
    }

    /// Short canonical suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            DurationUnit::Millisecond => "ms",
            DurationUnit::Second => "s",
            DurationUnit::Minute => "m",
            DurationUnit::Hour => "h",
            DurationUnit::Day => "d",
            DurationUnit::Week => "w",
            DurationUnit::Year => "y",
        }
    }

    /// Length of one unit in milliseconds. A year is 365.25 days.
    pub fn millis(&self) -> f64 {
        match self {
            DurationUnit::Millisecond => 1.0,
            DurationUnit::Second => 1_000.0,
            DurationUnit::Minute => 60_000.0,
            DurationUnit::Hour => 3_600_000.0,
            DurationUnit::Day => 86_400_000.0,
            DurationUnit::Week => 604_800_000.0,
            DurationUnit::Year => 31_557_600_000.0,
        }
    }
}

/// A validated, strictly positive time span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationSpec {
    magnitude: f64,
    unit: DurationUnit,
}

impl DurationSpec {
    /// Parse an expiration string.
    ///
    /// # Errors
    ///
    /// * [`DurationError::InvalidFormat`] if the input is not an amount with an
    ///   optional recognized unit
    /// * [`DurationError::NonPositiveMagnitude`] if the amount is zero or negative
    /// * [`DurationError::BelowMinimum`] if the span rounds to under one second
    /// * [`DurationError::OutOfRange`] if the span exceeds [`MAX_SPAN_MILLIS`]
    pub fn parse(raw: &str) -> Result<Self, DurationError> {
        let invalid = || DurationError::InvalidFormat {
            value: raw.to_string(),
        };

        let captures = DURATION_PATTERN.captures(raw).ok_or_else(invalid)?;

        let unit = match captures.name("unit") {
            Some(token) => DurationUnit::from_alias(token.as_str()).ok_or_else(invalid)?,
            None => DEFAULT_UNIT,
        };

        let magnitude: f64 = captures["value"].parse().map_err(|_| invalid())?;

        if magnitude <= 0.0 {
            return Err(DurationError::NonPositiveMagnitude {
                value: raw.to_string(),
            });
        }

        let spec = Self { magnitude, unit };
        let millis = spec.total_millis().round();
        if millis > MAX_SPAN_MILLIS as f64 {
            return Err(DurationError::OutOfRange {
                value: raw.to_string(),
            });
        }
        if millis < MIN_SPAN_MILLIS as f64 {
            return Err(DurationError::BelowMinimum {
                value: raw.to_string(),
            });
        }

        Ok(spec)
    }

    /// Build a spec directly from its parts
    pub fn new(magnitude: f64, unit: DurationUnit) -> Result<Self, DurationError> {
        Self::parse(&format!("{}{}", magnitude, unit.suffix()))
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    fn total_millis(&self) -> f64 {
        self.magnitude * self.unit.millis()
    }

    /// Resolve to an absolute span, rounded to the nearest millisecond
    pub fn to_duration(&self) -> Duration {
        Duration::milliseconds(self.total_millis().round() as i64)
    }
}

impl FromStr for DurationSpec {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DurationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

impl Serialize for DurationSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
