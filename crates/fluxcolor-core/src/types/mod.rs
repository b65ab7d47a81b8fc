//! # Core Type Definitions
//!
//! The collaborator value types consumed by the derivation engine:
//! - Band identity (`Waveband`) and its bucket key
//! - Numbers with an optional symmetric uncertainty (`Measure`)
//! - Quality tagging (`QualityFlags`)
//! - Observation time (`Timestamp`)
//! - Error types (`FluxColorError`)
//! - Boundary conversions (`IntoWaveband`, `IntoTimestamp`)
//!
//! These are deliberately thin. Waveband names are trimmed and validated,
//! never canonicalized beyond that.

use crate::primitives::{DERIVED_FLAG, MAX_WAVEBAND_LENGTH};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Neg;
use thiserror::Error;

/// Observation time attached to fluxes and colors.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// WAVEBAND
// =============================================================================

/// A spectral band, identified by its canonical name (e.g. `"J"`, `"Ks"`).
///
/// Two wavebands are equal when their canonical names are equal.
/// Grouping inside a collection uses only the first character of the name,
/// see [`Waveband::bucket_key`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Waveband {
    name: String,
}

impl Waveband {
    /// Create a waveband from a band name.
    ///
    /// Leading and trailing whitespace is ignored. Returns
    /// `MissingArgument` for an empty name and `TypeMismatch` for a name that
    /// contains whitespace or control characters, or is too long.
    pub fn new(name: &str) -> Result<Self, FluxColorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FluxColorError::MissingArgument("waveband"));
        }
        if name.chars().count() > MAX_WAVEBAND_LENGTH {
            return Err(FluxColorError::TypeMismatch {
                argument: "waveband",
                reason: format!("name longer than {} characters", MAX_WAVEBAND_LENGTH),
            });
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(FluxColorError::TypeMismatch {
                argument: "waveband",
                reason: format!("'{}' is not a valid band name", name.escape_debug()),
            });
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// The canonical descriptive string of this band.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.name
    }

    /// The grouping key: the first character of the canonical name.
    ///
    /// Bands whose names share a first character share a bucket.
    #[must_use]
    pub fn bucket_key(&self) -> char {
        // Construction guarantees a non-empty name.
        self.name.chars().next().unwrap_or_default()
    }
}

impl fmt::Display for Waveband {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for Waveband {
    type Err = FluxColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Waveband {
    type Error = FluxColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Waveband> for String {
    fn from(value: Waveband) -> Self {
        value.name
    }
}

// =============================================================================
// MEASURE
// =============================================================================

/// A numeric quantity with an optional symmetric uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    value: f64,
    error: Option<f64>,
}

impl Measure {
    /// A value with no uncertainty attached.
    #[must_use]
    pub const fn exact(value: f64) -> Self {
        Self { value, error: None }
    }

    /// A value with a symmetric uncertainty. The sign of `error` is dropped.
    #[must_use]
    pub fn with_error(value: f64, error: f64) -> Self {
        Self {
            value,
            error: Some(error.abs()),
        }
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub const fn error(&self) -> Option<f64> {
        self.error
    }

    /// The squared uncertainty, if any.
    #[must_use]
    pub fn variance(&self) -> Option<f64> {
        self.error.map(|e| e * e)
    }

    /// Same value, with a missing uncertainty replaced by zero.
    #[must_use]
    pub fn or_zero_error(self) -> Self {
        Self {
            value: self.value,
            error: Some(self.error.unwrap_or(0.0)),
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.value.is_finite() && self.error.is_none_or(f64::is_finite)
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Self::exact(value)
    }
}

impl From<(f64, f64)> for Measure {
    fn from((value, error): (f64, f64)) -> Self {
        Self::with_error(value, error)
    }
}

impl Neg for Measure {
    type Output = Self;

    /// Negates the value and keeps the uncertainty.
    fn neg(self) -> Self {
        Self {
            value: -self.value,
            error: self.error,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error {
            Some(err) => write!(f, "{} ± {}", self.value, err),
            None => write!(f, "{}", self.value),
        }
    }
}

// =============================================================================
// QUALITY FLAGS
// =============================================================================

/// Boolean quality flags keyed by name.
///
/// The CORE only ever sets [`DERIVED_FLAG`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualityFlags(BTreeMap<String, bool>);

impl QualityFlags {
    /// Flags holding a single key/value pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: bool) -> Self {
        let mut flags = BTreeMap::new();
        flags.insert(key.into(), value);
        Self(flags)
    }

    /// The `{derived: true}` flag set.
    #[must_use]
    pub fn derived() -> Self {
        Self::new(DERIVED_FLAG, true)
    }

    /// Set or overwrite a flag.
    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.get(DERIVED_FLAG).unwrap_or(false)
    }
}

// =============================================================================
// BOUNDARY CONVERSIONS
// =============================================================================

/// Conversion of a caller-supplied band into a [`Waveband`].
///
/// This is the only place a string becomes a waveband. Every public entry
/// point that accepts a band goes through it once, before any bucket work.
pub trait IntoWaveband {
    fn into_waveband(self) -> Result<Waveband, FluxColorError>;
}

impl IntoWaveband for Waveband {
    fn into_waveband(self) -> Result<Waveband, FluxColorError> {
        Ok(self)
    }
}

impl IntoWaveband for &Waveband {
    fn into_waveband(self) -> Result<Waveband, FluxColorError> {
        Ok(self.clone())
    }
}

impl IntoWaveband for &str {
    fn into_waveband(self) -> Result<Waveband, FluxColorError> {
        Waveband::new(self)
    }
}

impl IntoWaveband for String {
    fn into_waveband(self) -> Result<Waveband, FluxColorError> {
        Waveband::new(&self)
    }
}

impl IntoWaveband for &String {
    fn into_waveband(self) -> Result<Waveband, FluxColorError> {
        Waveband::new(self)
    }
}

/// Conversion of a caller-supplied time into a [`Timestamp`].
///
/// Strings are parsed as RFC 3339; anything else is a `TypeMismatch`.
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Result<Timestamp, FluxColorError>;
}

impl IntoTimestamp for Timestamp {
    fn into_timestamp(self) -> Result<Timestamp, FluxColorError> {
        Ok(self)
    }
}

impl IntoTimestamp for &Timestamp {
    fn into_timestamp(self) -> Result<Timestamp, FluxColorError> {
        Ok(*self)
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Result<Timestamp, FluxColorError> {
        DateTime::parse_from_rfc3339(self.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| FluxColorError::TypeMismatch {
                argument: "datetime",
                reason: format!("'{}' is not an RFC 3339 timestamp: {}", self, e),
            })
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by malformed calls.
///
/// A well-formed query that finds nothing is NOT an error; those return
/// `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FluxColorError {
    /// A mandatory argument was absent or empty.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// An argument had the wrong kind of value.
    #[error("Type mismatch for {argument}: {reason}")]
    TypeMismatch {
        argument: &'static str,
        reason: String,
    },

    /// A flux was asked for a type label it never stored.
    #[error("Unknown flux type: {0}")]
    UnknownType(String),
}

// =============================================================================
// TESTS
// =============================================================================
