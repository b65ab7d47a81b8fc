//! # Flux
//!
//! One measurement of one physical quantity, under a named type label, for
//! one waveband.
//!
//! A flux with a reference waveband is synthetic: its value is relative to
//! another band and it only ever exists inside a [`Fluxes`](crate::Fluxes)
//! collection, produced by color expansion.

use crate::primitives::{DEFAULT_FLUX_TYPE, MAX_TYPE_LABEL_LENGTH};
use crate::types::{FluxColorError, IntoWaveband, Measure, QualityFlags, Timestamp, Waveband};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Optional fields for [`Flux::new`].
///
/// All fields default to `None`.
#[derive(Debug, Clone, Default)]
pub struct FluxOptions {
    /// Quality flags, e.g. `{derived: true}`.
    pub quality: Option<QualityFlags>,
    /// Band this value is measured relative to. Setting it makes the flux synthetic.
    pub reference_waveband: Option<Waveband>,
    /// Observation time.
    pub datetime: Option<Timestamp>,
}

impl FluxOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn quality(mut self, quality: QualityFlags) -> Self {
        self.quality = Some(quality);
        self
    }

    #[must_use]
    pub fn reference_waveband(mut self, waveband: Waveband) -> Self {
        self.reference_waveband = Some(waveband);
        self
    }

    #[must_use]
    pub fn datetime(mut self, datetime: Timestamp) -> Self {
        self.datetime = Some(datetime);
        self
    }
}

/// A single-band measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flux {
    /// Upper-cased type label -> value.
    values: BTreeMap<String, Measure>,
    waveband: Waveband,
    quality: Option<QualityFlags>,
    reference_waveband: Option<Waveband>,
    datetime: Option<Timestamp>,
}

impl Flux {
    /// Create a flux holding `quantity` under `flux_type` for `waveband`.
    ///
    /// The type label is case-insensitive. Fails with `MissingArgument` for
    /// an empty label or band name and `TypeMismatch` for an invalid band
    /// name or a non-finite quantity.
    pub fn new(
        quantity: impl Into<Measure>,
        flux_type: &str,
        waveband: impl IntoWaveband,
        options: FluxOptions,
    ) -> Result<Self, FluxColorError> {
        let label = normalize_type(flux_type)?;
        let waveband = waveband.into_waveband()?;
        let quantity = quantity.into();
        if !quantity.is_finite() {
            return Err(FluxColorError::TypeMismatch {
                argument: "quantity",
                reason: format!("{} is not a finite number", quantity),
            });
        }

        let mut values = BTreeMap::new();
        values.insert(label, quantity);

        Ok(Self {
            values,
            waveband,
            quality: options.quality,
            reference_waveband: options.reference_waveband,
            datetime: options.datetime,
        })
    }

    /// A synthetic magnitude entry, made from already-validated parts.
    pub(crate) fn synthetic(
        quantity: Measure,
        waveband: Waveband,
        reference_waveband: Waveband,
        datetime: Option<Timestamp>,
    ) -> Self {
        Self::derived_magnitude(quantity, waveband, Some(reference_waveband), datetime)
    }

    /// A magnitude flagged `{derived: true}`.
    pub(crate) fn derived_magnitude(
        quantity: Measure,
        waveband: Waveband,
        reference_waveband: Option<Waveband>,
        datetime: Option<Timestamp>,
    ) -> Self {
        let mut values = BTreeMap::new();
        values.insert(DEFAULT_FLUX_TYPE.to_string(), quantity);
        Self {
            values,
            waveband,
            quality: Some(QualityFlags::derived()),
            reference_waveband,
            datetime,
        }
    }

    /// The stored value for `flux_type`.
    pub fn quantity(&self, flux_type: &str) -> Result<f64, FluxColorError> {
        self.measure(flux_type).map(|m| m.value())
    }

    /// The stored uncertainty for `flux_type`, if the value carries one.
    pub fn error(&self, flux_type: &str) -> Result<Option<f64>, FluxColorError> {
        self.measure(flux_type).map(|m| m.error())
    }

    /// The full value-with-uncertainty for `flux_type`.
    pub fn measure(&self, flux_type: &str) -> Result<Measure, FluxColorError> {
        let label = normalize_type(flux_type)?;
        self.values
            .get(&label)
            .copied()
            .ok_or(FluxColorError::UnknownType(label))
    }

    /// Whether a value is stored under `flux_type`.
    #[must_use]
    pub fn has_type(&self, flux_type: &str) -> bool {
        self.values.contains_key(&flux_type.trim().to_uppercase())
    }

    /// The stored type labels, upper-cased, in lexical order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn waveband(&self) -> &Waveband {
        &self.waveband
    }

    #[must_use]
    pub fn quality(&self) -> Option<&QualityFlags> {
        self.quality.as_ref()
    }

    #[must_use]
    pub fn reference_waveband(&self) -> Option<&Waveband> {
        self.reference_waveband.as_ref()
    }

    #[must_use]
    pub fn datetime(&self) -> Option<&Timestamp> {
        self.datetime.as_ref()
    }

    /// Assign or overwrite the observation time.
    pub fn set_datetime(&mut self, datetime: Timestamp) {
        self.datetime = Some(datetime);
    }

    /// True when this entry was made from a color (it has a reference band).
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.reference_waveband.is_some()
    }

    /// True when the quality flags mark this value as derived.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.quality.as_ref().is_some_and(QualityFlags::is_derived)
    }
}

impl fmt::Display for Flux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.waveband)?;
        for (label, measure) in &self.values {
            write!(f, " {}={}", label, measure)?;
        }
        if let Some(reference) = &self.reference_waveband {
            write!(f, " (rel. {})", reference)?;
        }
        Ok(())
    }
}

/// Validate and upper-case a type label.
pub(crate) fn normalize_type(flux_type: &str) -> Result<String, FluxColorError> {
    let label = flux_type.trim();
    if label.is_empty() {
        return Err(FluxColorError::MissingArgument("type"));
    }
    if label.len() > MAX_TYPE_LABEL_LENGTH {
        return Err(FluxColorError::TypeMismatch {
            argument: "type",
            reason: format!("label longer than {} bytes", MAX_TYPE_LABEL_LENGTH),
        });
    }
    Ok(label.to_uppercase())
}

// =============================================================================
// TESTS
// =============================================================================
