//! # Color
//!
//! A differential measurement between two wavebands.
//!
//! Sign pairing used everywhere in this crate: expanding a color gives the
//! lower band `+quantity` relative to the upper band and the upper band
//! `-quantity` relative to the lower band. A color therefore reads as
//! `lower_mag - upper_mag`.

use crate::primitives::COLOR_LABEL_SEPARATOR;
use crate::types::{FluxColorError, IntoWaveband, Measure, Timestamp, Waveband};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional fields for [`Color::new`].
#[derive(Debug, Clone, Default)]
pub struct ColorOptions {
    /// Observation time. Defaults to `None`.
    pub datetime: Option<Timestamp>,
}

impl ColorOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn datetime(mut self, datetime: Timestamp) -> Self {
        self.datetime = Some(datetime);
        self
    }
}

/// A color between a shorter-wavelength `lower` band and a longer-wavelength
/// `upper` band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    lower: Waveband,
    upper: Waveband,
    quantity: Measure,
    datetime: Option<Timestamp>,
}

impl Color {
    /// Create a color.
    ///
    /// A quantity without an uncertainty is stored with a zero uncertainty.
    pub fn new(
        lower: impl IntoWaveband,
        upper: impl IntoWaveband,
        quantity: impl Into<Measure>,
        options: ColorOptions,
    ) -> Result<Self, FluxColorError> {
        let lower = lower.into_waveband()?;
        let upper = upper.into_waveband()?;
        let quantity = quantity.into();
        if !quantity.is_finite() {
            return Err(FluxColorError::TypeMismatch {
                argument: "quantity",
                reason: format!("{} is not a finite number", quantity),
            });
        }
        Ok(Self::from_parts(
            lower,
            upper,
            quantity.or_zero_error(),
            options.datetime,
        ))
    }

    /// Assemble a color from already-validated parts, keeping the
    /// uncertainty exactly as given.
    pub(crate) fn from_parts(
        lower: Waveband,
        upper: Waveband,
        quantity: Measure,
        datetime: Option<Timestamp>,
    ) -> Self {
        Self {
            lower,
            upper,
            quantity,
            datetime,
        }
    }

    #[must_use]
    pub fn quantity(&self) -> f64 {
        self.quantity.value()
    }

    #[must_use]
    pub fn error(&self) -> Option<f64> {
        self.quantity.error()
    }

    #[must_use]
    pub fn measure(&self) -> Measure {
        self.quantity
    }

    #[must_use]
    pub fn lower(&self) -> &Waveband {
        &self.lower
    }

    #[must_use]
    pub fn upper(&self) -> &Waveband {
        &self.upper
    }

    #[must_use]
    pub fn datetime(&self) -> Option<&Timestamp> {
        self.datetime.as_ref()
    }

    /// Provenance label, `"<upper>-<lower>"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}{}", self.upper, COLOR_LABEL_SEPARATOR, self.lower)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}: {}", self.lower, self.upper, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_gets_zero_uncertainty() {
        let color = Color::new("J", "K", 10.0, ColorOptions::new()).expect("color");

        assert_eq!(color.quantity(), 10.0);
        assert_eq!(color.error(), Some(0.0));
    }

    #[test]
    fn uncertainty_is_kept() {
        let color = Color::new("J", "K", (1.2, 0.05), ColorOptions::new()).expect("color");
        assert_eq!(color.error(), Some(0.05));
    }

    #[test]
    fn label_is_upper_minus_lower() {
        let color = Color::new("J", "K", 1.0, ColorOptions::new()).expect("color");
        assert_eq!(color.label(), "K-J");
        assert_eq!(color.lower().canonical(), "J");
        assert_eq!(color.upper().canonical(), "K");
    }

    #[test]
    fn missing_band_rejected() {
        let result = Color::new("", "K", 1.0, ColorOptions::new());
        assert_eq!(result, Err(FluxColorError::MissingArgument("waveband")));
    }

    #[test]
    fn infinite_quantity_rejected() {
        let result = Color::new("J", "K", f64::INFINITY, ColorOptions::new());
        assert!(result.is_err());
    }

    #[test]
    fn datetime_option() {
        let when = "2020-01-01T00:00:00Z".parse::<Timestamp>().expect("ts");
        let color =
            Color::new("J", "K", 1.0, ColorOptions::new().datetime(when)).expect("color");
        assert_eq!(color.datetime(), Some(&when));
    }
}
