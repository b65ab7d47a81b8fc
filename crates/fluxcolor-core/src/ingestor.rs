//! # Ingestor Module
//!
//! Turns raw observations into bucket entries.
//!
//! - A raw flux is stored as-is
//! - A color is expanded into a linked pair of synthetic magnitudes
//! - No deduplication, no unit conversion

use crate::color::Color;
use crate::flux::Flux;
use serde::{Deserialize, Serialize};

/// One raw input to a [`Fluxes`](crate::Fluxes) collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Observation {
    /// A single-band measurement.
    Flux(Flux),
    /// A two-band color.
    Color(Color),
}

impl From<Flux> for Observation {
    fn from(flux: Flux) -> Self {
        Self::Flux(flux)
    }
}

impl From<Color> for Observation {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

/// What a single observation contributes to a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingested {
    /// A flux entry. `raw` is false when the flux already carried a
    /// reference band.
    Flux { flux: Flux, raw: bool },
    /// The two synthetic entries of an expanded color plus its provenance label.
    Color {
        lower: Flux,
        upper: Flux,
        label: String,
    },
}

/// The Ingestor expands observations into storable entries.
pub struct Ingestor;

impl Ingestor {
    /// Reduce one observation to the entries it contributes.
    #[must_use]
    pub fn ingest(observation: Observation) -> Ingested {
        match observation {
            Observation::Flux(flux) => {
                let raw = !flux.is_synthetic();
                tracing::trace!(waveband = %flux.waveband(), raw, "ingesting flux");
                Ingested::Flux { flux, raw }
            }
            Observation::Color(color) => {
                tracing::trace!(color = %color.label(), "expanding color");
                let label = color.label();
                let (lower, upper) = Self::expand_color(&color);
                Ingested::Color {
                    lower,
                    upper,
                    label,
                }
            }
        }
    }

    /// Expand a color into `(lower_flux, upper_flux)`.
    ///
    /// - `lower_flux`: `+quantity`, band `lower`, referenced to `upper`
    /// - `upper_flux`: `-quantity`, band `upper`, referenced to `lower`
    ///
    /// Both are `MAG`, flagged derived, and carry the color's timestamp.
    #[must_use]
    pub fn expand_color(color: &Color) -> (Flux, Flux) {
        let datetime = color.datetime().copied();

        let lower = Flux::synthetic(
            color.measure(),
            color.lower().clone(),
            color.upper().clone(),
            datetime,
        );
        let upper = Flux::synthetic(
            -color.measure(),
            color.upper().clone(),
            color.lower().clone(),
            datetime,
        );

        (lower, upper)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorOptions;
    use crate::flux::FluxOptions;
    use crate::primitives::DEFAULT_FLUX_TYPE;
    use crate::types::{Timestamp, Waveband};

    fn band(name: &str) -> Waveband {
        Waveband::new(name).expect("band")
    }

    #[test]
    fn expand_color_sign_pairing() {
        let color = Color::new("J", "K", (10.0, 0.2), ColorOptions::new()).expect("color");

        let (lower, upper) = Ingestor::expand_color(&color);

        assert_eq!(lower.waveband(), &band("J"));
        assert_eq!(lower.reference_waveband(), Some(&band("K")));
        assert_eq!(lower.quantity(DEFAULT_FLUX_TYPE).expect("mag"), 10.0);
        assert_eq!(lower.error(DEFAULT_FLUX_TYPE).expect("err"), Some(0.2));

        assert_eq!(upper.waveband(), &band("K"));
        assert_eq!(upper.reference_waveband(), Some(&band("J")));
        assert_eq!(upper.quantity(DEFAULT_FLUX_TYPE).expect("mag"), -10.0);
        assert_eq!(upper.error(DEFAULT_FLUX_TYPE).expect("err"), Some(0.2));
    }

    #[test]
    fn expanded_entries_are_derived_and_timestamped() {
        let when = "2021-06-01T00:00:00Z".parse::<Timestamp>().expect("ts");
        let color =
            Color::new("J", "K", 1.0, ColorOptions::new().datetime(when)).expect("color");

        let (lower, upper) = Ingestor::expand_color(&color);

        for flux in [&lower, &upper] {
            assert!(flux.is_derived());
            assert!(flux.is_synthetic());
            assert_eq!(flux.datetime(), Some(&when));
        }
    }

    #[test]
    fn ingest_raw_flux() {
        let flux = Flux::new(1.0, "mag", "J", FluxOptions::new()).expect("flux");

        let ingested = Ingestor::ingest(flux.clone().into());

        assert_eq!(ingested, Ingested::Flux { flux, raw: true });
    }

    #[test]
    fn ingest_flux_with_reference_is_not_raw() {
        let options = FluxOptions::new().reference_waveband(band("K"));
        let flux = Flux::new(1.0, "mag", "J", options).expect("flux");

        let ingested = Ingestor::ingest(flux.into());

        assert!(matches!(ingested, Ingested::Flux { raw: false, .. }));
    }

    #[test]
    fn ingest_color_labels_upper_minus_lower() {
        let color = Color::new("H", "K", 0.3, ColorOptions::new()).expect("color");

        let Ingested::Color { label, .. } = Ingestor::ingest(color.into()) else {
            unreachable!("color observation must expand to a color");
        };

        assert_eq!(label, "K-H");
    }
}
