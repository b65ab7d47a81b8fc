//! # Derivation Engine
//!
//! Magnitude and color lookups on a [`Fluxes`] collection.
//!
//! Every color stored in the collection links two buckets through a pair of
//! synthetic entries. A magnitude that was never measured is derived by
//! following one such link to a bucket that can be resolved, recursively,
//! until a raw measurement (the anchor) is reached:
//!
//! ```text
//!   flux(K) = synthetic(K rel. J) + flux(J)
//!           = -(J-K color)        + raw J
//! ```
//!
//! ## Termination
//!
//! A link is only followed when its reference bucket is anchored: it holds
//! more than one entry, or its sole entry does not point straight back. Two
//! bands joined by nothing but one color are therefore never bounced between.
//! Links into a bucket already on the current derivation path are not
//! followed either, since that call would repeat itself unchanged. There is
//! no depth limit.

use crate::color::Color;
use crate::flux::{Flux, normalize_type};
use crate::fluxes::Fluxes;
use crate::primitives::DEFAULT_FLUX_TYPE;
use crate::query::{ColorQuery, FluxQuery, matches_datetime};
use crate::types::{FluxColorError, IntoWaveband, Measure, Timestamp, Waveband};

impl Fluxes {
    /// Look up a flux for `waveband`.
    ///
    /// Returns the first raw entry in the band's bucket that holds the
    /// requested type (and, when scoped, has exactly the requested
    /// timestamp). When none exists and `query.derived` is set, a magnitude
    /// is derived through stored colors.
    ///
    /// `Ok(None)` means the collection cannot answer; errors are reserved for
    /// malformed arguments.
    pub fn flux(
        &self,
        waveband: impl IntoWaveband,
        query: &FluxQuery,
    ) -> Result<Option<Flux>, FluxColorError> {
        let waveband = waveband.into_waveband()?;
        let flux_type = normalize_type(&query.flux_type)?;
        let mut path = Vec::new();

        Ok(self.resolve(
            &waveband,
            &flux_type,
            query.derived,
            query.datetime.as_ref(),
            &mut path,
        ))
    }

    /// Look up the color `lower - upper`.
    ///
    /// A color stored between exactly these two bands is returned as stored.
    /// Otherwise both magnitudes are resolved (deriving where needed) and
    /// subtracted. Colors are never chained from other colors alone.
    pub fn color(
        &self,
        lower: impl IntoWaveband,
        upper: impl IntoWaveband,
        query: &ColorQuery,
    ) -> Result<Option<Color>, FluxColorError> {
        let lower = lower.into_waveband()?;
        let upper = upper.into_waveband()?;
        let datetime = query.datetime.as_ref();

        let stored = self.bucket(lower.bucket_key()).iter().find(|f| {
            f.reference_waveband() == Some(&upper)
                && f.has_type(DEFAULT_FLUX_TYPE)
                && matches_datetime(datetime, f.datetime())
        });
        if let Some(entry) = stored {
            let measure = entry.measure(DEFAULT_FLUX_TYPE)?;
            let datetime = entry.datetime().copied();
            return Ok(Some(Color::from_parts(lower, upper, measure, datetime)));
        }

        let legs = FluxQuery {
            derived: true,
            datetime: query.datetime,
            ..FluxQuery::default()
        };
        let Some(upper_flux) = self.flux(&upper, &legs)? else {
            tracing::debug!(%lower, %upper, "color: upper band unresolved");
            return Ok(None);
        };
        let Some(lower_flux) = self.flux(&lower, &legs)? else {
            tracing::debug!(%lower, %upper, "color: lower band unresolved");
            return Ok(None);
        };

        let lower_mag = lower_flux.measure(DEFAULT_FLUX_TYPE)?;
        let upper_mag = upper_flux.measure(DEFAULT_FLUX_TYPE)?;
        let value = lower_mag.value() - upper_mag.value();
        let measure = match (lower_mag.variance(), upper_mag.variance()) {
            (Some(a), Some(b)) => Measure::with_error(value, (a + b).sqrt()),
            _ => Measure::exact(value),
        };
        let datetime = match (lower_flux.datetime(), upper_flux.datetime()) {
            (Some(a), Some(b)) if a == b => Some(*a),
            _ => None,
        };

        Ok(Some(Color::from_parts(lower, upper, measure, datetime)))
    }

    // =========================================================================
    // GRAPH WALK
    // =========================================================================

    fn resolve(
        &self,
        waveband: &Waveband,
        flux_type: &str,
        derived: bool,
        datetime: Option<&Timestamp>,
        path: &mut Vec<char>,
    ) -> Option<Flux> {
        let direct = self.bucket(waveband.bucket_key()).iter().find(|f| {
            !f.is_synthetic() && f.has_type(flux_type) && matches_datetime(datetime, f.datetime())
        });
        if let Some(flux) = direct {
            return Some(flux.clone());
        }

        // Links between buckets only ever carry magnitudes.
        if !derived || flux_type != DEFAULT_FLUX_TYPE {
            return None;
        }

        let key = waveband.bucket_key();
        path.push(key);
        let result = self.derive_magnitude(waveband, datetime, path);
        path.pop();
        result
    }

    fn derive_magnitude(
        &self,
        waveband: &Waveband,
        datetime: Option<&Timestamp>,
        path: &mut Vec<char>,
    ) -> Option<Flux> {
        let key = waveband.bucket_key();

        let edge = self.bucket(key).iter().find_map(|f| {
            let reference = f.reference_waveband()?;
            let usable = f.has_type(DEFAULT_FLUX_TYPE)
                && matches_datetime(datetime, f.datetime())
                && self.is_anchored(reference, key, path);
            usable.then_some((f, reference))
        });
        let Some((edge, reference)) = edge else {
            tracing::debug!(%waveband, "no anchored link to derive from");
            return None;
        };
        let edge_mag = edge.measure(DEFAULT_FLUX_TYPE).ok()?;

        tracing::debug!(%waveband, %reference, offset = edge_mag.value(), "following link");

        let Some(anchor) = self.resolve(reference, DEFAULT_FLUX_TYPE, true, datetime, path)
        else {
            tracing::debug!(%waveband, %reference, "link leads to no anchor");
            return None;
        };
        let anchor_mag = anchor.measure(DEFAULT_FLUX_TYPE).ok()?;

        let total = edge_mag.value() + anchor_mag.value();
        let measure = match add_variance(edge_mag.variance(), anchor_mag.variance()) {
            Some(variance) => Measure::with_error(total, variance.sqrt()),
            None => Measure::exact(total),
        };
        let timestamp = datetime.and(anchor.datetime().copied());

        tracing::debug!(%waveband, %measure, "derived magnitude");

        Some(Flux::derived_magnitude(
            measure,
            waveband.clone(),
            None,
            timestamp,
        ))
    }

    /// Whether following a link from bucket `from` to `reference` can lead
    /// somewhere other than straight back.
    fn is_anchored(&self, reference: &Waveband, from: char, path: &[char]) -> bool {
        let reference_key = reference.bucket_key();
        if path.contains(&reference_key) {
            return false;
        }

        match self.bucket(reference_key) {
            [] => false,
            [sole] => sole
                .reference_waveband()
                .is_none_or(|back| back.bucket_key() != from),
            _ => true,
        }
    }
}

/// Sum two optional variances; absent only when both are absent.
fn add_variance(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

// =============================================================================
// TESTS
// =============================================================================
