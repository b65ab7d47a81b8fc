//! # Flux Collection
//!
//! The bucketed store of raw and synthetic fluxes.
//!
//! Entries are grouped by [`Waveband::bucket_key`](crate::Waveband::bucket_key)
//! in a `BTreeMap`, so bucket iteration is lexical. Inside a bucket entries
//! keep insertion order; every scan in this crate takes the first match.
//!
//! Lookups and derivation live in [`derivation`](crate::derivation).

use crate::flux::Flux;
use crate::ingestor::{Ingested, Ingestor, Observation};
use crate::types::{FluxColorError, IntoTimestamp, IntoWaveband};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A collection of fluxes and colors that can answer magnitude and color
/// queries, deriving unmeasured values on demand.
///
/// The collection only grows. Merging or pushing the same data twice stores
/// it twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fluxes {
    /// Bucket key -> entries, in insertion order.
    buckets: BTreeMap<char, Vec<Flux>>,

    /// Bucket key of every raw flux ingested.
    provenance_filters: Vec<char>,

    /// `"<upper>-<lower>"` label of every color ingested.
    provenance_colors: Vec<String>,
}

impl Fluxes {
    /// Build a collection from any mixture of fluxes and colors.
    pub fn new<I, O>(items: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Observation>,
    {
        let mut fluxes = Self::default();
        fluxes.push_fluxes(items);
        fluxes
    }

    /// Add more fluxes and colors, in order.
    pub fn push_fluxes<I, O>(&mut self, items: I)
    where
        I: IntoIterator<Item = O>,
        O: Into<Observation>,
    {
        for item in items {
            self.push(item);
        }
    }

    /// Add a single flux or color.
    pub fn push(&mut self, item: impl Into<Observation>) {
        match Ingestor::ingest(item.into()) {
            Ingested::Flux { flux, raw } => {
                let key = flux.waveband().bucket_key();
                self.buckets.entry(key).or_default().push(flux);
                if raw {
                    self.provenance_filters.push(key);
                }
            }
            Ingested::Color {
                lower,
                upper,
                label,
            } => {
                for flux in [lower, upper] {
                    self.buckets
                        .entry(flux.waveband().bucket_key())
                        .or_default()
                        .push(flux);
                }
                self.provenance_colors.push(label);
            }
        }
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    /// The full bucket mapping.
    #[must_use]
    pub fn all_fluxes(&self) -> &BTreeMap<char, Vec<Flux>> {
        &self.buckets
    }

    /// Every entry, raw and synthetic, in the bucket `waveband` falls in.
    ///
    /// An empty slice when nothing was stored there.
    pub fn fluxes_by_waveband(
        &self,
        waveband: impl IntoWaveband,
    ) -> Result<&[Flux], FluxColorError> {
        let waveband = waveband.into_waveband()?;
        Ok(self.bucket(waveband.bucket_key()))
    }

    /// Bucket keys, in lexical order.
    #[must_use]
    pub fn what_wavebands(&self) -> Vec<char> {
        self.buckets.keys().copied().collect()
    }

    /// Color labels in ingestion order, duplicates included.
    #[must_use]
    pub fn original_colors(&self) -> &[String] {
        &self.provenance_colors
    }

    /// Bucket keys of raw fluxes in ingestion order, duplicates included.
    #[must_use]
    pub fn original_filters(&self) -> &[char] {
        &self.provenance_filters
    }

    /// Total number of stored entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn bucket(&self, key: char) -> &[Flux] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    // =========================================================================
    // BULK MUTATION
    // =========================================================================

    /// Absorb another collection.
    ///
    /// Entries are appended bucket by bucket without deduplication.
    /// Provenance entries are only added when not already present.
    pub fn merge(&mut self, other: &Fluxes) {
        for (key, entries) in &other.buckets {
            self.buckets
                .entry(*key)
                .or_default()
                .extend(entries.iter().cloned());
        }

        for key in &other.provenance_filters {
            if !self.provenance_filters.contains(key) {
                self.provenance_filters.push(*key);
            }
        }

        for label in &other.provenance_colors {
            if !self.provenance_colors.contains(label) {
                self.provenance_colors.push(label.clone());
            }
        }

        tracing::debug!(
            buckets = self.buckets.len(),
            entries = self.len(),
            "merged flux collection"
        );
    }

    /// Stamp every stored entry with `timestamp`, overwriting existing ones.
    pub fn datestamp(&mut self, timestamp: impl IntoTimestamp) -> Result<(), FluxColorError> {
        let timestamp = timestamp.into_timestamp()?;
        for flux in self.buckets.values_mut().flatten() {
            flux.set_datetime(timestamp);
        }
        Ok(())
    }
}

impl<O: Into<Observation>> Extend<O> for Fluxes {
    fn extend<I: IntoIterator<Item = O>>(&mut self, iter: I) {
        self.push_fluxes(iter);
    }
}

impl<O: Into<Observation>> FromIterator<O> for Fluxes {
    fn from_iter<I: IntoIterator<Item = O>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// =============================================================================
// TESTS
// =============================================================================
