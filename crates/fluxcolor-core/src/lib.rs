//! # fluxcolor-core
//!
//! Photometric fluxes and colors, and the engine that derives what was
//! never measured.
//!
//! A [`Fluxes`] collection holds raw single-band measurements ([`Flux`]) and
//! two-band differences ([`Color`]). Each color is expanded into a linked
//! pair of synthetic magnitudes, so the collection implicitly carries a graph
//! between wavebands. Queries walk that graph:
//!
//! ```
//! use fluxcolor_core::{Color, ColorOptions, ColorQuery, Flux, FluxOptions, FluxQuery, Fluxes, Observation};
//!
//! let j = Flux::new(1.0, "mag", "J", FluxOptions::new()).expect("flux");
//! let jk = Color::new("J", "K", 10.0, ColorOptions::new()).expect("color");
//! let fluxes = Fluxes::new([Observation::from(j), jk.into()]);
//!
//! let k = fluxes.flux("K", &FluxQuery::derived()).expect("query").expect("derivable");
//! assert_eq!(k.quantity("mag").expect("mag"), -9.0);
//!
//! let color = fluxes.color("J", "K", &ColorQuery::new()).expect("query").expect("stored");
//! assert_eq!(color.quantity(), 10.0);
//! ```
//!
//! ## Architectural Constraints
//!
//! - No I/O, no async, no unit conversion between type labels
//! - A query that cannot be answered returns `Ok(None)`
//! - Malformed arguments return `Err(FluxColorError)`

// =============================================================================
// MODULES
// =============================================================================

pub mod color;
pub mod derivation;
pub mod flux;
pub mod fluxes;
pub mod ingestor;
pub mod primitives;
pub mod query;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    FluxColorError, IntoTimestamp, IntoWaveband, Measure, QualityFlags, Timestamp, Waveband,
};

// =============================================================================
// RE-EXPORTS: Values and Collection
// =============================================================================

pub use color::{Color, ColorOptions};
pub use flux::{Flux, FluxOptions};
pub use fluxes::Fluxes;
pub use ingestor::{Ingested, Ingestor, Observation};
pub use query::{ColorQuery, FluxQuery};
