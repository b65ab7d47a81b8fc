//! # Query Module
//!
//! Parameter structs for collection lookups.
//!
//! - `FluxQuery`: type label, whether to derive, optional time scope
//! - `ColorQuery`: optional time scope

use crate::primitives::DEFAULT_FLUX_TYPE;
use crate::types::Timestamp;

/// Parameters for [`Fluxes::flux`](crate::Fluxes::flux).
///
/// Defaults: type `MAG`, no derivation, no time scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluxQuery {
    /// Type label to match, case-insensitive.
    pub flux_type: String,
    /// Fall back to a derivation through colors when nothing raw is stored.
    pub derived: bool,
    /// Only accept entries observed at exactly this time.
    pub datetime: Option<Timestamp>,
}

impl Default for FluxQuery {
    fn default() -> Self {
        Self {
            flux_type: DEFAULT_FLUX_TYPE.to_string(),
            derived: false,
            datetime: None,
        }
    }
}

impl FluxQuery {
    /// A direct magnitude lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A magnitude lookup that may derive through colors.
    #[must_use]
    pub fn derived() -> Self {
        Self {
            derived: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, flux_type: impl Into<String>) -> Self {
        self.flux_type = flux_type.into();
        self
    }

    #[must_use]
    pub fn with_derived(mut self, derived: bool) -> Self {
        self.derived = derived;
        self
    }

    #[must_use]
    pub fn at(mut self, datetime: Timestamp) -> Self {
        self.datetime = Some(datetime);
        self
    }
}

/// Parameters for [`Fluxes::color`](crate::Fluxes::color).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorQuery {
    /// Only accept entries observed at exactly this time.
    pub datetime: Option<Timestamp>,
}

impl ColorQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn at(mut self, datetime: Timestamp) -> Self {
        self.datetime = Some(datetime);
        self
    }
}

/// Whether an entry's timestamp satisfies an optional time scope.
pub(crate) fn matches_datetime(scope: Option<&Timestamp>, entry: Option<&Timestamp>) -> bool {
    match scope {
        None => true,
        Some(wanted) => entry == Some(wanted),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_query_defaults() {
        let q = FluxQuery::new();
        assert_eq!(q.flux_type, "MAG");
        assert!(!q.derived);
        assert_eq!(q.datetime, None);
    }

    #[test]
    fn flux_query_helpers() {
        let when = "2019-05-05T05:05:05Z".parse::<Timestamp>().expect("ts");
        let q = FluxQuery::derived().with_type("flux").at(when);
        assert!(q.derived);
        assert_eq!(q.flux_type, "flux");
        assert_eq!(q.datetime, Some(when));

        assert!(!FluxQuery::derived().with_derived(false).derived);
    }

    #[test]
    fn datetime_scope() {
        let a = "2019-05-05T05:05:05Z".parse::<Timestamp>().expect("ts");
        let b = "2019-05-06T05:05:05Z".parse::<Timestamp>().expect("ts");

        assert!(matches_datetime(None, None));
        assert!(matches_datetime(None, Some(&a)));
        assert!(matches_datetime(Some(&a), Some(&a)));
        assert!(!matches_datetime(Some(&a), Some(&b)));
        assert!(!matches_datetime(Some(&a), None));
    }

    #[test]
    fn color_query_scope() {
        let when = "2019-05-05T05:05:05Z".parse::<Timestamp>().expect("ts");
        assert_eq!(ColorQuery::new().datetime, None);
        assert_eq!(ColorQuery::new().at(when).datetime, Some(when));
    }
}
