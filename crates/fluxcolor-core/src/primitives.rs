//! # Innate Primitives
//!
//! Compiled-in constants for the fluxcolor CORE.
//!
//! The collection starts with zero data but fixed conventions.
//! These values are immutable at runtime.

/// Type label used for magnitudes.
///
/// - Every synthetic entry produced by color expansion carries this label.
/// - Every derived flux carries this label.
/// - Labels are stored upper-cased, so callers may pass `"mag"`.
pub const DEFAULT_FLUX_TYPE: &str = "MAG";

/// Quality flag key that marks a value as derived rather than measured.
pub const DERIVED_FLAG: &str = "derived";

/// Separator between the upper and lower band in a color label (`"K-J"`).
pub const COLOR_LABEL_SEPARATOR: char = '-';

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for a waveband name.
///
/// Names longer than this are rejected as `TypeMismatch`.
pub const MAX_WAVEBAND_LENGTH: usize = 64;

/// Maximum length for a flux type label.
pub const MAX_TYPE_LABEL_LENGTH: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_type_is_upper_case() {
        assert_eq!(DEFAULT_FLUX_TYPE, DEFAULT_FLUX_TYPE.to_uppercase());
    }

    #[test]
    fn derived_flag_key() {
        assert_eq!(DERIVED_FLAG, "derived");
    }
}
