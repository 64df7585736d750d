//! Canonical schema constants for captured entries and diagnostics
//!
//! These constants keep configuration keys, bridge field names and the
//! engine's own diagnostic target consistent across crates.

/// Mandatory level-map key used for categories with no matching prefix
pub const DEFAULT_LEVEL_KEY: &str = "Default";

/// Suffix accepted (and ignored) on configured category prefixes
pub const PREFIX_WILDCARD: char = '*';

/// Target used by the engine's own diagnostics
///
/// The tracing bridge never captures events under this target, so the
/// engine cannot feed its own output back into the capture pipeline.
pub const DIAGNOSTICS_TARGET: &str = "logspy";

// Field names
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_ERROR: &str = "error";

/// Rendering used for a null structured value inside a message
pub const NULL_VALUE_TEXT: &str = "(null)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!DEFAULT_LEVEL_KEY.is_empty());
        assert!(!DIAGNOSTICS_TARGET.is_empty());
        assert!(!FIELD_MESSAGE.is_empty());
    }

    #[test]
    fn test_field_names_are_distinct() {
        assert_ne!(FIELD_MESSAGE, FIELD_ERROR);
    }
}
