//! Parsing utilities for operator input.
//!
//! This module provides reusable parsing and validation for voltage entries
//! and pin counts as they come in from the CLI.

use crate::error::{Result, TesterError};

/// Pin counts the entry form supports.
pub const ALLOWED_PIN_COUNTS: [usize; 5] = [2, 3, 4, 6, 8];

// =============================================================================
// Voltage Parsing
// =============================================================================

/// Round a voltage to 2 decimal places.
///
/// All entries are rounded at entry time; comparisons operate on the rounded
/// values.
pub fn round_voltage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a single voltage entry.
///
/// # Arguments
/// * `input` - Raw text from one pin entry field
///
/// # Returns
/// The voltage rounded to 2 decimals
///
/// # Example
/// ```
/// use voltsig::utils::parsing::parse_voltage;
///
/// assert_eq!(parse_voltage("5.196").unwrap(), 5.2);
/// assert_eq!(parse_voltage(" 0.7 ").unwrap(), 0.7);
/// assert!(parse_voltage("5v").is_err());
/// ```
pub fn parse_voltage(input: &str) -> Result<f64> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| TesterError::InvalidVoltage(input.trim().to_string()))?;

    if !value.is_finite() {
        return Err(TesterError::InvalidVoltage(input.trim().to_string()));
    }

    Ok(round_voltage(value))
}

/// Parse a full set of voltage entries, one per pin.
///
/// Fails on the first non-numeric entry; no partial result is returned.
pub fn parse_voltages(inputs: &[String]) -> Result<Vec<f64>> {
    inputs.iter().map(|s| parse_voltage(s)).collect()
}

// =============================================================================
// Pin Count Validation
// =============================================================================

/// Validate an entered pin count against the supported set {2, 3, 4, 6, 8}.
pub fn validate_pin_count(count: usize) -> Result<usize> {
    if ALLOWED_PIN_COUNTS.contains(&count) {
        Ok(count)
    } else {
        Err(TesterError::InvalidPinCount(count))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_voltage_rounds_to_two_decimals() {
        assert_eq!(parse_voltage("5.196").unwrap(), 5.2);
        assert_eq!(parse_voltage("3.333").unwrap(), 3.33);
        assert_eq!(parse_voltage("-0.125").unwrap(), -0.13); // ties round away from zero
    }

    #[test]
    fn test_parse_voltage_accepts_whitespace() {
        assert_eq!(parse_voltage("  12.0\t").unwrap(), 12.0);
    }

    #[test]
    fn test_parse_voltage_rejects_garbage() {
        assert!(parse_voltage("").is_err());
        assert!(parse_voltage("5v").is_err());
        assert!(parse_voltage("3,3").is_err());
        assert!(parse_voltage("NaN").is_err());
        assert!(parse_voltage("inf").is_err());
    }

    #[test]
    fn test_parse_voltages_all_or_nothing() {
        let inputs = vec!["5.0".to_string(), "oops".to_string(), "0.0".to_string()];
        let err = parse_voltages(&inputs).unwrap_err();
        assert!(matches!(err, TesterError::InvalidVoltage(s) if s == "oops"));
    }

    #[test]
    fn test_validate_pin_count() {
        for count in [2, 3, 4, 6, 8] {
            assert_eq!(validate_pin_count(count).unwrap(), count);
        }
        assert!(validate_pin_count(0).is_err());
        assert!(validate_pin_count(5).is_err());
        assert!(validate_pin_count(16).is_err());
    }
}
