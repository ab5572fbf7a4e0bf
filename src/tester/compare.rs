//! Tolerance-based comparison of measured voltages against a reference.
//!
//! This module holds the pass/fail logic: per-pin absolute-difference
//! matching, the overall match percentage, and the health verdict.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TesterError};
use crate::storage::types::PinReading;

/// Match percentage at or above which a component is considered healthy.
pub const HEALTHY_THRESHOLD: f64 = 90.0;

/// Overall outcome of a component test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Match percentage at or above [`HEALTHY_THRESHOLD`].
    Healthy,
    /// Too many pins out of tolerance (or missing from the entry).
    PossiblyFaulty,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Healthy => write!(f, "healthy"),
            Verdict::PossiblyFaulty => write!(f, "possibly faulty"),
        }
    }
}

/// One pin's measured value against its reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinComparison {
    /// 1-based pin position.
    pub pin: u32,
    /// Reference voltage from the stored profile.
    pub expected: f64,
    /// Measured voltage as entered (already rounded to 2 decimals).
    pub entered: f64,
    /// Whether the absolute difference stayed within tolerance.
    pub matched: bool,
}

impl PinComparison {
    /// Row status label, as recorded in the result log.
    pub fn status(&self) -> &'static str {
        if self.matched { "OK" } else { "Fail" }
    }
}

/// Full outcome of comparing an entered voltage set against a reference
/// profile.
#[derive(Debug, Clone)]
pub struct TestReport {
    /// Component name the reference was loaded for.
    pub name: String,
    /// One entry per pin that existed in both the entry and the reference,
    /// in pin order. Entered pins with no reference counterpart are absent.
    pub comparisons: Vec<PinComparison>,
    /// Pins that matched within tolerance.
    pub matched: usize,
    /// Total pins in the reference profile (the percentage denominator).
    pub expected_pins: usize,
}

impl TestReport {
    /// Matched pins as a percentage of the reference pin count.
    ///
    /// The denominator is the full reference size, not the number of pins
    /// actually compared: a reference pin missing from the entry lowers the
    /// percentage without producing a mismatch row. Known quirk, kept from
    /// the reference behavior.
    pub fn match_percentage(&self) -> f64 {
        self.matched as f64 / self.expected_pins as f64 * 100.0
    }

    /// Health verdict from the match percentage.
    pub fn verdict(&self) -> Verdict {
        if self.match_percentage() >= HEALTHY_THRESHOLD {
            Verdict::Healthy
        } else {
            Verdict::PossiblyFaulty
        }
    }

    /// Pins whose measured value fell outside tolerance.
    pub fn mismatches(&self) -> Vec<&PinComparison> {
        self.comparisons.iter().filter(|c| !c.matched).collect()
    }
}

/// Compare entered voltages against a reference profile.
///
/// `entered` is ordered, index 0 = pin 1. Entered pins with no counterpart in
/// `expected` are skipped entirely (not matched, not failed, not reported).
///
/// # Errors
/// [`TesterError::EmptyReference`] if `expected` holds no pins; the
/// percentage would be undefined.
pub fn compare_pins(
    name: &str,
    expected: &[PinReading],
    entered: &[f64],
    tolerance: f64,
) -> Result<TestReport> {
    if expected.is_empty() {
        return Err(TesterError::EmptyReference(name.to_string()));
    }

    let reference: HashMap<u32, f64> =
        expected.iter().map(|r| (r.pin, r.voltage)).collect();

    let mut comparisons = Vec::new();
    let mut matched = 0;

    for (i, &value) in entered.iter().enumerate() {
        let pin = (i + 1) as u32;
        let Some(&reference_value) = reference.get(&pin) else {
            continue;
        };

        let is_match = (value - reference_value).abs() <= tolerance;
        if is_match {
            matched += 1;
        }
        comparisons.push(PinComparison {
            pin,
            expected: reference_value,
            entered: value,
            matched: is_match,
        });
    }

    Ok(TestReport {
        name: name.to_string(),
        comparisons,
        matched,
        expected_pins: reference.len(),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(voltages: &[f64]) -> Vec<PinReading> {
        voltages
            .iter()
            .enumerate()
            .map(|(i, &voltage)| PinReading {
                pin: (i + 1) as u32,
                voltage,
            })
            .collect()
    }

    #[test]
    fn test_identical_entry_is_fully_healthy() {
        let expected = reference(&[5.0, 0.7, 3.3, 0.0]);
        let report = compare_pins("LM358", &expected, &[5.0, 0.7, 3.3, 0.0], 0.2).unwrap();

        assert_eq!(report.matched, 4);
        assert_eq!(report.match_percentage(), 100.0);
        assert_eq!(report.verdict(), Verdict::Healthy);
        assert!(report.mismatches().is_empty());
    }

    #[test]
    fn test_out_of_tolerance_pin_fails() {
        let expected = reference(&[5.0, 5.0]);
        let report = compare_pins("REG", &expected, &[5.0, 5.3], 0.2).unwrap();

        assert_eq!(report.matched, 1);
        assert_eq!(report.match_percentage(), 50.0);
        assert_eq!(report.verdict(), Verdict::PossiblyFaulty);

        let mismatches = report.mismatches();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].pin, 2);
        assert_eq!(mismatches[0].expected, 5.0);
        assert_eq!(mismatches[0].entered, 5.3);
        assert_eq!(mismatches[0].status(), "Fail");
    }

    #[test]
    fn test_difference_inside_tolerance_matches() {
        let expected = reference(&[5.0, 5.0]);
        let report = compare_pins("REG", &expected, &[5.0, 5.19], 0.2).unwrap();

        assert_eq!(report.matched, 2);
        assert_eq!(report.match_percentage(), 100.0);
        assert_eq!(report.verdict(), Verdict::Healthy);
    }

    #[test]
    fn test_extra_entered_pins_are_skipped() {
        // Reference has 2 pins; pins 3 and 4 of the entry have nothing to
        // compare against and must not appear anywhere in the report.
        let expected = reference(&[5.0, 0.0]);
        let report = compare_pins("REG", &expected, &[5.0, 0.0, 9.9, 9.9], 0.2).unwrap();

        assert_eq!(report.comparisons.len(), 2);
        assert_eq!(report.matched, 2);
        assert_eq!(report.match_percentage(), 100.0);
    }

    #[test]
    fn test_short_entry_lowers_percentage_without_mismatch_rows() {
        // 8-pin reference, 2-pin entry: both entered pins match, but the
        // percentage is computed over all 8 reference pins.
        let expected = reference(&[5.0, 1.6, 1.6, 0.0, 3.3, 5.0, 0.0, 5.0]);
        let report = compare_pins("NE555", &expected, &[5.0, 1.6], 0.2).unwrap();

        assert_eq!(report.matched, 2);
        assert_eq!(report.match_percentage(), 25.0);
        assert_eq!(report.verdict(), Verdict::PossiblyFaulty);
        // The missing pins never show up as mismatches.
        assert!(report.mismatches().is_empty());
    }

    #[test]
    fn test_ninety_percent_is_healthy() {
        let mut voltages = vec![1.0; 10];
        let expected = reference(&voltages);
        voltages[9] = 9.0; // one pin far out of tolerance
        let report = compare_pins("DIP10", &expected, &voltages, 0.2).unwrap();

        assert_eq!(report.matched, 9);
        assert_eq!(report.match_percentage(), 90.0);
        assert_eq!(report.verdict(), Verdict::Healthy); // threshold is inclusive
    }

    #[test]
    fn test_empty_reference_is_an_error() {
        let err = compare_pins("GHOST", &[], &[5.0], 0.2).unwrap_err();
        assert!(matches!(err, TesterError::EmptyReference(name) if name == "GHOST"));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Healthy.to_string(), "healthy");
        assert_eq!(Verdict::PossiblyFaulty.to_string(), "possibly faulty");
    }
}
