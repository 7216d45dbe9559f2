/// Result of comparing a scanned value against an expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No expected value to compare against, so nothing to enforce.
    NoExpectation,
    /// Trimmed values are equal.
    Match,
    /// Trimmed values differ.
    Mismatch,
}

/// Tri-state comparison on trimmed strings, case-sensitive.
///
/// A missing or whitespace-only expected value means "no expectation",
/// not "must be empty".
pub fn compare(observed: &str, expected: Option<&str>) -> ScanOutcome {
    let expected = match expected {
        Some(e) if !e.trim().is_empty() => e.trim(),
        _ => return ScanOutcome::NoExpectation,
    };
    if observed.trim() == expected {
        ScanOutcome::Match
    } else {
        ScanOutcome::Mismatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_after_trim_matches() {
        assert_eq!(compare(" X ", Some("X")), ScanOutcome::Match);
        assert_eq!(compare("X", Some("  X  ")), ScanOutcome::Match);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(compare("ABC", Some("abc")), ScanOutcome::Mismatch);
    }

    #[test]
    fn differing_values_mismatch() {
        assert_eq!(compare("LOC-A1", Some("LOC-B2")), ScanOutcome::Mismatch);
    }

    #[test]
    fn absent_expected_is_no_expectation() {
        assert_eq!(compare("anything", None), ScanOutcome::NoExpectation);
    }

    #[test]
    fn blank_expected_is_no_expectation() {
        assert_eq!(compare("anything", Some("")), ScanOutcome::NoExpectation);
        assert_eq!(compare("anything", Some("   ")), ScanOutcome::NoExpectation);
    }

    #[test]
    fn empty_observed_against_expected_mismatches() {
        assert_eq!(compare("", Some("X")), ScanOutcome::Mismatch);
    }
}
