//! Small numeric helpers shared by the report functions.

/// `part / whole * 100`, or `None` when either side is missing or the
/// denominator is zero. Report ratios stay lenient: a bad denominator
/// becomes an empty output cell, never an error.
pub fn ratio_pct(part: Option<i64>, whole: Option<i64>) -> Option<f64> {
    let part = part? as f64;
    let whole = whole? as f64;
    if whole == 0.0 {
        None
    } else {
        Some(part / whole * 100.0)
    }
}

/// Rounds to two decimals for percentage display columns.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Case-insensitive substring match used by the `--location` filter.
pub fn location_matches(location: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(n) => location.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}

/// Maximum of two possibly-missing floats. `f64` has no total order, so
/// `Option::max` is not available here.
pub fn max_rate(current: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(if b > a { b } else { a }),
        (None, b) => b,
        (a, None) => a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_pct() {
        assert_eq!(ratio_pct(Some(1), Some(4)), Some(25.0));
        assert_eq!(ratio_pct(Some(1), Some(0)), None);
        assert_eq!(ratio_pct(None, Some(4)), None);
        assert_eq!(ratio_pct(Some(1), None), None);
    }

    #[test]
    fn test_ratio_pct_can_exceed_one_hundred() {
        assert_eq!(ratio_pct(Some(3), Some(2)), Some(150.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(2.346), 2.35);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_location_matches() {
        assert!(location_matches("United States", Some("states")));
        assert!(location_matches("United States", None));
        assert!(!location_matches("Albania", Some("states")));
    }

    #[test]
    fn test_max_rate() {
        assert_eq!(max_rate(Some(1.0), Some(2.0)), Some(2.0));
        assert_eq!(max_rate(Some(3.0), Some(2.0)), Some(3.0));
        assert_eq!(max_rate(None, Some(2.0)), Some(2.0));
        assert_eq!(max_rate(Some(1.0), None), Some(1.0));
        assert_eq!(max_rate(None, None), None);
    }
}
