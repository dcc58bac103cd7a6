//! Small statistics helpers over yearly ratio histories.
//!
//! Histories carry `Option<f64>` so missing filings never get mistaken for
//! zeros; every helper documents which values it keeps.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation in percent over the strictly positive values.
/// Fewer than two positive values reads as maximally unstable (100).
pub fn coefficient_of_variation(values: &[Option<f64>]) -> f64 {
    let valid: Vec<f64> = values.iter().flatten().copied().filter(|v| *v > 0.0).collect();
    if valid.len() < 2 {
        return 100.0;
    }
    let m = mean(&valid);
    if m == 0.0 {
        return 100.0;
    }
    std_dev(&valid) / m * 100.0
}

/// Average of filed, non-zero values; 0.0 when nothing qualifies.
pub fn average_nonzero(values: &[Option<f64>]) -> f64 {
    let valid: Vec<f64> = values.iter().flatten().copied().filter(|v| *v != 0.0).collect();
    mean(&valid)
}

/// True when at least 60% of the filed values reach `threshold`.
/// Needs two or more values.
pub fn is_consistent(values: &[Option<f64>], threshold: f64) -> bool {
    let valid: Vec<f64> = values.iter().flatten().copied().collect();
    if valid.len() < 2 {
        return false;
    }
    let passing = valid.iter().filter(|v| **v >= threshold).count();
    passing as f64 >= valid.len() as f64 * 0.6
}

/// Percent change from the mean of the first third of the filed values to
/// the mean of the last third. `None` below three values or when the early
/// mean is zero.
pub fn thirds_change_pct(values: &[Option<f64>]) -> Option<f64> {
    let valid: Vec<f64> = values.iter().flatten().copied().collect();
    let n = valid.len();
    if n < 3 {
        return None;
    }
    let first = mean(&valid[..n / 3]);
    let last = mean(&valid[n - n.div_ceil(3)..]);
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first.abs() * 100.0)
}

/// Share of filed values that are strictly positive, in percent.
pub fn positive_share_pct(values: &[Option<f64>]) -> f64 {
    let valid: Vec<f64> = values.iter().flatten().copied().collect();
    if valid.is_empty() {
        return 0.0;
    }
    valid.iter().filter(|v| **v > 0.0).count() as f64 / valid.len() as f64 * 100.0
}

/// Round for display.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cv_of_flat_series_is_zero() {
        let data = vec![Some(10.0), Some(10.0), Some(10.0)];
        assert_relative_eq!(coefficient_of_variation(&data), 0.0);
    }

    #[test]
    fn test_cv_ignores_missing_and_non_positive() {
        let data = vec![Some(10.0), None, Some(-5.0), Some(0.0), Some(30.0)];
        // positives 10 and 30: mean 20, population sd 10
        assert_relative_eq!(coefficient_of_variation(&data), 50.0);
        assert_relative_eq!(coefficient_of_variation(&[Some(10.0)]), 100.0);
    }

    #[test]
    fn test_average_skips_missing_and_zero() {
        let data = vec![Some(10.0), None, Some(0.0), Some(20.0)];
        assert_relative_eq!(average_nonzero(&data), 15.0);
        assert_relative_eq!(average_nonzero(&[None]), 0.0);
    }

    #[test]
    fn test_consistency_needs_sixty_percent() {
        let data = vec![Some(16.0), Some(18.0), Some(20.0), Some(5.0), Some(4.0)];
        assert!(is_consistent(&data, 15.0));
        let data = vec![Some(16.0), Some(18.0), Some(5.0), Some(5.0), Some(4.0)];
        assert!(!is_consistent(&data, 15.0));
        assert!(!is_consistent(&[Some(20.0)], 15.0));
    }

    #[test]
    fn test_thirds_change() {
        let growing = vec![Some(30.0), Some(32.0), Some(34.0), Some(36.0), Some(40.0), Some(42.0)];
        // first third [30, 32] -> 31, last third [40, 42] -> 41
        assert_relative_eq!(thirds_change_pct(&growing).unwrap(), 1000.0 / 31.0);
        assert!(thirds_change_pct(&[Some(1.0), Some(2.0)]).is_none());
    }

    #[test]
    fn test_positive_share() {
        let data = vec![Some(1.0), Some(-1.0), None, Some(2.0), Some(3.0)];
        assert_relative_eq!(positive_share_pct(&data), 75.0);
    }

    #[test]
    fn test_round_to() {
        assert_relative_eq!(round_to(12.3456, 2), 12.35);
        assert_relative_eq!(round_to(12.34, 1), 12.3);
    }
}
