use std::f64;

/// Binomial coefficient C(n, k). Saturates at `u64::MAX` rather than overflowing.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    // Symmetry keeps the intermediate products small
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) / (i + 1) is always an integer at every step
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}

/// base^exp for counts, saturating at `u64::MAX`.
pub fn saturating_pow(base: u64, exp: usize) -> u64 {
    let exp = u32::try_from(exp).unwrap_or(u32::MAX);
    base.saturating_pow(exp)
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Largest non-NaN value. `None` when there is nothing to compare.
pub fn nan_max(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
}

/// Sum of squared deviations from the mean
pub fn centered_sum_of_squares(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum()
}

/// Sum of squares about zero
pub fn uncentered_sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_matches_pascal() {
        assert_eq!(binomial(0, 0), 1);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(52, 5), 2_598_960);
    }

    #[test]
    fn binomial_saturates() {
        assert_eq!(binomial(200, 100), u64::MAX);
    }

    #[test]
    fn max_skips_nan() {
        assert_eq!(nan_max(vec![0.1, 0.4, 0.2]), Some(0.4));
        assert_eq!(nan_max(vec![0.1, f64::NAN]), Some(0.1));
        assert_eq!(nan_max(vec![f64::NAN]), None);
        assert_eq!(nan_max(Vec::<f64>::new()), None);
    }

    #[test]
    fn sums_of_squares() {
        let v = [1.0, 2.0, 3.0];
        assert!((centered_sum_of_squares(&v) - 2.0).abs() < 1e-12);
        assert!((uncentered_sum_of_squares(&v) - 14.0).abs() < 1e-12);
    }
}
