//! Collinearity and heteroskedasticity diagnostics.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::models::errors::{FitError, FitResult};
use crate::models::ols::{least_squares, rsquared};

/// Variance inflation factor of every column of `x`.
///
/// Column `i` is regressed on the remaining columns with no intercept added,
/// so `x` should hold only the non-constant regressors. `VIF = 1 / (1 - R²)`
/// with the uncentred R² of that auxiliary fit.
pub fn variance_inflation_factors(x: &DMatrix<f64>) -> FitResult<Vec<f64>> {
    if x.ncols() < 2 {
        return Err(FitError::Degenerate(format!(
            "VIF needs at least two columns, got {}",
            x.ncols()
        )));
    }

    (0..x.ncols())
        .map(|i| {
            let target: DVector<f64> = x.column(i).into_owned();
            let others = x.clone().remove_column(i);
            let beta = least_squares(&target, &others)?;
            let ssr = (&target - &others * beta).norm_squared();
            let r2 = rsquared(&target, ssr, false);
            Ok(1.0 / (1.0 - r2))
        })
        .collect()
}

/// Outcome of a Breusch–Pagan test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreuschPagan {
    pub lm: f64,
    pub df: usize,
    pub p_value: f64,
}

/// Koenker's studentised Breusch–Pagan test.
///
/// Squared residuals are regressed on the full design `exog` (constant
/// included when present), `LM = n * R²` against χ²(p - 1). With a
/// single-column design there are no degrees of freedom: the p-value is NaN
/// and callers treat the test as passed rather than errored.
pub fn breusch_pagan(resid: &DVector<f64>, exog: &DMatrix<f64>, has_constant: bool) -> FitResult<BreuschPagan> {
    let squared = resid.map(|r| r * r);
    let gamma = least_squares(&squared, exog)?;
    let ssr = (&squared - exog * gamma).norm_squared();
    let r2 = rsquared(&squared, ssr, has_constant);

    let n = resid.len();
    let lm = n as f64 * r2;
    let df = exog.ncols().saturating_sub(1);

    let p_value = if df == 0 || !lm.is_finite() {
        f64::NAN
    } else {
        ChiSquared::new(df as f64)
            .map_err(|e| FitError::Degenerate(e.to_string()))?
            .sf(lm)
    };

    Ok(BreuschPagan { lm, df, p_value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn orthogonal_columns_have_unit_vif() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0, -1.0]);
        let vifs = variance_inflation_factors(&x).unwrap();
        assert_eq!(vifs.len(), 2);
        assert!(vifs.iter().all(|v| approx_eq(*v, 1.0, 1e-9)));
    }

    #[test]
    fn near_duplicate_columns_inflate() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [1.01, 1.98, 3.02, 3.99, 5.01, 6.0];
        let x = DMatrix::from_fn(6, 2, |r, c| if c == 0 { a[r] } else { b[r] });
        let vifs = variance_inflation_factors(&x).unwrap();
        assert!(vifs.iter().all(|v| *v > 10.0));
    }

    #[test]
    fn vif_needs_two_columns() {
        let x = DMatrix::from_element(5, 1, 1.0);
        assert!(variance_inflation_factors(&x).is_err());
    }

    #[test]
    fn breusch_pagan_flags_growing_variance() {
        let n = 40;
        let x: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        // Residual magnitude grows with x, sign alternates
        let resid = DVector::from_iterator(
            n,
            x.iter().enumerate().map(|(i, v)| if i % 2 == 0 { *v } else { -*v }),
        );
        let exog = DMatrix::from_fn(n, 2, |r, c| if c == 0 { 1.0 } else { x[r] });

        let bp = breusch_pagan(&resid, &exog, true).unwrap();
        assert_eq!(bp.df, 1);
        assert!(bp.lm > 0.0);
        assert!(bp.p_value < 0.05);
    }

    #[test]
    fn breusch_pagan_accepts_unrelated_variance() {
        // Squared residuals [1, 4, 4, 1] repeat against x = [1, 1, 0, 0]: zero correlation
        let n = 40;
        let magnitudes = [1.0, 2.0, 2.0, 1.0];
        let xs = [1.0, 1.0, 0.0, 0.0];
        let resid = DVector::from_iterator(
            n,
            (0..n).map(|i| if i % 3 == 0 { -magnitudes[i % 4] } else { magnitudes[i % 4] }),
        );
        let exog = DMatrix::from_fn(n, 2, |r, c| if c == 0 { 1.0 } else { xs[r % 4] });

        let bp = breusch_pagan(&resid, &exog, true).unwrap();
        assert!(approx_eq(bp.lm, 0.0, 1e-9));
        assert!(bp.p_value > 0.05);
    }

    #[test]
    fn breusch_pagan_without_degrees_of_freedom() {
        let resid = DVector::from_vec(vec![0.5, -0.2, 0.1, -0.4]);
        let exog = DMatrix::from_element(4, 1, 1.0);
        let bp = breusch_pagan(&resid, &exog, true).unwrap();
        assert_eq!(bp.df, 0);
        assert!(bp.p_value.is_nan());
    }
}
