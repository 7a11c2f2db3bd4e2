//! Ordinary least squares on a dense design.
//!
//! The main fit demands full column rank and goes through the normal equations
//! (Cholesky), which also yields `(X'X)^-1` for the standard errors. Auxiliary
//! regressions used by the diagnostics go through [`least_squares`], an SVD
//! solve that tolerates rank deficiency.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::models::errors::{FitError, FitResult};
use crate::utils::maths_utils::{centered_sum_of_squares, uncentered_sum_of_squares};

/// Everything the scorer needs from one OLS fit.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub params: DVector<f64>,
    pub bse: DVector<f64>,
    pub pvalues: DVector<f64>,
    pub fitted: DVector<f64>,
    pub resid: DVector<f64>,
    pub n_obs: usize,
    pub df_resid: usize,
    pub ssr: f64,
    pub rsquared: f64,
    pub rsquared_adj: f64,
    pub llf: f64,
    pub aic: f64,
    pub bic: f64,
}

/// Singular values at or below this are treated as zero.
fn rank_tolerance(singular_values: &DVector<f64>, rows: usize, cols: usize) -> f64 {
    let max_sv = singular_values.iter().cloned().fold(0.0_f64, f64::max);
    max_sv * rows.max(cols) as f64 * f64::EPSILON
}

fn check_inputs(y: &DVector<f64>, x: &DMatrix<f64>) -> FitResult<()> {
    if x.ncols() == 0 {
        return Err(FitError::EmptyDesign);
    }
    if x.nrows() != y.len() {
        return Err(FitError::DimensionMismatch {
            rows: x.nrows(),
            response_len: y.len(),
        });
    }
    if y.iter().chain(x.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }
    Ok(())
}

/// R² of a fit. Centred (about the mean of `y`) when the design has an intercept.
pub fn rsquared(y: &DVector<f64>, ssr: f64, centered: bool) -> f64 {
    let tss = if centered {
        centered_sum_of_squares(y.as_slice())
    } else {
        uncentered_sum_of_squares(y.as_slice())
    };
    1.0 - ssr / tss
}

/// Minimum-norm least-squares solution of `x * beta = y`.
pub fn least_squares(y: &DVector<f64>, x: &DMatrix<f64>) -> FitResult<DVector<f64>> {
    check_inputs(y, x)?;
    let svd = x.clone().svd(true, true);
    let eps = rank_tolerance(&svd.singular_values, x.nrows(), x.ncols());
    svd.solve(y, eps)
        .map_err(|msg| FitError::Degenerate(msg.to_string()))
}

/// Fits `y` on `x`. `has_constant` only changes how R² is centred.
pub fn fit(y: &DVector<f64>, x: &DMatrix<f64>, has_constant: bool) -> FitResult<OlsFit> {
    check_inputs(y, x)?;

    let n = x.nrows();
    let p = x.ncols();

    let singular_values = x.singular_values();
    let tol = rank_tolerance(&singular_values, n, p);
    let rank = singular_values.iter().filter(|sv| **sv > tol).count();
    if rank < p {
        return Err(FitError::Singular { rank, columns: p });
    }
    if n <= p {
        return Err(FitError::Degenerate(format!(
            "{} observations for {} parameters leaves no residual degrees of freedom",
            n, p
        )));
    }

    let xt = x.transpose();
    let chol = (&xt * x)
        .cholesky()
        .ok_or(FitError::Singular { rank, columns: p })?;
    let params = chol.solve(&(&xt * y));
    let xtx_inv = chol.inverse();

    let fitted = x * &params;
    let resid = y - &fitted;
    let ssr = resid.norm_squared();
    let df_resid = n - p;
    let sigma2 = ssr / df_resid as f64;

    let bse = DVector::from_iterator(p, (0..p).map(|i| (sigma2 * xtx_inv[(i, i)]).sqrt()));

    let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
        .map_err(|e| FitError::Degenerate(e.to_string()))?;
    let pvalues = params.zip_map(&bse, |b, se| 2.0 * t_dist.sf((b / se).abs()));

    let r2 = rsquared(y, ssr, has_constant);
    let k_const = if has_constant { 1.0 } else { 0.0 };
    let rsquared_adj = 1.0 - (n as f64 - k_const) / df_resid as f64 * (1.0 - r2);

    let nf = n as f64;
    let llf = -nf / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / nf).ln() + 1.0);
    let aic = -2.0 * llf + 2.0 * p as f64;
    let bic = -2.0 * llf + p as f64 * nf.ln();

    Ok(OlsFit {
        params,
        bse,
        pvalues,
        fitted,
        resid,
        n_obs: n,
        df_resid,
        ssr,
        rsquared: r2,
        rsquared_adj,
        llf,
        aic,
        bic,
    })
}
