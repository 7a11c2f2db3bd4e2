//! Metrics and diagnostic verdicts for a completed fit.

use nalgebra::DVector;

use crate::analysis::evaluator::Design;
use crate::config::SEARCH;
use crate::domain::{DiagnosticTest, Metric, SearchConfig, Selection};
use crate::models::diagnostics::{breusch_pagan, variance_inflation_factors};
use crate::models::{FitSummary, MetricValues, OlsFit, TestResults};
use crate::utils::RunLog;
use crate::utils::maths_utils::nan_max;

pub fn summarize(design: &Design, fit: &OlsFit, config: &SearchConfig, model_id: &str, log: &mut RunLog) -> FitSummary {
    let coefficients = design
        .columns
        .iter()
        .cloned()
        .zip(fit.params.iter().copied())
        .collect();
    let p_values = design
        .columns
        .iter()
        .cloned()
        .zip(fit.pvalues.iter().copied())
        .collect();

    let metrics = compute_metrics(&config.metrics, &design.y, fit);
    let test_results = run_diagnostics(config, design, fit, model_id, log);
    let is_valid = test_results.all_passed();

    FitSummary {
        coefficients,
        p_values,
        n_obs: fit.n_obs,
        rsquared: fit.rsquared,
        rsquared_adj: fit.rsquared_adj,
        aic: fit.aic,
        bic: fit.bic,
        metrics,
        test_results,
        is_valid,
    }
}

/// Only the requested metrics are computed.
pub fn compute_metrics(selection: &Selection<Metric>, actual: &DVector<f64>, fit: &OlsFit) -> MetricValues {
    let resid = &fit.resid;
    let n = resid.len() as f64;
    let mut metrics = MetricValues::default();

    if selection.contains(&Metric::Mae) {
        metrics.mae = Some(resid.iter().map(|r| r.abs()).sum::<f64>() / n);
    }
    if selection.contains(&Metric::Mape) {
        metrics.mape = Some(if actual.iter().any(|a| *a == 0.0) {
            f64::INFINITY
        } else {
            resid.iter().zip(actual.iter()).map(|(r, a)| (r / a).abs()).sum::<f64>() / n * 100.0
        });
    }
    if selection.contains(&Metric::Rmse) {
        metrics.rmse = Some((resid.norm_squared() / n).sqrt());
    }
    if selection.contains(&Metric::RSquared) {
        metrics.r_squared = Some(fit.rsquared);
        metrics.adj_r_squared = Some(fit.rsquared_adj);
    }

    metrics
}

/// Runs each requested test. A failing or erroring test clears its flag; none of them panics.
pub fn run_diagnostics(
    config: &SearchConfig,
    design: &Design,
    fit: &OlsFit,
    model_id: &str,
    log: &mut RunLog,
) -> TestResults {
    let thresholds = &SEARCH.diagnostics;
    let mut results = TestResults::default();

    if config.tests.contains(&DiagnosticTest::PValue) {
        let worst = nan_max(fit.pvalues.iter().skip(design.regressor_offset()).copied());
        if worst.is_some_and(|p| p > config.p_value_threshold) {
            results.p_value_ok = false;
        }
    }

    if config.tests.contains(&DiagnosticTest::Vif) && design.regressor_names().len() >= 2 {
        match variance_inflation_factors(&design.regressor_block()) {
            Ok(vifs) => {
                results.vif_ok = !vifs.iter().any(|v| v.is_nan() || *v > thresholds.vif_threshold);
                results.vif_values = design.regressor_names().iter().cloned().zip(vifs).collect();
            }
            Err(e) => {
                log.warn(format!("VIF calculation failed for {}: {}", model_id, e));
                results.vif_ok = false;
            }
        }
    }

    if config.tests.contains(&DiagnosticTest::Heteroskedasticity) && design.x.ncols() > 0 {
        match breusch_pagan(&fit.resid, &design.x, design.has_constant) {
            Ok(bp) => {
                // A constant-only design leaves the test without degrees of freedom:
                // the NaN p-value is reported and the test passes
                results.bp_pvalue = Some(bp.p_value);
                if bp.p_value < thresholds.heteroskedasticity_alpha {
                    results.heteroskedasticity_ok = false;
                }
            }
            Err(e) => {
                log.warn(format!("Breusch-Pagan test failed for {}: {}", model_id, e));
                results.heteroskedasticity_ok = false;
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ols;
    use nalgebra::DMatrix;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn design() -> Design {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = DVector::from_vec(vec![2.3, 3.8, 6.1, 8.2, 9.9, 11.8]);
        Design {
            y,
            x: DMatrix::from_fn(6, 2, |r, c| if c == 0 { 1.0 } else { xs[r] }),
            columns: vec!["const".to_string(), "x_L0".to_string()],
            has_constant: true,
        }
    }

    #[test]
    fn metrics_follow_definitions() {
        let design = design();
        let fit = ols::fit(&design.y, &design.x, true).unwrap();
        let all = Selection::of([Metric::Mae, Metric::Mape, Metric::Rmse, Metric::RSquared]);
        let m = compute_metrics(&all, &design.y, &fit);

        let n = 6.0;
        let mae = fit.resid.iter().map(|r| r.abs()).sum::<f64>() / n;
        let rmse = (fit.resid.iter().map(|r| r * r).sum::<f64>() / n).sqrt();
        assert!(approx_eq(m.mae.unwrap(), mae, 1e-12));
        assert!(approx_eq(m.rmse.unwrap(), rmse, 1e-12));
        assert!(m.mape.unwrap().is_finite());
        assert_eq!(m.r_squared, Some(fit.rsquared));
        assert_eq!(m.adj_r_squared, Some(fit.rsquared_adj));

        let none = compute_metrics(&Selection::default(), &design.y, &fit);
        assert_eq!(none, MetricValues::default());
    }

    #[test]
    fn unrequested_tests_stay_true() {
        let design = design();
        let fit = ols::fit(&design.y, &design.x, true).unwrap();
        let mut log = RunLog::new("MASTER");
        let results = run_diagnostics(&SearchConfig::default(), &design, &fit, "m_1", &mut log);
        assert_eq!(results, TestResults::default());
        assert!(log.is_empty());
    }

    #[test]
    fn constant_p_value_is_ignored() {
        // Intercept is pure noise, slope is strong: only the slope counts
        let design = design();
        let fit = ols::fit(&design.y, &design.x, true).unwrap();
        let config = SearchConfig {
            tests: Selection::of([DiagnosticTest::PValue]),
            p_value_threshold: 0.01,
            ..Default::default()
        };
        assert!(fit.pvalues[0] > 0.01);
        let mut log = RunLog::new("MASTER");
        let results = run_diagnostics(&config, &design, &fit, "m_1", &mut log);
        assert!(results.p_value_ok);
    }

    fn hand_fit(resid: DVector<f64>, pvalues: DVector<f64>) -> OlsFit {
        let n = resid.len();
        let p = pvalues.len();
        OlsFit {
            params: DVector::from_element(p, 1.0),
            bse: DVector::from_element(p, 0.1),
            pvalues,
            fitted: DVector::zeros(n),
            resid,
            n_obs: n,
            df_resid: n - p,
            ssr: f64::INFINITY,
            rsquared: 0.0,
            rsquared_adj: 0.0,
            llf: f64::NEG_INFINITY,
            aic: f64::INFINITY,
            bic: f64::INFINITY,
        }
    }

    #[test]
    fn breusch_pagan_error_clears_flag_and_warns() {
        // Squaring residuals of this size overflows to infinity
        let design = design();
        let resid = DVector::from_fn(6, |i, _| if i % 2 == 0 { 1e200 } else { -1e200 });
        let fit = hand_fit(resid, DVector::from_element(2, 0.001));
        let config = SearchConfig {
            tests: Selection::of([DiagnosticTest::Heteroskedasticity]),
            ..Default::default()
        };

        let mut log = RunLog::new("MASTER");
        let results = run_diagnostics(&config, &design, &fit, "m_7", &mut log);
        assert!(!results.heteroskedasticity_ok);
        assert_eq!(results.bp_pvalue, None);
        assert!(!results.all_passed());
        assert_eq!(log.lines().len(), 1);
        assert!(log.lines()[0].starts_with("WARN_MASTER: Breusch-Pagan test failed for m_7: "));
    }

    #[test]
    fn vif_error_clears_flag_and_warns() {
        let mut design = design();
        design.x = DMatrix::from_fn(6, 3, |r, c| match c {
            0 => 1.0,
            1 => r as f64,
            _ if r == 2 => f64::NAN,
            _ => (r * r) as f64,
        });
        design.columns.push("z_L0".to_string());
        let fit = hand_fit(DVector::from_element(6, 0.5), DVector::from_element(3, 0.001));
        let config = SearchConfig {
            tests: Selection::of([DiagnosticTest::Vif]),
            ..Default::default()
        };

        let mut log = RunLog::new("MASTER");
        let results = run_diagnostics(&config, &design, &fit, "m_3", &mut log);
        assert!(!results.vif_ok);
        assert!(results.vif_values.is_empty());
        assert!(!results.all_passed());
        assert!(log.lines()[0].starts_with("WARN_MASTER: VIF calculation failed for m_3: "));
    }

    #[test]
    fn constant_only_design_passes_heteroskedasticity_with_nan() {
        let mut design = design();
        design.x = DMatrix::from_element(6, 1, 1.0);
        design.columns.truncate(1);
        let fit = ols::fit(&design.y, &design.x, true).unwrap();
        let config = SearchConfig {
            tests: Selection::of([DiagnosticTest::Heteroskedasticity]),
            ..Default::default()
        };

        let mut log = RunLog::new("MASTER");
        let results = run_diagnostics(&config, &design, &fit, "m_1", &mut log);
        assert!(results.heteroskedasticity_ok);
        assert!(results.bp_pvalue.is_some_and(f64::is_nan));
        assert!(log.is_empty());
    }
}
