//! Per-specification outcome as it appears in progress batches.

use serde::Serialize;

use crate::utils::serde_pairs;

/// Requested accuracy metrics. Only the requested ones are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mae: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mape: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rmse: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adj_r_squared: Option<f64>,
}

/// Per-test verdicts plus the raw statistics behind them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResults {
    pub p_value_ok: bool,
    pub vif_ok: bool,
    pub heteroskedasticity_ok: bool,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serde_pairs::serialize"
    )]
    pub vif_values: Vec<(String, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bp_pvalue: Option<f64>,
}

impl Default for TestResults {
    fn default() -> Self {
        Self {
            p_value_ok: true,
            vif_ok: true,
            heteroskedasticity_ok: true,
            vif_values: Vec::new(),
            bp_pvalue: None,
        }
    }
}

impl TestResults {
    pub fn all_passed(&self) -> bool {
        self.p_value_ok && self.vif_ok && self.heteroskedasticity_ok
    }
}

/// A completed fit. Coefficients and p-values are keyed by design column, in design order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    #[serde(serialize_with = "serde_pairs::serialize")]
    pub coefficients: Vec<(String, f64)>,
    #[serde(serialize_with = "serde_pairs::serialize")]
    pub p_values: Vec<(String, f64)>,
    pub n_obs: usize,
    pub rsquared: f64,
    pub rsquared_adj: f64,
    pub aic: f64,
    pub bic: f64,
    pub metrics: MetricValues,
    pub test_results: TestResults,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ModelResult {
    Completed {
        data: FitSummary,
    },
    /// Expected outcome (e.g. deep lags on a short series), not a failure.
    Skipped {
        reason: String,
    },
    Error {
        #[serde(rename = "error")]
        message: String,
    },
}

impl ModelResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ModelResult::Completed { data } if data.is_valid)
    }

    pub fn summary(&self) -> Option<&FitSummary> {
        match self {
            ModelResult::Completed { data } => Some(data),
            _ => None,
        }
    }
}
