//! One-shot evaluation of a single, caller-supplied specification.

use anyhow::Result;
use serde::Serialize;

use crate::analysis::ModelEvaluator;
use crate::config::SEARCH;
use crate::data::align;
use crate::domain::{ModelSpecification, RegressorPool, SingleRequest, TimeSeries};
use crate::models::{FitSummary, ModelResult};
use crate::utils::RunLog;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleCompleted {
    pub model_id: String,
    pub status: &'static str,
    #[serde(flatten)]
    pub summary: FitSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleFailed {
    pub model_id: String,
    pub status: &'static str,
    pub error: String,
    pub is_valid: bool,
}

/// The single JSON document printed for a single-specification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SingleOutcome {
    Completed(SingleCompleted),
    Failed(SingleFailed),
}

impl SingleOutcome {
    fn completed(model_id: String, summary: FitSummary) -> Self {
        SingleOutcome::Completed(SingleCompleted {
            model_id,
            status: "completed",
            summary,
        })
    }

    fn failed(model_id: String, cause: impl std::fmt::Display) -> Self {
        SingleOutcome::Failed(SingleFailed {
            model_id,
            status: "error",
            error: format!("Failed to process model: {}", cause),
            is_valid: false,
        })
    }

    /// Failure reported before any request could be parsed, under the default model id.
    pub fn unreadable(cause: impl std::fmt::Display) -> Self {
        Self::failed(SEARCH.naming.default_single_model_id.to_string(), cause)
    }

    pub fn is_valid(&self) -> bool {
        match self {
            SingleOutcome::Completed(done) => done.summary.is_valid,
            SingleOutcome::Failed(_) => false,
        }
    }
}

/// Evaluates the specification in `payload`. Never fails: every problem ends up in the outcome.
pub fn run_single(payload: &str, log: &mut RunLog) -> SingleOutcome {
    let request = match SingleRequest::from_json(payload) {
        Ok(request) => request,
        Err(e) => {
            log.error(format!("Error processing spec: {:#}", e));
            return SingleOutcome::unreadable(format!("{:#}", e));
        }
    };

    let model_id = request
        .model_id
        .clone()
        .unwrap_or_else(|| SEARCH.naming.default_single_model_id.to_string());
    log.info(format!("--- Processing Model ID: {} ---", model_id));

    match evaluate(&request, &model_id, log) {
        Ok(summary) => {
            log.info(format!(
                "Model {} processing finished. Is Valid: {}",
                model_id, summary.is_valid
            ));
            SingleOutcome::completed(model_id, summary)
        }
        Err(e) => {
            log.error(format!("Error processing spec {}: {:#}", model_id, e));
            SingleOutcome::failed(model_id, format!("{:#}", e))
        }
    }
}

fn evaluate(request: &SingleRequest, model_id: &str, log: &mut RunLog) -> Result<FitSummary> {
    let (dependent_raw, regressors_raw, spec_input) = request.inputs()?;

    log.info(format!("Y: {}", dependent_raw.name));
    log.info(format!("X spec: {:?}", spec_input.regressors));
    log.info(format!("Include Constant: {}", spec_input.include_constant));

    let dependent = TimeSeries::build(&dependent_raw.name, &dependent_raw.data)?;
    let pool = RegressorPool::build(regressors_raw)?;
    let table = align(&dependent, &pool);

    let spec = ModelSpecification::new(
        model_id,
        spec_input.regressors.clone(),
        spec_input.include_constant,
    );

    // Nothing to move on to here, so a skip is reported as a failure
    match ModelEvaluator::new(&table, &request.config).evaluate(&spec, log) {
        ModelResult::Completed { data } => Ok(data),
        ModelResult::Skipped { reason } => anyhow::bail!("{}", reason),
        ModelResult::Error { message } => anyhow::bail!("{}", message),
    }
}
