//! Evaluates one specification: lag, select complete cases, fit, score.
//!
//! Each evaluation walks `Preparing -> Fitting -> Scoring` and stops in one of
//! the terminal outcomes of [`ModelResult`]. Nothing an evaluation does can
//! abort the surrounding search.

use nalgebra::{DMatrix, DVector};

use crate::analysis::scoring;
use crate::config::{SEARCH, debug};
use crate::data::{AlignedTable, lags};
use crate::domain::{ModelSpecification, SearchConfig};
use crate::models::{ModelResult, OlsFit, ols};
use crate::utils::RunLog;

/// Complete-case design for one specification.
#[derive(Debug, Clone)]
pub struct Design {
    pub y: DVector<f64>,
    /// Constant (when present) in column 0, lagged regressors after it
    pub x: DMatrix<f64>,
    pub columns: Vec<String>,
    pub has_constant: bool,
}

impl Design {
    /// Index of the first non-constant column.
    pub fn regressor_offset(&self) -> usize {
        usize::from(self.has_constant)
    }

    pub fn regressor_names(&self) -> &[String] {
        &self.columns[self.regressor_offset()..]
    }

    /// The design without its constant column.
    pub fn regressor_block(&self) -> DMatrix<f64> {
        let offset = self.regressor_offset();
        self.x.columns(offset, self.x.ncols() - offset).into_owned()
    }

    pub fn n_obs(&self) -> usize {
        self.y.len()
    }
}

enum Stage {
    Preparing,
    Fitting(Design),
    Scoring(Design, OlsFit),
    Done(ModelResult),
}

impl Stage {
    fn label(&self) -> &'static str {
        match self {
            Stage::Preparing => "preparing",
            Stage::Fitting(_) => "fitting",
            Stage::Scoring(..) => "scoring",
            Stage::Done(ModelResult::Completed { .. }) => "completed",
            Stage::Done(ModelResult::Skipped { .. }) => "skipped",
            Stage::Done(ModelResult::Error { .. }) => "error",
        }
    }
}

/// Fits specifications against one aligned table under one configuration.
pub struct ModelEvaluator<'a> {
    table: &'a AlignedTable,
    config: &'a SearchConfig,
}

impl<'a> ModelEvaluator<'a> {
    pub fn new(table: &'a AlignedTable, config: &'a SearchConfig) -> Self {
        Self { table, config }
    }

    pub fn evaluate(&self, spec: &ModelSpecification, log: &mut RunLog) -> ModelResult {
        let mut stage = Stage::Preparing;
        loop {
            if debug::PRINT_EVALUATION_STEPS {
                log::info!("{}: {}", spec.model_id, stage.label());
            }

            stage = match stage {
                Stage::Preparing => self.prepare(spec, log),
                Stage::Fitting(design) => match ols::fit(&design.y, &design.x, design.has_constant) {
                    Ok(fit) => Stage::Scoring(design, fit),
                    Err(e) => {
                        log.error(format!("Error fitting {}: {}", spec.model_id, e));
                        Stage::Done(ModelResult::Error {
                            message: format!("Failed OLS: {}", e),
                        })
                    }
                },
                Stage::Scoring(design, fit) => {
                    let summary = scoring::summarize(&design, &fit, self.config, &spec.model_id, log);
                    Stage::Done(ModelResult::Completed { data: summary })
                }
                Stage::Done(result) => return result,
            };
        }
    }

    fn prepare(&self, spec: &ModelSpecification, log: &mut RunLog) -> Stage {
        let lagged = lags::apply(self.table, &spec.regressors_with_lags, log);
        let dependent = self.table.dependent();

        // Complete-case rows: dependent and every lagged column observed
        let rows: Vec<(f64, Vec<f64>)> = (0..self.table.n_rows())
            .filter_map(|r| {
                let y = dependent[r]?;
                let xs = lagged
                    .columns
                    .iter()
                    .map(|col| col[r])
                    .collect::<Option<Vec<f64>>>()?;
                Some((y, xs))
            })
            .collect();

        let has_constant = spec.include_constant;
        let min_rows = lagged.width() + usize::from(has_constant) + 1;
        if rows.len() < min_rows {
            return Stage::Done(ModelResult::Skipped {
                reason: format!("insufficient observations: {}", rows.len()),
            });
        }

        let offset = usize::from(has_constant);
        let y = DVector::from_iterator(rows.len(), rows.iter().map(|(y, _)| *y));
        let x = DMatrix::from_fn(rows.len(), lagged.width() + offset, |r, c| {
            if c < offset { 1.0 } else { rows[r].1[c - offset] }
        });

        let mut columns = Vec::with_capacity(x.ncols());
        if has_constant {
            columns.push(SEARCH.naming.constant_column.to_string());
        }
        columns.extend(lagged.names);

        Stage::Fitting(Design {
            y,
            x,
            columns,
            has_constant,
        })
    }
}
