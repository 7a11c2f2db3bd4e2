//! Lagged feature columns for one specification.

use crate::data::aligner::AlignedTable;
use crate::utils::RunLog;

/// Lagged columns in specification order, named `<name>_L<lag>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaggedTable {
    pub names: Vec<String>,
    pub columns: Vec<Vec<Option<f64>>>,
}

impl LaggedTable {
    pub fn width(&self) -> usize {
        self.names.len()
    }
}

pub fn lagged_name(name: &str, lag: i64) -> String {
    format!("{name}_L{lag}")
}

/// Moves `values` forward in time by `lag` rows. The first `lag` rows become missing.
pub fn shift(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let lead = lag.min(n);
    std::iter::repeat_n(None, lead)
        .chain(values[..n - lead].iter().copied())
        .collect()
}

/// Builds the lagged columns. Unknown names and negative lags are skipped with a warning.
pub fn apply(table: &AlignedTable, regressors_with_lags: &[(String, i64)], log: &mut RunLog) -> LaggedTable {
    let mut lagged = LaggedTable::default();

    for (name, lag) in regressors_with_lags {
        let Some(column) = table.column(name) else {
            log.warn(format!("Feature {name} not found in input data, skipping."));
            continue;
        };

        let Ok(periods) = usize::try_from(*lag) else {
            log.warn(format!("Invalid lag {lag} for feature {name}, skipping."));
            continue;
        };

        let values = if periods == 0 {
            column.to_vec()
        } else {
            shift(column, periods)
        };

        lagged.names.push(lagged_name(name, *lag));
        lagged.columns.push(values);
    }

    lagged
}
