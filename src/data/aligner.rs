//! Common-index table built from the dependent series and the regressor pool.

use chrono::NaiveDateTime;

use crate::domain::{RegressorPool, TimeSeries};

/// Every column shares the dependent series' timestamp index.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    index: Vec<NaiveDateTime>,
    dependent: Vec<Option<f64>>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl AlignedTable {
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn dependent(&self) -> &[Option<f64>] {
        &self.dependent
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }
}

/// Reindexes every pool series onto the dependent series' timestamps.
///
/// Pure reindex: a regressor without an observation at a dependent timestamp
/// gets a missing value there. Nothing is filled or interpolated.
pub fn align(dependent: &TimeSeries, pool: &RegressorPool) -> AlignedTable {
    let index = dependent.timestamps().to_vec();

    let columns = pool
        .iter()
        .map(|series| {
            let values = index.iter().map(|ts| series.get(ts).flatten()).collect();
            (series.name().to_string(), values)
        })
        .collect();

    AlignedTable {
        index,
        dependent: dependent.values().to_vec(),
        columns,
    }
}
