//! Request payloads and the search configuration they carry.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::SEARCH;
use crate::domain::specification::ConstantStatus;
use crate::domain::timeseries::RawPoint;
use crate::utils::serde_pairs;

/// Accuracy metrics a caller can ask for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
pub enum Metric {
    #[strum(serialize = "mae")]
    Mae,
    #[strum(serialize = "mape")]
    Mape,
    #[strum(serialize = "rmse")]
    Rmse,
    #[strum(serialize = "rSquared")]
    RSquared,
}

/// Diagnostic tests a caller can switch on. Each one can veto `is_valid`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
pub enum DiagnosticTest {
    #[strum(serialize = "pValue")]
    PValue,
    #[strum(serialize = "vif")]
    Vif,
    #[strum(serialize = "heteroskedasticity")]
    Heteroskedasticity,
}

/// A set of enabled options.
///
/// Accepts either a list of names (`["mae", "rmse"]`) or a toggle map
/// (`{"mae": true, "mape": false}`). Unknown names are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T: Ord>(BTreeSet<T>);

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<T: Ord> Selection<T> {
    pub fn of(items: impl IntoIterator<Item = T>) -> Self {
        Self(items.into_iter().collect())
    }

    pub fn contains(&self, item: &T) -> bool {
        self.0.contains(item)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<'de, T: Ord + FromStr> Deserialize<'de> for Selection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Toggles {
            Names(Vec<String>),
            Flags(BTreeMap<String, bool>),
        }

        let names = match Toggles::deserialize(deserializer)? {
            Toggles::Names(names) => names,
            Toggles::Flags(flags) => flags
                .into_iter()
                .filter_map(|(name, on)| on.then_some(name))
                .collect(),
        };

        Ok(Self(
            names.iter().filter_map(|n| T::from_str(n).ok()).collect(),
        ))
    }
}

impl<T: Ord + Display> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|item| item.to_string()))
    }
}

/// Runtime configuration of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    pub max_lag_depth: usize,
    pub constant_status: ConstantStatus,
    pub metrics: Selection<Metric>,
    pub tests: Selection<DiagnosticTest>,
    pub p_value_threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_lag_depth: 0,
            constant_status: ConstantStatus::Include,
            metrics: Selection::default(),
            tests: Selection::default(),
            p_value_threshold: SEARCH.diagnostics.default_p_value_threshold,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependentVariable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: Vec<RawPoint>,
}

impl DependentVariable {
    fn is_usable(&self) -> bool {
        !self.name.is_empty() && !self.data.is_empty()
    }
}

/// Payload of a full specification search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub dependent_variable: Option<DependentVariable>,
    #[serde(default, deserialize_with = "serde_pairs::deserialize_optional")]
    pub regressors: Option<Vec<(String, Vec<RawPoint>)>>,
    #[serde(default)]
    pub config: SearchConfig,
}

impl SearchRequest {
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).context("Failed to parse request payload")
    }

    /// The dependent variable and a non-empty regressor pool, or a run-fatal error.
    pub fn inputs(&self) -> Result<(&DependentVariable, &[(String, Vec<RawPoint>)])> {
        match (&self.dependent_variable, &self.regressors) {
            (Some(dep), Some(regs)) if dep.is_usable() && !regs.is_empty() => Ok((dep, regs)),
            _ => bail!("Invalid payload structure: missing dependentVariable or regressors."),
        }
    }
}

/// The `specification` block of a single-model request.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecificationInput {
    #[serde(default, with = "serde_pairs")]
    pub regressors: Vec<(String, i64)>,
    #[serde(default = "default_include_constant")]
    pub include_constant: bool,
}

fn default_include_constant() -> bool {
    true
}

/// Payload of a one-shot, single-specification regression.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleRequest {
    #[serde(default, rename = "model_id")]
    pub model_id: Option<String>,
    #[serde(default)]
    pub dependent_variable: Option<DependentVariable>,
    #[serde(default, deserialize_with = "serde_pairs::deserialize_optional")]
    pub regressors: Option<Vec<(String, Vec<RawPoint>)>>,
    #[serde(default)]
    pub specification: Option<SpecificationInput>,
    #[serde(default)]
    pub config: SearchConfig,
}

impl SingleRequest {
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).context("Failed to parse request payload")
    }

    pub fn inputs(
        &self,
    ) -> Result<(
        &DependentVariable,
        &[(String, Vec<RawPoint>)],
        &SpecificationInput,
    )> {
        match (&self.dependent_variable, &self.regressors, &self.specification) {
            (Some(dep), Some(regs), Some(spec)) if dep.is_usable() && !regs.is_empty() => {
                Ok((dep, regs, spec))
            }
            _ => bail!(
                "Invalid payload structure: missing dependentVariable, regressors, or specification."
            ),
        }
    }
}
