use serde::{Deserialize, Serialize};

/// How the intercept is treated across the search.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConstantStatus {
    /// Every model carries a constant
    #[default]
    Include,
    /// No model carries a constant (and the empty model is never generated)
    Exclude,
    /// Each regressor set is fitted both with and without a constant
    Test,
}

/// One candidate model: which regressors, at which lag, with or without a constant.
///
/// Lags are signed because single-specification requests can carry anything;
/// a negative lag is dropped by the lag builder rather than rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpecification {
    pub model_id: String,
    #[serde(serialize_with = "crate::utils::serde_pairs::serialize")]
    pub regressors_with_lags: Vec<(String, i64)>,
    pub include_constant: bool,
}

impl ModelSpecification {
    pub fn new(
        model_id: impl Into<String>,
        regressors_with_lags: Vec<(String, i64)>,
        include_constant: bool,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            regressors_with_lags,
            include_constant,
        }
    }

    pub fn regressor_count(&self) -> usize {
        self.regressors_with_lags.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn constant_status_parses_from_wire_and_cli_text() {
        assert_eq!(ConstantStatus::from_str("test").unwrap(), ConstantStatus::Test);
        assert_eq!(ConstantStatus::Exclude.to_string(), "exclude");

        let parsed: ConstantStatus = serde_json::from_str(r#""include""#).unwrap();
        assert_eq!(parsed, ConstantStatus::Include);
        assert!(serde_json::from_str::<ConstantStatus>(r#""sometimes""#).is_err());
    }

    #[test]
    fn specification_keeps_regressor_order_on_the_wire() {
        let spec = ModelSpecification::new(
            "m_7",
            vec![("oil".to_string(), 2), ("fx".to_string(), 0)],
            true,
        );
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            json,
            r#"{"model_id":"m_7","regressors_with_lags":{"oil":2,"fx":0},"include_constant":true}"#
        );
    }
}
