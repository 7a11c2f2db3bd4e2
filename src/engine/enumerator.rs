//! Lazy, deterministic stream of model specifications.
//!
//! Ordering: subset size `m` ascending, then subsets in lexicographic index
//! order, then lag assignments as the Cartesian product of `0..=N` (last
//! regressor varies fastest), then the constant variants.

use std::collections::VecDeque;
use std::iter;

use itertools::Itertools;

use crate::config::SEARCH;
use crate::domain::{ConstantStatus, ModelSpecification};
use crate::utils::maths_utils::{binomial, saturating_pow};

type Combination = (Vec<usize>, Vec<usize>);

/// Constant flags to emit for one (subset, lags) pair.
fn constant_variants(status: ConstantStatus, subset_size: usize) -> &'static [bool] {
    match (status, subset_size) {
        (ConstantStatus::Include, _) => &[true],
        // Neither regressors nor constant: nothing to fit
        (ConstantStatus::Exclude, 0) => &[],
        (ConstantStatus::Exclude, _) => &[false],
        (ConstantStatus::Test, 0) => &[true],
        (ConstantStatus::Test, _) => &[true, false],
    }
}

fn lag_assignments(subset_size: usize, max_lag: usize) -> Box<dyn Iterator<Item = Vec<usize>>> {
    if subset_size == 0 {
        Box::new(iter::once(Vec::new()))
    } else {
        Box::new(
            iter::repeat_n(0..=max_lag, subset_size).multi_cartesian_product(),
        )
    }
}

pub struct SpecificationEnumerator<'a> {
    names: &'a [String],
    status: ConstantStatus,
    counter: u64,
    combinations: Box<dyn Iterator<Item = Combination>>,
    pending: VecDeque<ModelSpecification>,
}

impl<'a> SpecificationEnumerator<'a> {
    /// A fresh enumerator always yields the same sequence for the same inputs.
    pub fn new(names: &'a [String], max_lag: usize, status: ConstantStatus) -> Self {
        let k = names.len();
        let combinations = (0..=k).flat_map(move |m| {
            (0..k).combinations(m).flat_map(move |subset| {
                lag_assignments(m, max_lag).map(move |lags| (subset.clone(), lags))
            })
        });

        Self {
            names,
            status,
            counter: 0,
            combinations: Box::new(combinations),
            pending: VecDeque::new(),
        }
    }

    /// Number of specifications handed out so far.
    pub fn emitted(&self) -> u64 {
        self.counter - self.pending.len() as u64
    }

    fn model_id(&self, include_constant: bool) -> String {
        let naming = &SEARCH.naming;
        let suffix = match (self.status, include_constant) {
            (ConstantStatus::Test, true) => naming.with_constant_suffix,
            (ConstantStatus::Test, false) => naming.without_constant_suffix,
            _ => "",
        };
        format!("{}{}{}", naming.model_id_prefix, self.counter, suffix)
    }

    fn expand(&mut self, (subset, lags): Combination) {
        let regressors: Vec<(String, i64)> = subset
            .iter()
            .zip(&lags)
            .map(|(&idx, &lag)| (self.names[idx].clone(), lag as i64))
            .collect();

        for &include_constant in constant_variants(self.status, subset.len()) {
            self.counter += 1;
            let id = self.model_id(include_constant);
            self.pending
                .push_back(ModelSpecification::new(id, regressors.clone(), include_constant));
        }
    }
}

impl Iterator for SpecificationEnumerator<'_> {
    type Item = ModelSpecification;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(spec) = self.pending.pop_front() {
                return Some(spec);
            }
            let combination = self.combinations.next()?;
            self.expand(combination);
        }
    }
}

/// Closed-form count of the specifications [`SpecificationEnumerator`] emits.
/// Saturates at `u64::MAX`.
pub fn count_models(k: usize, max_lag: usize, status: ConstantStatus) -> u64 {
    let lag_choices = (max_lag as u64).saturating_add(1);
    let with_regressors = (1..=k).fold(0u64, |acc, m| {
        acc.saturating_add(binomial(k, m).saturating_mul(saturating_pow(lag_choices, m)))
    });

    match status {
        ConstantStatus::Include => with_regressors.saturating_add(1),
        ConstantStatus::Exclude => with_regressors,
        ConstantStatus::Test => with_regressors.saturating_mul(2).saturating_add(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn names(k: usize) -> Vec<String> {
        (0..k).map(|i| format!("x{i}")).collect()
    }

    #[test]
    fn one_regressor_one_lag_include() {
        let names = names(1);
        let specs: Vec<_> = SpecificationEnumerator::new(&names, 1, ConstantStatus::Include).collect();
        assert_eq!(specs.len(), 3);

        assert_eq!(specs[0], ModelSpecification::new("m_1", vec![], true));
        assert_eq!(specs[1], ModelSpecification::new("m_2", vec![("x0".to_string(), 0)], true));
        assert_eq!(specs[2], ModelSpecification::new("m_3", vec![("x0".to_string(), 1)], true));
    }

    #[test]
    fn one_regressor_one_lag_test() {
        let names = names(1);
        let ids: Vec<String> = SpecificationEnumerator::new(&names, 1, ConstantStatus::Test)
            .map(|s| s.model_id)
            .collect();
        assert_eq!(ids, vec!["m_1_c", "m_2_c", "m_3_nc", "m_4_c", "m_5_nc"]);
    }

    #[test]
    fn exclude_never_emits_the_empty_model() {
        let names = names(2);
        let specs: Vec<_> = SpecificationEnumerator::new(&names, 1, ConstantStatus::Exclude).collect();
        assert!(specs.iter().all(|s| s.regressor_count() > 0 && !s.include_constant));
        assert_eq!(specs[0].model_id, "m_1");

        for status in ConstantStatus::iter() {
            let empty_without_constant = SpecificationEnumerator::new(&names, 2, status)
                .any(|s| s.regressor_count() == 0 && !s.include_constant);
            assert!(!empty_without_constant);
        }
    }

    #[test]
    fn ordering_is_subset_then_lags() {
        let names = names(3);
        let specs: Vec<_> = SpecificationEnumerator::new(&names, 1, ConstantStatus::Include).collect();

        let sizes: Vec<usize> = specs.iter().map(|s| s.regressor_count()).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));

        // First pair subset is (x0, x1) with lags (0,0), (0,1), (1,0), (1,1)
        let pairs: Vec<Vec<(String, i64)>> = specs
            .iter()
            .filter(|s| s.regressor_count() == 2)
            .take(4)
            .map(|s| s.regressors_with_lags.clone())
            .collect();
        let lag = |a: i64, b: i64| vec![("x0".to_string(), a), ("x1".to_string(), b)];
        assert_eq!(pairs, vec![lag(0, 0), lag(0, 1), lag(1, 0), lag(1, 1)]);
    }

    #[test]
    fn count_matches_enumeration() {
        for k in 0..=3 {
            for n in 0..=2 {
                let names = names(k);
                for status in ConstantStatus::iter() {
                    let emitted = SpecificationEnumerator::new(&names, n, status).count() as u64;
                    assert_eq!(emitted, count_models(k, n, status), "k={k} n={n} status={status}");
                }
            }
        }
    }

    #[test]
    fn count_edge_cases() {
        assert_eq!(count_models(0, 5, ConstantStatus::Include), 1);
        assert_eq!(count_models(0, 5, ConstantStatus::Test), 1);
        assert_eq!(count_models(0, 5, ConstantStatus::Exclude), 0);
        assert_eq!(count_models(1, 1, ConstantStatus::Include), 3);
        assert_eq!(count_models(1, 1, ConstantStatus::Test), 5);
        assert_eq!(count_models(200, 200, ConstantStatus::Test), u64::MAX);
    }

    #[test]
    fn restart_is_deterministic() {
        let names = names(3);
        let first: Vec<_> = SpecificationEnumerator::new(&names, 2, ConstantStatus::Test).collect();
        let second: Vec<_> = SpecificationEnumerator::new(&names, 2, ConstantStatus::Test).collect();
        assert_eq!(first, second);

        let mut partial = SpecificationEnumerator::new(&names, 2, ConstantStatus::Test);
        let _ = partial.by_ref().take(7).count();
        assert_eq!(partial.emitted(), 7);
    }
}
