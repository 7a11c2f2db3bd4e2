use std::time::Duration;

use crate::models::ModelResult;
use crate::utils::app_time::{AppInstant, Clock};

/// Outcome counts for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub completed: u64,
    pub skipped: u64,
    pub errors: u64,
    /// Completed models whose requested diagnostics all passed
    pub valid: u64,
}

impl RunTally {
    pub fn record(&mut self, result: &ModelResult) {
        match result {
            ModelResult::Completed { data } => {
                self.completed += 1;
                if data.is_valid {
                    self.valid += 1;
                }
            }
            ModelResult::Skipped { .. } => self.skipped += 1,
            ModelResult::Error { .. } => self.errors += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.completed + self.skipped + self.errors
    }
}

/// Bookkeeping for one search invocation, from setup to teardown.
#[derive(Debug, Clone)]
pub struct SearchSession {
    started: AppInstant,
    /// Closed-form specification count, known once setup succeeded
    pub expected: Option<u64>,
    pub tally: RunTally,
}

impl SearchSession {
    pub fn start(clock: &impl Clock) -> Self {
        Self {
            started: clock.now(),
            expected: None,
            tally: RunTally::default(),
        }
    }

    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        clock.elapsed_since(self.started)
    }

    pub fn summary_line(&self, elapsed: Duration) -> String {
        let t = &self.tally;
        let expected = self
            .expected
            .map(|n| format!(" of {}", n))
            .unwrap_or_default();
        format!(
            "Run summary: {}{} models in {} ms ({} completed, {} skipped, {} errors, {} valid)",
            t.total(),
            expected,
            elapsed.as_millis(),
            t.completed,
            t.skipped,
            t.errors,
            t.valid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ManualClock;

    #[test]
    fn tally_counts_each_outcome() {
        let mut tally = RunTally::default();
        tally.record(&ModelResult::Skipped {
            reason: "insufficient observations: 0".to_string(),
        });
        tally.record(&ModelResult::Error {
            message: "Failed OLS: singular".to_string(),
        });
        assert_eq!(tally.total(), 2);
        assert_eq!(tally.skipped, 1);
        assert_eq!(tally.errors, 1);
        assert_eq!(tally.valid, 0);
    }

    #[test]
    fn summary_mentions_counts_and_time() {
        let clock = ManualClock::new();
        let mut session = SearchSession::start(&clock);
        session.expected = Some(3);
        session.tally.skipped = 3;
        clock.advance(Duration::from_millis(250));

        let line = session.summary_line(session.elapsed(&clock));
        assert_eq!(
            line,
            "Run summary: 3 of 3 models in 250 ms (0 completed, 3 skipped, 0 errors, 0 valid)"
        );
    }
}
