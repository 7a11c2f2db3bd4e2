use std::io::Write;

use anyhow::Result;

use crate::analysis::ModelEvaluator;
use crate::config::debug;
use crate::data::align;
use crate::domain::{RegressorPool, SearchRequest, TimeSeries};
use crate::utils::{Clock, RunLog, SystemClock, TimeUtils};

use super::batcher::{Batch, BatchPolicy, FlushTrigger, ResultBatcher};
use super::enumerator::{SpecificationEnumerator, count_models};
use super::messages::{FinalFrame, FrameWriter, ProgressFrame};
use super::state::SearchSession;

/// Drives one specification search: enumerate, evaluate, batch, stream.
pub struct SearchController<C: Clock = SystemClock> {
    policy: BatchPolicy,
    clock: C,
}

impl SearchController<SystemClock> {
    pub fn new(policy: BatchPolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl<C: Clock> SearchController<C> {
    pub fn with_clock(policy: BatchPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    /// Runs the search described by `payload`.
    ///
    /// Always ends with exactly one final frame. Setup failures produce only
    /// that frame; an `Err` is returned only when the frames cannot be written.
    pub fn run<W: Write>(&self, payload: &str, frames: &mut FrameWriter<W>, log: &mut RunLog) -> Result<FinalFrame> {
        log.info("--- Starting Regression Search ---");
        let mut session = SearchSession::start(&self.clock);

        let final_frame = match self.search(payload, frames, log, &mut session) {
            Ok(()) => {
                log.info("Regression search finished.");
                FinalFrame::finished(session.tally.total())
            }
            Err(e) => {
                log.error(format!("Critical error in regression search: {:#}", e));
                FinalFrame::failed(session.tally.total(), format!("{:#}", e))
            }
        };

        frames.final_result(&final_frame)?;
        log.info(session.summary_line(session.elapsed(&self.clock)));
        Ok(final_frame)
    }

    fn search<W: Write>(
        &self,
        payload: &str,
        frames: &mut FrameWriter<W>,
        log: &mut RunLog,
        session: &mut SearchSession,
    ) -> Result<()> {
        let request = SearchRequest::from_json(payload)?;
        let (dependent_raw, regressors_raw) = request.inputs()?;
        let config = &request.config;

        let regressor_names: Vec<&str> = regressors_raw.iter().map(|(name, _)| name.as_str()).collect();
        log.info(format!("Y: {}", dependent_raw.name));
        log.info(format!("Available X: {:?}", regressor_names));
        if debug::PRINT_REQUEST_CONFIG {
            log.info(format!("Config: {}", serde_json::to_string(config)?));
        }

        let dependent = TimeSeries::build(&dependent_raw.name, &dependent_raw.data)?;
        let pool = RegressorPool::build(regressors_raw)?;
        let table = align(&dependent, &pool);
        if let (Some(first), Some(last)) = (table.index().first(), table.index().last()) {
            log.info(format!(
                "Aligned {} rows from {} to {}",
                table.n_rows(),
                TimeUtils::format_timestamp(first),
                TimeUtils::format_timestamp(last)
            ));
        }
        let names = pool.names();

        let expected = count_models(names.len(), config.max_lag_depth, config.constant_status);
        session.expected = Some(expected);
        log.info(format!(
            "Generating models: k={}, N={}, constant='{}' ({} specifications)",
            names.len(),
            config.max_lag_depth,
            config.constant_status,
            expected
        ));

        let evaluator = ModelEvaluator::new(&table, config);
        let mut batcher = ResultBatcher::new(self.policy, &self.clock);

        for spec in SpecificationEnumerator::new(&names, config.max_lag_depth, config.constant_status) {
            if debug::PRINT_SPECIFICATIONS {
                log::info!("Evaluating {:?}", spec);
            }

            let result = evaluator.evaluate(&spec, log);
            session.tally.record(&result);

            if let Some(batch) = batcher.push(spec.model_id, result) {
                Self::flush(batch, frames, log)?;
            }
        }

        if let Some(batch) = batcher.finish() {
            Self::flush(batch, frames, log)?;
        }

        Ok(())
    }

    fn flush<W: Write>(batch: Batch, frames: &mut FrameWriter<W>, log: &mut RunLog) -> Result<()> {
        let (size, total, trigger) = (batch.results.len(), batch.total_calculated, batch.trigger);
        frames.progress(&ProgressFrame::from(batch))?;

        if debug::PRINT_BATCH_FLUSHES {
            let what = match trigger {
                FlushTrigger::Drain => "final batch update",
                FlushTrigger::Size | FlushTrigger::Elapsed => "progress update",
            };
            log.info(format!(
                "Sent {} ({}). Batch size: {}. Total calculated: {}",
                what, trigger, size, total
            ));
        }
        Ok(())
    }
}
