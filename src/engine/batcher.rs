//! Dual-trigger batching of model results.
//!
//! After every appended result two independent conditions are checked: the
//! batch reached its size limit, or the flush interval elapsed since the last
//! flush. Either one moves the batcher from `Accumulating` to `Flushing`; the
//! batch is handed out, the timer resets, and accumulation resumes.

use std::time::Duration;

use crate::config::SEARCH;
use crate::models::ModelResult;
use crate::utils::app_time::{AppInstant, Clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub max_batch_size: usize,
    pub flush_interval: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            max_batch_size: SEARCH.batch.max_batch_size,
            flush_interval: Duration::from_millis(SEARCH.batch.flush_interval_ms),
        }
    }
}

/// What caused a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FlushTrigger {
    Size,
    Elapsed,
    /// Enumeration finished with results still pending
    Drain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Accumulating,
    Flushing(FlushTrigger),
}

/// Results released by one flush, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub results: Vec<(String, ModelResult)>,
    /// Results produced so far, this batch included
    pub total_calculated: u64,
    pub trigger: FlushTrigger,
}

pub struct ResultBatcher<C: Clock> {
    policy: BatchPolicy,
    clock: C,
    phase: Phase,
    pending: Vec<(String, ModelResult)>,
    last_flush: AppInstant,
    total: u64,
}

impl<C: Clock> ResultBatcher<C> {
    pub fn new(policy: BatchPolicy, clock: C) -> Self {
        let last_flush = clock.now();
        Self {
            policy,
            clock,
            phase: Phase::Accumulating,
            pending: Vec::new(),
            last_flush,
            total: 0,
        }
    }

    /// Appends one result. Returns a batch when either trigger fires.
    pub fn push(&mut self, model_id: String, result: ModelResult) -> Option<Batch> {
        self.pending.push((model_id, result));
        self.total += 1;

        let now = self.clock.now();
        if self.pending.len() >= self.policy.max_batch_size {
            self.phase = Phase::Flushing(FlushTrigger::Size);
        } else if now.saturating_duration_since(self.last_flush) >= self.policy.flush_interval {
            self.phase = Phase::Flushing(FlushTrigger::Elapsed);
        }

        match self.phase {
            Phase::Accumulating => None,
            Phase::Flushing(trigger) => Some(self.take(trigger, now)),
        }
    }

    /// Releases whatever is still pending. `None` when nothing is.
    pub fn finish(&mut self) -> Option<Batch> {
        if self.pending.is_empty() {
            return None;
        }
        let now = self.clock.now();
        Some(self.take(FlushTrigger::Drain, now))
    }

    pub fn total_calculated(&self) -> u64 {
        self.total
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn take(&mut self, trigger: FlushTrigger, now: AppInstant) -> Batch {
        let batch = Batch {
            results: std::mem::take(&mut self.pending),
            total_calculated: self.total,
            trigger,
        };
        self.last_flush = now;
        self.phase = Phase::Accumulating;
        batch
    }
}
