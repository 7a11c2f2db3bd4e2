use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::engine::batcher::Batch;
use crate::models::ModelResult;
use crate::utils::serde_pairs;

pub const PROGRESS_TAG: &str = "PROGRESS_UPDATE:";
pub const FINAL_TAG: &str = "FINAL_RESULT:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Progress,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    Finished,
    Error,
}

/// One flushed batch, keyed by model id in evaluation order.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressFrame {
    #[serde(rename = "type")]
    pub kind: FrameKind,
    #[serde(serialize_with = "serde_pairs::serialize")]
    pub processed_batch: Vec<(String, ModelResult)>,
    pub total_calculated: u64,
}

impl From<Batch> for ProgressFrame {
    fn from(batch: Batch) -> Self {
        Self {
            kind: FrameKind::Progress,
            processed_batch: batch.results,
            total_calculated: batch.total_calculated,
        }
    }
}

/// Terminal summary. Exactly one per run, success or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalFrame {
    #[serde(rename = "type")]
    pub kind: FrameKind,
    pub status: RunStatus,
    pub total_models_calculated: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FinalFrame {
    pub fn finished(total_models_calculated: u64) -> Self {
        Self {
            kind: FrameKind::Final,
            status: RunStatus::Finished,
            total_models_calculated,
            message: Some("Regression search finished successfully.".to_string()),
            error: None,
        }
    }

    pub fn failed(total_models_calculated: u64, cause: impl Display) -> Self {
        Self {
            kind: FrameKind::Final,
            status: RunStatus::Error,
            total_models_calculated,
            message: None,
            error: Some(format!("Regression search failed: {}", cause)),
        }
    }
}

/// Writes tagged, line-delimited JSON frames and flushes after each one.
pub struct FrameWriter<W: Write> {
    out: W,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn progress(&mut self, frame: &ProgressFrame) -> Result<()> {
        self.write_tagged(PROGRESS_TAG, frame)
    }

    pub fn final_result(&mut self, frame: &FinalFrame) -> Result<()> {
        self.write_tagged(FINAL_TAG, frame)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_tagged<T: Serialize>(&mut self, tag: &str, frame: &T) -> Result<()> {
        let json = serde_json::to_string(frame).context("Failed to serialise frame")?;
        writeln!(self.out, "{}{}", tag, json).context("Failed to write frame")?;
        self.out.flush().context("Failed to flush frame")?;
        Ok(())
    }
}
