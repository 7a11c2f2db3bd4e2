#![allow(clippy::const_is_empty)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod utils;

// The search engine: enumeration, batching, streaming
pub mod engine;

// Re-export commonly used types
pub use domain::{ConstantStatus, ModelSpecification, SearchConfig, SearchRequest, TimeSeries};
pub use engine::{BatchPolicy, FrameWriter, SearchController, count_models, run_single};
pub use models::ModelResult;
pub use utils::{RunLog, app_time};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read the request payload from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Treat the payload as a single-specification request
    #[arg(long, default_value_t = false)]
    pub single: bool,

    /// Flush a progress frame once this many results are pending
    #[arg(long, default_value_t = config::SEARCH.batch.max_batch_size)]
    pub batch_size: usize,

    /// Flush a progress frame once this many milliseconds passed since the last one
    #[arg(long, default_value_t = config::SEARCH.batch.flush_interval_ms)]
    pub flush_interval_ms: u64,
}

impl Cli {
    pub fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy {
            // A zero-size batch would never accumulate anything
            max_batch_size: self.batch_size.max(1),
            flush_interval: Duration::from_millis(self.flush_interval_ms),
        }
    }
}
