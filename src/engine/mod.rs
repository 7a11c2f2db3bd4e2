pub mod batcher;
pub mod core;
pub mod enumerator;
pub mod messages;
pub mod single;
pub mod state;

// Re-export key components
pub use batcher::{BatchPolicy, ResultBatcher};
pub use core::SearchController;
pub use enumerator::{SpecificationEnumerator, count_models};
pub use messages::{FinalFrame, FrameWriter, RunStatus};
pub use single::{SingleOutcome, run_single};
pub use state::{RunTally, SearchSession};
