//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so a normal
//! run only writes the frames and the run log summary.

/// Trace every specification as it is pulled from the enumerator.
pub const PRINT_SPECIFICATIONS: bool = false;

/// Trace the state transitions of each model evaluation (preparing, fitting, scoring).
pub const PRINT_EVALUATION_STEPS: bool = false;

/// Emit a run-log line every time a progress batch is flushed.
pub const PRINT_BATCH_FLUSHES: bool = true;

/// Emit the parsed request configuration at the start of a run.
pub const PRINT_REQUEST_CONFIG: bool = true;
