// Least-squares fitting, diagnostics, and the per-model result type
pub mod diagnostics;
pub mod errors;
pub mod ols;
pub mod result;

// Re-export key types for convenience
pub use errors::{FitError, FitResult};
pub use ols::OlsFit;
pub use result::{FitSummary, MetricValues, ModelResult, TestResults};
