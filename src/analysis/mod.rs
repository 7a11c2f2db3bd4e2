// Per-specification evaluation and scoring
pub mod evaluator;
pub mod scoring;

// Re-export commonly used types
pub use evaluator::{Design, ModelEvaluator};
