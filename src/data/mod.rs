// Table building: alignment onto the dependent index, then lagging
pub mod aligner;
pub mod lags;

// Re-export commonly used types
pub use aligner::{AlignedTable, align};
pub use lags::{LaggedTable, lagged_name};
