// Domain types and value objects
pub mod request;
pub mod specification;
pub mod timeseries;

// Re-export commonly used types
pub use request::{DiagnosticTest, Metric, SearchConfig, SearchRequest, Selection, SingleRequest};
pub use specification::{ConstantStatus, ModelSpecification};
pub use timeseries::{RawPoint, RegressorPool, SeriesError, TimeSeries};
