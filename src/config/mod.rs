//! Configuration module for the regression search.

pub mod debug;
pub mod search;

// Re-export commonly used items
pub use search::{SEARCH, SearchSettings};
