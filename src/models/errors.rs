//! Errors raised by the least-squares routines and the diagnostics built on them.

/// Numerical failure while fitting one design.
///
/// Any of these turns a single specification into an `error` result; none of
/// them is fatal for a search.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// The design has no columns at all.
    EmptyDesign,

    /// Response length and design row count disagree.
    DimensionMismatch { rows: usize, response_len: usize },

    /// The design does not have full column rank.
    Singular { rank: usize, columns: usize },

    /// A value in the response or the design is NaN or infinite.
    NonFinite,

    /// The fit cannot produce the requested statistic (e.g. no residual degrees of freedom).
    Degenerate(String),
}

pub type FitResult<T> = Result<T, FitError>;

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::EmptyDesign => write!(f, "design matrix has no columns"),
            FitError::DimensionMismatch { rows, response_len } => write!(
                f,
                "design has {} rows but the response has {} values",
                rows, response_len
            ),
            FitError::Singular { rank, columns } => write!(
                f,
                "singular design matrix (rank {} of {} columns)",
                rank, columns
            ),
            FitError::NonFinite => write!(f, "non-finite value in design or response"),
            FitError::Degenerate(msg) => write!(f, "degenerate fit: {}", msg),
        }
    }
}

impl std::error::Error for FitError {}
