use chrono::NaiveDate;
use common::ParseError;
use thiserror::Error;

/// Rejected filter input. Every variant is the user's to fix, so the message
/// is shown as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("End date {end} is before start date {start}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid {field} '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Unknown segment '{0}', expected one of: all, 0, 1")]
    UnknownSegment(String),

    #[error("Unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("Unknown time bucket '{0}', expected one of: day, week, month")]
    UnknownBucket(String),
}

impl FilterError {
    /// Stable machine-readable code used in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::InvertedDateRange { .. } | FilterError::InvalidDate { .. } => {
                "INVALID_DATE_RANGE"
            }
            FilterError::UnknownSegment(_) => "INVALID_SEGMENT",
            FilterError::UnknownFeature(_) => "INVALID_FEATURE",
            FilterError::UnknownBucket(_) => "INVALID_BUCKET",
        }
    }
}

impl From<ParseError> for FilterError {
    fn from(error: ParseError) -> Self {
        match error.kind {
            "segment" => FilterError::UnknownSegment(error.value),
            "feature" => FilterError::UnknownFeature(error.value),
            _ => FilterError::UnknownBucket(error.value),
        }
    }
}

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// The filter selection could not be resolved
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
