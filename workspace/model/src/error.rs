use std::path::PathBuf;
use thiserror::Error;

/// Error types for loading the source tables.
///
/// All of them are configuration errors: the dashboard refuses to start
/// rather than render from a table it cannot trust.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The table file does not exist
    #[error("{table} table not found at {}", path.display())]
    NotFound { table: &'static str, path: PathBuf },

    /// Error from Polars while reading or casting
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] polars::error::PolarsError),

    /// A required column is absent
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A cell could not be interpreted
    #[error("{table} table, column '{column}', row {row}: {reason}")]
    InvalidValue {
        table: &'static str,
        column: &'static str,
        row: usize,
        reason: String,
    },
}

/// Type alias for Result with ModelError
pub type Result<T> = std::result::Result<T, ModelError>;
