//! Spreadsheet Collaborator Errors

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, SheetsError>;

/// Errors from the catalog feed and the log webhook
#[derive(Error, Debug)]
pub enum SheetsError {
    /// No catalog row matches the requested course/location pair.
    /// The only caller-correctable variant; everything else is upstream.
    #[error("no catalog price for {course:?} at {location:?}")]
    PriceNotFound { course: String, location: String },

    /// Endpoint answered with a non-success status
    #[error("endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog document did not parse as CSV
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}
