//! Booking Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, BookingError>;

/// Validation-class booking errors
///
/// Every variant maps to a 400 at the HTTP boundary: the caller can fix
/// the submission and resubmit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A required field is absent or empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// No price was supplied and none could be resolved
    #[error("booking price missing")]
    MissingPrice,

    /// Price string does not normalize to a positive minor-unit amount
    #[error("invalid price amount: {0:?}")]
    InvalidAmount(String),
}

impl BookingError {
    /// Caller-safe message for the HTTP response body. Field-level detail
    /// stays in server logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField(_) | Self::MissingPrice => "Missing booking details",
            Self::InvalidAmount(_) => "Invalid booking price.",
        }
    }
}
