//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Session was created but carried no redirect URL
    #[error("no checkout URL on session {0}")]
    NoRedirectUrl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Caller-safe message; raw Stripe detail stays in server logs.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Stripe(_) | Self::NoRedirectUrl(_) => {
                "Payment processing failed. Please try again."
            }
            Self::Config(_) => "Service configuration error.",
        }
    }
}
