//! Booking Request and Record Types

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// Inbound booking submission.
///
/// The required fields default to empty strings so that an absent field
/// fails validation (400) rather than deserialization (500).
#[derive(Clone, Debug, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub course: String,

    /// Required under the catalog price policy, where it keys the lookup
    #[serde(default)]
    pub location: Option<String>,

    /// Only honored under the caller-supplied price policy
    #[serde(default)]
    pub price: Option<String>,
}

impl BookingRequest {
    /// Check the required fields. Empty or whitespace-only counts as
    /// missing, matching how browser forms submit blank inputs.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("course", &self.course),
        ] {
            if value.trim().is_empty() {
                return Err(BookingError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// The booking plus its resolved price, as delivered to the log webhook.
#[derive(Clone, Debug, Serialize)]
pub struct BookingRecord {
    pub name: String,
    pub email: String,
    pub course: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub price: String,
}

impl BookingRecord {
    /// Build the record from a validated request and its resolved price.
    pub fn from_request(request: &BookingRequest, price: impl Into<String>) -> Self {
        Self {
            name: request.name.clone(),
            email: request.email.clone(),
            course: request.course.clone(),
            location: request.location.clone(),
            price: price.into(),
        }
    }
}
