//! Booking Log Webhook
//!
//! POSTs each booking to a spreadsheet web-app endpoint. The response
//! body is ignored; callers only learn success or failure. Delivery is
//! at-most-once: one attempt, no retry, no dead-letter.

use async_trait::async_trait;
use booking_core::BookingRecord;

use crate::error::{Result, SheetsError};

/// Booking-log sink (trait seam for tests).
#[async_trait]
pub trait BookingLog: Send + Sync {
    /// Deliver one booking record.
    async fn record(&self, booking: &BookingRecord) -> Result<()>;
}

/// Log backed by an HTTP webhook (a spreadsheet web-app URL in production).
pub struct HttpBookingLog {
    client: reqwest::Client,
    webhook_url: String,
}

impl HttpBookingLog {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl BookingLog for HttpBookingLog {
    async fn record(&self, booking: &BookingRecord) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(booking)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SheetsError::Status(response.status()));
        }

        tracing::debug!(course = %booking.course, "booking recorded");
        Ok(())
    }
}
