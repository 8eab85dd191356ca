//! Application State

use std::sync::Arc;

use booking_payments::CheckoutGateway;
use booking_sheets::{BookingLog, PriceCatalog};

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Price catalog collaborator (HTTP CSV feed in production; None when
    /// the caller-supplied price policy is active and no feed is set)
    pub catalog: Option<Arc<dyn PriceCatalog>>,

    /// Booking-log webhook (None if not configured)
    pub booking_log: Option<Arc<dyn BookingLog>>,

    /// Payment-session gateway (Stripe in production)
    pub payments: Arc<dyn CheckoutGateway>,

    /// Static configuration
    pub config: Arc<AppConfig>,
}
