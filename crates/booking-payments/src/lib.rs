//! # booking-payments
//!
//! Stripe Checkout (hosted) integration for the booking service.
//!
//! **Flow:** booking form → this service → redirect to Stripe's hosted
//! checkout page → redirect back to the success/cancelled URL.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌──────────────┐
//! │ Booking form│────▶│  Stripe Hosted  │────▶│ Success page │
//! │  (browser)  │     │  Checkout Page  │     │  (redirect)  │
//! └─────────────┘     └─────────────────┘     └──────────────┘
//! ```
//!
//! Sessions are one-time `payment` mode with a single card line item; the
//! course name is the product label and the amount is already normalized
//! to minor currency units before it reaches this crate.

mod checkout;
mod error;

pub use checkout::{CheckoutGateway, CheckoutRequest, CheckoutSession, StripeGateway};
pub use error::{PaymentError, Result};

// Re-exported so downstream config can parse currency codes without
// depending on async-stripe directly.
pub use stripe::Currency;
