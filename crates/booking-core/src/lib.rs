//! # booking-core
//!
//! Domain model for the course-booking checkout service: the booking
//! request and record types, required-field validation, the price policy,
//! and normalization of decimal price strings into integer minor currency
//! units.
//!
//! The booking pipeline is strictly linear and this crate owns its gates:
//!
//! ```text
//! Received ──▶ Validated ──▶ Priced ──▶ SessionCreated
//!    │             │            │
//!    └── 405/500   └── 400      └── 400 (unresolved / non-positive)
//! ```
//!
//! No state survives a request. Everything here is constructed per
//! submission and dropped once the response is sent.

mod error;
mod model;
mod pricing;

pub use error::{BookingError, Result};
pub use model::{BookingRecord, BookingRequest};
pub use pricing::{PricePolicy, to_minor_units};
