//! # booking-sheets
//!
//! Outbound spreadsheet collaborators for the booking service:
//!
//! - the **price catalog**: a published quoted-CSV feed mapping
//!   (course, location) pairs to prices. Fetched fresh on every lookup:
//!   no caching, no invalidation;
//! - the **booking log**: a web-app webhook that records each booking.
//!   Delivery is at-most-once and best-effort; the caller decides whether
//!   a failure matters (the server swallows it).
//!
//! Both collaborators sit behind traits so handlers can run against
//! in-memory implementations in tests.

mod catalog;
mod error;
mod log;

pub use catalog::{CatalogRow, HttpPriceCatalog, MemoryCatalog, PriceCatalog};
pub use error::{Result, SheetsError};
pub use log::{BookingLog, HttpBookingLog};
