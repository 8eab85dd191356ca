//! Price Normalization
//!
//! Payment amounts are integers in minor currency units (pence for GBP).
//! Decimal strings from the catalog or the caller go through
//! [`to_minor_units`] exactly once; a checkout session is never created
//! with an amount that did not pass this gate.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{BookingError, Result};

/// How the unit price is determined for a booking. Fixed at startup,
/// never per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PricePolicy {
    /// Look the price up in the external catalog feed by (course, location)
    Catalog,
    /// Trust the price string the caller submitted
    CallerSupplied,
}

impl PricePolicy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Catalog => "catalog",
            Self::CallerSupplied => "request",
        }
    }

    /// Lenient parse; anything unrecognized falls back to catalog lookup.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "request" | "caller" => Self::CallerSupplied,
            _ => Self::Catalog,
        }
    }
}

/// Convert a decimal price string into minor currency units.
///
/// `"150.00"` becomes `15000`. Rounds halves away from zero, the usual
/// `round(price * 100)` convention. Anything non-numeric or resulting in
/// a non-positive amount is rejected.
pub fn to_minor_units(price: &str) -> Result<i64> {
    let invalid = || BookingError::InvalidAmount(price.to_string());

    let amount = Decimal::from_str(price.trim()).map_err(|_| invalid())?;
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(invalid)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(invalid)?;

    if minor <= 0 {
        return Err(invalid());
    }
    Ok(minor)
}
