//! Service Configuration
//!
//! Every collaborator endpoint and credential comes from the environment
//! (a `.env` file is loaded in `main` via dotenvy). Nothing is hard-coded.

use anyhow::{Context, bail};
use booking_core::PricePolicy;
use booking_payments::Currency;

/// Runtime configuration for the booking service
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Stripe secret key
    pub stripe_secret_key: String,

    /// Published CSV price feed; required under the catalog price policy
    pub catalog_url: Option<String>,

    /// Booking-log webhook; booking logging is disabled when unset
    pub booking_log_url: Option<String>,

    /// Redirect after successful payment
    pub success_url: String,

    /// Redirect after cancelled checkout
    pub cancel_url: String,

    pub currency: Currency,

    /// Fixed at startup, never per request
    pub price_policy: PricePolicy,

    pub bind_addr: String,
}

impl AppConfig {
    /// Load from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let stripe_secret_key = require("STRIPE_SECRET_KEY")?;
        let success_url = require("SUCCESS_URL")?;
        let cancel_url = require("CANCEL_URL")?;

        let price_policy = std::env::var("PRICE_SOURCE")
            .map_or(PricePolicy::Catalog, |value| PricePolicy::from_str(&value));

        let catalog_url = std::env::var("CATALOG_CSV_URL").ok();
        if price_policy == PricePolicy::Catalog && catalog_url.is_none() {
            bail!("CATALOG_CSV_URL must be set when PRICE_SOURCE is catalog");
        }

        let currency = std::env::var("CURRENCY")
            .unwrap_or_else(|_| "gbp".into())
            .parse::<Currency>()
            .context("CURRENCY is not a recognized ISO currency code")?;

        Ok(Self {
            stripe_secret_key,
            catalog_url,
            booking_log_url: std::env::var("BOOKING_LOG_URL").ok(),
            success_url,
            cancel_url,
            currency,
            price_policy,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
        })
    }
}

fn require(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} not set"))
}
