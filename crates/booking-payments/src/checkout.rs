//! Stripe Checkout Integration
//!
//! Implements the hosted-checkout approach: create a session, hand the
//! caller Stripe's redirect URL, let Stripe own the payment page.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionPaymentMethodTypes, Currency,
};

use crate::error::{PaymentError, Result};

/// Request to create a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Product label shown on the Stripe page (the course name)
    pub product_name: String,

    /// Amount in minor currency units (pence for GBP), already validated
    /// as positive
    pub unit_amount: i64,

    pub currency: Currency,

    /// Customer email, prefilled on the checkout page
    pub customer_email: String,

    /// URL to redirect to after successful payment
    pub success_url: String,

    /// URL to redirect to if checkout is cancelled
    pub cancel_url: String,
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session ID
    pub id: String,

    /// URL to redirect the customer to
    pub url: String,
}

/// Payment-session creation (trait seam so handlers can run against a
/// stub gateway in tests).
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(&self, request: CheckoutRequest) -> Result<CheckoutSession>;
}

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
}

impl StripeGateway {
    /// Create a new gateway from a Stripe secret key
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        Ok(Self::new(&secret_key))
    }
}

#[async_trait]
impl CheckoutGateway for StripeGateway {
    /// Create a one-time-payment Checkout session and return its redirect
    /// URL. Card only, quantity 1.
    async fn create_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let mut params = CreateCheckoutSession::new();
        params.customer_email = Some(&request.customer_email);
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: request.currency,
                unit_amount: Some(request.unit_amount),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: request.product_name.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::NoRedirectUrl(session.id.to_string()))?;

        Ok(CheckoutSession {
            id: session.id.to_string(),
            url,
        })
    }
}
