//! course-booking checkout server
//!
//! Axum-based service exposing the booking endpoint: validates a booking
//! submission, resolves its price from the published catalog (or trusts
//! the caller, per policy), records the booking to the log webhook
//! best-effort, and returns a Stripe Checkout redirect URL.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booking_core::PricePolicy;
use booking_payments::StripeGateway;
use booking_sheets::{BookingLog, HttpBookingLog, HttpPriceCatalog, PriceCatalog};

use crate::config::AppConfig;
use crate::handlers::{create_checkout, health_check, method_not_allowed};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Wire up collaborators
    let catalog = config
        .catalog_url
        .as_ref()
        .map(|url| Arc::new(HttpPriceCatalog::new(url.clone())) as Arc<dyn PriceCatalog>);
    let booking_log = config
        .booking_log_url
        .as_ref()
        .map(|url| Arc::new(HttpBookingLog::new(url.clone())) as Arc<dyn BookingLog>);
    let payments = Arc::new(StripeGateway::new(&config.stripe_secret_key));

    match config.price_policy {
        PricePolicy::Catalog => tracing::info!("✓ Price policy: catalog lookup"),
        PricePolicy::CallerSupplied => tracing::info!("✓ Price policy: caller-supplied"),
    }
    if booking_log.is_none() {
        tracing::warn!("⚠ BOOKING_LOG_URL not set - bookings will not be recorded");
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        catalog,
        booking_log,
        payments,
        config: Arc::new(config),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 booking-server running on http://{}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health        - Health check");
    tracing::info!("  POST /api/checkout  - Create booking checkout session");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router. Split out so handler tests can drive it
/// without binding a socket.
fn router(state: AppState) -> Router {
    // Browser callers live on a different origin than the service; the
    // CORS layer also answers preflight OPTIONS with these headers.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/checkout",
            post(create_checkout).fallback(method_not_allowed),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
