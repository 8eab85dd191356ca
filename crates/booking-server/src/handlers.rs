//! HTTP Handlers
//!
//! The booking endpoint pipeline is strictly linear: parse → validate →
//! resolve price → log booking (best-effort) → create checkout session →
//! respond. A failure at any gate ends the request with the mapped status;
//! there is no retry, rollback, or compensation between gates.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use booking_core::{BookingError, BookingRecord, BookingRequest, PricePolicy, to_minor_units};
use booking_payments::CheckoutRequest;
use booking_sheets::SheetsError;

use crate::state::AppState;

/// Message for failures whose detail belongs in server logs only.
const GENERIC_ERROR: &str = "Something went wrong.";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog_configured: bool,
    pub booking_log_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        catalog_configured: state.catalog.is_some(),
        booking_log_configured: state.booking_log.is_some(),
    })
}

/// Any verb other than POST/OPTIONS on the booking route. OPTIONS itself
/// never reaches the router; the CORS layer answers preflight directly.
pub async fn method_not_allowed() -> HandlerError {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Create a checkout session for a booking submission
pub async fn create_checkout(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<CheckoutResponse>, HandlerError> {
    // A body that does not parse is an internal error, not a validation
    // one: the detail goes to the log, the caller sees a generic message.
    let booking: BookingRequest = serde_json::from_str(&body).map_err(|e| {
        tracing::error!("unparseable booking body: {e}");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
    })?;

    booking.validate().map_err(|e| {
        tracing::warn!("rejected booking: {e}");
        error_response(StatusCode::BAD_REQUEST, e.user_message())
    })?;

    let price = resolve_price(&state, &booking).await?;

    let unit_amount = to_minor_units(&price).map_err(|e| {
        tracing::warn!("rejected booking price: {e}");
        error_response(StatusCode::BAD_REQUEST, e.user_message())
    })?;

    // Best-effort, at-most-once: a log failure never blocks the payment.
    if let Some(ref log) = state.booking_log {
        let record = BookingRecord::from_request(&booking, price.clone());
        if let Err(e) = log.record(&record).await {
            tracing::warn!("booking log delivery failed: {e}");
        }
    }

    let session = state
        .payments
        .create_session(CheckoutRequest {
            product_name: booking.course.clone(),
            unit_amount,
            currency: state.config.currency,
            customer_email: booking.email.clone(),
            success_url: state.config.success_url.clone(),
            cancel_url: state.config.cancel_url.clone(),
        })
        .await
        .map_err(|e| {
            tracing::error!("checkout session creation failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
        })?;

    tracing::info!(session = %session.id, course = %booking.course, "checkout session created");

    Ok(Json(CheckoutResponse { url: session.url }))
}

// ============================================================================
// Price Resolution
// ============================================================================

async fn resolve_price(
    state: &AppState,
    booking: &BookingRequest,
) -> Result<String, HandlerError> {
    match state.config.price_policy {
        PricePolicy::CallerSupplied => booking
            .price
            .clone()
            .filter(|price| !price.trim().is_empty())
            .ok_or_else(|| {
                tracing::warn!("rejected booking: {}", BookingError::MissingPrice);
                error_response(
                    StatusCode::BAD_REQUEST,
                    BookingError::MissingPrice.user_message(),
                )
            }),
        PricePolicy::Catalog => {
            // The published sheet keys prices on (course, location), so the
            // location is required under this policy.
            let location = booking
                .location
                .as_deref()
                .filter(|location| !location.trim().is_empty())
                .ok_or_else(|| {
                    tracing::warn!("rejected booking: {}", BookingError::MissingField("location"));
                    error_response(
                        StatusCode::BAD_REQUEST,
                        BookingError::MissingField("location").user_message(),
                    )
                })?;

            let catalog = state.catalog.as_ref().ok_or_else(|| {
                tracing::error!("catalog price policy active but no catalog feed configured");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
            })?;

            match catalog.price_for(&booking.course, location).await {
                Ok(row) => Ok(row.price),
                Err(e @ SheetsError::PriceNotFound { .. }) => {
                    tracing::warn!("rejected booking: {e}");
                    Err(error_response(
                        StatusCode::BAD_REQUEST,
                        "Course price not found.",
                    ))
                }
                Err(e) => {
                    tracing::error!("catalog lookup failed: {e}");
                    Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR))
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use booking_core::{BookingRecord, PricePolicy};
    use booking_payments::{
        CheckoutGateway, CheckoutRequest, CheckoutSession, Currency, PaymentError,
    };
    use booking_sheets::{BookingLog, CatalogRow, MemoryCatalog, PriceCatalog, SheetsError};

    use crate::config::AppConfig;
    use crate::router;
    use crate::state::AppState;

    // ------------------------------------------------------------------
    // Stub collaborators
    // ------------------------------------------------------------------

    struct CountingCatalog {
        inner: MemoryCatalog,
        calls: AtomicUsize,
    }

    impl CountingCatalog {
        fn with_rows(rows: Vec<CatalogRow>) -> Arc<Self> {
            Arc::new(Self {
                inner: MemoryCatalog::new(rows),
                calls: AtomicUsize::new(0),
            })
        }

        fn standard() -> Arc<Self> {
            Self::with_rows(vec![CatalogRow {
                course: "Photography Basics".into(),
                location: "London".into(),
                price: "150.00".into(),
            }])
        }
    }

    #[async_trait]
    impl PriceCatalog for CountingCatalog {
        async fn price_for(
            &self,
            course: &str,
            location: &str,
        ) -> booking_sheets::Result<CatalogRow> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.price_for(course, location).await
        }
    }

    struct StubGateway {
        url: String,
        fail: bool,
        calls: AtomicUsize,
        last_request: Mutex<Option<CheckoutRequest>>,
    }

    impl StubGateway {
        fn ok(url: &str) -> Arc<Self> {
            Arc::new(Self {
                url: url.into(),
                fail: false,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                url: String::new(),
                fail: true,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CheckoutGateway for StubGateway {
        async fn create_session(
            &self,
            request: CheckoutRequest,
        ) -> booking_payments::Result<CheckoutSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            if self.fail {
                return Err(PaymentError::Stripe("simulated outage".into()));
            }
            Ok(CheckoutSession {
                id: "cs_test_123".into(),
                url: self.url.clone(),
            })
        }
    }

    struct FailingLog {
        calls: AtomicUsize,
    }

    impl FailingLog {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl BookingLog for FailingLog {
        async fn record(&self, _booking: &BookingRecord) -> booking_sheets::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SheetsError::Status(StatusCode::BAD_GATEWAY))
        }
    }

    // ------------------------------------------------------------------
    // Harness
    // ------------------------------------------------------------------

    fn test_config(policy: PricePolicy) -> AppConfig {
        AppConfig {
            stripe_secret_key: "sk_test_xxx".into(),
            catalog_url: None,
            booking_log_url: None,
            success_url: "https://example.com/booking-success".into(),
            cancel_url: "https://example.com/booking-cancelled".into(),
            currency: Currency::GBP,
            price_policy: policy,
            bind_addr: "127.0.0.1:0".into(),
        }
    }

    fn app(
        policy: PricePolicy,
        catalog: Option<Arc<CountingCatalog>>,
        booking_log: Option<Arc<FailingLog>>,
        payments: Arc<StubGateway>,
    ) -> Router {
        router(AppState {
            catalog: catalog.map(|c| c as Arc<dyn PriceCatalog>),
            booking_log: booking_log.map(|l| l as Arc<dyn BookingLog>),
            payments: payments as Arc<dyn CheckoutGateway>,
            config: Arc::new(test_config(policy)),
        })
    }

    async fn post_booking(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/checkout")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn valid_booking() -> String {
        json!({
            "name": "A",
            "email": "a@x.com",
            "course": "Photography Basics",
            "location": "London",
        })
        .to_string()
    }

    // ------------------------------------------------------------------
    // Endpoint behavior
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn missing_field_is_rejected_before_any_collaborator() {
        let catalog = CountingCatalog::standard();
        let gateway = StubGateway::ok("https://pay.example/abc");
        let app = app(PricePolicy::Catalog, Some(catalog.clone()), None, gateway.clone());

        let body = json!({"name": "A", "course": "Photography Basics", "location": "London"});
        let (status, json) = post_booking(app, &body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing booking details");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_error_body() {
        let catalog = CountingCatalog::standard();
        let gateway = StubGateway::ok("https://pay.example/abc");
        let app = app(PricePolicy::Catalog, Some(catalog.clone()), None, gateway.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/checkout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Method Not Allowed");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn preflight_returns_permissive_headers() {
        let app = app(
            PricePolicy::Catalog,
            Some(CountingCatalog::standard()),
            None,
            StubGateway::ok("https://pay.example/abc"),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/checkout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("POST") && methods.contains("OPTIONS"));
        let allowed = headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_lowercase();
        assert!(allowed.contains("content-type"));
    }

    #[tokio::test]
    async fn unmatched_catalog_pair_is_400_and_gateway_untouched() {
        let catalog = CountingCatalog::standard();
        let gateway = StubGateway::ok("https://pay.example/abc");
        let app = app(PricePolicy::Catalog, Some(catalog.clone()), None, gateway.clone());

        let body = json!({
            "name": "A",
            "email": "a@x.com",
            "course": "Photography Basics",
            "location": "Bristol",
        });
        let (status, json) = post_booking(app, &body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Course price not found.");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_positive_or_non_numeric_price_never_reaches_gateway() {
        for bad_price in ["0", "-5", "abc", "79228162514264337593543950335"] {
            let gateway = StubGateway::ok("https://pay.example/abc");
            let app = app(PricePolicy::CallerSupplied, None, None, gateway.clone());

            let body = json!({
                "name": "A",
                "email": "a@x.com",
                "course": "Photography Basics",
                "price": bad_price,
            });
            let (status, json) = post_booking(app, &body.to_string()).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "price {bad_price:?}");
            assert_eq!(json["error"], "Invalid booking price.");
            assert_eq!(gateway.calls.load(Ordering::SeqCst), 0, "price {bad_price:?}");
        }
    }

    #[tokio::test]
    async fn missing_price_under_caller_supplied_policy_is_400() {
        let gateway = StubGateway::ok("https://pay.example/abc");
        let app = app(PricePolicy::CallerSupplied, None, None, gateway.clone());

        let body = json!({"name": "A", "email": "a@x.com", "course": "Photography Basics"});
        let (status, json) = post_booking(app, &body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing booking details");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn catalog_price_reaches_gateway_in_minor_units() {
        let gateway = StubGateway::ok("https://pay.example/abc");
        let app = app(
            PricePolicy::Catalog,
            Some(CountingCatalog::standard()),
            None,
            gateway.clone(),
        );

        let (status, _) = post_booking(app, &valid_booking()).await;
        assert_eq!(status, StatusCode::OK);

        let request = gateway.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.unit_amount, 15000);
        assert_eq!(request.product_name, "Photography Basics");
        assert_eq!(request.customer_email, "a@x.com");
        assert_eq!(request.currency, Currency::GBP);
        assert_eq!(request.success_url, "https://example.com/booking-success");
    }

    #[tokio::test]
    async fn success_response_is_exactly_the_redirect_url() {
        let app = app(
            PricePolicy::Catalog,
            Some(CountingCatalog::standard()),
            None,
            StubGateway::ok("https://pay.example/abc"),
        );

        let (status, json) = post_booking(app, &valid_booking()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"url": "https://pay.example/abc"}));
    }

    #[tokio::test]
    async fn booking_log_failure_does_not_block_checkout() {
        let log = FailingLog::new();
        let app = app(
            PricePolicy::Catalog,
            Some(CountingCatalog::standard()),
            Some(log.clone()),
            StubGateway::ok("https://pay.example/abc"),
        );

        let (status, json) = post_booking(app, &valid_booking()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["url"], "https://pay.example/abc");
        // Attempted exactly once, failure swallowed.
        assert_eq!(log.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_500_with_generic_message() {
        let catalog = CountingCatalog::standard();
        let gateway = StubGateway::ok("https://pay.example/abc");
        let app = app(PricePolicy::Catalog, Some(catalog.clone()), None, gateway.clone());

        let (status, json) = post_booking(app, "not json at all").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Something went wrong.");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn gateway_failure_is_500_without_stripe_detail() {
        let gateway = StubGateway::failing();
        let app = app(
            PricePolicy::Catalog,
            Some(CountingCatalog::standard()),
            None,
            gateway.clone(),
        );

        let (status, json) = post_booking(app, &valid_booking()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Payment processing failed. Please try again.");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_location_under_catalog_policy_is_400() {
        let catalog = CountingCatalog::standard();
        let app = app(
            PricePolicy::Catalog,
            Some(catalog.clone()),
            None,
            StubGateway::ok("https://pay.example/abc"),
        );

        let body = json!({"name": "A", "email": "a@x.com", "course": "Photography Basics"});
        let (status, json) = post_booking(app, &body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing booking details");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn health_reports_collaborator_configuration() {
        let app = app(
            PricePolicy::Catalog,
            Some(CountingCatalog::standard()),
            None,
            StubGateway::ok("https://pay.example/abc"),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["catalog_configured"], true);
        assert_eq!(json["booking_log_configured"], false);
    }
}
