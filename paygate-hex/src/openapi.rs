//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use paygate_types::domain::SessionId;
use paygate_types::dto::{
    CardFormData, CardPaymentRequest, PaymentDataResponse, PaymentsPageResponse,
    PeriodPageResponse, RegisterPaymentRequest, SessionCreatedResponse, StatusResponse,
    ValidationErrorResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Register a payment and receive a payment session
#[utoipa::path(
    post,
    path = "/api/payment/register",
    tag = "payments",
    request_body = RegisterPaymentRequest,
    responses(
        (status = 200, description = "Payment registered, session created", body = SessionCreatedResponse),
        (status = 400, description = "Validation failure (a duplicate orderId is reported here too)", body = ValidationErrorResponse)
    )
)]
async fn register_payment() {}

/// Get payment data by order id
#[utoipa::path(
    get,
    path = "/api/payment/{orderId}",
    tag = "payments",
    params(
        ("orderId" = String, Path, description = "External order identifier"),
        ("fields" = Option<String>, Query, description = "Optional fields to include (notification, createdAt)")
    ),
    responses(
        (status = 200, description = "Payment data", body = PaymentDataResponse),
        (status = 404, description = "No payment with this order id")
    )
)]
async fn get_payment() {}

/// Payments created inside a period, paginated
#[utoipa::path(
    get,
    path = "/api/payments/period",
    tag = "payments",
    params(
        ("startsOn" = String, Query, description = "Exclusive lower bound, RFC 3339"),
        ("endsOn" = String, Query, description = "Exclusive upper bound, RFC 3339"),
        ("fields" = Option<String>, Query, description = "Optional fields to include"),
        ("page" = Option<u32>, Query, description = "Page number, snaps back to 1 past the end"),
        ("resOnPage" = Option<u32>, Query, description = "Results per page (default 100)")
    ),
    responses(
        (status = 200, description = "One page of payments, newest first", body = PeriodPageResponse),
        (status = 400, description = "Validation failure", body = ValidationErrorResponse),
        (status = 404, description = "No payments in the period")
    )
)]
async fn payments_from_period() {}

/// Full payments listing with the orderBy mini-language
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "payments",
    params(
        ("orderBy" = Option<String>, Query, description = "Ordering expression, e.g. desc_createdAt or ASC(amount)"),
        ("fields" = Option<String>, Query, description = "Optional fields to include"),
        ("page" = Option<u32>, Query, description = "Page number (only with resOnPage)"),
        ("resOnPage" = Option<u32>, Query, description = "Results per page (only with page)")
    ),
    responses(
        (status = 200, description = "Payments listing", body = PaymentsPageResponse),
        (status = 400, description = "Validation failure", body = ValidationErrorResponse)
    )
)]
async fn payments_page() {}

/// Open a session for a pending payment
#[utoipa::path(
    get,
    path = "/api/session/create/{orderId}",
    tag = "sessions",
    params(
        ("orderId" = String, Path, description = "External order identifier")
    ),
    responses(
        (status = 200, description = "Session created", body = SessionCreatedResponse),
        (status = 404, description = "No pending payment with this order id")
    )
)]
async fn create_payment_session() {}

/// Card form data for a session
#[utoipa::path(
    get,
    path = "/payment/card/{sessionId}",
    tag = "sessions",
    params(
        ("sessionId" = SessionId, Path, description = "Payment session token")
    ),
    responses(
        (status = 200, description = "Amount and purpose backing the card form", body = CardFormData),
        (status = 400, description = "Malformed session token", body = StatusResponse),
        (status = 404, description = "Session expired, unknown, or payment already completed", body = StatusResponse)
    )
)]
async fn card_form() {}

/// Submit card data and complete the payment
#[utoipa::path(
    post,
    path = "/payment/card/{sessionId}",
    tag = "sessions",
    request_body = CardPaymentRequest,
    params(
        ("sessionId" = SessionId, Path, description = "Payment session token")
    ),
    responses(
        (status = 200, description = "Payment completed", body = StatusResponse),
        (status = 400, description = "Card validation failure", body = ValidationErrorResponse),
        (status = 404, description = "Session expired, unknown, or payment already completed", body = StatusResponse)
    )
)]
async fn pay_card() {}

/// OpenAPI documentation for the payment gateway API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Paygate API",
        version = "1.0.0",
        description = "A small payment gateway: registers payments, hands out time-limited payment sessions, accepts card submissions, and notifies merchant callback URLs on completion.",
        license(name = "MIT"),
    ),
    paths(
        health,
        register_payment,
        get_payment,
        payments_from_period,
        payments_page,
        create_payment_session,
        card_form,
        pay_card,
    ),
    components(
        schemas(
            RegisterPaymentRequest,
            CardPaymentRequest,
            SessionCreatedResponse,
            PaymentDataResponse,
            PeriodPageResponse,
            PaymentsPageResponse,
            CardFormData,
            StatusResponse,
            ValidationErrorResponse,
            SessionId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "payments", description = "Payment registration and queries"),
        (name = "sessions", description = "Payment sessions and card submission"),
    )
)]
pub struct ApiDoc;
