//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use paygate_types::{
    AppError, CardFormData, CardPaymentRequest, Notifier, OrderId, PageQuery, Payment,
    PaymentDataResponse, PaymentRepository, PaymentsPageResponse, PeriodPageResponse, PeriodQuery,
    RegisterPaymentRequest, SessionCreatedResponse, SessionId, SessionStore, StatusResponse,
    ValidationErrorResponse,
};

use crate::PaymentService;

const STATUS_SUCCESS: &str = "Success";

/// Application state shared across handlers.
pub struct AppState<R: PaymentRepository, S: SessionStore, N: Notifier> {
    pub service: PaymentService<R, S, N>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    status: "Validation error occurred".to_string(),
                    errors,
                }),
            )
                .into_response(),
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(StatusResponse { status: message })).into_response()
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error serving request: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(StatusResponse {
                        status: "Internal server error.".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Query-string carrier for the optional `fields` parameter.
#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    #[serde(default)]
    pub fields: Option<String>,
}

fn card_payment_url(session_id: &SessionId) -> String {
    format!("/payment/card/{}", session_id)
}

fn session_created(session_id: SessionId) -> Json<SessionCreatedResponse> {
    Json(SessionCreatedResponse {
        status: STATUS_SUCCESS.to_string(),
        card_payment_url: card_payment_url(&session_id),
        session_id,
    })
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Get payment data by order id.
#[tracing::instrument(skip(state), fields(order_id = %order_id))]
pub async fn get_payment<R: PaymentRepository, S: SessionStore, N: Notifier>(
    State(state): State<Arc<AppState<R, S, N>>>,
    Path(order_id): Path<String>,
    Query(query): Query<FieldsQuery>,
) -> Result<Response, ApiError> {
    let order_id = OrderId::new(order_id);
    let fields = query.fields.unwrap_or_default();

    match state.service.get_payment_data(&order_id, &fields).await {
        Ok(payment) => Ok(Json(PaymentDataResponse {
            status: STATUS_SUCCESS.to_string(),
            payment,
        })
        .into_response()),
        Err(AppError::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "status": "Payment not found", "orderId": order_id })),
        )
            .into_response()),
        Err(other) => Err(ApiError(other)),
    }
}

/// Register a payment and open a session for it.
#[tracing::instrument(skip(state, req), fields(order_id = %req.order_id))]
pub async fn register_payment<R: PaymentRepository, S: SessionStore, N: Notifier>(
    State(state): State<Arc<AppState<R, S, N>>>,
    Json(req): Json<RegisterPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let registered = state.service.register_payment(&req).await?;
    Ok(session_created(registered.session_id))
}

/// Paginated payments for a period.
#[tracing::instrument(skip(state, query))]
pub async fn payments_from_period<R: PaymentRepository, S: SessionStore, N: Notifier>(
    State(state): State<Arc<AppState<R, S, N>>>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let req = query.validate().map_err(AppError::Validation)?;
    let data = state.service.payments_from_period(&req).await?;
    Ok(Json(PeriodPageResponse {
        status: STATUS_SUCCESS.to_string(),
        page: data.page,
        next_page_exists: data.next_page_exists,
        payments: data.payments,
    }))
}

/// Full payments listing with the orderBy mini-language.
#[tracing::instrument(skip(state, query))]
pub async fn payments_page<R: PaymentRepository, S: SessionStore, N: Notifier>(
    State(state): State<Arc<AppState<R, S, N>>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.service.payments_page(&query).await?;
    Ok(Json(PaymentsPageResponse {
        status: STATUS_SUCCESS.to_string(),
        payments,
    }))
}

/// Open a session for a pending payment, looked up by order id.
#[tracing::instrument(skip(state), fields(order_id = %order_id))]
pub async fn create_payment_session<R: PaymentRepository, S: SessionStore, N: Notifier>(
    State(state): State<Arc<AppState<R, S, N>>>,
    Path(order_id): Path<String>,
) -> Result<Response, ApiError> {
    let order_id = OrderId::new(order_id);

    match state.service.create_payment_session(&order_id).await {
        Ok(session_id) => Ok(session_created(session_id).into_response()),
        Err(AppError::NotFound(message)) => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "status": message, "orderId": order_id })),
        )
            .into_response()),
        Err(other) => Err(ApiError(other)),
    }
}

/// Data for the card payment form behind a session.
#[tracing::instrument(skip(state))]
pub async fn card_form<R: PaymentRepository, S: SessionStore, N: Notifier>(
    State(state): State<Arc<AppState<R, S, N>>>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return Ok(invalid_session());
    };

    // The session only holds a weak reference: the payment must still exist
    // and still be pending.
    match state
        .service
        .payment_by_session(&session_id)
        .await?
        .filter(Payment::is_pending)
    {
        Some(payment) => Ok(Json(CardFormData {
            amount: payment.amount,
            purpose: payment.purpose,
        })
        .into_response()),
        None => Ok(expired_session()),
    }
}

/// Card submission: completes the payment behind the session.
#[tracing::instrument(skip(state, card))]
pub async fn pay_card<R: PaymentRepository, S: SessionStore, N: Notifier>(
    State(state): State<Arc<AppState<R, S, N>>>,
    Path(session_id): Path<String>,
    Json(card): Json<CardPaymentRequest>,
) -> Result<Response, ApiError> {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return Ok(invalid_session());
    };

    let Some(payment) = state
        .service
        .payment_by_session(&session_id)
        .await?
        .filter(Payment::is_pending)
    else {
        return Ok(expired_session());
    };

    card.validate().map_err(AppError::Validation)?;

    state.service.complete_payment(payment).await?;
    // The session is single-use. A failed delete leaves it to age out and
    // must not undo the completed payment.
    let _ = state.service.delete_session(&session_id).await;

    Ok(Json(StatusResponse {
        status: STATUS_SUCCESS.to_string(),
    })
    .into_response())
}

fn invalid_session() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(StatusResponse {
            status: "Invalid payment session.".to_string(),
        }),
    )
        .into_response()
}

fn expired_session() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(StatusResponse {
            status: "Payment session expired.".to_string(),
        }),
    )
        .into_response()
}
