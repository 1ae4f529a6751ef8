//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use paygate_types::{Notifier, PaymentRepository, SessionStore};

use super::handlers::{self, AppState};
use crate::PaymentService;
use crate::openapi::ApiDoc;

/// HTTP Server for the payment gateway API.
pub struct HttpServer<R: PaymentRepository, S: SessionStore, N: Notifier> {
    state: Arc<AppState<R, S, N>>,
}

impl<R: PaymentRepository, S: SessionStore, N: Notifier> HttpServer<R, S, N> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: PaymentService<R, S, N>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(SwaggerUi::new("/doc").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .route("/health", get(handlers::health))
            .route(
                "/api/payment/register",
                post(handlers::register_payment::<R, S, N>),
            )
            .route(
                "/api/payment/{order_id}",
                get(handlers::get_payment::<R, S, N>),
            )
            .route(
                "/api/payments/period",
                get(handlers::payments_from_period::<R, S, N>),
            )
            .route("/api/payments", get(handlers::payments_page::<R, S, N>))
            .route(
                "/api/session/create/{order_id}",
                get(handlers::create_payment_session::<R, S, N>),
            )
            .route(
                "/payment/card/{session_id}",
                get(handlers::card_form::<R, S, N>).post(handlers::pay_card::<R, S, N>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
