//! Payment application service.
//!
//! Orchestrates the repository, session store and notifier ports.
//! Contains NO infrastructure logic - pure business orchestration.

use std::time::Duration;

use paygate_types::{
    AppError, Notifier, OrderId, PageQuery, Payment, PaymentData, PaymentRepository, PeriodRequest,
    RegisterPaymentRequest, SessionId, SessionStore, SortDirection, SortField,
};

pub mod fields;
pub mod ordering;

use fields::normalize_payment;

/// Session lifetime used when the deployment does not configure one.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(1800);

/// Ordering applied to period queries and used as the listing fallback.
const DEFAULT_ORDER: &[(SortField, SortDirection)] =
    &[(SortField::CreatedAt, SortDirection::Desc)];

/// Service-level configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub session_ttl: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct Registered {
    pub payment: Payment,
    pub session_id: SessionId,
}

/// One page of a period query.
#[derive(Debug, Clone)]
pub struct PeriodData {
    /// The page actually served; snaps back to 1 when the requested page
    /// lies past the end of the result set.
    pub page: u32,
    pub next_page_exists: bool,
    pub payments: Vec<PaymentData>,
}

/// Application service for payment operations.
///
/// Generic over the three ports - the adapters are injected at compile time.
/// This enables:
/// - Swapping adapters without code changes
/// - Testing with in-memory ports
/// - Compile-time checks for port implementation
pub struct PaymentService<R: PaymentRepository, S: SessionStore, N: Notifier> {
    repo: R,
    sessions: S,
    notifier: N,
    config: ServiceConfig,
}

impl<R: PaymentRepository, S: SessionStore, N: Notifier> PaymentService<R, S, N> {
    /// Creates a new payment service with default configuration.
    pub fn new(repo: R, sessions: S, notifier: N) -> Self {
        Self::with_config(repo, sessions, notifier, ServiceConfig::default())
    }

    /// Creates a new payment service with the given configuration.
    pub fn with_config(repo: R, sessions: S, notifier: N, config: ServiceConfig) -> Self {
        Self {
            repo,
            sessions,
            notifier,
            config,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the underlying session store.
    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Registration and lookups
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates and stores a new payment, then opens a session for it.
    ///
    /// Eligibility needs no check here: a just-created payment is always
    /// pending. A duplicate order id comes back from the storage constraint
    /// and surfaces as a validation error on the `orderId` field.
    pub async fn register_payment(
        &self,
        req: &RegisterPaymentRequest,
    ) -> Result<Registered, AppError> {
        let new = req.validate().map_err(AppError::Validation)?;
        let payment = self.repo.insert(new).await?;
        let session_id = self
            .sessions
            .create(payment.id, self.config.session_ttl)
            .await?;
        Ok(Registered {
            payment,
            session_id,
        })
    }

    /// Normalized payment data by order id.
    pub async fn get_payment_data(
        &self,
        order_id: &OrderId,
        fields: &str,
    ) -> Result<PaymentData, AppError> {
        let payment = self
            .repo
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".into()))?;
        Ok(normalize_payment(&payment, fields))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Opens a session for an existing payment, looked up by order id.
    ///
    /// The payment must exist and still be pending; a completed payment is
    /// as unfindable as a missing one.
    pub async fn create_payment_session(
        &self,
        order_id: &OrderId,
    ) -> Result<SessionId, AppError> {
        let payment = self
            .repo
            .find_by_order_id(order_id)
            .await?
            .filter(Payment::is_pending)
            .ok_or_else(|| {
                AppError::NotFound("Incomplete payment with this orderId was not found.".into())
            })?;
        Ok(self
            .sessions
            .create(payment.id, self.config.session_ttl)
            .await?)
    }

    /// Resolves a session to its payment: session -> payment id -> lookup.
    ///
    /// Either miss reports `None`. Does not filter by status; callers that
    /// need a still-pending payment re-check `is_pending` themselves.
    pub async fn payment_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Payment>, AppError> {
        match self.sessions.resolve(session_id).await? {
            Some(payment_id) => Ok(self.repo.find_by_id(payment_id).await?),
            None => Ok(None),
        }
    }

    /// Drops a session once it has served its purpose. Idempotent.
    pub async fn delete_session(&self, session_id: &SessionId) -> Result<bool, AppError> {
        Ok(self.sessions.delete(session_id).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Completion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Marks the payment completed, persists it, then notifies the merchant
    /// callback URL with the payment's default field set.
    ///
    /// Notification is fire-and-forget: failures are logged and never undo
    /// the completion. Concurrent double completion is last-write-wins; both
    /// writers store the same terminal status, and each call fires its own
    /// notification.
    pub async fn complete_payment(&self, mut payment: Payment) -> Result<Payment, AppError> {
        payment.complete();
        self.repo.update(&payment).await?;
        self.send_notification(&payment).await;
        Ok(payment)
    }

    async fn send_notification(&self, payment: &Payment) {
        let Some(url) = payment.notification.as_deref() else {
            return;
        };
        let data = normalize_payment(payment, "");
        if let Err(e) = self.notifier.notify(url, &data).await {
            tracing::warn!("Error sending notification: {}", e);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Period and listing queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// One page of the payments created inside a period, newest first.
    ///
    /// A requested page past the end of the result set snaps back to page 1
    /// rather than serving an empty page, and the reported page number snaps
    /// with it. An empty period reports not-found.
    pub async fn payments_from_period(&self, req: &PeriodRequest) -> Result<PeriodData, AppError> {
        let count = self
            .repo
            .count_by_created_range(req.starts_on, req.ends_on)
            .await?;
        if count == 0 {
            return Err(AppError::NotFound("No payments found for this period.".into()));
        }

        let res_on_page = req.res_on_page;
        let mut page = req.page;
        if i64::from(page - 1) * i64::from(res_on_page) >= count {
            page = 1;
        }
        let offset = i64::from(page - 1) * i64::from(res_on_page);

        let items = self
            .repo
            .find_by_created_range(
                req.starts_on,
                req.ends_on,
                DEFAULT_ORDER,
                Some(i64::from(res_on_page)),
                Some(offset),
            )
            .await?;

        Ok(PeriodData {
            page,
            next_page_exists: i64::from(page) * i64::from(res_on_page) < count,
            payments: items
                .iter()
                .map(|payment| normalize_payment(payment, &req.fields))
                .collect(),
        })
    }

    /// A page of the full payments listing, ordered by the caller's
    /// `orderBy` expression.
    ///
    /// Pagination applies only when both `page` and `resOnPage` are given,
    /// matching the period endpoint's sibling behavior.
    pub async fn payments_page(&self, query: &PageQuery) -> Result<Vec<PaymentData>, AppError> {
        query.validate().map_err(AppError::Validation)?;

        let order = ordering::parse_order_by(
            query.order_by.as_deref().unwrap_or(""),
            &SortField::ALL,
            DEFAULT_ORDER,
        );
        let (limit, offset) = match (query.page, query.res_on_page) {
            (Some(page), Some(res_on_page)) => (
                Some(i64::from(res_on_page)),
                Some(i64::from(page - 1) * i64::from(res_on_page)),
            ),
            _ => (None, None),
        };

        let items = self.repo.list(&order, limit, offset).await?;
        let fields = query.fields.as_deref().unwrap_or("");
        Ok(items
            .iter()
            .map(|payment| normalize_payment(payment, fields))
            .collect())
    }
}
