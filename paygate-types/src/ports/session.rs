//! Session store port trait.

use std::time::Duration;

use crate::domain::{PaymentId, SessionId};
use crate::error::SessionError;

/// Ephemeral, TTL-bound mapping from session token to payment id.
///
/// A session either has not yet expired and resolves, or it is absent;
/// the two are observationally identical. Sessions hold a weak reference
/// only - resolving callers must re-verify the payment still exists and
/// is still pending.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Creates a session for the given payment, expiring after `ttl`.
    ///
    /// Implementations must never overwrite an existing token: on a
    /// collision they retry with a fresh token, giving up after a bounded
    /// number of attempts with a storage error.
    async fn create(&self, payment_id: PaymentId, ttl: Duration)
    -> Result<SessionId, SessionError>;

    /// Resolves a token to its payment id, if present and not expired.
    /// A successful read does not refresh the TTL.
    async fn resolve(&self, session_id: &SessionId) -> Result<Option<PaymentId>, SessionError>;

    /// Deletes a session. Idempotent: reports `Ok(true)` whether or not the
    /// entry existed, and fails only on a genuine storage error.
    async fn delete(&self, session_id: &SessionId) -> Result<bool, SessionError>;
}
