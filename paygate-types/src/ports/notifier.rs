//! Notifier port trait.

use crate::error::NotifyError;

/// Outbound notification to a merchant-supplied callback URL.
///
/// Invoked after a payment completes, with the payment data as query
/// parameters. Delivery is fire-and-forget: the caller logs failures and
/// never retries, and a failed notification never rolls back the
/// completion that triggered it.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(
        &self,
        url: &str,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), NotifyError>;
}
