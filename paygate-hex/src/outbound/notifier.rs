//! HTTP notifier adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use paygate_types::{Notifier, NotifyError};

/// Timeout for a single notification request.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Fire-and-forget GET notifier.
///
/// The payment data travels as query parameters on a GET request to the
/// merchant-supplied URL. The request is dispatched on a detached task so
/// the completing request never waits for the merchant's endpoint; delivery
/// failures are logged and dropped.
#[derive(Clone, Default)]
pub struct HttpNotifier {
    client: reqwest::Client,
}

impl HttpNotifier {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(
        &self,
        url: &str,
        params: &serde_json::Map<String, Value>,
    ) -> Result<(), NotifyError> {
        let query: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect();

        let request = self
            .client
            .get(url)
            .query(&query)
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.execute(request).await {
                tracing::warn!("Error sending notification: {}", e);
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_a_transport_error() {
        let notifier = HttpNotifier::new();
        let result = notifier.notify("not a url", &serde_json::Map::new()).await;
        assert!(matches!(result, Err(NotifyError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_does_not_fail_dispatch() {
        // Delivery errors surface in the detached task, not the caller.
        let notifier = HttpNotifier::new();
        let mut params = serde_json::Map::new();
        params.insert("orderId".to_string(), Value::String("order-1".into()));
        let result = notifier
            .notify("http://127.0.0.1:1/callback", &params)
            .await;
        assert!(result.is_ok());
    }
}
