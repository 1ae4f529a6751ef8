//! In-memory TTL session store.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;

use paygate_types::{PaymentId, SessionError, SessionId, SessionStore};

/// Collision retries before the store gives up. With 128-bit random tokens a
/// second attempt is already vanishingly unlikely; the bound exists so a
/// broken randomness source cannot loop forever.
const MAX_CREATE_ATTEMPTS: u32 = 5;

struct SessionEntry {
    payment_id: PaymentId,
    expires_at: Instant,
}

/// In-process session store backed by a concurrent map.
///
/// Expiry is passive: entries past their deadline stop resolving and are
/// dropped lazily on the next access, so an expired session is
/// indistinguishable from one that never existed.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: DashMap<SessionId, SessionEntry>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of live entries, expired ones included until they are swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(
        &self,
        payment_id: PaymentId,
        ttl: Duration,
    ) -> Result<SessionId, SessionError> {
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let session_id = SessionId::new();
            match self.entries.entry(session_id) {
                // Never overwrite a live session; try a fresh token instead.
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(SessionEntry {
                        payment_id,
                        expires_at: Instant::now() + ttl,
                    });
                    return Ok(session_id);
                }
            }
        }
        Err(SessionError::Storage(format!(
            "could not allocate a unique session token in {} attempts",
            MAX_CREATE_ATTEMPTS
        )))
    }

    async fn resolve(&self, session_id: &SessionId) -> Result<Option<PaymentId>, SessionError> {
        let expired = match self.entries.get(session_id) {
            None => return Ok(None),
            Some(entry) if Instant::now() < entry.expires_at => {
                return Ok(Some(entry.payment_id));
            }
            Some(_) => true,
        };
        if expired {
            self.entries.remove(session_id);
        }
        Ok(None)
    }

    async fn delete(&self, session_id: &SessionId) -> Result<bool, SessionError> {
        self.entries.remove(session_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(1800);

    #[tokio::test(start_paused = true)]
    async fn test_round_trip_before_expiry() {
        let store = MemorySessionStore::new();
        let payment_id = PaymentId::from_i64(42);

        let session_id = store.create(payment_id, TTL).await.unwrap();

        assert_eq!(store.resolve(&session_id).await.unwrap(), Some(payment_id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_ttl() {
        let store = MemorySessionStore::new();
        let session_id = store
            .create(PaymentId::from_i64(1), Duration::from_secs(30))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(31)).await;

        assert_eq!(store.resolve(&session_id).await.unwrap(), None);
        assert!(store.is_empty(), "expired entry should be swept on access");
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_does_not_refresh_ttl() {
        let store = MemorySessionStore::new();
        let session_id = store
            .create(PaymentId::from_i64(1), Duration::from_secs(30))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(20)).await;
        assert!(store.resolve(&session_id).await.unwrap().is_some());

        // 35s after creation: a refreshing read would have kept it alive.
        tokio::time::advance(Duration::from_secs(15)).await;
        assert_eq!(store.resolve(&session_id).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_is_idempotent() {
        let store = MemorySessionStore::new();

        let unknown = SessionId::new();
        assert!(store.delete(&unknown).await.unwrap());

        let session_id = store.create(PaymentId::from_i64(9), TTL).await.unwrap();
        assert!(store.delete(&session_id).await.unwrap());
        assert_eq!(store.resolve(&session_id).await.unwrap(), None);
        assert!(store.delete(&session_id).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_tokens_for_same_payment() {
        let store = MemorySessionStore::new();
        let payment_id = PaymentId::from_i64(5);

        let first = store.create(payment_id, TTL).await.unwrap();
        let second = store.create(payment_id, TTL).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.resolve(&first).await.unwrap(), Some(payment_id));
        assert_eq!(store.resolve(&second).await.unwrap(), Some(payment_id));
    }
}
