//! Persisted key-value store abstraction.
//!
//! The engine treats cross-session state (active flag, last global status,
//! aggregate counters) as an external key-value store with get/set/subscribe
//! semantics. Two implementations ship: an in-memory store for tests and
//! embeddings, and a SQLite-backed store for the CLI.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

use crate::error_handling::StoreError;

/// Capacity of the change-notification channel. Subscribers that lag simply
/// miss intermediate values; the engine re-reads on demand.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A change notification from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// The key that changed.
    pub key: String,
    /// The new value.
    pub value: String,
}

/// Persisted key-value store with change notifications.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads the value for `key`, if present.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key` and notifies subscribers.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Subscribes to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

/// In-memory store. State lives for the process lifetime only.
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    changes: broadcast::Sender<StoreChange>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        MemoryStore {
            values: Mutex::new(HashMap::new()),
            changes,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .values
            .lock()
            .expect("memory store poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .expect("memory store poisoned")
            .insert(key.to_string(), value.to_string());
        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips_and_notifies() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe();

        assert_eq!(store.get("missing").await.unwrap(), None);
        store.set("truthlens_active", "true").await.unwrap();
        assert_eq!(
            store.get("truthlens_active").await.unwrap().as_deref(),
            Some("true")
        );

        let change = rx.recv().await.unwrap();
        assert_eq!(change.key, "truthlens_active");
        assert_eq!(change.value, "true");
    }
}
