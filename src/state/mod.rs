//! State synchronization.
//!
//! Connects the engine to the persisted key-value store and to the
//! control-message protocol used by the presentational shell. The bridge
//! mirrors the active flag and last global status on every change, seeds
//! defaults on startup, and maintains the aggregate per-status counters. All
//! store failures are swallowed: the engine continues on in-memory defaults
//! and records a counter event.

mod sqlite;
mod store;

pub use sqlite::SqliteStore;
pub use store::{MemoryStore, StateStore, StoreChange};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use log::warn;

use crate::classify::Status;
use crate::config::{ACTIVE_KEY, STATS_KEY, STATUS_KEY};
use crate::error_handling::{ScanEvent, ScanStats};

/// Request messages of the control protocol (shell → engine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    /// Query the active flag.
    GetActive,
    /// Set the active flag; activates or deactivates the engine.
    SetActive {
        /// Desired active state.
        active: bool,
    },
    /// Query the last known global status.
    GetStatus,
    /// Override the global status; restyles badges while active.
    SetStatus {
        /// Desired status.
        status: Status,
    },
}

/// Response messages of the control protocol (engine → shell).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlResponse {
    /// Response to the active-flag messages.
    Active {
        /// Current active state.
        active: bool,
    },
    /// Response to the status messages.
    Status {
        /// Current global status.
        status: Status,
    },
}

/// Aggregate per-status counters persisted under [`STATS_KEY`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounts {
    /// Products classified legit.
    #[serde(default)]
    pub legit: u64,
    /// Products classified scam.
    #[serde(default)]
    pub scam: u64,
    /// Products classified uncertain.
    #[serde(default)]
    pub uncertain: u64,
}

/// Bridge between the engine and the persisted store.
pub struct StateBridge {
    store: Arc<dyn StateStore>,
    stats: Arc<ScanStats>,
}

impl StateBridge {
    /// Creates a bridge over `store`.
    pub fn new(store: Arc<dyn StateStore>, stats: Arc<ScanStats>) -> Self {
        StateBridge { store, stats }
    }

    /// Subscribes to store change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.store.subscribe()
    }

    /// Reads the persisted active flag. If absent, persists and returns
    /// `default`. Store failures fall back to `default` for this session.
    pub async fn load_active(&self, default: bool) -> bool {
        match self.store.get(ACTIVE_KEY).await {
            Ok(Some(value)) => value == "true",
            Ok(None) => {
                self.persist_active(default).await;
                default
            }
            Err(e) => {
                self.stats.increment(ScanEvent::StoreFailure);
                warn!("State store unavailable, assuming active={default}: {e}");
                default
            }
        }
    }

    /// Persists the active flag. Failures are swallowed.
    pub async fn persist_active(&self, active: bool) {
        if let Err(e) = self
            .store
            .set(ACTIVE_KEY, if active { "true" } else { "false" })
            .await
        {
            self.stats.increment(ScanEvent::StoreFailure);
            warn!("Failed to persist active flag: {e}");
        }
    }

    /// Persists the global status. Failures are swallowed.
    pub async fn persist_status(&self, status: Status) {
        if let Err(e) = self.store.set(STATUS_KEY, &status.to_string()).await {
            self.stats.increment(ScanEvent::StoreFailure);
            warn!("Failed to persist status: {e}");
        }
    }

    /// Reads the persisted global status, if any.
    pub async fn load_status(&self) -> Option<Status> {
        match self.store.get(STATUS_KEY).await {
            Ok(Some(value)) => value.parse().ok(),
            Ok(None) => None,
            Err(e) => {
                self.stats.increment(ScanEvent::StoreFailure);
                warn!("State store unavailable reading status: {e}");
                None
            }
        }
    }

    /// Increments the persisted aggregate counter for `status` by one.
    /// Read-modify-write; failures are swallowed.
    pub async fn increment_counter(&self, status: Status) {
        let mut counts = match self.store.get(STATS_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            Ok(None) => AggregateCounts::default(),
            Err(e) => {
                self.stats.increment(ScanEvent::StoreFailure);
                warn!("Failed to read aggregate counters: {e}");
                return;
            }
        };
        match status {
            Status::Legit => counts.legit += 1,
            Status::Scam => counts.scam += 1,
            Status::Uncertain => counts.uncertain += 1,
        }
        let json = match serde_json::to_string(&counts) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize aggregate counters: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(STATS_KEY, &json).await {
            self.stats.increment(ScanEvent::StoreFailure);
            warn!("Failed to persist aggregate counters: {e}");
        }
    }

    /// Reads the persisted aggregate counters.
    pub async fn counters(&self) -> AggregateCounts {
        match self.store.get(STATS_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            _ => AggregateCounts::default(),
        }
    }
}
