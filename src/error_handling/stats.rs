//! Scan statistics tracking.
//!
//! Thread-safe counters for scan events, shared across the engine's
//! components via `Arc`. All counters are initialized to zero on creation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ScanEvent;

/// Thread-safe scan-event counters.
///
/// Every fail-soft recovery and every unit of scan progress increments a
/// counter here, so tests and the CLI can observe engine behavior without
/// scraping log output.
pub struct ScanStats {
    events: HashMap<ScanEvent, AtomicUsize>,
}

impl ScanStats {
    /// Creates a tracker with all counters at zero.
    pub fn new() -> Self {
        let mut events = HashMap::new();
        for event in ScanEvent::iter() {
            events.insert(event, AtomicUsize::new(0));
        }
        ScanStats { events }
    }

    /// Increments the counter for `event`.
    pub fn increment(&self, event: ScanEvent) {
        if let Some(counter) = self.events.get(&event) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment counter for {:?} which is not in the map. \
                 This indicates a bug in ScanStats initialization.",
                event
            );
        }
    }

    /// Returns the current count for `event`.
    pub fn count(&self, event: ScanEvent) -> usize {
        self.events
            .get(&event)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Returns a point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            scans_executed: self.count(ScanEvent::ScanExecuted),
            elements_processed: self.count(ScanEvent::ElementProcessed),
            elements_skipped: self.count(ScanEvent::ElementSkipped),
            elements_classified: self.count(ScanEvent::ElementClassified),
            cache_hits: self.count(ScanEvent::CacheHit),
            transport_failures: self.count(ScanEvent::TransportFailure),
            field_misses: self.count(ScanEvent::FieldMiss),
            short_title_skips: self.count(ScanEvent::ShortTitleSkip),
            store_failures: self.count(ScanEvent::StoreFailure),
        }
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the scan counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Scan passes executed.
    pub scans_executed: usize,
    /// Elements fully processed.
    pub elements_processed: usize,
    /// Elements skipped as already processed.
    pub elements_skipped: usize,
    /// Elements classified by the backend.
    pub elements_classified: usize,
    /// Classifications served from the cache.
    pub cache_hits: usize,
    /// Backend call failures recovered as fallbacks.
    pub transport_failures: usize,
    /// Field selectors that matched nothing.
    pub field_misses: usize,
    /// Elements skipped for having too short a title.
    pub short_title_skips: usize,
    /// Swallowed persisted-store failures.
    pub store_failures: usize,
}

impl std::fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scans: {}, processed: {}, skipped: {}, classified: {}, cache hits: {}, \
             transport failures: {}, field misses: {}, short titles: {}, store failures: {}",
            self.scans_executed,
            self.elements_processed,
            self.elements_skipped,
            self.elements_classified,
            self.cache_hits,
            self.transport_failures,
            self.field_misses,
            self.short_title_skips,
            self.store_failures
        )
    }
}
