//! Error types and scan statistics.
//!
//! The engine itself is fail-soft: extraction misses degrade to empty fields,
//! classification failures degrade to a cached `uncertain` fallback, and
//! store failures fall back to in-memory defaults. The types here cover the
//! few genuinely fatal paths (initialization) plus the structured counter
//! channel that fail-soft paths report into.

mod stats;
mod types;

pub use stats::{ScanStats, StatsSnapshot};
pub use types::{InitializationError, ScanEvent, StoreError};
