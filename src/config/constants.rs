//! Configuration constants.
//!
//! All operational constants used by the engine: debounce windows, cache
//! sizing, storage keys, and the marker attributes written into the page.

use std::time::Duration;

/// Default base URL of the product-analysis backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Path of the analysis endpoint, appended to the API base URL.
pub const ANALYZE_PATH: &str = "/analyze-product";

/// Debounce window applied to DOM-mutation batches before a re-scan.
pub const MUTATION_DEBOUNCE: Duration = Duration::from_millis(400);

/// Debounce window applied to scroll events before a re-scan.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(300);

/// Minimum title length (exclusive) required before a product is sent to the
/// analysis backend. Shorter titles get an `uncertain` badge with no call.
pub const MIN_TITLE_LEN: usize = 3;

/// Default maximum number of distinct fingerprints retained by the
/// classification cache. The cache is LRU-bounded so repeated elements stay
/// cheap without growing unbounded across long-lived pages.
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Separator joining title and price into a cache fingerprint.
pub const FINGERPRINT_SEPARATOR: &str = "_";

/// Reason string attached to the fail-soft fallback classification.
pub const FALLBACK_REASON: &str = "Unable to analyze - Backend unavailable";

/// Persisted-store key for the on/off flag.
pub const ACTIVE_KEY: &str = "truthlens_active";

/// Persisted-store key for the last known global status.
pub const STATUS_KEY: &str = "truthlens_status";

/// Persisted-store key for the aggregate per-status counters.
pub const STATS_KEY: &str = "truthlens_stats";

/// Attribute identifying a rendered badge element.
pub const BADGE_ATTR: &str = "data-truthlens";

/// Durable attribute marking a product element as already handled. Survives
/// the in-memory tracker being reset by partial page re-renders.
pub const PRODUCT_MARKER_ATTR: &str = "data-truthlens-product";

/// Attribute identifying the detail popover element.
pub const POPOVER_ATTR: &str = "data-truthlens-info";

/// Attribute identifying the popover's close control.
pub const POPOVER_CLOSE_ATTR: &str = "data-truthlens-close";

/// Default per-request timeout for calls to the analysis backend.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent sent on backend and page-fetch requests.
pub const DEFAULT_USER_AGENT: &str = "truthlens/0.1 (+https://github.com/truthlens)";
