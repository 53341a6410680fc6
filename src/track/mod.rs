//! Processed-element tracking.
//!
//! Keeps re-scans idempotent without querying rendered markup for every
//! element: an in-memory identity set (side table keyed by `NodeId`, which
//! never owns or extends the life of page nodes) plus a durable marker
//! attribute written into the page for cross-context detection after partial
//! DOM replacement.

use ego_tree::NodeId;
use scraper::Selector;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::{BADGE_ATTR, PRODUCT_MARKER_ATTR};
use crate::page::PageDom;
use crate::utils::parse_selector_unsafe;

static BADGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        &format!("[{}=\"true\"]", BADGE_ATTR),
        "processed badge lookup",
    )
});

/// Tracker of already-handled product elements.
#[derive(Default)]
pub struct ProcessedSet {
    ids: HashSet<NodeId>,
}

impl ProcessedSet {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `element` has already been handled.
    ///
    /// True if any of: the element is in the in-memory set; it or an ancestor
    /// carries the durable marker attribute; it contains a live badge
    /// descendant.
    pub fn is_processed(&self, page: &PageDom, element: NodeId) -> bool {
        if self.ids.contains(&element) {
            return true;
        }
        if page
            .closest_with_attribute(element, PRODUCT_MARKER_ATTR)
            .is_some()
        {
            return true;
        }
        !page.select_within(element, &BADGE_SELECTOR).is_empty()
    }

    /// Marks `element` as handled.
    ///
    /// Adds to the in-memory set and attempts to write the durable marker
    /// attribute; attribute writes on detached or non-element nodes are
    /// swallowed, so marking never raises.
    pub fn mark_processed(&mut self, page: &mut PageDom, element: NodeId) {
        // Best effort; the in-memory set is authoritative for this session.
        let _ = page.set_attribute(element, PRODUCT_MARKER_ATTR, "true");
        self.ids.insert(element);
    }

    /// Drops the in-memory set entirely.
    ///
    /// Invoked whenever all indicators are removed (engine deactivation) so
    /// re-activation can re-mark elements whose durable attribute may have
    /// been stripped by a page re-render.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Number of elements in the in-memory set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the in-memory set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
