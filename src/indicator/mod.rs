//! Indicator rendering.
//!
//! Creates, restyles, and removes the per-product badge and its on-demand
//! detail popover. At most one popover is open globally: opening another
//! badge's popover closes the current one first, and clicking the same badge
//! toggles its popover closed. Exclusivity is enforced synchronously at
//! render time; no locking is involved.

mod popover;
mod style;

pub use popover::{detail_popover_html, minimal_popover_html};
pub use style::{badge_style, style_for, StatusStyle};

use chrono::Utc;
use ego_tree::NodeId;
use log::debug;
use scraper::Selector;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::classify::{Classification, Status};
use crate::config::{BADGE_ATTR, PRODUCT_MARKER_ATTR};
use crate::page::PageDom;
use crate::utils::parse_selector_unsafe;

static BADGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(&format!("[{}=\"true\"]", BADGE_ATTR), "badge lookup")
});

static MARKED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(&format!("[{}]", PRODUCT_MARKER_ATTR), "marked product lookup")
});

/// One rendered badge.
#[derive(Debug, Clone)]
pub struct Badge {
    /// The badge element's node id.
    pub node: NodeId,
    /// The product element hosting the badge.
    pub product: NodeId,
    /// Currently rendered visual status (may be overridden by broadcasts).
    pub status: Status,
    /// Stored classification backing the detail popover, if any.
    pub classification: Option<Classification>,
}

struct OpenPopover {
    node: NodeId,
    badge: NodeId,
}

/// Renders and manages all badges and the single detail popover.
#[derive(Default)]
pub struct IndicatorRenderer {
    badges: HashMap<NodeId, Badge>,
    open_popover: Option<OpenPopover>,
}

impl IndicatorRenderer {
    /// Creates a renderer with no badges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a badge for `product` with the given status and optional
    /// classification breakdown. Returns the badge node id.
    ///
    /// Rendering into a detached element (e.g., an in-flight classification
    /// completing after teardown removed the target) is a silent no-op.
    pub fn render(
        &mut self,
        page: &mut PageDom,
        product: NodeId,
        status: Status,
        classification: Option<Classification>,
    ) -> Option<NodeId> {
        if !page.is_attached(product) {
            debug!("skipping badge render into detached element");
            return None;
        }

        ensure_overlay_host(page, product);

        let s = style_for(status);
        let html = format!(
            "<button {BADGE_ATTR}=\"true\" title=\"{}\" style=\"{}\">{}</button>",
            s.title,
            badge_style(s.background),
            s.glyph
        );
        let node = page.append_fragment(product, &html).into_iter().next()?;
        self.badges.insert(
            node,
            Badge {
                node,
                product,
                status,
                classification,
            },
        );
        Some(node)
    }

    /// Handles a click on `badge`: toggles its popover, closing any other
    /// open popover first.
    pub fn toggle_popover(&mut self, page: &mut PageDom, badge: NodeId) {
        if let Some(open) = self.open_popover.take() {
            let same = open.badge == badge;
            page.detach(open.node);
            if same {
                return;
            }
        }
        let Some(entry) = self.badges.get(&badge) else {
            return;
        };
        let html = match &entry.classification {
            Some(c) => detail_popover_html(c, Utc::now()),
            None => minimal_popover_html(entry.status, Utc::now()),
        };
        if let Some(node) = page.append_to_body(&html) {
            self.open_popover = Some(OpenPopover { node, badge });
        }
    }

    /// Closes the open popover, if any. Used by the explicit close control
    /// and by backdrop clicks outside the popover's content box.
    pub fn close_popover(&mut self, page: &mut PageDom) {
        if let Some(open) = self.open_popover.take() {
            page.detach(open.node);
        }
    }

    /// The badge whose popover is currently open, if any.
    pub fn open_popover_badge(&self) -> Option<NodeId> {
        self.open_popover.as_ref().map(|p| p.badge)
    }

    /// Restyles every rendered badge to a single override status.
    ///
    /// Stored classifications are untouched; only the visual treatment
    /// changes. Used when an external status broadcast arrives.
    pub fn update_all(&mut self, page: &mut PageDom, status: Status) {
        let s = style_for(status);
        for badge in self.badges.values_mut() {
            badge.status = status;
            page.set_attribute(badge.node, "style", &badge_style(s.background));
            page.set_attribute(badge.node, "title", s.title);
            page.set_text(badge.node, s.glyph);
        }
    }

    /// Deletes every badge node and strips the durable marker attribute from
    /// every marked element.
    ///
    /// Callers must pair this with a processed-tracker reset so reactivation
    /// reprocesses the page from scratch.
    pub fn remove_all(&mut self, page: &mut PageDom) {
        self.close_popover(page);
        for badge in page.select_ids(&BADGE_SELECTOR) {
            page.detach(badge);
        }
        for node in self.badges.keys().copied().collect::<Vec<_>>() {
            page.detach(node);
        }
        self.badges.clear();
        for marked in page.select_ids(&MARKED_SELECTOR) {
            page.remove_attribute(marked, PRODUCT_MARKER_ATTR);
        }
    }

    /// All rendered badges.
    pub fn badges(&self) -> impl Iterator<Item = &Badge> {
        self.badges.values()
    }

    /// The badge rendered on `product`, if any.
    pub fn badge_for_product(&self, product: NodeId) -> Option<&Badge> {
        self.badges.values().find(|b| b.product == product)
    }

    /// Number of rendered badges.
    pub fn badge_count(&self) -> usize {
        self.badges.len()
    }

    /// Per-status badge counts: `(legit, scam, uncertain)`.
    pub fn status_counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for badge in self.badges.values() {
            match badge.status {
                Status::Legit => counts.0 += 1,
                Status::Scam => counts.1 += 1,
                Status::Uncertain => counts.2 += 1,
            }
        }
        counts
    }
}

/// Makes `product` able to host an absolutely positioned overlay: sets
/// `position: relative` only when the inline position is the default static
/// value, to avoid disturbing existing non-static layouts.
fn ensure_overlay_host(page: &mut PageDom, product: NodeId) {
    let style = page.attr(product, "style").unwrap_or_default();
    if inline_position(&style).map_or(true, |p| p == "static") {
        let new_style = if style.trim().is_empty() {
            "position: relative".to_string()
        } else {
            format!("{}; position: relative", style.trim_end_matches([' ', ';']))
        };
        page.set_attribute(product, "style", &new_style);
    }
}

fn inline_position(style: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        if prop.trim().eq_ignore_ascii_case("position") {
            Some(value.trim().to_lowercase())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        parse_selector_unsafe(s, "test")
    }

    fn page_with_cards() -> PageDom {
        PageDom::parse(
            r#"<html><body>
                <div id="p1">one</div>
                <div id="p2" style="position: absolute; top: 0">two</div>
            </body></html>"#,
            "https://example.com/",
        )
    }

    #[test]
    fn render_creates_badge_and_relative_position() {
        let mut page = page_with_cards();
        let mut renderer = IndicatorRenderer::new();
        let p1 = page.select_ids(&sel("#p1"))[0];

        let badge = renderer
            .render(&mut page, p1, Status::Legit, None)
            .expect("badge rendered");
        assert_eq!(page.count(&BADGE_SELECTOR), 1);
        assert_eq!(page.attr(badge, "title").as_deref(), Some("TruthLens: LEGIT"));
        assert!(page
            .attr(p1, "style")
            .unwrap()
            .contains("position: relative"));
    }

    #[test]
    fn non_static_position_is_left_alone() {
        let mut page = page_with_cards();
        let mut renderer = IndicatorRenderer::new();
        let p2 = page.select_ids(&sel("#p2"))[0];

        renderer.render(&mut page, p2, Status::Scam, None);
        let style = page.attr(p2, "style").unwrap();
        assert!(style.contains("position: absolute"));
        assert!(!style.contains("relative"));
    }

    #[test]
    fn render_into_detached_element_is_noop() {
        let mut page = page_with_cards();
        let mut renderer = IndicatorRenderer::new();
        let p1 = page.select_ids(&sel("#p1"))[0];
        page.detach(p1);

        assert!(renderer.render(&mut page, p1, Status::Legit, None).is_none());
        assert_eq!(renderer.badge_count(), 0);
    }

    #[test]
    fn popover_is_globally_exclusive_and_toggles() {
        let mut page = page_with_cards();
        let mut renderer = IndicatorRenderer::new();
        let p1 = page.select_ids(&sel("#p1"))[0];
        let p2 = page.select_ids(&sel("#p2"))[0];
        let b1 = renderer.render(&mut page, p1, Status::Legit, None).unwrap();
        let b2 = renderer.render(&mut page, p2, Status::Scam, None).unwrap();
        let popover_sel = sel("[data-truthlens-info]");

        renderer.toggle_popover(&mut page, b1);
        assert_eq!(page.count(&popover_sel), 1);
        assert_eq!(renderer.open_popover_badge(), Some(b1));

        // Opening the second closes the first; exactly one stays open.
        renderer.toggle_popover(&mut page, b2);
        assert_eq!(page.count(&popover_sel), 1);
        assert_eq!(renderer.open_popover_badge(), Some(b2));

        // Clicking the same badge again closes it.
        renderer.toggle_popover(&mut page, b2);
        assert_eq!(page.count(&popover_sel), 0);
        assert_eq!(renderer.open_popover_badge(), None);
    }

    #[test]
    fn update_all_restyles_without_touching_classification() {
        let mut page = page_with_cards();
        let mut renderer = IndicatorRenderer::new();
        let p1 = page.select_ids(&sel("#p1"))[0];
        let classification = Classification::fallback("offline");
        let badge = renderer
            .render(&mut page, p1, Status::Uncertain, Some(classification.clone()))
            .unwrap();

        renderer.update_all(&mut page, Status::Scam);
        assert!(page.attr(badge, "style").unwrap().contains("#f44336"));
        assert_eq!(page.text_of(badge), "✗");
        assert_eq!(
            renderer.badge_for_product(p1).unwrap().classification,
            Some(classification)
        );
    }

    #[test]
    fn remove_all_deletes_badges_and_markers() {
        let mut page = page_with_cards();
        let mut renderer = IndicatorRenderer::new();
        let p1 = page.select_ids(&sel("#p1"))[0];
        let b1 = renderer.render(&mut page, p1, Status::Legit, None).unwrap();
        page.set_attribute(p1, PRODUCT_MARKER_ATTR, "true");
        renderer.toggle_popover(&mut page, b1);

        renderer.remove_all(&mut page);
        assert_eq!(page.count(&BADGE_SELECTOR), 0);
        assert_eq!(page.count(&MARKED_SELECTOR), 0);
        assert_eq!(page.count(&sel("[data-truthlens-info]")), 0);
        assert_eq!(renderer.badge_count(), 0);
    }
}
