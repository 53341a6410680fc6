//! Product field extraction.
//!
//! Given a candidate product element and its resolved site profile, pulls out
//! a best-effort string record. Every field is tried selector-by-selector in
//! profile order, first non-empty match wins, and a miss degrades to the
//! empty string. Extraction as a whole never fails: one malformed field never
//! aborts the others or raises to the scan loop.

use ego_tree::NodeId;
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

use crate::error_handling::{ScanEvent, ScanStats};
use crate::page::PageDom;
use crate::site::SiteProfile;

// Numeric portion of rating text such as "4.5 out of 5 stars".
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.?\d*)").expect("numeric rating regex is a compile-time constant")
});

/// A best-effort product record extracted from one listing card.
///
/// All fields are raw extracted text; the empty string signals "not found,"
/// never null. Records are ephemeral: constructed per scan, retained only
/// inside classification cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductRecord {
    /// Product title text.
    pub title: String,
    /// Product description text (rarely present on listing cards).
    pub description: String,
    /// Price text as rendered, e.g. `$9.99`.
    pub price: String,
    /// Seller name text.
    pub seller: String,
    /// Numeric rating text, e.g. `4.5`.
    pub rating: String,
    /// Review-count text.
    pub reviews_count: String,
    /// URL of the page the record came from.
    pub source_url: String,
}

/// Extracts a [`ProductRecord`] from `element` using `profile`'s field rules.
///
/// Field misses are recorded on `stats` but never surfaced; the returned
/// record always has every field populated (possibly empty).
pub fn extract(
    page: &PageDom,
    element: NodeId,
    profile: &SiteProfile,
    stats: &ScanStats,
) -> ProductRecord {
    let fields = &profile.fields;
    ProductRecord {
        title: first_text(page, element, &fields.title, stats),
        description: first_text(page, element, &fields.description, stats),
        price: first_text(page, element, &fields.price, stats),
        seller: first_text(page, element, &fields.seller, stats),
        rating: first_numeric(page, element, &fields.rating, stats),
        reviews_count: first_text(page, element, &fields.reviews_count, stats),
        source_url: page.url().to_string(),
    }
}

/// First non-empty text match across `selectors`, in order.
fn first_text(
    page: &PageDom,
    element: NodeId,
    selectors: &[Selector],
    stats: &ScanStats,
) -> String {
    for sel in selectors {
        for id in page.select_within(element, sel) {
            let text = page.text_of(id);
            if !text.is_empty() {
                return text;
            }
        }
    }
    if !selectors.is_empty() {
        stats.increment(ScanEvent::FieldMiss);
    }
    String::new()
}

/// First numeric capture across `selectors`, reading element text first and
/// falling back to the `aria-label` attribute (some sites render star ratings
/// as empty elements labelled for accessibility).
fn first_numeric(
    page: &PageDom,
    element: NodeId,
    selectors: &[Selector],
    stats: &ScanStats,
) -> String {
    for sel in selectors {
        for id in page.select_within(element, sel) {
            let mut source = page.text_of(id);
            if source.is_empty() {
                source = page.attr(id, "aria-label").unwrap_or_default();
            }
            if let Some(caps) = NUMERIC_RE.captures(&source) {
                if let Some(m) = caps.get(1) {
                    return m.as_str().to_string();
                }
            }
        }
    }
    if !selectors.is_empty() {
        stats.increment(ScanEvent::FieldMiss);
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{Site, SiteProfile};

    fn amazon_card_page() -> PageDom {
        PageDom::parse(
            r#"<html><body>
                <div data-asin="B001">
                    <h2><a href="/dp/B001"><span>Wireless Mouse</span></a></h2>
                    <span class="a-price"><span class="a-offscreen">$9.99</span></span>
                    <i class="a-icon-alt">4.5 out of 5 stars</i>
                    <a href="/product-reviews/B001"><span>1,234</span></a>
                    <span class="a-size-base-plus">AcmeSeller</span>
                </div>
            </body></html>"#,
            "https://www.amazon.com/s?k=mouse",
        )
    }

    #[test]
    fn amazon_fields_extract_in_order() {
        let page = amazon_card_page();
        let profile = SiteProfile::for_site(Site::Amazon);
        let stats = ScanStats::new();
        let card = page.select_ids(&profile.product_selectors[1])[0];

        let record = extract(&page, card, &profile, &stats);
        assert_eq!(record.title, "Wireless Mouse");
        assert_eq!(record.price, "$9.99");
        assert_eq!(record.rating, "4.5");
        assert_eq!(record.reviews_count, "1,234");
        assert_eq!(record.seller, "AcmeSeller");
        assert_eq!(record.source_url, "https://www.amazon.com/s?k=mouse");
    }

    #[test]
    fn missing_fields_degrade_to_empty_strings() {
        let page = PageDom::parse(
            r#"<html><body><div data-asin="B002"><h2><a><span>Bare Listing Card</span></a></h2></div></body></html>"#,
            "https://www.amazon.com/",
        );
        let profile = SiteProfile::for_site(Site::Amazon);
        let stats = ScanStats::new();
        let card = page.select_ids(&profile.product_selectors[1])[0];

        let record = extract(&page, card, &profile, &stats);
        assert_eq!(record.title, "Bare Listing Card");
        assert_eq!(record.price, "");
        assert_eq!(record.rating, "");
        assert!(stats.count(ScanEvent::FieldMiss) >= 2);
    }

    #[test]
    fn default_profile_uses_broad_heuristics() {
        let page = PageDom::parse(
            r#"<html><body>
                <div class="shop-product">
                    <div class="listing-title">Garden Hose</div>
                    <div class="sale-price">$19.99</div>
                </div>
            </body></html>"#,
            "https://shop.example.com/",
        );
        let profile = SiteProfile::for_site(Site::Default);
        let stats = ScanStats::new();
        let cards: Vec<_> = profile
            .product_selectors
            .iter()
            .flat_map(|sel| page.select_ids(sel))
            .collect();
        assert!(!cards.is_empty());

        let record = extract(&page, cards[0], &profile, &stats);
        assert_eq!(record.title, "Garden Hose");
        assert_eq!(record.price, "$19.99");
    }

    #[test]
    fn aria_label_feeds_numeric_rating() {
        let page = PageDom::parse(
            r#"<html><body>
                <div data-item-id="77">
                    <span data-automation-id="product-title">Desk Lamp</span>
                    <div class="price-current">$25.00</div>
                    <div class="stars-container"><span class="stars-small" aria-label="4.2 stars"></span></div>
                </div>
            </body></html>"#,
            "https://www.walmart.com/search?q=lamp",
        );
        let profile = SiteProfile::for_site(Site::Walmart);
        let stats = ScanStats::new();
        let card = page.select_ids(&profile.product_selectors[0])[0];

        let record = extract(&page, card, &profile, &stats);
        assert_eq!(record.title, "Desk Lamp");
        assert_eq!(record.rating, "4.2");
    }
}
