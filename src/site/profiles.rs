//! Per-site selector profiles.
//!
//! Each profile carries a priority-ordered list of product-card selectors
//! (each is scanned independently; overlap is handled by the processed
//! tracker) and ordered per-field selector lists for extraction. Selector
//! strings are static configuration; they are parsed once when the profile is
//! built, with the parse-with-fallback guard so one bad selector cannot take
//! down a profile.

use scraper::Selector;

use super::Site;
use crate::utils::parse_selector_with_fallback;

/// Ordered per-field selectors for one site layout.
///
/// For each field the extractor tries the selectors in order and takes the
/// first non-empty match; an empty list means the site never exposes that
/// field on listing cards.
#[derive(Debug)]
pub struct FieldRules {
    /// Product title selectors.
    pub title: Vec<Selector>,
    /// Product description selectors.
    pub description: Vec<Selector>,
    /// Price selectors.
    pub price: Vec<Selector>,
    /// Seller-name selectors.
    pub seller: Vec<Selector>,
    /// Rating selectors (numeric portion is extracted from text or aria-label).
    pub rating: Vec<Selector>,
    /// Review-count selectors.
    pub reviews_count: Vec<Selector>,
}

/// A resolved site profile: card selectors plus field rules.
#[derive(Debug)]
pub struct SiteProfile {
    /// Which site layout this profile describes.
    pub site: Site,
    /// Priority-ordered product-card selectors; each is scanned independently.
    pub product_selectors: Vec<Selector>,
    /// Field extraction rules.
    pub fields: FieldRules,
}

fn parse_all(site: Site, field: &str, selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|s| parse_selector_with_fallback(s, &format!("{site} {field}")))
        .collect()
}

impl SiteProfile {
    /// Builds the selector profile for `site`.
    pub fn for_site(site: Site) -> Self {
        let (cards, title, description, price, seller, rating, reviews): (
            &[&str],
            &[&str],
            &[&str],
            &[&str],
            &[&str],
            &[&str],
            &[&str],
        ) = match site {
            Site::Amazon => (
                &[
                    r#"[data-component-type="s-search-result"]"#,
                    "[data-asin]",
                    ".s-result-item",
                    ".s-widget-container",
                    ".s-search-result",
                ],
                &[
                    "h2 a span",
                    ".s-size-mini .a-link-normal span",
                    r#"[data-cy="title-recipe-title"] span"#,
                ],
                &[],
                &[".a-price-whole", ".a-price .a-offscreen", ".a-price-range"],
                &[".a-size-base-plus", ".a-color-secondary"],
                &[".a-icon-alt", ".a-star-mini .a-icon-alt"],
                &[r#"a[href*="reviews"] span"#, ".a-size-base"],
            ),
            Site::Walmart => (
                &[
                    "[data-item-id]",
                    ".search-result-gridview-item",
                    ".search-result-gridview-item-wrapper",
                ],
                &[
                    r#"[data-automation-id="product-title"]"#,
                    ".search-result-product-title",
                ],
                &[],
                &[".price-current", ".price-main"],
                &[],
                &[".stars-container .stars-small"],
                &[".stars-reviews-count"],
            ),
            Site::Ebay => (
                &["[data-viewport]", ".s-item", ".s-item__wrapper"],
                &[".s-item__title", ".s-item__link"],
                &[],
                &[".s-item__price", ".notranslate"],
                &[".s-item__seller-info-text"],
                &[".s-item__reviews .clipped"],
                &[],
            ),
            Site::Target => (
                &[
                    r#"[data-test="product-details"]"#,
                    ".styles__ProductCardContainer",
                ],
                &[r#"[data-test="product-title"]"#, ".styles__ProductCardTitle"],
                &[],
                &[r#"[data-test="current-price"]"#, ".styles__PriceText"],
                &[],
                &[r#"[data-test="rating"]"#, ".styles__RatingText"],
                &[],
            ),
            Site::BestBuy => (
                &[".product-item", ".sku-item"],
                &[".product-title", ".sku-title"],
                &[],
                &[".price-current", ".price-main"],
                &[],
                &[".rating", ".stars"],
                &[],
            ),
            // Broad heuristics: anything that looks like a card, title, or price.
            Site::Default => (
                &[".product", ".product-card", ".item", r#"[class*="product"]"#],
                &[
                    "h1",
                    "h2",
                    "h3",
                    ".title",
                    ".product-title",
                    r#"[class*="title"]"#,
                ],
                &[],
                &[".price", r#"[class*="price"]"#, r#"[class*="cost"]"#],
                &[],
                &[],
                &[],
            ),
        };

        SiteProfile {
            site,
            product_selectors: parse_all(site, "product card", cards),
            fields: FieldRules {
                title: parse_all(site, "title", title),
                description: parse_all(site, "description", description),
                price: parse_all(site, "price", price),
                seller: parse_all(site, "seller", seller),
                rating: parse_all(site, "rating", rating),
                reviews_count: parse_all(site, "reviews_count", reviews),
            },
        }
    }
}
