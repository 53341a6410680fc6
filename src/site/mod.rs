//! Site resolution.
//!
//! Maps a page host to a named retailer profile carrying the selectors used
//! to find product cards and read their fields. Resolution is a pure function
//! of the host string: substring match against a fixed ordered list of known
//! retailers, first match wins, anything else gets the `default` profile with
//! generic heuristics.

mod profiles;

pub use profiles::{FieldRules, SiteProfile};

use strum_macros::{Display, EnumIter};

/// Known retailer layouts, plus a generic default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Site {
    /// amazon.* listing layout
    Amazon,
    /// walmart.* listing layout
    Walmart,
    /// ebay.* listing layout
    Ebay,
    /// target.* listing layout
    Target,
    /// bestbuy.* listing layout
    BestBuy,
    /// Generic heuristics for unknown hosts
    Default,
}

// Ordered: first substring match wins.
const KNOWN_SITES: [(&str, Site); 5] = [
    ("amazon", Site::Amazon),
    ("walmart", Site::Walmart),
    ("ebay", Site::Ebay),
    ("target", Site::Target),
    ("bestbuy", Site::BestBuy),
];

/// Resolves a page host to a site. Case-insensitive substring match; unknown
/// hosts resolve to [`Site::Default`]. Never fails.
pub fn resolve(page_host: &str) -> Site {
    let host = page_host.to_lowercase();
    KNOWN_SITES
        .iter()
        .find(|(needle, _)| host.contains(needle))
        .map(|(_, site)| *site)
        .unwrap_or(Site::Default)
}

/// Resolves a page host directly to its selector profile.
pub fn resolve_profile(page_host: &str) -> SiteProfile {
    SiteProfile::for_site(resolve(page_host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn known_hosts_resolve_by_substring() {
        assert_eq!(resolve("www.amazon.com"), Site::Amazon);
        assert_eq!(resolve("www.AMAZON.co.uk"), Site::Amazon);
        assert_eq!(resolve("www.walmart.com"), Site::Walmart);
        assert_eq!(resolve("www.ebay.de"), Site::Ebay);
        assert_eq!(resolve("www.target.com"), Site::Target);
        assert_eq!(resolve("www.bestbuy.com"), Site::BestBuy);
    }

    #[test]
    fn unknown_hosts_get_default() {
        assert_eq!(resolve("shop.example.com"), Site::Default);
        assert_eq!(resolve(""), Site::Default);
    }

    #[test]
    fn every_site_has_a_profile_with_product_selectors() {
        for site in Site::iter() {
            let profile = SiteProfile::for_site(site);
            assert!(
                !profile.product_selectors.is_empty(),
                "site {site} has no product selectors"
            );
        }
    }
}
