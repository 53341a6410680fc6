// Shared test helpers for page construction and backend mocking.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::json;
use std::sync::Arc;

use truthlens::{Config, Engine, MemoryStore, StateStore};

/// Builds one Amazon-style listing card.
#[allow(dead_code)] // Used by other test files
pub fn amazon_card(asin: &str, title: &str, price: &str, seller: &str) -> String {
    format!(
        r#"<div data-asin="{asin}">
            <h2><a href="/dp/{asin}"><span>{title}</span></a></h2>
            <span class="a-price"><span class="a-offscreen">{price}</span></span>
            <span class="a-size-base-plus">{seller}</span>
        </div>"#
    )
}

/// Wraps cards in a minimal listing-page document.
#[allow(dead_code)]
pub fn listing_page(cards: &[String]) -> String {
    format!("<html><body>{}</body></html>", cards.join("\n"))
}

/// Analysis response body in the backend's wire format.
#[allow(dead_code)]
pub fn analysis_response(
    status: &str,
    confidence: f64,
    reasons: &[&str],
    scam_indicators: u32,
    legit_indicators: u32,
) -> serde_json::Value {
    json!({
        "success": true,
        "analysis": {
            "status": status,
            "confidence": confidence,
            "reasons": reasons,
            "indicators": {
                "scam_indicators": scam_indicators,
                "legit_indicators": legit_indicators
            }
        }
    })
}

/// Expects exactly `times` analysis calls, all answered with `body`.
#[allow(dead_code)]
pub fn expect_analyze(server: &Server, times: usize, body: serde_json::Value) {
    server.expect(
        Expectation::matching(request::method_path("POST", "/analyze-product"))
            .times(times)
            .respond_with(json_encoded(body)),
    );
}

/// Engine configuration pointed at the mock backend.
#[allow(dead_code)]
pub fn test_config(server: &Server) -> Config {
    Config {
        api_base: format!("http://{}", server.addr()),
        ..Default::default()
    }
}

/// Builds an engine over `html` with an in-memory store.
#[allow(dead_code)]
pub fn engine_for(server: &Server, html: &str, url: &str) -> Engine {
    engine_with_store(server, html, url, Arc::new(MemoryStore::new()))
}

/// Builds an engine over `html` with the given store.
#[allow(dead_code)]
pub fn engine_with_store(
    server: &Server,
    html: &str,
    url: &str,
    store: Arc<dyn StateStore>,
) -> Engine {
    Engine::new(&test_config(server), html, url, store).expect("engine construction")
}
