//! SQLite-backed state store behavior, including cross-session persistence.

mod helpers;

use helpers::*;
use httptest::Server;
use std::sync::Arc;
use tempfile::TempDir;

use truthlens::{SqliteStore, StateStore};

#[tokio::test]
async fn values_round_trip_and_notify() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&dir.path().join("state.db")).await.unwrap();
    let mut rx = store.subscribe();

    assert_eq!(store.get("truthlens_active").await.unwrap(), None);
    store.set("truthlens_active", "true").await.unwrap();
    assert_eq!(
        store.get("truthlens_active").await.unwrap().as_deref(),
        Some("true")
    );

    let change = rx.recv().await.unwrap();
    assert_eq!(change.key, "truthlens_active");
    assert_eq!(change.value, "true");
}

#[tokio::test]
async fn upserts_keep_the_latest_value() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&dir.path().join("state.db")).await.unwrap();

    store.set("truthlens_status", "legit").await.unwrap();
    store.set("truthlens_status", "scam").await.unwrap();
    assert_eq!(
        store.get("truthlens_status").await.unwrap().as_deref(),
        Some("scam")
    );
}

#[tokio::test]
async fn state_survives_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.db");

    {
        let store = SqliteStore::open(&path).await.unwrap();
        store.set("truthlens_active", "false").await.unwrap();
    }

    let reopened = SqliteStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get("truthlens_active").await.unwrap().as_deref(),
        Some("false")
    );
}

#[tokio::test]
async fn engine_honors_a_persisted_inactive_flag() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.db");

    {
        let store = SqliteStore::open(&path).await.unwrap();
        store.set("truthlens_active", "false").await.unwrap();
    }

    // No expectations: an analysis call would fail the test.
    let server = Server::run();
    let html = listing_page(&[amazon_card("B001", "Wireless Mouse", "$9.99", "AcmeSeller")]);
    let store = Arc::new(SqliteStore::open(&path).await.unwrap());
    let mut engine = engine_with_store(&server, &html, "https://www.amazon.com/", store);
    engine.start().await;

    assert!(!engine.is_active());
    assert_eq!(engine.renderer().badge_count(), 0);
}

#[tokio::test]
async fn engine_counters_accumulate_across_sessions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.db");
    let html = listing_page(&[amazon_card("B001", "Wireless Mouse", "$9.99", "AcmeSeller")]);

    for _ in 0..2 {
        let server = Server::run();
        expect_analyze(&server, 1, analysis_response("scam", 0.87, &[], 2, 0));
        let store = Arc::new(SqliteStore::open(&path).await.unwrap());
        let mut engine = engine_with_store(&server, &html, "https://www.amazon.com/", store);
        engine.start().await;
        assert_eq!(engine.renderer().badge_count(), 1);
    }

    let store = SqliteStore::open(&path).await.unwrap();
    let stats_json = store.get("truthlens_stats").await.unwrap().unwrap();
    let counts: serde_json::Value = serde_json::from_str(&stats_json).unwrap();
    assert_eq!(counts["scam"], 2);
}
