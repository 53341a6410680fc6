//! truthlens library: incremental product-discovery and classification engine
//!
//! This library scans e-commerce listing pages for product cards, extracts a
//! per-site field record from each, classifies records through an external
//! analysis backend (with a bounded fingerprint cache and a fail-soft
//! fallback), and renders status badges with on-demand detail popovers into
//! the page it owns. Re-scans are debounced off page mutation and scroll
//! events, activation is toggleable over a small control protocol, and the
//! active flag, global status, and aggregate counters are mirrored to a
//! key-value store.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use truthlens::{Config, Engine, MemoryStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let html = "<html><body><div data-asin=\"B001\">…</div></body></html>";
//! let mut engine = Engine::new(
//!     &config,
//!     html,
//!     "https://www.amazon.com/s?k=mouse",
//!     Arc::new(MemoryStore::new()),
//! )?;
//! engine.start().await;
//! println!("{} badges rendered", engine.renderer().badge_count());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling engine methods within an async
//! context.

#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod error_handling;
pub mod extract;
pub mod indicator;
pub mod initialization;
pub mod page;
pub mod scheduler;
pub mod site;
pub mod state;
pub mod track;
mod utils;

// Re-export public API
pub use classify::{Classification, Classifier, Status};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ScanEvent, ScanStats, StatsSnapshot};
pub use extract::ProductRecord;
pub use indicator::IndicatorRenderer;
pub use page::PageDom;
pub use scheduler::{Engine, PageEvent, ScanState};
pub use site::{Site, SiteProfile};
pub use state::{
    ControlMessage, ControlResponse, MemoryStore, SqliteStore, StateStore, StoreChange,
};
