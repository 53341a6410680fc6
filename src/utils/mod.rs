//! Shared utilities.

mod selector;

pub use selector::{parse_selector_unsafe, parse_selector_with_fallback};
