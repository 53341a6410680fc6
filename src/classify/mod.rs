//! Classification cache and client.
//!
//! Deduplicates and memoizes calls to the external analysis service keyed by
//! a fingerprint of product identity fields (title + price), and owns the
//! fail-soft fallback policy for backend failures.

mod cache;
mod client;
mod types;

pub use cache::{fingerprint, ClassificationCache};
pub use client::Classifier;
pub use types::{AnalysisBody, AnalyzeRequest, AnalyzeResponse, Classification, IndicatorCounts, Status};
