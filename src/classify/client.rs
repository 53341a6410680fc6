//! Remote classification client.
//!
//! Wraps the analysis backend behind a never-failing `classify` call: cache
//! hit, successful backend response, or the cached `uncertain` fallback. All
//! transport and parse failures are recovered locally, logged, and counted.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};

use super::cache::{fingerprint, ClassificationCache};
use super::types::{AnalyzeRequest, AnalyzeResponse, Classification};
use crate::config::ANALYZE_PATH;
use crate::error_handling::{ScanEvent, ScanStats};
use crate::extract::ProductRecord;

/// Fail-soft classification client with a bounded fingerprint cache.
pub struct Classifier {
    client: reqwest::Client,
    endpoint: String,
    cache: ClassificationCache,
    stats: Arc<ScanStats>,
}

impl Classifier {
    /// Creates a classifier targeting `api_base` (the `/analyze-product` path
    /// is appended) with a cache bounded to `cache_capacity` fingerprints.
    pub fn new(
        client: reqwest::Client,
        api_base: &str,
        cache_capacity: usize,
        stats: Arc<ScanStats>,
    ) -> Self {
        Classifier {
            client,
            endpoint: format!("{}{}", api_base.trim_end_matches('/'), ANALYZE_PATH),
            cache: ClassificationCache::new(cache_capacity),
            stats,
        }
    }

    /// Classifies a product record.
    ///
    /// At most one backend call is issued per distinct fingerprint for the
    /// engine's lifetime; later calls with the same fingerprint return the
    /// cached result even when other record fields differ. Never raises: all
    /// failure paths resolve to a usable fallback result, which is itself
    /// cached so an unreachable backend is not retried per element.
    pub async fn classify(&self, record: &ProductRecord) -> Classification {
        let key = fingerprint(record);

        if let Some(hit) = self.cache.get(&key) {
            self.stats.increment(ScanEvent::CacheHit);
            debug!("classification cache hit for '{}'", key);
            return hit;
        }

        let classification = match self.request(record).await {
            Ok(result) => {
                self.stats.increment(ScanEvent::ElementClassified);
                result
            }
            Err(e) => {
                self.stats.increment(ScanEvent::TransportFailure);
                warn!("Backend analysis failed for '{}': {:#}", key, e);
                Classification::fallback(format!("{e:#}"))
            }
        };

        self.cache.put(key, classification.clone());
        classification
    }

    /// Number of cached fingerprints.
    pub fn cached_fingerprints(&self) -> usize {
        self.cache.len()
    }

    async fn request(&self, record: &ProductRecord) -> Result<Classification> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest::from(record))
            .send()
            .await
            .context("Failed to reach analysis backend")?
            .error_for_status()
            .context("Analysis backend returned an error status")?;

        let body: AnalyzeResponse = response
            .json()
            .await
            .context("Failed to parse analysis response body")?;

        Ok(Classification::from(body))
    }
}
