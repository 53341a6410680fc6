//! Classification result and wire types.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::config::FALLBACK_REASON;
use crate::extract::ProductRecord;

/// Trust status assigned to a product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Status {
    /// The product looks legitimate.
    Legit,
    /// The product looks like a scam.
    Scam,
    /// The analysis was inconclusive or unavailable.
    Uncertain,
}

/// Outcome of classifying one product record.
///
/// `status` is always present, even when `succeeded` is false: failed
/// classifications carry the `uncertain` fallback with confidence 0.5.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Whether the backend produced this result (false for fallbacks).
    pub succeeded: bool,
    /// Error description when the backend reported or caused a failure.
    pub error: Option<String>,
    /// Assigned trust status.
    pub status: Status,
    /// Backend confidence in `[0, 1]`.
    pub confidence: f64,
    /// Ordered human-readable reasons for the status.
    pub reasons: Vec<String>,
    /// Count of scam indicators the backend matched.
    pub scam_indicators: u32,
    /// Count of legitimacy indicators the backend matched.
    pub legit_indicators: u32,
}

impl Classification {
    /// The fail-soft fallback result: `uncertain` at confidence 0.5, cached
    /// under the same fingerprint so an unreachable backend is retried at
    /// most once per distinct product.
    pub fn fallback(error: impl Into<String>) -> Self {
        Classification {
            succeeded: false,
            error: Some(error.into()),
            status: Status::Uncertain,
            confidence: 0.5,
            reasons: vec![FALLBACK_REASON.to_string()],
            scam_indicators: 0,
            legit_indicators: 0,
        }
    }
}

impl From<AnalyzeResponse> for Classification {
    fn from(resp: AnalyzeResponse) -> Self {
        Classification {
            succeeded: resp.success,
            error: resp.error,
            status: resp.analysis.status,
            confidence: resp.analysis.confidence,
            reasons: resp.analysis.reasons,
            scam_indicators: resp.analysis.indicators.scam_indicators,
            legit_indicators: resp.analysis.indicators.legit_indicators,
        }
    }
}

/// Request body for `POST /analyze-product`.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    /// Product title.
    pub title: &'a str,
    /// Product description.
    pub description: &'a str,
    /// Price text.
    pub price: &'a str,
    /// Seller name.
    pub seller: &'a str,
    /// Rating text.
    pub rating: &'a str,
    /// Review-count text.
    pub reviews_count: &'a str,
    /// Source page URL.
    pub url: &'a str,
}

impl<'a> From<&'a ProductRecord> for AnalyzeRequest<'a> {
    fn from(record: &'a ProductRecord) -> Self {
        AnalyzeRequest {
            title: &record.title,
            description: &record.description,
            price: &record.price,
            seller: &record.seller,
            rating: &record.rating,
            reviews_count: &record.reviews_count,
            url: &record.source_url,
        }
    }
}

/// Response body of `POST /analyze-product`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    /// Whether the backend analysis succeeded.
    pub success: bool,
    /// Backend-reported error, if any.
    #[serde(default)]
    pub error: Option<String>,
    /// The analysis payload.
    pub analysis: AnalysisBody,
}

/// Analysis payload within an [`AnalyzeResponse`].
#[derive(Debug, Deserialize)]
pub struct AnalysisBody {
    /// Assigned trust status.
    pub status: Status,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Ordered reasons.
    #[serde(default)]
    pub reasons: Vec<String>,
    /// Indicator counts.
    #[serde(default)]
    pub indicators: IndicatorCounts,
}

/// Indicator counts within an analysis.
#[derive(Debug, Deserialize, Default)]
pub struct IndicatorCounts {
    /// Scam indicators matched.
    #[serde(default)]
    pub scam_indicators: u32,
    /// Legitimacy indicators matched.
    #[serde(default)]
    pub legit_indicators: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_serde_and_strum() {
        assert_eq!(serde_json::to_string(&Status::Scam).unwrap(), "\"scam\"");
        let parsed: Status = serde_json::from_str("\"legit\"").unwrap();
        assert_eq!(parsed, Status::Legit);
        assert_eq!(Status::from_str("uncertain").unwrap(), Status::Uncertain);
        assert_eq!(Status::Scam.to_string(), "scam");
    }

    #[test]
    fn fallback_is_uncertain_at_half_confidence() {
        let c = Classification::fallback("connection refused");
        assert!(!c.succeeded);
        assert_eq!(c.status, Status::Uncertain);
        assert_eq!(c.confidence, 0.5);
        assert_eq!(c.reasons, vec![FALLBACK_REASON.to_string()]);
        assert_eq!((c.scam_indicators, c.legit_indicators), (0, 0));
    }

    #[test]
    fn response_deserializes_wire_format() {
        let body = r#"{
            "success": true,
            "analysis": {
                "status": "scam",
                "confidence": 0.87,
                "reasons": ["Price anomaly"],
                "indicators": {"scam_indicators": 3, "legit_indicators": 0}
            }
        }"#;
        let resp: AnalyzeResponse = serde_json::from_str(body).unwrap();
        let c = Classification::from(resp);
        assert!(c.succeeded);
        assert_eq!(c.status, Status::Scam);
        assert_eq!(c.confidence, 0.87);
        assert_eq!(c.reasons, vec!["Price anomaly".to_string()]);
        assert_eq!(c.scam_indicators, 3);
    }
}
