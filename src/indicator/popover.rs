//! Detail popover markup.
//!
//! Builds the popover shown when a badge is clicked: the full classification
//! breakdown when one is stored, or a minimal status-only message otherwise.

use chrono::{DateTime, Utc};

use super::style::popover_style;
use crate::classify::{Classification, Status};
use crate::config::{POPOVER_ATTR, POPOVER_CLOSE_ATTR};
use crate::page::html_escape;

fn wrap(content: String, opened_at: DateTime<Utc>) -> String {
    format!(
        "<div {POPOVER_ATTR}=\"true\" style=\"{style}\">\
         <h3 style=\"margin: 0; color: #fff;\">TruthLens Analysis</h3>\
         {content}\
         <p style=\"margin: 5px 0; color: #fff;\"><strong>Last Updated:</strong> {ts}</p>\
         <button {POPOVER_CLOSE_ATTR}=\"true\">Close</button>\
         </div>",
        style = popover_style(),
        ts = opened_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

fn line(label: &str, value: &str) -> String {
    format!(
        "<p style=\"margin: 5px 0; color: #fff;\"><strong>{}:</strong> {}</p>",
        label,
        html_escape(value)
    )
}

/// Popover body for a stored classification: status, rounded confidence
/// percentage, ordered reasons, and indicator counts.
pub fn detail_popover_html(classification: &Classification, opened_at: DateTime<Utc>) -> String {
    let mut content = String::new();
    content.push_str(&line(
        "Status",
        &classification.status.to_string().to_uppercase(),
    ));
    let confidence = (classification.confidence * 100.0).round() as i64;
    content.push_str(&line("Confidence", &format!("{confidence}%")));

    if !classification.reasons.is_empty() {
        content.push_str(&line("Analysis Reasons", ""));
        content.push_str("<ul style=\"margin: 5px 0; color: #fff; padding-left: 20px;\">");
        for reason in &classification.reasons {
            content.push_str(&format!("<li>{}</li>", html_escape(reason)));
        }
        content.push_str("</ul>");
    }

    content.push_str(&line("Indicators", ""));
    content.push_str(&line(
        "Scam indicators",
        &classification.scam_indicators.to_string(),
    ));
    content.push_str(&line(
        "Legit indicators",
        &classification.legit_indicators.to_string(),
    ));

    wrap(content, opened_at)
}

/// Minimal popover body when no classification is stored for the badge.
pub fn minimal_popover_html(status: Status, opened_at: DateTime<Utc>) -> String {
    let qualitative = match status {
        Status::Scam | Status::Legit => "High",
        Status::Uncertain => "Medium",
    };
    let mut content = String::new();
    content.push_str(&line("Status", &status.to_string().to_uppercase()));
    content.push_str(&line(
        "Analysis",
        "This product has been analyzed for potential scams.",
    ));
    content.push_str(&line("Confidence", qualitative));
    wrap(content, opened_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_popover_renders_breakdown() {
        let c = Classification {
            succeeded: true,
            error: None,
            status: Status::Scam,
            confidence: 0.87,
            reasons: vec!["Price anomaly".into()],
            scam_indicators: 3,
            legit_indicators: 0,
        };
        let html = detail_popover_html(&c, Utc::now());
        assert!(html.contains("Status:</strong> SCAM"));
        assert!(html.contains("Confidence:</strong> 87%"));
        assert!(html.contains("<li>Price anomaly</li>"));
        assert!(html.contains("Scam indicators:</strong> 3"));
    }

    #[test]
    fn minimal_popover_uses_qualitative_confidence() {
        let html = minimal_popover_html(Status::Uncertain, Utc::now());
        assert!(html.contains("Status:</strong> UNCERTAIN"));
        assert!(html.contains("Confidence:</strong> Medium"));
    }

    #[test]
    fn reason_text_is_escaped() {
        let mut c = Classification::fallback("x");
        c.reasons = vec!["<script>alert(1)</script>".into()];
        let html = detail_popover_html(&c, Utc::now());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
