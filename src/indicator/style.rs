//! Badge styling per status.

use crate::classify::Status;

/// Visual treatment of a badge for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    /// Background color.
    pub background: &'static str,
    /// Glyph rendered inside the badge.
    pub glyph: &'static str,
    /// Tooltip title.
    pub title: &'static str,
}

/// Returns the badge treatment for `status`.
pub fn style_for(status: Status) -> StatusStyle {
    match status {
        Status::Scam => StatusStyle {
            background: "#f44336",
            glyph: "✗",
            title: "TruthLens: SCAM",
        },
        Status::Uncertain => StatusStyle {
            background: "#ff9800",
            glyph: "...",
            title: "TruthLens: UNCERTAIN",
        },
        Status::Legit => StatusStyle {
            background: "#4CAF50",
            glyph: "✓",
            title: "TruthLens: LEGIT",
        },
    }
}

/// Full inline style for a badge with the given background.
pub fn badge_style(background: &str) -> String {
    format!(
        "position: absolute; top: 10px; right: 10px; width: 22px; height: 22px; \
         border-radius: 50%; color: #fff; display: flex; align-items: center; \
         justify-content: center; font-weight: bold; font-size: 12px; \
         box-shadow: 0 2px 8px rgba(0,0,0,0.25); border: none; outline: none; \
         cursor: pointer; z-index: 9999; pointer-events: auto; user-select: none; \
         background: {background}"
    )
}

/// Inline style for the detail popover box.
pub fn popover_style() -> &'static str {
    "position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); \
     background: rgba(88, 81, 85, 0.95); border: 2px solid rgb(255, 255, 255); \
     border-radius: 8px; padding: 20px; box-shadow: 0 4px 20px rgba(0,0,0,0.3); \
     z-index: 10000; max-width: 400px; font-family: Arial, sans-serif"
}
