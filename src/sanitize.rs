//! Text sanitation for AI-generated content
//!
//! Upstream content generation occasionally prepends list markers to
//! highlight strings and, on some transport paths, delivers UTF-8 text that
//! was wrongly decoded as Latin-1. Both defects are repaired here before
//! any text reaches layout.

use crate::unicode_utils::contains_arabic;

/// Known bad leading tokens, longest first so that e.g. "->" wins over "-".
const BULLET_PREFIXES: [&str; 9] = [
    "\u{00E2}\u{20AC}\u{00A2}", // mojibake bullet "â€¢"
    "\u{2022}",                 // bullet
    "\u{2192}",                 // rightwards arrow
    "\u{2014}",                 // em dash
    "\u{2013}",                 // en dash
    "->",
    "=>",
    "-",
    "*",
];

/// Strip at most one known list-marker prefix from the front of `text`.
///
/// Whitespace is trimmed before and after the match. Applying this to an
/// already clean string is a no-op.
pub fn strip_bullet_prefix(text: &str) -> String {
    let trimmed = text.trim();
    for prefix in BULLET_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return rest.trim_start().to_string();
        }
    }
    trimmed.to_string()
}

/// Repair text whose UTF-8 bytes were decoded as Latin-1 somewhere upstream.
///
/// Best-effort heuristic, not a charset detector: text already containing
/// Arabic-block codepoints is left alone, and the re-decode is attempted
/// only when the characteristic marker 'Ã' is present. Pure Arabic mojibake
/// without that marker is not detected.
pub fn repair_mojibake(text: &str) -> String {
    if contains_arabic(text) {
        return text.to_string();
    }
    if !text.contains('\u{00C3}') {
        return text.to_string();
    }

    // Reverse the bad decode: every scalar must fit in one Latin-1 byte,
    // and the recovered byte sequence must be valid UTF-8.
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let cp = ch as u32;
        if cp > 0xFF {
            return text.to_string();
        }
        bytes.push(cp as u8);
    }

    match String::from_utf8(bytes) {
        Ok(repaired) => repaired,
        Err(_) => text.to_string(),
    }
}
