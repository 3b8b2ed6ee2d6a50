//! Text measurement and line breaking
//!
//! Widths come from glyph advances for embedded fonts and from a
//! char-count approximation for the builtin faces (0.6 em per glyph,
//! 0.3 em per space). All widths are returned in millimeters; font
//! sizes stay in points.

use crate::font_registry::{FontEncoding, RegisteredFont};
use crate::layout::MM_TO_PT;

const APPROX_CHAR_EM: f64 = 0.6;
const APPROX_SPACE_EM: f64 = 0.3;
const MISSING_GLYPH_ADVANCE: f64 = 500.0;

/// Width of `text` drawn in `font` at `font_size` points, in millimeters
pub fn text_width_mm(text: &str, font: &RegisteredFont, font_size: f64) -> f64 {
    let width_pt: f64 = match &font.encoding {
        FontEncoding::WinAnsi => text
            .chars()
            .map(|ch| {
                if ch == ' ' {
                    font_size * APPROX_SPACE_EM
                } else {
                    font_size * APPROX_CHAR_EM
                }
            })
            .sum(),
        FontEncoding::Cid(glyph_map) => text
            .chars()
            .map(|ch| {
                let advance = glyph_map
                    .get(&(ch as u32))
                    .map(|glyph| glyph.advance as f64)
                    .unwrap_or(MISSING_GLYPH_ADVANCE);
                advance / 1000.0 * font_size
            })
            .sum(),
    };
    width_pt / MM_TO_PT
}

/// Greedy word wrap into lines of at most `max_width_mm`.
///
/// Newlines force paragraph breaks and blank lines survive as empty
/// strings so vertical gaps are preserved. A word wider than the limit
/// gets a line of its own rather than being split.
pub fn wrap_text(
    text: &str,
    font: &RegisteredFont,
    font_size: f64,
    max_width_mm: f64,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let space_width = text_width_mm(" ", font, font_size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = text_width_mm(word, font, font_size);
            let needed_width = if current_line.is_empty() {
                word_width
            } else {
                current_width + space_width + word_width
            };

            if needed_width <= max_width_mm || current_line.is_empty() {
                if !current_line.is_empty() {
                    current_line.push(' ');
                    current_width += space_width;
                }
                current_line.push_str(word);
                current_width += word_width;
            } else {
                lines.push(current_line);
                current_line = word.to_string();
                current_width = word_width;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    lines
}
