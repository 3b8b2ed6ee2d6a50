//! Layout primitives shared by all page archetypes
//!
//! Everything content-bearing threads a `LayoutCursor` functionally: a
//! primitive takes the cursor, draws, and returns the advanced cursor.
//! The cosmetic primitives (background, ornaments, page number) never
//! touch the cursor and may be called in any order.

use crate::canvas::PdfCanvas;
use crate::font_registry::{FontRegistry, FontStyle};
use crate::layout::{
    CONTENT_LEFT, CONTENT_RIGHT, CONTENT_WIDTH, FOOTER_Y, GRID_ROW_HEIGHT, HEADER_ADVANCE,
    LINE_HEIGHT, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::layout::LayoutCursor;
use crate::locale::Direction;
use crate::text_layout::{text_width_mm, wrap_text};
use crate::types::{Align, Color, Rect};

pub const HEADING_BLUE: Color = Color::rgb8(31, 78, 121);
pub const PRICE_RED: Color = Color::rgb8(220, 53, 69);
pub const MUTED_GRAY: Color = Color::rgb8(100, 100, 100);
pub const BODY_GRAY: Color = Color::rgb8(60, 60, 60);
pub const LINE_GRAY: Color = Color::rgb8(200, 200, 200);
pub const ACCENT_GOLD: Color = Color::rgb8(197, 163, 93);
pub const PAGE_CREAM: Color = Color::rgb8(250, 248, 243);
pub const SHADOW_GRAY: Color = Color::rgb8(136, 136, 136);

const HEADER_BAR_HEIGHT: f64 = 10.0;
const HEADER_TEXT_SIZE: f64 = 14.0;
const HEADER_PAD: f64 = 4.0;
const PLACEHOLDER_MESSAGE_LIMIT: usize = 30;

/// Soft full-page background, drawn first on every page
pub fn page_background(canvas: &mut PdfCanvas) {
    canvas.set_fill_color(PAGE_CREAM);
    canvas.rect(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT), true, false);
}

/// Filled header bar with the title aligned per direction and a gold
/// accent line beneath
pub fn section_header(
    canvas: &mut PdfCanvas,
    fonts: &FontRegistry,
    title: &str,
    cursor: LayoutCursor,
    direction: Direction,
) -> LayoutCursor {
    let bar = Rect::new(CONTENT_LEFT, cursor.y, CONTENT_WIDTH, HEADER_BAR_HEIGHT);
    canvas.set_fill_color(HEADING_BLUE);
    canvas.rect(bar, true, false);

    let font = fonts.resolve_for_text(title, FontStyle::Bold);
    canvas.set_font(font, HEADER_TEXT_SIZE);
    canvas.set_fill_color(Color::white());
    let baseline = cursor.y + 7.0;
    match direction {
        Direction::Ltr => canvas.draw_string(bar.left() + HEADER_PAD, baseline, title),
        Direction::Rtl => {
            let width = text_width_mm(title, font, HEADER_TEXT_SIZE);
            canvas.draw_string(bar.right() - HEADER_PAD - width, baseline, title);
        }
    }

    canvas.set_stroke_color(ACCENT_GOLD);
    canvas.set_line_width(0.6);
    let line_y = bar.bottom() + 1.2;
    canvas.line(bar.left(), line_y, bar.right(), line_y);

    cursor.advance(HEADER_ADVANCE)
}

/// Section header with a small gold diamond icon at the reading edge
pub fn icon_section_header(
    canvas: &mut PdfCanvas,
    fonts: &FontRegistry,
    title: &str,
    cursor: LayoutCursor,
    direction: Direction,
) -> LayoutCursor {
    let bar = Rect::new(CONTENT_LEFT, cursor.y, CONTENT_WIDTH, HEADER_BAR_HEIGHT);
    let icon_y = cursor.y + HEADER_BAR_HEIGHT / 2.0;
    canvas.set_fill_color(ACCENT_GOLD);
    match direction {
        Direction::Ltr => canvas.diamond(bar.left() + HEADER_PAD, icon_y, 1.6, true, false),
        Direction::Rtl => canvas.diamond(bar.right() - HEADER_PAD, icon_y, 1.6, true, false),
    }

    canvas.set_fill_color(HEADING_BLUE);
    let font = fonts.resolve_for_text(title, FontStyle::Bold);
    canvas.set_font(font, HEADER_TEXT_SIZE);
    let baseline = cursor.y + 7.0;
    match direction {
        Direction::Ltr => canvas.draw_string(bar.left() + HEADER_PAD + 4.0, baseline, title),
        Direction::Rtl => {
            let width = text_width_mm(title, font, HEADER_TEXT_SIZE);
            canvas.draw_string(bar.right() - HEADER_PAD - 4.0 - width, baseline, title);
        }
    }

    canvas.set_stroke_color(ACCENT_GOLD);
    canvas.set_line_width(0.6);
    let line_y = bar.bottom() + 1.2;
    canvas.line(bar.left(), line_y, bar.right(), line_y);

    cursor.advance(HEADER_ADVANCE)
}

/// Alternate items left/right at a fixed row height. The vertical extent
/// is always `ceil(n/2)` rows.
pub fn two_column_grid<T>(
    canvas: &mut PdfCanvas,
    items: &[T],
    cursor: LayoutCursor,
    mut draw_item: impl FnMut(&mut PdfCanvas, &T, f64, f64),
) -> LayoutCursor {
    let column_width = CONTENT_WIDTH / 2.0;
    for (i, item) in items.iter().enumerate() {
        let column = (i % 2) as f64;
        let row = (i / 2) as f64;
        let x = CONTENT_LEFT + column * column_width;
        let y = cursor.y + row * GRID_ROW_HEIGHT;
        draw_item(canvas, item, x, y);
    }
    let rows = (items.len() + 1) / 2;
    cursor.advance(rows as f64 * GRID_ROW_HEIGHT)
}

/// Filled gold disc used instead of a bullet glyph
pub fn gold_bullet(canvas: &mut PdfCanvas, x: f64, y: f64) {
    canvas.set_fill_color(ACCENT_GOLD);
    canvas.circle(x, y, 1.1, true, false);
}

/// Two stroked lines forming a checkmark, anchored at (x, y)
pub fn checkmark(canvas: &mut PdfCanvas, x: f64, y: f64) {
    canvas.set_stroke_color(ACCENT_GOLD);
    canvas.set_line_width(0.5);
    canvas.line(x, y - 1.4, x + 1.1, y);
    canvas.line(x + 1.1, y, x + 3.0, y - 3.2);
}

/// Gold frame ticks in all four page corners
pub fn corner_ornaments(canvas: &mut PdfCanvas) {
    let inset = 10.0;
    let arm = 8.0;
    canvas.set_stroke_color(ACCENT_GOLD);
    canvas.set_line_width(0.5);
    for (cx, cy, dx, dy) in [
        (inset, inset, 1.0, 1.0),
        (PAGE_WIDTH - inset, inset, -1.0, 1.0),
        (inset, PAGE_HEIGHT - inset, 1.0, -1.0),
        (PAGE_WIDTH - inset, PAGE_HEIGHT - inset, -1.0, -1.0),
    ] {
        canvas.line(cx, cy, cx + dx * arm, cy);
        canvas.line(cx, cy, cx, cy + dy * arm);
    }
}

/// Three small diamonds centered above the footer, cover decoration
pub fn diamond_row(canvas: &mut PdfCanvas, y: f64) {
    canvas.set_fill_color(ACCENT_GOLD);
    let center = PAGE_WIDTH / 2.0;
    canvas.diamond(center - 8.0, y, 1.2, true, false);
    canvas.diamond(center, y, 1.8, true, false);
    canvas.diamond(center + 8.0, y, 1.2, true, false);
}

/// Footer page number flanked by two small gold diamonds
pub fn page_number(canvas: &mut PdfCanvas, fonts: &FontRegistry, number: u32) {
    let text = number.to_string();
    let font = fonts.builtin(FontStyle::Regular);
    let width = text_width_mm(&text, font, 9.0);
    let center = PAGE_WIDTH / 2.0;

    canvas.set_font(font, 9.0);
    canvas.set_fill_color(MUTED_GRAY);
    canvas.draw_string(center - width / 2.0, FOOTER_Y, &text);

    canvas.set_fill_color(ACCENT_GOLD);
    canvas.diamond(center - width / 2.0 - 4.0, FOOTER_Y - 1.1, 0.9, true, false);
    canvas.diamond(center + width / 2.0 + 4.0, FOOTER_Y - 1.1, 0.9, true, false);
}

/// Neutral placeholder box for an image that could not be fetched or
/// decoded. The message is truncated so it never escapes the frame.
pub fn image_placeholder(canvas: &mut PdfCanvas, fonts: &FontRegistry, rect: Rect, message: &str) {
    canvas.set_stroke_color(Color::rgb(0.8, 0.8, 0.8));
    canvas.set_line_width(0.4);
    canvas.rect(rect, false, true);

    let display: String = message.chars().take(PLACEHOLDER_MESSAGE_LIMIT).collect();
    let font = fonts.resolve_for_text(&display, FontStyle::Oblique);
    canvas.set_font(font, 10.0);
    canvas.set_fill_color(Color::rgb(0.6, 0.6, 0.6));
    canvas.draw_string(rect.left() + 5.0, rect.center_y(), &display);
}

/// Shadow rectangle painted behind a gallery image
pub fn drop_shadow(canvas: &mut PdfCanvas, rect: Rect) {
    canvas.set_fill_color(SHADOW_GRAY);
    canvas.rect(rect.offset(1.2, 1.2), true, false);
}

/// Hairline frame around an image box
pub fn image_border(canvas: &mut PdfCanvas, rect: Rect) {
    canvas.set_stroke_color(LINE_GRAY);
    canvas.set_line_width(0.4);
    canvas.rect(rect, false, true);
}

/// One line of text anchored at `x` per `align` (left edge, center, or
/// right edge)
pub fn text_line(
    canvas: &mut PdfCanvas,
    fonts: &FontRegistry,
    text: &str,
    x: f64,
    baseline: f64,
    style: FontStyle,
    size: f64,
    color: Color,
    align: Align,
) {
    let font = fonts.resolve_for_text(text, style);
    let width = text_width_mm(text, font, size);
    let start = match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    };
    canvas.set_font(font, size);
    canvas.set_fill_color(color);
    canvas.draw_string(start, baseline, text);
}

/// Wrapped paragraph block across the content width, aligned per
/// direction, advancing one line height per wrapped line
pub fn text_block(
    canvas: &mut PdfCanvas,
    fonts: &FontRegistry,
    text: &str,
    cursor: LayoutCursor,
    direction: Direction,
    size: f64,
    color: Color,
) -> LayoutCursor {
    let font = fonts.resolve_for_text(text, FontStyle::Regular).clone();
    let lines = wrap_text(text, &font, size, CONTENT_WIDTH);
    let mut cursor = cursor;
    for line in &lines {
        if !line.is_empty() {
            let width = text_width_mm(line, &font, size);
            let x = match direction {
                Direction::Ltr => CONTENT_LEFT,
                Direction::Rtl => CONTENT_RIGHT - width,
            };
            canvas.set_font(&font, size);
            canvas.set_fill_color(color);
            canvas.draw_string(x, cursor.y + size * 0.35, line);
        }
        cursor = cursor.advance(LINE_HEIGHT);
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontSet;
    use crate::document::BrochureDocument;

    fn builtin_fonts() -> (pdf_writer::Pdf, FontRegistry) {
        let mut pdf = pdf_writer::Pdf::new();
        let registry = FontRegistry::new(&mut pdf, 1000, None, None);
        (pdf, registry)
    }

    #[test]
    fn test_section_header_advances_fixed_amount() {
        let (_, fonts) = builtin_fonts();
        let mut canvas = PdfCanvas::new();
        let cursor = LayoutCursor::new(40.0);
        let after = section_header(&mut canvas, &fonts, "Property Description", cursor, Direction::Ltr);
        assert!((after.y - 55.0).abs() < 1e-9);
        let ops = String::from_utf8_lossy(&canvas.finish()).to_string();
        assert!(ops.contains("(Property Description) Tj"));
        assert!(ops.contains("/F2 14 Tf"));
    }

    #[test]
    fn test_grid_row_count_is_half_rounded_up() {
        let (_, fonts) = builtin_fonts();
        let _ = fonts;
        let items: Vec<String> = (0..5).map(|i| format!("item {}", i)).collect();
        let mut canvas = PdfCanvas::new();
        let mut positions = Vec::new();
        let cursor = LayoutCursor::new(100.0);
        let after = two_column_grid(&mut canvas, &items, cursor, |_, _, x, y| {
            positions.push((x, y));
        });
        assert!((after.y - (100.0 + 3.0 * GRID_ROW_HEIGHT)).abs() < 1e-9);
        // Row-major: left, right, then next row
        assert_eq!(positions[0], (CONTENT_LEFT, 100.0));
        assert_eq!(positions[1], (CONTENT_LEFT + CONTENT_WIDTH / 2.0, 100.0));
        assert_eq!(positions[2], (CONTENT_LEFT, 100.0 + GRID_ROW_HEIGHT));
    }

    #[test]
    fn test_grid_even_count() {
        let items = ["a", "b", "c", "d"];
        let mut canvas = PdfCanvas::new();
        let cursor = LayoutCursor::new(60.0);
        let after = two_column_grid(&mut canvas, &items, cursor, |_, _, _, _| {});
        assert!((after.y - (60.0 + 2.0 * GRID_ROW_HEIGHT)).abs() < 1e-9);
    }

    #[test]
    fn test_page_number_literal_in_stream() {
        let (_, fonts) = builtin_fonts();
        let mut canvas = PdfCanvas::new();
        page_number(&mut canvas, &fonts, 3);
        let ops = String::from_utf8_lossy(&canvas.finish()).to_string();
        assert!(ops.contains("(3) Tj"));
    }

    #[test]
    fn test_placeholder_truncates_message() {
        let (_, fonts) = builtin_fonts();
        let mut canvas = PdfCanvas::new();
        let long = "this message is far longer than the thirty character limit";
        image_placeholder(&mut canvas, &fonts, Rect::new(20.0, 45.0, 170.0, 100.0), long);
        let ops = String::from_utf8_lossy(&canvas.finish()).to_string();
        assert!(ops.contains("(this message is far longer tha) Tj"));
        assert!(ops.contains("/F3 10 Tf"));
    }

    #[test]
    fn test_text_block_advances_per_line() {
        let (_, fonts) = builtin_fonts();
        let mut canvas = PdfCanvas::new();
        let cursor = LayoutCursor::new(50.0);
        let after = text_block(
            &mut canvas,
            &fonts,
            "word\nword",
            cursor,
            Direction::Ltr,
            11.0,
            BODY_GRAY,
        );
        assert!((after.y - (50.0 + 2.0 * LINE_HEIGHT)).abs() < 1e-9);
    }

    #[test]
    fn test_cosmetics_do_not_need_cursor() {
        // Compiles and runs against a real document page without panicking
        let mut doc = BrochureDocument::new(&FontSet::empty());
        let fonts_snapshot = doc.fonts().builtin(FontStyle::Regular).clone();
        let _ = fonts_snapshot;
        page_background(doc.canvas());
        corner_ornaments(doc.canvas());
        diamond_row(doc.canvas(), 270.0);
        let bytes = doc.finish();
        assert!(!bytes.is_empty());
    }
}
