//! Page geometry and the layout cursor
//!
//! All layout runs on an A4 page measured in millimeters, content spanning
//! 20..190 mm horizontally. Font sizes stay in points; measured text widths
//! come back in millimeters so they compose with the page geometry.

use crate::types::Rect;

/// Conversion factor from millimeters to PDF points
pub const MM_TO_PT: f64 = 72.0 / 25.4;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;

pub const CONTENT_LEFT: f64 = 20.0;
pub const CONTENT_RIGHT: f64 = 190.0;
pub const CONTENT_WIDTH: f64 = CONTENT_RIGHT - CONTENT_LEFT;
pub const CONTENT_TOP: f64 = 30.0;

/// Cursor positions past this start a new page before variable-length blocks
pub const NEAR_BOTTOM: f64 = 250.0;

/// Vertical space consumed by a section header bar
pub const HEADER_ADVANCE: f64 = 15.0;

/// Default body line height
pub const LINE_HEIGHT: f64 = 6.0;

/// Row height of the two-column amenity grid
pub const GRID_ROW_HEIGHT: f64 = 8.0;

pub const HERO_HEIGHT: f64 = 100.0;

pub const GALLERY_CELL_WIDTH: f64 = 80.0;
pub const GALLERY_CELL_HEIGHT: f64 = 60.0;
pub const GALLERY_SPACING: f64 = 10.0;

/// Baseline of the page-number footer
pub const FOOTER_Y: f64 = 285.0;

/// Fixed top-right branding box
pub fn logo_box() -> Rect {
    Rect::new(160.0, 8.0, 30.0, 14.0)
}

/// Running vertical offset threaded through a page's drawing operations.
///
/// Every layout primitive takes a cursor and returns the advanced cursor;
/// no drawing call mutates hidden position state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub y: f64,
}

impl LayoutCursor {
    pub fn new(y: f64) -> Self {
        Self { y }
    }

    /// Cursor at the top of the content area
    pub fn top() -> Self {
        Self { y: CONTENT_TOP }
    }

    pub fn advance(self, dy: f64) -> Self {
        Self { y: self.y + dy }
    }

    /// True when a block of the given height would cross the near-bottom
    /// threshold
    pub fn overflows(self, block_height: f64) -> bool {
        self.y + block_height > NEAR_BOTTOM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_advance_is_functional() {
        let c = LayoutCursor::top();
        let c2 = c.advance(15.0);
        assert_eq!(c.y, CONTENT_TOP);
        assert_eq!(c2.y, CONTENT_TOP + 15.0);
    }

    #[test]
    fn test_overflow_threshold() {
        assert!(!LayoutCursor::new(200.0).overflows(50.0));
        assert!(LayoutCursor::new(200.0).overflows(51.0));
        assert!(LayoutCursor::new(251.0).overflows(0.0));
    }

    #[test]
    fn test_content_span() {
        assert_eq!(CONTENT_WIDTH, 170.0);
        assert!((MM_TO_PT * 210.0 - 595.275).abs() < 0.01);
    }
}
