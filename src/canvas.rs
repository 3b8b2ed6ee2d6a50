//! High-level canvas over a pdf-writer content stream
//!
//! The API speaks millimeters with the origin at the top-left corner of an
//! A4 page; conversion to PDF points (bottom-up) happens at the operator
//! boundary and nowhere else. Font sizes stay in points. Text encoding
//! follows the active font: WinAnsi bytes for the builtin faces, 2-byte
//! big-endian CIDs for embedded Type0 fonts.

use pdf_writer::{Content, Str};

use crate::font_registry::{FontEncoding, RegisteredFont};
use crate::image_registry::PlacedImage;
use crate::layout::{MM_TO_PT, PAGE_HEIGHT};
use crate::types::{Color, Rect};
use crate::unicode_utils::unicode_to_winansi;

// Quarter-circle bezier control point offset
const ARC_MAGIC: f64 = 0.55228475;

/// Graphics state mirrored alongside the content stream
struct CanvasState {
    font: Option<RegisteredFont>,
    font_size: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 12.0,
        }
    }
}

/// Drawing surface for one page
pub struct PdfCanvas {
    content: Content,
    state: CanvasState,
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            content: Content::new(),
            state: CanvasState::default(),
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }

    fn xp(x: f64) -> f32 {
        (x * MM_TO_PT) as f32
    }

    fn yp(y: f64) -> f32 {
        ((PAGE_HEIGHT - y) * MM_TO_PT) as f32
    }

    // ===== State management =====

    pub fn set_fill_color(&mut self, color: Color) {
        self.content
            .set_fill_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.content
            .set_stroke_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    /// Stroke width in millimeters
    pub fn set_line_width(&mut self, width: f64) {
        self.content.set_line_width((width * MM_TO_PT) as f32);
    }

    // ===== Shapes =====

    /// Rectangle given in top-down coordinates (y is the top edge)
    pub fn rect(&mut self, rect: Rect, fill: bool, stroke: bool) {
        self.content.rect(
            Self::xp(rect.x),
            Self::yp(rect.y + rect.height),
            (rect.width * MM_TO_PT) as f32,
            (rect.height * MM_TO_PT) as f32,
        );
        self.paint(fill, stroke);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.content.move_to(Self::xp(x1), Self::yp(y1));
        self.content.line_to(Self::xp(x2), Self::yp(y2));
        self.content.stroke();
    }

    /// Circle centered at (cx, cy) from four bezier arcs
    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64, fill: bool, stroke: bool) {
        let r = radius;
        let c = r * ARC_MAGIC;
        let (x, y) = (cx, cy);

        self.content.move_to(Self::xp(x + r), Self::yp(y));
        self.content.cubic_to(
            Self::xp(x + r),
            Self::yp(y - c),
            Self::xp(x + c),
            Self::yp(y - r),
            Self::xp(x),
            Self::yp(y - r),
        );
        self.content.cubic_to(
            Self::xp(x - c),
            Self::yp(y - r),
            Self::xp(x - r),
            Self::yp(y - c),
            Self::xp(x - r),
            Self::yp(y),
        );
        self.content.cubic_to(
            Self::xp(x - r),
            Self::yp(y + c),
            Self::xp(x - c),
            Self::yp(y + r),
            Self::xp(x),
            Self::yp(y + r),
        );
        self.content.cubic_to(
            Self::xp(x + c),
            Self::yp(y + r),
            Self::xp(x + r),
            Self::yp(y + c),
            Self::xp(x + r),
            Self::yp(y),
        );
        self.content.close_path();
        self.paint(fill, stroke);
    }

    /// Diamond (rotated square) centered at (cx, cy)
    pub fn diamond(&mut self, cx: f64, cy: f64, radius: f64, fill: bool, stroke: bool) {
        self.content.move_to(Self::xp(cx), Self::yp(cy - radius));
        self.content.line_to(Self::xp(cx + radius), Self::yp(cy));
        self.content.line_to(Self::xp(cx), Self::yp(cy + radius));
        self.content.line_to(Self::xp(cx - radius), Self::yp(cy));
        self.content.close_path();
        self.paint(fill, stroke);
    }

    fn paint(&mut self, fill: bool, stroke: bool) {
        match (fill, stroke) {
            (true, true) => {
                self.content.fill_nonzero_and_stroke();
            }
            (true, false) => {
                self.content.fill_nonzero();
            }
            (false, _) => {
                self.content.stroke();
            }
        }
    }

    // ===== Text =====

    pub fn set_font(&mut self, font: &RegisteredFont, size: f64) {
        self.state.font = Some(font.clone());
        self.state.font_size = size;
    }

    /// Show `text` with its baseline starting at (x, y)
    pub fn draw_string(&mut self, x: f64, y: f64, text: &str) {
        let Some(font) = self.state.font.clone() else {
            log::warn!("draw_string with no font set, skipping text");
            return;
        };
        self.content.begin_text();
        self.content.set_font(font.name, self.state.font_size as f32);
        self.content.next_line(Self::xp(x), Self::yp(y));
        match &font.encoding {
            FontEncoding::WinAnsi => {
                self.content.show(Str(&unicode_to_winansi(text)));
            }
            FontEncoding::Cid(glyph_map) => {
                let mut cid_bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    // Missing glyphs show as notdef
                    let cid = glyph_map.get(&(ch as u32)).map(|g| g.cid).unwrap_or(0);
                    cid_bytes.extend_from_slice(&cid.to_be_bytes());
                }
                self.content.show(Str(&cid_bytes));
            }
        }
        self.content.end_text();
    }

    // ===== Images =====

    /// Paint an embedded image into a top-down box: (x, y) is the top-left
    /// corner, width and height in millimeters
    pub fn draw_image(&mut self, image: PlacedImage, x: f64, y: f64, width: f64, height: f64) {
        self.content.save_state();
        self.content.transform([
            (width * MM_TO_PT) as f32,
            0.0,
            0.0,
            (height * MM_TO_PT) as f32,
            Self::xp(x),
            Self::yp(y + height),
        ]);
        self.content.x_object(image.name);
        self.content.restore_state();
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}
