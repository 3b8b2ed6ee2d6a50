//! Brochure generation: the page composer
//!
//! One renderer holds the resolved fonts, the shared HTTP client and the
//! optional branding logo URL. Each render call owns a fresh document and
//! walks a fixed page sequence (cover, details, investment + gallery,
//! contact) parameterized by the resolved content and its direction, so
//! the English and Arabic variants share every drawing routine. Per-asset
//! failures degrade to placeholders; only final document assembly can fail.

use crate::config::{FontSet, RendererConfig};
use crate::document::BrochureDocument;
use crate::error::{RendererError, RendererResult};
use crate::fetch::ImageFetcher;
use crate::font_registry::FontStyle;
use crate::format::{format_location, format_price};
use crate::image_registry::image_key;
use crate::image_utils::aspect_fit;
use crate::layout::{
    logo_box, LayoutCursor, CONTENT_LEFT, CONTENT_RIGHT, CONTENT_WIDTH, GALLERY_CELL_HEIGHT,
    GALLERY_CELL_WIDTH, GALLERY_SPACING, GRID_ROW_HEIGHT, HEADER_ADVANCE, HERO_HEIGHT,
    LINE_HEIGHT, NEAR_BOTTOM, PAGE_WIDTH,
};
use crate::locale::{resolve, BuiltinCopy, Direction, Language, ResolvedContent};
use crate::primitives::{
    checkmark, corner_ornaments, diamond_row, drop_shadow, gold_bullet, icon_section_header,
    image_border, image_placeholder, page_background, page_number, section_header, text_block,
    text_line, two_column_grid, ACCENT_GOLD, BODY_GRAY, HEADING_BLUE, MUTED_GRAY, PRICE_RED,
};
use crate::property::PropertyRecord;
use crate::text_layout::wrap_text;
use crate::types::{Align, Color, Rect};

const COVER_HEADING_SIZE: f64 = 20.0;
const TITLE_SIZE: f64 = 18.0;
const TITLE_LINE_HEIGHT: f64 = 9.0;
const PRICE_SIZE: f64 = 16.0;
const BODY_SIZE: f64 = 11.0;
const HERO_TOP: f64 = 55.0;
const BULLET_INDENT: f64 = 8.0;

/// Generates brochure PDFs for one or both language variants
pub struct BrochureRenderer {
    fonts: FontSet,
    fetcher: ImageFetcher,
    logo_url: Option<String>,
}

impl BrochureRenderer {
    pub fn new(config: &RendererConfig) -> RendererResult<Self> {
        Self::with_fonts(config.resolve_fonts(), config.logo_url.clone())
    }

    /// Renderer from an already resolved font set
    pub fn with_fonts(fonts: FontSet, logo_url: Option<String>) -> RendererResult<Self> {
        Ok(Self {
            fonts,
            fetcher: ImageFetcher::new()?,
            logo_url,
        })
    }

    /// Render the four-page brochure for one language
    pub fn render(&self, property: &PropertyRecord, language: Language) -> RendererResult<Vec<u8>> {
        let content = resolve(property, language);
        let mut composer = Composer::new(&self.fonts, &self.fetcher, self.logo_url.as_deref());
        composer.check_arabic_support(language);
        composer.cover(property, &content);
        composer.next_page();
        composer.details(&content);
        composer.next_page();
        composer.investment_gallery(property, &content);
        composer.next_page();
        composer.contact(property, &content);
        composer.finish()
    }

    /// Render the combined bilingual brochure: the English pages plus an
    /// Arabic-description interstitial before the contact page
    pub fn render_combined(&self, property: &PropertyRecord) -> RendererResult<Vec<u8>> {
        let english = resolve(property, Language::English);
        let arabic = resolve(property, Language::Arabic);
        let mut composer = Composer::new(&self.fonts, &self.fetcher, self.logo_url.as_deref());
        composer.check_arabic_support(Language::Arabic);
        composer.cover(property, &english);
        composer.next_page();
        composer.details(&english);
        composer.next_page();
        composer.investment_gallery(property, &english);
        composer.next_page();
        composer.interstitial(&arabic);
        composer.next_page();
        composer.contact(property, &english);
        composer.finish()
    }
}

/// One render call's working state: the open document, the running page
/// number and the shared fetcher
struct Composer<'a> {
    doc: BrochureDocument,
    fetcher: &'a ImageFetcher,
    logo_url: Option<&'a str>,
    logo_failed: bool,
    page_number: u32,
}

impl<'a> Composer<'a> {
    fn new(fonts: &FontSet, fetcher: &'a ImageFetcher, logo_url: Option<&'a str>) -> Self {
        let mut composer = Self {
            doc: BrochureDocument::new(fonts),
            fetcher,
            logo_url,
            logo_failed: false,
            page_number: 1,
        };
        composer.start_page();
        composer
    }

    fn finish(mut self) -> RendererResult<Vec<u8>> {
        self.end_page();
        if self.doc.page_count() == 0 {
            return Err(RendererError::PdfError("document has no pages".to_string()));
        }
        let bytes = self.doc.finish();
        if bytes.is_empty() {
            return Err(RendererError::PdfError(
                "serialized document is empty".to_string(),
            ));
        }
        Ok(bytes)
    }

    /// Arabic pages without an Arabic font still render, with glyph loss
    fn check_arabic_support(&self, language: Language) {
        if language == Language::Arabic && !self.doc.fonts().has_arabic() {
            log::warn!("no Arabic font embedded, Arabic text will degrade to the builtin face");
        }
    }

    // ===== Page lifecycle =====

    fn start_page(&mut self) {
        {
            let (canvas, _) = self.doc.canvas_and_fonts();
            page_background(canvas);
            corner_ornaments(canvas);
        }
        self.draw_logo();
    }

    fn end_page(&mut self) {
        let (canvas, fonts) = self.doc.canvas_and_fonts();
        page_number(canvas, fonts, self.page_number);
    }

    fn next_page(&mut self) {
        self.end_page();
        self.doc.new_page();
        self.page_number += 1;
        self.start_page();
    }

    /// Uniform overflow policy: a variable-length block that would cross
    /// the near-bottom threshold starts a continuation page instead of
    /// clamping
    fn ensure_room(&mut self, cursor: LayoutCursor, block_height: f64) -> LayoutCursor {
        if cursor.overflows(block_height.min(NEAR_BOTTOM - LayoutCursor::top().y)) {
            self.next_page();
            LayoutCursor::top()
        } else {
            cursor
        }
    }

    // ===== Shared drawing helpers =====

    /// Fetch, embed and draw an image aspect-fitted into `rect`, or draw a
    /// placeholder when it cannot be fetched. Returns whether a real image
    /// was placed.
    fn place_image(&mut self, url: &str, rect: Rect, unavailable: &str) -> bool {
        let key = image_key(url, rect.x, rect.y);
        match self.doc.embed_image(&key, self.fetcher, url) {
            Ok(placed) => {
                if placed.degraded {
                    // No trustworthy pixel data, fill the box as-is
                    self.doc
                        .canvas()
                        .draw_image(placed, rect.x, rect.y, rect.width, rect.height);
                } else {
                    let (ox, oy, w, h) =
                        aspect_fit(placed.width, placed.height, rect.width, rect.height);
                    self.doc
                        .canvas()
                        .draw_image(placed, rect.x + ox, rect.y + oy, w, h);
                }
                true
            }
            Err(e) => {
                log::warn!("image {} unavailable, drawing placeholder: {}", url, e);
                let (canvas, fonts) = self.doc.canvas_and_fonts();
                image_placeholder(canvas, fonts, rect, unavailable);
                false
            }
        }
    }

    fn draw_logo(&mut self) {
        let Some(url) = self.logo_url else { return };
        if self.logo_failed {
            return;
        }
        let rect = logo_box();
        let key = image_key(url, rect.x, rect.y);
        match self.doc.embed_image(&key, self.fetcher, url) {
            Ok(placed) => {
                let (ox, oy, w, h) =
                    aspect_fit(placed.width, placed.height, rect.width, rect.height);
                self.doc
                    .canvas()
                    .draw_image(placed, rect.x + ox, rect.y + oy, w, h);
            }
            Err(e) => {
                log::warn!("logo {} unavailable, pages render without it: {}", url, e);
                self.logo_failed = true;
            }
        }
    }

    /// Wrapped paragraph with per-line continuation paging
    fn paragraph(
        &mut self,
        text: &str,
        cursor: LayoutCursor,
        direction: Direction,
        size: f64,
        color: Color,
    ) -> LayoutCursor {
        let lines = {
            let (_, fonts) = self.doc.canvas_and_fonts();
            let font = fonts.resolve_for_text(text, FontStyle::Regular).clone();
            wrap_text(text, &font, size, CONTENT_WIDTH)
        };
        let mut cursor = cursor;
        for line in &lines {
            cursor = self.ensure_room(cursor, LINE_HEIGHT);
            if !line.is_empty() {
                let (canvas, fonts) = self.doc.canvas_and_fonts();
                let (x, align) = match direction {
                    Direction::Ltr => (CONTENT_LEFT, Align::Left),
                    Direction::Rtl => (CONTENT_RIGHT, Align::Right),
                };
                text_line(
                    canvas,
                    fonts,
                    line,
                    x,
                    cursor.y + size * 0.35,
                    FontStyle::Regular,
                    size,
                    color,
                    align,
                );
            }
            cursor = cursor.advance(LINE_HEIGHT);
        }
        cursor
    }

    // ===== Page archetypes =====

    /// Page 1: heading, hero image, title, price and location
    fn cover(&mut self, property: &PropertyRecord, content: &ResolvedContent) {
        let copy = BuiltinCopy::for_language(content.language);

        {
            let (canvas, fonts) = self.doc.canvas_and_fonts();
            text_line(
                canvas,
                fonts,
                copy.cover_heading,
                PAGE_WIDTH / 2.0,
                42.0,
                FontStyle::Bold,
                COVER_HEADING_SIZE,
                HEADING_BLUE,
                Align::Center,
            );
            canvas.set_stroke_color(ACCENT_GOLD);
            canvas.set_line_width(0.6);
            canvas.line(CONTENT_LEFT + 40.0, 47.0, CONTENT_RIGHT - 40.0, 47.0);
        }

        let hero = Rect::new(CONTENT_LEFT, HERO_TOP, CONTENT_WIDTH, HERO_HEIGHT);
        if let Some(url) = property.image_urls.first() {
            if self.place_image(url, hero, copy.image_unavailable) {
                let (canvas, _) = self.doc.canvas_and_fonts();
                image_border(canvas, hero);
            }
        } else {
            let (canvas, fonts) = self.doc.canvas_and_fonts();
            image_placeholder(canvas, fonts, hero, copy.image_unavailable);
        }

        let (canvas, fonts) = self.doc.canvas_and_fonts();
        let title_font = fonts.resolve_for_text(&content.title, FontStyle::Bold).clone();
        let title_lines = wrap_text(&content.title, &title_font, TITLE_SIZE, CONTENT_WIDTH);
        let mut baseline = hero.bottom() + 16.0;
        for line in &title_lines {
            text_line(
                canvas,
                fonts,
                line,
                PAGE_WIDTH / 2.0,
                baseline,
                FontStyle::Bold,
                TITLE_SIZE,
                HEADING_BLUE,
                Align::Center,
            );
            baseline += TITLE_LINE_HEIGHT;
        }

        let price = format_price(property.price, &property.currency);
        baseline += 4.0;
        text_line(
            canvas,
            fonts,
            &price,
            PAGE_WIDTH / 2.0,
            baseline,
            FontStyle::Bold,
            PRICE_SIZE,
            PRICE_RED,
            Align::Center,
        );

        let location = format_location(
            &property.address,
            &property.city,
            &property.state,
            &property.zip_code,
        );
        baseline += 9.0;
        text_line(
            canvas,
            fonts,
            &location,
            PAGE_WIDTH / 2.0,
            baseline,
            FontStyle::Regular,
            BODY_SIZE,
            MUTED_GRAY,
            Align::Center,
        );

        diamond_row(canvas, 265.0);
    }

    /// Page 2: description, highlight list and amenity grid
    fn details(&mut self, content: &ResolvedContent) {
        let direction = content.direction();
        let mut cursor = LayoutCursor::top();

        {
            let (canvas, fonts) = self.doc.canvas_and_fonts();
            cursor = section_header(canvas, fonts, &content.labels.description, cursor, direction);
        }
        cursor = self.paragraph(&content.description, cursor, direction, BODY_SIZE, BODY_GRAY);
        cursor = cursor.advance(4.0);

        if !content.highlights.is_empty() {
            cursor = self.ensure_room(cursor, HEADER_ADVANCE + LINE_HEIGHT);
            {
                let (canvas, fonts) = self.doc.canvas_and_fonts();
                cursor =
                    section_header(canvas, fonts, &content.labels.highlights, cursor, direction);
            }
            for highlight in &content.highlights {
                cursor = self.highlight_row(highlight, cursor, direction);
            }
            cursor = cursor.advance(4.0);
        }

        if !content.amenities.is_empty() {
            let rows = (content.amenities.len() + 1) / 2;
            cursor = self.ensure_room(cursor, HEADER_ADVANCE + rows as f64 * GRID_ROW_HEIGHT);
            let (canvas, fonts) = self.doc.canvas_and_fonts();
            cursor =
                icon_section_header(canvas, fonts, &content.labels.amenities, cursor, direction);
            let column_width = CONTENT_WIDTH / 2.0;
            two_column_grid(canvas, &content.amenities, cursor, |canvas, item, x, y| {
                let baseline = y + 4.0;
                match direction {
                    Direction::Ltr => {
                        checkmark(canvas, x + 1.0, baseline);
                        text_line(
                            canvas,
                            fonts,
                            item,
                            x + 7.0,
                            baseline,
                            FontStyle::Regular,
                            BODY_SIZE,
                            BODY_GRAY,
                            Align::Left,
                        );
                    }
                    Direction::Rtl => {
                        checkmark(canvas, x + column_width - 5.0, baseline);
                        text_line(
                            canvas,
                            fonts,
                            item,
                            x + column_width - 7.0,
                            baseline,
                            FontStyle::Regular,
                            BODY_SIZE,
                            BODY_GRAY,
                            Align::Right,
                        );
                    }
                }
            });
        }
    }

    /// One bulleted highlight line, wrapped inside the bullet indent
    fn highlight_row(
        &mut self,
        text: &str,
        cursor: LayoutCursor,
        direction: Direction,
    ) -> LayoutCursor {
        let lines = {
            let (_, fonts) = self.doc.canvas_and_fonts();
            let font = fonts.resolve_for_text(text, FontStyle::Regular).clone();
            wrap_text(text, &font, BODY_SIZE, CONTENT_WIDTH - BULLET_INDENT)
        };
        let mut cursor = self.ensure_room(cursor, lines.len() as f64 * LINE_HEIGHT);

        let (canvas, fonts) = self.doc.canvas_and_fonts();
        match direction {
            Direction::Ltr => gold_bullet(canvas, CONTENT_LEFT + 2.0, cursor.y + 2.6),
            Direction::Rtl => gold_bullet(canvas, CONTENT_RIGHT - 2.0, cursor.y + 2.6),
        }
        for line in &lines {
            let (x, align) = match direction {
                Direction::Ltr => (CONTENT_LEFT + BULLET_INDENT, Align::Left),
                Direction::Rtl => (CONTENT_RIGHT - BULLET_INDENT, Align::Right),
            };
            text_line(
                canvas,
                fonts,
                line,
                x,
                cursor.y + BODY_SIZE * 0.35,
                FontStyle::Regular,
                BODY_SIZE,
                BODY_GRAY,
                align,
            );
            cursor = cursor.advance(LINE_HEIGHT);
        }
        cursor.advance(1.0)
    }

    /// Page 3: investment copy plus up to four gallery images in a 2x2 grid
    fn investment_gallery(&mut self, property: &PropertyRecord, content: &ResolvedContent) {
        let direction = content.direction();
        let copy = BuiltinCopy::for_language(content.language);
        let mut cursor = LayoutCursor::top();

        {
            let (canvas, fonts) = self.doc.canvas_and_fonts();
            cursor = icon_section_header(canvas, fonts, copy.investment_heading, cursor, direction);
            cursor = text_block(
                canvas,
                fonts,
                copy.investment_body,
                cursor,
                direction,
                BODY_SIZE,
                BODY_GRAY,
            );
            cursor = cursor.advance(3.0);

            let price_line = format!(
                "{}: {}",
                content.labels.price,
                format_price(property.price, &property.currency)
            );
            let (x, align) = match direction {
                Direction::Ltr => (CONTENT_LEFT, Align::Left),
                Direction::Rtl => (CONTENT_RIGHT, Align::Right),
            };
            text_line(
                canvas,
                fonts,
                &price_line,
                x,
                cursor.y + PRICE_SIZE * 0.35,
                FontStyle::Bold,
                PRICE_SIZE,
                PRICE_RED,
                align,
            );
            cursor = cursor.advance(12.0);
        }

        if property.image_urls.len() > 1 {
            cursor = self.ensure_room(cursor, HEADER_ADVANCE + GALLERY_CELL_HEIGHT);
            {
                let (canvas, fonts) = self.doc.canvas_and_fonts();
                cursor = section_header(canvas, fonts, &content.labels.gallery, cursor, direction);
            }
            cursor = cursor.advance(2.0);

            for (i, url) in property.image_urls.iter().skip(1).take(4).enumerate() {
                let column = (i % 2) as f64;
                let row = (i / 2) as f64;
                let cell = Rect::new(
                    CONTENT_LEFT + column * (GALLERY_CELL_WIDTH + GALLERY_SPACING),
                    cursor.y + row * (GALLERY_CELL_HEIGHT + GALLERY_SPACING),
                    GALLERY_CELL_WIDTH,
                    GALLERY_CELL_HEIGHT,
                );
                // Near-bottom images are skipped, not paginated
                if cell.bottom() > NEAR_BOTTOM {
                    log::warn!("gallery image {} skipped, would cross page bottom", i + 1);
                    continue;
                }
                {
                    let (canvas, _) = self.doc.canvas_and_fonts();
                    drop_shadow(canvas, cell);
                }
                if self.place_image(url, cell, copy.image_unavailable) {
                    let (canvas, _) = self.doc.canvas_and_fonts();
                    image_border(canvas, cell);
                }
            }
        }
    }

    /// Combined-variant page: Arabic description on its own RTL page
    fn interstitial(&mut self, content: &ResolvedContent) {
        let direction = content.direction();
        let mut cursor = LayoutCursor::top();
        {
            let (canvas, fonts) = self.doc.canvas_and_fonts();
            cursor = section_header(canvas, fonts, &content.labels.description, cursor, direction);
        }
        self.paragraph(&content.description, cursor, direction, BODY_SIZE, BODY_GRAY);
    }

    /// Last page: agent contact card and the closing thank-you line
    fn contact(&mut self, property: &PropertyRecord, content: &ResolvedContent) {
        let direction = content.direction();
        let copy = BuiltinCopy::for_language(content.language);
        let mut cursor = LayoutCursor::top();

        let (canvas, fonts) = self.doc.canvas_and_fonts();
        cursor = section_header(canvas, fonts, &content.labels.agent, cursor, direction);
        cursor = cursor.advance(4.0);

        let panel = Rect::new(CONTENT_LEFT, cursor.y, CONTENT_WIDTH, 48.0);
        canvas.set_fill_color(Color::white());
        canvas.set_stroke_color(ACCENT_GOLD);
        canvas.set_line_width(0.5);
        canvas.rect(panel, true, true);

        let agent = &property.agent_info;
        let rows = [
            (copy.contact_name, agent.name.as_str()),
            (copy.contact_email, agent.email.as_str()),
            (copy.contact_phone, agent.phone.as_str()),
        ];
        let mut baseline = panel.top() + 13.0;
        for (label, value) in rows {
            let label_text = format!("{}:", label);
            match direction {
                Direction::Ltr => {
                    text_line(
                        canvas,
                        fonts,
                        &label_text,
                        panel.left() + 8.0,
                        baseline,
                        FontStyle::Bold,
                        BODY_SIZE,
                        HEADING_BLUE,
                        Align::Left,
                    );
                    text_line(
                        canvas,
                        fonts,
                        value,
                        panel.left() + 45.0,
                        baseline,
                        FontStyle::Regular,
                        BODY_SIZE,
                        BODY_GRAY,
                        Align::Left,
                    );
                }
                Direction::Rtl => {
                    text_line(
                        canvas,
                        fonts,
                        &label_text,
                        panel.right() - 8.0,
                        baseline,
                        FontStyle::Bold,
                        BODY_SIZE,
                        HEADING_BLUE,
                        Align::Right,
                    );
                    text_line(
                        canvas,
                        fonts,
                        value,
                        panel.right() - 45.0,
                        baseline,
                        FontStyle::Regular,
                        BODY_SIZE,
                        BODY_GRAY,
                        Align::Right,
                    );
                }
            }
            baseline += 13.0;
        }

        text_line(
            canvas,
            fonts,
            copy.thank_you,
            PAGE_WIDTH / 2.0,
            245.0,
            FontStyle::Oblique,
            12.0,
            MUTED_GRAY,
            Align::Center,
        );
        diamond_row(canvas, 255.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> BrochureRenderer {
        BrochureRenderer::with_fonts(FontSet::empty(), None).unwrap()
    }

    fn property_without_images() -> PropertyRecord {
        serde_json::from_value(json!({
            "title": "Skyline Loft",
            "description": "Open-plan loft over the marina.",
            "price": 550000.0,
            "currency": "Dollar",
            "address": "12 Marina Walk",
            "city": "Dubai",
            "amenities": ["Pool", "Gym", "Sauna", "Parking", "Concierge"],
            "agentInfo": {"name": "Lina Haddad", "email": "lina@agency.example", "phone": "+971 50 000 0000"},
            "aiContent": {
                "englishDescription": "Open-plan loft over the marina.",
                "arabicDescription": "شقة مفتوحة تطل على المرسى",
                "keyHighlights": ["• Marina view", "- Floor-to-ceiling glass"]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_no_images_renders_four_pages() {
        let bytes = renderer()
            .render(&property_without_images(), Language::English)
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(text.contains("/Count 4"));
        // Cover degraded to the placeholder instead of failing
        assert!(text.contains("(Image not available"));
    }

    #[test]
    fn test_arabic_variant_is_four_pages() {
        let bytes = renderer()
            .render(&property_without_images(), Language::Arabic)
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 4"));
    }

    #[test]
    fn test_combined_variant_is_five_pages() {
        let bytes = renderer()
            .render_combined(&property_without_images())
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 5"));
    }

    #[test]
    fn test_page_numbers_in_order() {
        let bytes = renderer()
            .render(&property_without_images(), Language::English)
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let positions: Vec<usize> = (1..=4)
            .map(|n| text.find(&format!("({}) Tj", n)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unreachable_images_degrade_to_placeholders() {
        let mut property = property_without_images();
        property.image_urls = vec![
            "http://127.0.0.1:1/hero.jpg".to_string(),
            "http://127.0.0.1:1/second.jpg".to_string(),
        ];
        let bytes = renderer().render(&property, Language::English).unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();
        assert!(text.contains("/Count 4"));
        assert!(text.contains("(Image not available"));
    }
}
