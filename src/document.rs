//! Document assembly: catalog, page tree and the open-page lifecycle
//!
//! One page is always open for drawing. Starting the next page finalizes
//! the previous one: its content stream is written, then the page object
//! with media box, parent and resources. Object ids are partitioned by
//! range so fonts and images never collide with page objects: document
//! objects count up from 3, fonts from 1000, images from 2000.

use pdf_writer::{Finish, Pdf, Ref};

use crate::canvas::PdfCanvas;
use crate::config::FontSet;
use crate::error::RendererResult;
use crate::fetch::ImageFetcher;
use crate::font_registry::FontRegistry;
use crate::image_registry::{ImageRegistry, PlacedImage};
use crate::layout::{MM_TO_PT, PAGE_HEIGHT, PAGE_WIDTH};

const DOC_REF_START: i32 = 3;
const FONT_REF_START: i32 = 1000;
const IMAGE_REF_START: i32 = 2000;

struct OpenPage {
    page_id: Ref,
    content_id: Ref,
    canvas: PdfCanvas,
}

pub struct BrochureDocument {
    pdf: Pdf,
    page_tree_id: Ref,
    next_ref_id: i32,
    pages: Vec<Ref>,
    current: OpenPage,
    fonts: FontRegistry,
    images: ImageRegistry,
}

impl BrochureDocument {
    /// Create a document with its first page open
    pub fn new(font_set: &FontSet) -> Self {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        pdf.catalog(catalog_id).pages(page_tree_id);

        let fonts = FontRegistry::new(
            &mut pdf,
            FONT_REF_START,
            font_set.body.as_deref(),
            font_set.arabic.as_deref(),
        );
        let images = ImageRegistry::new(IMAGE_REF_START);

        let mut next_ref_id = DOC_REF_START;
        let mut pages = Vec::new();
        let current = alloc_page(&mut next_ref_id, &mut pages);

        Self {
            pdf,
            page_tree_id,
            next_ref_id,
            pages,
            current,
            fonts,
            images,
        }
    }

    /// Drawing surface of the open page
    pub fn canvas(&mut self) -> &mut PdfCanvas {
        &mut self.current.canvas
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Canvas and font registry together; the borrows are disjoint so a
    /// drawing call can measure and draw in one expression
    pub fn canvas_and_fonts(&mut self) -> (&mut PdfCanvas, &FontRegistry) {
        (&mut self.current.canvas, &self.fonts)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Fetch, decode and embed an image, reusing a previous embedding when
    /// the key matches
    pub fn embed_image(
        &mut self,
        key: &str,
        fetcher: &ImageFetcher,
        url: &str,
    ) -> RendererResult<PlacedImage> {
        self.images.get_or_create(&mut self.pdf, key, fetcher, url)
    }

    /// Finalize the open page and start a fresh one
    pub fn new_page(&mut self) {
        let next = alloc_page(&mut self.next_ref_id, &mut self.pages);
        let prev = std::mem::replace(&mut self.current, next);
        finalize_page(&mut self.pdf, self.page_tree_id, &self.fonts, &self.images, prev);
    }

    /// Finalize the last page, write the page tree and serialize
    pub fn finish(self) -> Vec<u8> {
        let Self {
            mut pdf,
            page_tree_id,
            pages,
            current,
            fonts,
            images,
            ..
        } = self;

        finalize_page(&mut pdf, page_tree_id, &fonts, &images, current);

        let mut page_tree = pdf.pages(page_tree_id);
        page_tree.kids(pages.iter().copied());
        page_tree.count(pages.len() as i32);
        page_tree.finish();

        pdf.finish()
    }
}

fn alloc_page(next_ref_id: &mut i32, pages: &mut Vec<Ref>) -> OpenPage {
    let page_id = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    let content_id = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    pages.push(page_id);
    OpenPage {
        page_id,
        content_id,
        canvas: PdfCanvas::new(),
    }
}

fn finalize_page(
    pdf: &mut Pdf,
    page_tree_id: Ref,
    fonts: &FontRegistry,
    images: &ImageRegistry,
    page: OpenPage,
) {
    let content_bytes = page.canvas.finish();
    pdf.stream(page.content_id, &content_bytes);

    let mut page_obj = pdf.page(page.page_id);
    page_obj.media_box(pdf_writer::Rect::new(
        0.0,
        0.0,
        (PAGE_WIDTH * MM_TO_PT) as f32,
        (PAGE_HEIGHT * MM_TO_PT) as f32,
    ));
    page_obj.parent(page_tree_id);
    page_obj.contents(page.content_id);

    {
        let mut resources = page_obj.resources();
        {
            let mut font_dict = resources.fonts();
            fonts.write_resources(&mut font_dict);
        }
        images.write_resources(&mut resources);
    }

    page_obj.finish();
}
