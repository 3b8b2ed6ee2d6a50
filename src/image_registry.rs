//! Registry of image XObjects embedded in the document
//!
//! Keys combine the URL tail with the placement position, so the same
//! photo reused at the same spot on several pages (the logo, in practice)
//! embeds once. Every registered image is written into each page's
//! resource dictionary.

use std::collections::HashMap;

use pdf_writer::writers::Resources;
use pdf_writer::{Name, Pdf, Ref};

use crate::error::RendererResult;
use crate::fetch::ImageFetcher;
use crate::image_utils::{add_image_to_pdf, decode_image, DecodedImage, ImageKind};

/// An embedded image: object id, resource name and pixel dimensions.
/// Degraded images (raw JPEG streams the decoder rejected) are drawn
/// filling their whole target box instead of aspect-fitting.
#[derive(Debug, Clone, Copy)]
pub struct PlacedImage {
    pub id: Ref,
    pub name: Name<'static>,
    pub width: u32,
    pub height: u32,
    pub degraded: bool,
}

pub struct ImageRegistry {
    next_ref_id: i32,
    images: HashMap<String, PlacedImage>,
}

impl ImageRegistry {
    pub fn new(start_ref: i32) -> Self {
        Self {
            next_ref_id: start_ref,
            images: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<PlacedImage> {
        self.images.get(key).copied()
    }

    /// Embed a decoded image under `key` and hand back its placement info
    pub fn create(&mut self, pdf: &mut Pdf, key: &str, decoded: &DecodedImage) -> PlacedImage {
        let id = Ref::new(self.next_ref_id);
        self.next_ref_id += 1;
        add_image_to_pdf(pdf, decoded, id, &mut self.next_ref_id);

        let name_static: &'static str = Box::leak(format!("I{}", id.get()).into_boxed_str());
        let placed = PlacedImage {
            id,
            name: Name(name_static.as_bytes()),
            width: decoded.width,
            height: decoded.height,
            degraded: matches!(decoded.kind, ImageKind::RawJpeg { .. }),
        };
        self.images.insert(key.to_string(), placed);
        placed
    }

    /// Cached fetch-decode-embed. Errors bubble up for the caller to turn
    /// into a placeholder.
    pub fn get_or_create(
        &mut self,
        pdf: &mut Pdf,
        key: &str,
        fetcher: &ImageFetcher,
        url: &str,
    ) -> RendererResult<PlacedImage> {
        if let Some(placed) = self.get(key) {
            log::debug!("reusing embedded image {} for {}", key, url);
            return Ok(placed);
        }
        let fetched = fetcher.fetch(url)?;
        let decoded = decode_image(&fetched.bytes, fetched.content_type.as_deref())?;
        Ok(self.create(pdf, key, &decoded))
    }

    /// Write all embedded images into a page's /XObject resource dictionary
    pub fn write_resources(&self, resources: &mut Resources) {
        if self.images.is_empty() {
            return;
        }
        let mut dict = resources.x_objects();
        for placed in self.images.values() {
            dict.pair(placed.name, placed.id);
        }
    }
}

/// Cache key for an image placed at a position, from the URL tail plus the
/// placement coordinates
pub fn image_key(url: &str, x: f64, y: f64) -> String {
    let chars: Vec<char> = url.chars().collect();
    let start = chars.len().saturating_sub(20);
    let tail: String = chars[start..].iter().collect();
    format!("img_{}_{:.0}_{:.0}", tail, x, y)
}
