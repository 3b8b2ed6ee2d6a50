//! Image decoding and XObject embedding
//!
//! Downloaded bytes are decoded with the format hint from the Content-Type
//! header first, then by sniffing. Fully decoded images embed as raw RGB
//! samples with an optional DeviceGray soft mask for alpha. JPEGs the
//! decoder rejects still embed when their header parses: the original
//! bytes go in unchanged behind a DCTDecode filter.

use std::io::Cursor;

use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageFormat};
use pdf_writer::{Filter, Pdf, Ref};

use crate::error::{RendererError, RendererResult};

/// Pixel payload of a decoded image
pub enum ImageKind {
    /// 8-bit RGB samples, with an 8-bit alpha plane when the source had one
    Pixels { rgb: Vec<u8>, smask: Option<Vec<u8>> },
    /// Untouched JPEG bytes to embed behind DCTDecode
    RawJpeg { data: Vec<u8>, gray: bool },
}

/// An image ready to embed, with its pixel dimensions
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub kind: ImageKind,
}

/// Decode downloaded image bytes.
///
/// A failed decode of a structurally valid JPEG falls back to embedding
/// the raw stream, so progressive and unusually encoded JPEGs still render.
pub fn decode_image(data: &[u8], content_type: Option<&str>) -> RendererResult<DecodedImage> {
    match decode_pixels(data, content_type) {
        Ok(image) => Ok(split_channels(image)),
        Err(decode_err) => {
            if let Some(raw) = probe_jpeg(data)? {
                log::debug!("decoder rejected JPEG, embedding raw stream: {}", decode_err);
                return Ok(raw);
            }
            Err(decode_err)
        }
    }
}

fn decode_pixels(data: &[u8], content_type: Option<&str>) -> RendererResult<DynamicImage> {
    let mut reader = ImageReader::new(Cursor::new(data));
    if let Some(fmt) = content_type.and_then(image_format_from_mime) {
        reader.set_format(fmt);
    }
    let reader = reader
        .with_guessed_format()
        .map_err(|e| RendererError::ImageError(format!("failed to detect image format: {}", e)))?;
    reader
        .decode()
        .map_err(|e| RendererError::ImageError(format!("failed to decode image: {}", e)))
}

fn image_format_from_mime(mime_type: &str) -> Option<ImageFormat> {
    // Parameters like "; charset" never appear on image types we accept
    match mime_type.split(';').next().unwrap_or(mime_type).trim() {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/gif" => Some(ImageFormat::Gif),
        "image/webp" => Some(ImageFormat::WebP),
        "image/bmp" => Some(ImageFormat::Bmp),
        _ => None,
    }
}

fn split_channels(image: DynamicImage) -> DecodedImage {
    let has_alpha = image.color().has_alpha();
    if has_alpha {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let bytes = rgba.into_raw();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for chunk in bytes.chunks_exact(4) {
            rgb.push(chunk[0]);
            rgb.push(chunk[1]);
            rgb.push(chunk[2]);
            alpha.push(chunk[3]);
        }
        // Fully opaque masks are dead weight
        let smask = if alpha.iter().any(|&a| a != 0xFF) {
            Some(alpha)
        } else {
            None
        };
        DecodedImage {
            width,
            height,
            kind: ImageKind::Pixels { rgb, smask },
        }
    } else {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        DecodedImage {
            width,
            height,
            kind: ImageKind::Pixels {
                rgb: rgb.into_raw(),
                smask: None,
            },
        }
    }
}

/// Parse just the JPEG header for dimensions and pixel format
fn probe_jpeg(data: &[u8]) -> RendererResult<Option<DecodedImage>> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Ok(None);
    }
    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(data));
    if decoder.read_info().is_err() {
        return Ok(None);
    }
    let Some(info) = decoder.info() else {
        return Ok(None);
    };
    let gray = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => true,
        jpeg_decoder::PixelFormat::RGB24 => false,
        other => {
            return Err(RendererError::ImageError(format!(
                "unsupported JPEG pixel format {:?}",
                other
            )))
        }
    };
    Ok(Some(DecodedImage {
        width: info.width as u32,
        height: info.height as u32,
        kind: ImageKind::RawJpeg {
            data: data.to_vec(),
            gray,
        },
    }))
}

/// Write the XObject (and soft mask, when present) for a decoded image
pub fn add_image_to_pdf(
    pdf: &mut Pdf,
    image: &DecodedImage,
    image_id: Ref,
    next_ref_id: &mut i32,
) {
    match &image.kind {
        ImageKind::Pixels { rgb, smask } => {
            let mut smask_id = None;
            if let Some(alpha) = smask {
                let id = Ref::new(*next_ref_id);
                *next_ref_id += 1;
                let mut mask = pdf.image_xobject(id, alpha);
                mask.width(image.width as i32);
                mask.height(image.height as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                drop(mask);
                smask_id = Some(id);
            }
            let mut xobject = pdf.image_xobject(image_id, rgb);
            xobject.width(image.width as i32);
            xobject.height(image.height as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
            if let Some(id) = smask_id {
                xobject.s_mask(id);
            }
        }
        ImageKind::RawJpeg { data, gray } => {
            let mut xobject = pdf.image_xobject(image_id, data);
            xobject.filter(Filter::DctDecode);
            xobject.width(image.width as i32);
            xobject.height(image.height as i32);
            if *gray {
                xobject.color_space().device_gray();
            } else {
                xobject.color_space().device_rgb();
            }
            xobject.bits_per_component(8);
        }
    }
}

/// Fit an image of `img_w` x `img_h` pixels into a box, preserving aspect
/// ratio and centering. Returns (offset_x, offset_y, width, height) in the
/// box's units.
pub fn aspect_fit(img_w: u32, img_h: u32, box_w: f64, box_h: f64) -> (f64, f64, f64, f64) {
    if img_w == 0 || img_h == 0 {
        return (0.0, 0.0, box_w, box_h);
    }
    let scale = (box_w / img_w as f64).min(box_h / img_h as f64);
    let draw_w = img_w as f64 * scale;
    let draw_h = img_h as f64 * scale;
    let offset_x = (box_w - draw_w) / 2.0;
    let offset_y = (box_h - draw_h) / 2.0;
    (offset_x, offset_y, draw_w, draw_h)
}
