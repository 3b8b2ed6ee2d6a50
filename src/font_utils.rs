//! TrueType loading and Type0 (CIDFontType2) embedding
//!
//! Fonts are embedded whole with Identity-H encoding: the glyph id doubles
//! as the CID, so text draws as 2-byte big-endian CID strings. The returned
//! map carries each code point's CID together with its advance width so the
//! layout side can measure strings without reparsing the face.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use ttf_parser::Face;

use crate::error::{RendererError, RendererResult};

/// One embeddable glyph: its CID in the Type0 font and its advance width
/// in 1000-unit text space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CidGlyph {
    pub cid: u16,
    pub advance: u16,
}

/// Map from Unicode code point to embedded glyph
pub type CidGlyphMap = HashMap<u32, CidGlyph>;

const DEFAULT_GLYPH_WIDTH: u16 = 500;

/// Load a TTF/OTF file and validate that ttf-parser accepts it
pub fn load_font_file(path: &Path) -> RendererResult<Vec<u8>> {
    if !path.exists() {
        return Err(RendererError::FontError(format!(
            "font file not found: {}",
            path.display()
        )));
    }

    let mut file = File::open(path)?;
    let mut font_data = Vec::new();
    file.read_to_end(&mut font_data)?;

    Face::parse(&font_data, 0).map_err(|e| {
        RendererError::FontError(format!("invalid font file {}: {}", path.display(), e))
    })?;

    Ok(font_data)
}

/// Embed a TrueType font as a Type0/CIDFontType2 structure.
///
/// Writes the FontDescriptor, CIDFont, CIDToGIDMap stream, font file stream,
/// ToUnicode CMap and the Type0 font object itself under `font_id`, taking
/// the auxiliary object ids from `next_ref_id`.
pub fn add_truetype_font(
    pdf: &mut Pdf,
    font_data: &[u8],
    font_id: Ref,
    next_ref_id: &mut i32,
) -> RendererResult<CidGlyphMap> {
    let face = Face::parse(font_data, 0)
        .map_err(|e| RendererError::FontError(format!("invalid font data: {}", e)))?;

    let units_per_em = face.units_per_em();
    let scale = 1000.0 / units_per_em as f32;
    let pdf_ascender = (face.ascender() as f32 * scale) as i32;
    let pdf_descender = (face.descender() as f32 * scale) as i32;

    let bbox = face.global_bounding_box();
    let pdf_bbox = [
        (bbox.x_min as f32 * scale) as i32,
        (bbox.y_min as f32 * scale) as i32,
        (bbox.x_max as f32 * scale) as i32,
        (bbox.y_max as f32 * scale) as i32,
    ];

    let font_family = face
        .names()
        .into_iter()
        .find(|name| name.name_id == 1)
        .and_then(|name| name.to_string())
        .unwrap_or_else(|| format!("Font{}", font_id.get()));

    // Build Unicode -> glyph mapping from the font's cmap table. With
    // Identity-H the GID is used directly as the CID.
    let mut glyph_map: CidGlyphMap = HashMap::new();
    let mut cid_to_gid_map: Vec<u16> = Vec::new();
    let mut cid_widths: BTreeMap<u16, i32> = BTreeMap::new();

    for code_point in 0x0000u32..=0xFFFFu32 {
        let Some(ch) = char::from_u32(code_point) else {
            continue;
        };
        let Some(glyph_id) = face.glyph_index(ch) else {
            continue;
        };
        let gid = glyph_id.0;
        let cid = gid;

        let advance = face
            .glyph_hor_advance(glyph_id)
            .map(|adv| (adv as f32 * scale).round() as u16)
            .unwrap_or(DEFAULT_GLYPH_WIDTH);

        glyph_map
            .entry(code_point)
            .or_insert(CidGlyph { cid, advance });

        if cid_to_gid_map.len() <= cid as usize {
            cid_to_gid_map.resize(cid as usize + 1, 0u16);
        }
        cid_to_gid_map[cid as usize] = gid;
        cid_widths.entry(cid).or_insert(advance as i32);
    }

    if glyph_map.is_empty() {
        return Err(RendererError::FontError(
            "font provides no Unicode glyphs in the BMP range".to_string(),
        ));
    }

    let font_descriptor_id = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    let cid_font_id = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    let cid_to_gid_map_id = Ref::new(*next_ref_id);
    *next_ref_id += 1;

    // CIDToGIDMap stream: array of 2-byte big-endian GIDs indexed by CID
    let mut cid_to_gid_bytes = Vec::with_capacity(cid_to_gid_map.len() * 2);
    for gid in &cid_to_gid_map {
        cid_to_gid_bytes.push((gid >> 8) as u8);
        cid_to_gid_bytes.push((gid & 0xFF) as u8);
    }
    pdf.stream(cid_to_gid_map_id, &cid_to_gid_bytes);

    let font_file_id = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    pdf.stream(font_file_id, font_data)
        .pair(Name(b"Length1"), font_data.len() as i32);

    let to_unicode_id = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    pdf.stream(to_unicode_id, build_to_unicode_cmap(&glyph_map).as_bytes());

    let base_font_name = font_family.replace(' ', "#20");
    let base_font_static: &'static str = Box::leak(base_font_name.into_boxed_str());
    let base_font = Name(base_font_static.as_bytes());

    {
        let mut font_descriptor = pdf.font_descriptor(font_descriptor_id);
        font_descriptor
            .name(base_font)
            .flags(FontFlags::SYMBOLIC)
            .bbox(Rect::new(
                pdf_bbox[0] as f32,
                pdf_bbox[1] as f32,
                pdf_bbox[2] as f32,
                pdf_bbox[3] as f32,
            ))
            .italic_angle(0.0)
            .ascent(pdf_ascender as f32)
            .descent(pdf_descender as f32)
            .cap_height(pdf_ascender as f32)
            .stem_v(80.0)
            .font_file2(font_file_id);
    }

    {
        let mut cid_font = pdf.cid_font(cid_font_id);
        cid_font
            .subtype(CidFontType::Type2)
            .base_font(base_font)
            .system_info(SystemInfo {
                registry: Str(b"Adobe"),
                ordering: Str(b"Identity"),
                supplement: 0,
            })
            .font_descriptor(font_descriptor_id)
            .default_width(DEFAULT_GLYPH_WIDTH as f32)
            .cid_to_gid_map_stream(cid_to_gid_map_id);

        // Emit widths as consecutive runs
        let mut widths_writer = cid_font.widths();
        let mut cid_iter = cid_widths.into_iter().peekable();
        while let Some((start_cid, start_width)) = cid_iter.next() {
            let mut widths = vec![start_width];
            let mut last_cid = start_cid;
            while let Some((next_cid, next_width)) = cid_iter.peek() {
                if *next_cid == last_cid + 1 {
                    widths.push(*next_width);
                    last_cid = *next_cid;
                    cid_iter.next();
                } else {
                    break;
                }
            }
            widths_writer.consecutive(start_cid, widths.iter().map(|w| *w as f32));
        }
    }

    {
        let mut type0_font = pdf.type0_font(font_id);
        type0_font
            .base_font(base_font)
            .encoding_predefined(Name(b"Identity-H"))
            .descendant_font(cid_font_id)
            .to_unicode(to_unicode_id);
    }

    Ok(glyph_map)
}

/// ToUnicode CMap mapping each CID back to its code point, in beginbfchar
/// blocks of at most 100 entries
fn build_to_unicode_cmap(glyph_map: &CidGlyphMap) -> String {
    let mut cid_unicode_pairs: Vec<(u16, u32)> = glyph_map
        .iter()
        .map(|(&unicode, glyph)| (glyph.cid, unicode))
        .collect();
    cid_unicode_pairs.sort_by_key(|&(cid, _)| cid);

    let mut sections = String::new();
    for chunk in cid_unicode_pairs.chunks(100) {
        sections.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (cid, unicode) in chunk {
            sections.push_str(&format!("<{:04X}> <{:04X}>\n", cid, unicode));
        }
        sections.push_str("endbfchar\n");
    }

    format!(
        "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
   /Ordering (Identity)
   /Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapVersion 1.0 def
/CMapType 1 def
/WMode 0 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
{}
endcmap
CMapName currentdict /CMap defineresource pop
end
end",
        sections
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_file_is_an_error() {
        let result = load_font_file(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(RendererError::FontError(_))));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let mut pdf = Pdf::new();
        let mut next_ref = 100;
        let result = add_truetype_font(&mut pdf, b"not a font", Ref::new(99), &mut next_ref);
        assert!(result.is_err());
        // No auxiliary ids consumed on early validation failure
        assert_eq!(next_ref, 100);
    }

    #[test]
    fn test_to_unicode_cmap_shape() {
        let mut glyph_map = CidGlyphMap::new();
        glyph_map.insert('A' as u32, CidGlyph { cid: 36, advance: 600 });
        glyph_map.insert('B' as u32, CidGlyph { cid: 37, advance: 620 });
        let cmap = build_to_unicode_cmap(&glyph_map);
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0024> <0041>"));
        assert!(cmap.contains("<0025> <0042>"));
        assert!(cmap.starts_with("/CIDInit"));
        assert!(cmap.contains("endcmap"));
    }
}
