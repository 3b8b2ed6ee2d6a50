//! Registry of the fonts available to a document
//!
//! Three builtin Type1 faces (F1 regular, F2 bold, F3 oblique) are always
//! present. An embedded Latin body face (F4) and an Arabic face (F5) are
//! added when font bytes were resolved at startup. Each font carries its
//! encoding so the canvas knows how to turn a string into show-text bytes.

use std::sync::Arc;

use pdf_writer::{Dict, Name, Pdf, Ref};

use crate::font_utils::{add_truetype_font, CidGlyphMap};
use crate::unicode_utils::contains_arabic;

/// How strings are encoded for a font's show-text operator
#[derive(Clone)]
pub enum FontEncoding {
    /// Single-byte WinAnsi for the builtin Type1 faces
    WinAnsi,
    /// Two-byte CIDs via Identity-H, with the code point -> glyph map
    Cid(Arc<CidGlyphMap>),
}

/// Weight/slant variants of the builtin family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

/// A font registered in the document, ready to reference from content streams
#[derive(Clone)]
pub struct RegisteredFont {
    pub id: Ref,
    pub name: Name<'static>,
    pub encoding: FontEncoding,
}

pub struct FontRegistry {
    regular: RegisteredFont,
    bold: RegisteredFont,
    oblique: RegisteredFont,
    body: Option<RegisteredFont>,
    arabic: Option<RegisteredFont>,
}

impl FontRegistry {
    /// Register the builtin family and embed whatever font bytes were
    /// resolved. Embedding failures degrade to the builtins with a warning.
    pub fn new(
        pdf: &mut Pdf,
        start_ref: i32,
        body_font: Option<&[u8]>,
        arabic_font: Option<&[u8]>,
    ) -> Self {
        let mut next_ref_id = start_ref;

        let regular = register_builtin(pdf, &mut next_ref_id, Name(b"F1"), Name(b"Helvetica"));
        let bold = register_builtin(pdf, &mut next_ref_id, Name(b"F2"), Name(b"Helvetica-Bold"));
        let oblique =
            register_builtin(pdf, &mut next_ref_id, Name(b"F3"), Name(b"Helvetica-Oblique"));

        let body =
            body_font.and_then(|data| embed(pdf, &mut next_ref_id, data, Name(b"F4"), "body"));
        let arabic =
            arabic_font.and_then(|data| embed(pdf, &mut next_ref_id, data, Name(b"F5"), "arabic"));

        Self {
            regular,
            bold,
            oblique,
            body,
            arabic,
        }
    }

    pub fn builtin(&self, style: FontStyle) -> &RegisteredFont {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Oblique => &self.oblique,
        }
    }

    pub fn has_arabic(&self) -> bool {
        self.arabic.is_some()
    }

    /// Pick the font for a run of text.
    ///
    /// Arabic text takes the embedded Arabic face regardless of style;
    /// without one it degrades to the builtin (which draws question marks).
    /// Latin regular text prefers the embedded body face, then the Arabic
    /// face, then the builtin. Bold and oblique always use the builtin
    /// variants since only one weight of each face is embedded.
    pub fn resolve_for_text(&self, text: &str, style: FontStyle) -> &RegisteredFont {
        if contains_arabic(text) {
            if let Some(arabic) = &self.arabic {
                return arabic;
            }
            log::warn!("Arabic text with no Arabic font resolved, output will degrade");
            return self.builtin(style);
        }
        if style == FontStyle::Regular {
            if let Some(body) = &self.body {
                return body;
            }
            if let Some(arabic) = &self.arabic {
                return arabic;
            }
        }
        self.builtin(style)
    }

    /// Write every registered font into a page's /Font resource dictionary
    pub fn write_resources(&self, fonts: &mut Dict) {
        for font in [&self.regular, &self.bold, &self.oblique] {
            fonts.pair(font.name, font.id);
        }
        for font in [&self.body, &self.arabic].into_iter().flatten() {
            fonts.pair(font.name, font.id);
        }
    }
}

fn register_builtin(
    pdf: &mut Pdf,
    next_ref_id: &mut i32,
    name: Name<'static>,
    base_font: Name<'static>,
) -> RegisteredFont {
    let id = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    pdf.type1_font(id)
        .base_font(base_font)
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    RegisteredFont {
        id,
        name,
        encoding: FontEncoding::WinAnsi,
    }
}

fn embed(
    pdf: &mut Pdf,
    next_ref_id: &mut i32,
    data: &[u8],
    name: Name<'static>,
    role: &str,
) -> Option<RegisteredFont> {
    let id = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    match add_truetype_font(pdf, data, id, next_ref_id) {
        Ok(glyph_map) => Some(RegisteredFont {
            id,
            name,
            encoding: FontEncoding::Cid(Arc::new(glyph_map)),
        }),
        Err(e) => {
            log::warn!("failed to embed {} font, using builtins: {}", role, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_only() -> (Pdf, FontRegistry) {
        let mut pdf = Pdf::new();
        let registry = FontRegistry::new(&mut pdf, 1000, None, None);
        (pdf, registry)
    }

    #[test]
    fn test_builtin_names_are_fixed() {
        let (_, registry) = builtin_only();
        assert_eq!(registry.builtin(FontStyle::Regular).name, Name(b"F1"));
        assert_eq!(registry.builtin(FontStyle::Bold).name, Name(b"F2"));
        assert_eq!(registry.builtin(FontStyle::Oblique).name, Name(b"F3"));
    }

    #[test]
    fn test_arabic_without_font_falls_back() {
        let (_, registry) = builtin_only();
        let font = registry.resolve_for_text("مرحبا", FontStyle::Regular);
        assert_eq!(font.name, Name(b"F1"));
        assert!(matches!(font.encoding, FontEncoding::WinAnsi));
    }

    #[test]
    fn test_latin_regular_uses_builtin_without_body_font() {
        let (_, registry) = builtin_only();
        let font = registry.resolve_for_text("Hello", FontStyle::Regular);
        assert_eq!(font.name, Name(b"F1"));
    }

    #[test]
    fn test_latin_regular_borrows_arabic_font_when_body_absent() {
        use crate::font_utils::CidGlyphMap;
        use std::sync::Arc;

        let (_, mut registry) = builtin_only();
        registry.arabic = Some(RegisteredFont {
            id: Ref::new(1100),
            name: Name(b"F5"),
            encoding: FontEncoding::Cid(Arc::new(CidGlyphMap::new())),
        });
        let font = registry.resolve_for_text("Hello", FontStyle::Regular);
        assert_eq!(font.name, Name(b"F5"));
        // Bold stays on the builtin variant
        let bold = registry.resolve_for_text("Hello", FontStyle::Bold);
        assert_eq!(bold.name, Name(b"F2"));
    }

    #[test]
    fn test_invalid_embedded_bytes_degrade() {
        let mut pdf = Pdf::new();
        let registry = FontRegistry::new(&mut pdf, 1000, Some(b"junk"), Some(b"junk"));
        assert!(!registry.has_arabic());
        let font = registry.resolve_for_text("Hello", FontStyle::Regular);
        assert_eq!(font.name, Name(b"F1"));
    }
}
