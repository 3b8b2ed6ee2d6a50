//! Unicode utilities for PDF text rendering
//!
//! Provides Arabic-script detection (used for font selection and the
//! mojibake heuristic) and conversion from Unicode to WinAnsiEncoding
//! bytes for the built-in Type1 fonts.

/// Check if text contains any codepoint in the Arabic block (U+0600-U+06FF)
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|ch| ('\u{0600}'..='\u{06FF}').contains(&ch))
}

/// Convert a Unicode string to WinAnsiEncoding bytes for the built-in fonts.
///
/// WinAnsiEncoding is Latin-1 with the 0x80-0x9F range reassigned to
/// typographic characters (curly quotes, dashes, bullet, euro). Characters
/// outside the encoding are replaced with '?', so Arabic text rendered
/// through a built-in font degrades visibly but never corrupts the stream.
pub fn unicode_to_winansi(text: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let byte = match ch {
            ch if (ch as u32) <= 0x7F => ch as u8,

            // 0x80-0x9F block specific to WinAnsi
            '\u{20AC}' => 0x80, // euro sign
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85, // horizontal ellipsis
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91, // left single quotation mark
            '\u{2019}' => 0x92, // right single quotation mark
            '\u{201C}' => 0x93, // left double quotation mark
            '\u{201D}' => 0x94, // right double quotation mark
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en dash
            '\u{2014}' => 0x97, // em dash
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99, // trade mark sign
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,

            // 0xA0-0xFF matches Latin-1 directly
            ch if (0xA0..=0xFF).contains(&(ch as u32)) => ch as u32 as u8,

            _ => b'?',
        };

        result.push(byte);
    }

    result
}
