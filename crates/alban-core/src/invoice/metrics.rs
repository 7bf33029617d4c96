//! Embedded invoice fonts and their text metrics.
//!
//! The PDF surface embeds DejaVu Sans so product names outside WinAnsi
//! (accented French, Spanish, Arabic letters) render as typed. Widths come
//! from the same font files through `ttf-parser`, so what truncation
//! measures is what the PDF draws.

use std::sync::OnceLock;

use ttf_parser::{Face, GlyphId};

/// DejaVu Sans, regular weight.
pub static REGULAR_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// DejaVu Sans, bold weight.
pub static BOLD_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

static REGULAR_FACE: OnceLock<Option<Face<'static>>> = OnceLock::new();
static BOLD_FACE: OnceLock<Option<Face<'static>>> = OnceLock::new();

/// Advance used if the embedded font cannot be parsed, in em units.
const FALLBACK_ADVANCE_EM: f32 = 0.55;

/// Font file for a weight.
pub fn font_bytes(bold: bool) -> &'static [u8] {
    if bold {
        BOLD_FONT
    } else {
        REGULAR_FONT
    }
}

fn face(bold: bool) -> Option<&'static Face<'static>> {
    let cell = if bold { &BOLD_FACE } else { &REGULAR_FACE };
    cell.get_or_init(|| Face::parse(font_bytes(bold), 0).ok())
        .as_ref()
}

/// Width of `text` in points at `size`.
///
/// Characters without a glyph are measured as the font's `.notdef` box,
/// which is what the PDF viewer draws for them.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let Some(face) = face(bold) else {
        return text.chars().count() as f32 * FALLBACK_ADVANCE_EM * size;
    };

    let units_per_em = face.units_per_em() as f32;
    if units_per_em <= 0.0 {
        return 0.0;
    }

    let notdef = face.glyph_hor_advance(GlyphId(0)).unwrap_or(0) as u32;
    let units: u32 = text
        .chars()
        .map(|c| {
            face.glyph_index(c)
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(u32::from)
                .unwrap_or(notdef)
        })
        .sum();

    units as f32 / units_per_em * size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_fonts_parse() {
        assert!(face(false).is_some());
        assert!(face(true).is_some());
    }

    #[test]
    fn test_width_scales_with_size_and_weight() {
        let small = text_width("Total", 10.0, false);
        let large = text_width("Total", 20.0, false);
        assert!((large - 2.0 * small).abs() < 1e-3);
        assert!(text_width("Total", 12.0, true) > text_width("Total", 12.0, false));
        assert_eq!(text_width("", 12.0, false), 0.0);
    }

    #[test]
    fn test_accented_letters_have_their_own_widths() {
        // Both are real glyphs; 'É' is as wide as 'E', 'i' is much narrower
        let e = text_width("E", 12.0, false);
        assert!((text_width("É", 12.0, false) - e).abs() < 1e-3);
        assert!(text_width("ï", 12.0, false) < e);
        assert!(text_width("ñ", 12.0, false) > 0.0);
    }

    #[test]
    fn test_arabic_letters_are_measured() {
        let width = text_width("حليب", 12.0, false);
        assert!(width > 0.0);
    }
}
