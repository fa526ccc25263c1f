//! Glyph cell building shared by the BDF and PCF readers.
//!
//! Both formats store each glyph as a tight "black box" of ink positioned
//! relative to the baseline. Every glyph is turned into a cell as wide as
//! its advance and as tall as the font's line height, with the ink placed
//! on a common baseline.

use std::collections::BTreeMap;

use fontknife_font::{BoundingBox, GlyphBitmap, RasterFont, RasterFontBuilder};
use tracing::warn;

use crate::options::LoadOptions;

/// Highest code point in the default glyph table.
const DEFAULT_TABLE_LAST: u32 = 255;

/// A glyph as stored by a bitmap font format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapGlyph {
    pub code_point: u32,
    /// Horizontal advance in pixels.
    pub advance: i32,
    /// Left edge of the ink box relative to the origin.
    pub x_offset: i32,
    /// Bottom edge of the ink box relative to the baseline, up is positive.
    pub y_offset: i32,
    /// The ink box, `width x height` pixels.
    pub ink: GlyphBitmap,
}

impl BitmapGlyph {
    fn top(&self) -> i32 {
        self.y_offset + self.ink.height() as i32
    }
}

/// Glyphs and properties parsed from a bitmap font file.
#[derive(Debug, Clone, Default)]
pub struct ParsedBitmapFont {
    pub glyphs: Vec<BitmapGlyph>,
    pub properties: Vec<(String, String)>,
}

/// Lay out parsed glyphs as cells and collect them into a [`RasterFont`].
///
/// Without a glyph sequence, every glyph in the 0-255 table is kept in code
/// point order. With one, glyphs are selected by key in sequence order and
/// keys the font lacks are skipped.
pub fn build_raster_font(
    parsed: ParsedBitmapFont,
    options: &LoadOptions,
    format: &'static str,
    origin: &str,
) -> RasterFont {
    let mut by_code: BTreeMap<u32, BitmapGlyph> = BTreeMap::new();
    for glyph in parsed.glyphs {
        by_code.insert(glyph.code_point, glyph);
    }

    let chosen: Vec<(String, &BitmapGlyph)> = match &options.glyph_sequence {
        None => by_code
            .range(0..=DEFAULT_TABLE_LAST)
            .filter_map(|(&code, glyph)| char::from_u32(code).map(|c| (c.to_string(), glyph)))
            .collect(),
        Some(sequence) => sequence
            .iter()
            .filter_map(|key| {
                let glyph = single_code_point(key).and_then(|code| by_code.get(&code));
                if glyph.is_none() {
                    warn!(glyph = %key, format, "glyph not found in font, skipping");
                }
                glyph.map(|g| (key.clone(), g))
            })
            .collect(),
    };

    let baseline = chosen.iter().map(|(_, g)| g.top()).max().unwrap_or(0);
    let bottom = chosen.iter().map(|(_, g)| g.y_offset).min().unwrap_or(0);
    let line_height = (baseline - bottom).max(0) as u32;

    let mut builder: RasterFontBuilder = RasterFont::builder().path(origin);
    for (name, value) in parsed.properties {
        builder = builder.metadata(name, value);
    }

    for (key, glyph) in chosen {
        let width = glyph.advance.max(0) as u32;
        let mut cell = GlyphBitmap::new(width, line_height);
        cell.paste(&glyph.ink, glyph.x_offset, baseline - glyph.top());
        builder = builder.glyph(key, cell, BoundingBox::new(0, 0, width as i32, line_height as i32));
    }

    builder.build()
}

fn single_code_point(key: &str) -> Option<u32> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontknife_font::Size;
    use pretty_assertions::assert_eq;

    fn glyph(code_point: u32, rows: &[&str], x_offset: i32, y_offset: i32) -> BitmapGlyph {
        BitmapGlyph {
            code_point,
            advance: 4,
            x_offset,
            y_offset,
            ink: GlyphBitmap::from_text_rows(rows, 'X'),
        }
    }

    fn parsed() -> ParsedBitmapFont {
        ParsedBitmapFont {
            glyphs: vec![
                // 'g' descends one pixel below the baseline
                glyph('g' as u32, &["XXX", "X.X", "XXX", "..X", "XX."], 0, -1),
                glyph('A' as u32, &[".X.", "X.X", "XXX", "X.X", "X.X"], 0, 0),
                glyph(0x263A, &["X"], 0, 0),
            ],
            properties: vec![("FOUNDRY".to_string(), "Test".to_string())],
        }
    }

    #[test]
    fn test_cells_share_baseline() {
        let font = build_raster_font(parsed(), &LoadOptions::default(), "BDF", "test.bdf");

        // 0x263A is outside the default table
        assert_eq!(font.provided_glyphs(), vec!["A", "g"]);
        assert_eq!(font.max_glyph_size(), Size::new(4, 6));
        assert_eq!(font.metadata().get("FOUNDRY").map(String::as_str), Some("Test"));
        assert_eq!(font.path(), Some("test.bdf"));

        let a = font.get_glyph("A", true).unwrap();
        assert_eq!(
            a.to_text_rows('X', '.'),
            vec![".X..", "X.X.", "XXX.", "X.X.", "X.X.", "...."]
        );
        let g = font.get_glyph("g", true).unwrap();
        assert_eq!(
            g.to_text_rows('X', '.'),
            vec!["....", "XXX.", "X.X.", "XXX.", "..X.", "XX.."]
        );
    }

    #[test]
    fn test_sequence_selects_in_order_and_skips_missing() {
        let options = LoadOptions::default().with_glyph_sequence(vec![
            "\u{263A}".to_string(),
            "z".to_string(),
            "A".to_string(),
        ]);
        let font = build_raster_font(parsed(), &options, "BDF", "test.bdf");
        assert_eq!(font.provided_glyphs(), vec!["\u{263A}", "A"]);
        // Line height only covers the chosen glyphs
        assert_eq!(font.max_glyph_size(), Size::new(4, 5));
    }

    #[test]
    fn test_negative_x_offset_is_clipped() {
        let parsed = ParsedBitmapFont {
            glyphs: vec![glyph('j' as u32, &["XX"], -1, 0)],
            properties: Vec::new(),
        };
        let font = build_raster_font(parsed, &LoadOptions::default(), "BDF", "j.bdf");
        assert_eq!(
            font.get_glyph("j", true).unwrap().to_text_rows('X', '.'),
            vec!["X..."]
        );
    }
}
