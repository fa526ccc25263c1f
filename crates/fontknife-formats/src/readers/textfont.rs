//! Human-editable textfont reader.
//!
//! ```text
//! # Comment lines start with '#'
//! GLYPH: "A"
//! .X.
//! X.X   # trailing comments are allowed on pixel rows
//! XXX
//! X.X
//! ```

use std::sync::OnceLock;

use fontknife_font::{BoundingBox, GlyphBitmap, RasterFont};
use regex::Regex;
use tracing::trace;

use super::FormatReader;
use crate::error::FormatError;
use crate::options::LoadOptions;

/// Maximum width and height of a glyph in a textfont.
pub const MAX_GLYPH_SIZE: u32 = 64;

pub(crate) const INK_CHAR: char = 'X';
pub(crate) const EMPTY_CHAR: char = '.';
pub(crate) const GLYPH_HEADER: &str = "GLYPH:";

fn header_regex() -> Option<&'static Regex> {
    static HEADER: OnceLock<Option<Regex>> = OnceLock::new();
    HEADER
        .get_or_init(|| Regex::new(r#"^GLYPH:\s*(?P<glyph>"(?:[^"\\]|\\.)*")"#).ok())
        .as_ref()
}

/// Reads textfont files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFontReader;

impl FormatReader for TextFontReader {
    fn read(
        &self,
        data: &[u8],
        origin: &str,
        _options: &LoadOptions,
    ) -> Result<RasterFont, FormatError> {
        let text = String::from_utf8_lossy(data);
        let glyphs = parse_textfont(&text, origin)?;

        let mut builder = RasterFont::builder().path(origin);
        for (key, bitmap) in glyphs {
            let bbox = BoundingBox::from_size(bitmap.size());
            builder = builder.glyph(key, bitmap, bbox);
        }
        Ok(builder.build())
    }
}

/// Parse textfont source into `(glyph, bitmap)` pairs in file order.
///
/// Duplicate glyphs are kept; when collected into a font the later one wins.
/// `file` names the source in error messages.
pub fn parse_textfont(text: &str, file: &str) -> Result<Vec<(String, GlyphBitmap)>, FormatError> {
    let error = |line: usize, message: String| FormatError::TextFont {
        file: file.to_string(),
        line,
        message,
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.starts_with('#') && !line.trim().is_empty())
        .peekable();

    let mut glyphs = Vec::new();
    while let Some((line_no, line)) = lines.next() {
        let header = header_regex()
            .and_then(|re| re.captures(line))
            .and_then(|caps| serde_json::from_str::<String>(&caps["glyph"]).ok())
            .ok_or_else(|| error(line_no, "Malformed glyph header".to_string()))?;

        let mut rows: Vec<&str> = Vec::new();
        while let Some(&(row_no, raw)) = lines.peek() {
            if !raw.starts_with([INK_CHAR, EMPTY_CHAR]) {
                break;
            }
            let row = strip_end_comment(raw);
            let width = row.chars().count();

            match rows.first().map(|first| first.chars().count()) {
                None if width > MAX_GLYPH_SIZE as usize => {
                    return Err(error(
                        row_no,
                        format!(
                            "Glyph {:?} exceeds maximum width ({} > {})",
                            header, width, MAX_GLYPH_SIZE
                        ),
                    ));
                }
                Some(expected) if expected != width => {
                    return Err(error(row_no, format!("Glyph: {:?}: Mismatched line length", header)));
                }
                _ => {}
            }
            if rows.len() >= MAX_GLYPH_SIZE as usize {
                return Err(error(
                    row_no,
                    format!(
                        "Glyph {:?} exceeds maximum height ({} > {})",
                        header,
                        rows.len() + 1,
                        MAX_GLYPH_SIZE
                    ),
                ));
            }
            if let Some(bad) = row.chars().find(|&c| c != INK_CHAR && c != EMPTY_CHAR) {
                return Err(error(row_no, format!("Unexpected character: {:?}", bad)));
            }

            rows.push(row);
            lines.next();
        }

        trace!(glyph = %header, line = line_no, rows = rows.len(), "parsed textfont glyph");
        glyphs.push((header, GlyphBitmap::from_text_rows(rows.as_slice(), INK_CHAR)));
    }

    Ok(glyphs)
}

fn strip_end_comment(line: &str) -> &str {
    let line = match line.rfind('#') {
        Some(i) => &line[..i],
        None => line,
    };
    line.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontknife_font::Size;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
# Exported glyphs:
# 'A', 'i'
GLYPH: \"A\" # Raw glyph: \"A\"
.X.
X.X   # middle row
XXX

X.X
GLYPH: \"i\"
X
.
X
GLYPH: \"\\\"\"
X.X
";

    #[test]
    fn test_parse_sample() {
        let glyphs = parse_textfont(SAMPLE, "sample.textfont").unwrap();
        let keys: Vec<&str> = glyphs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["A", "i", "\""]);
        assert_eq!(
            glyphs[0].1.to_text_rows('X', '.'),
            vec![".X.", "X.X", "XXX", "X.X"]
        );
        assert_eq!(glyphs[1].1.size(), Size::new(1, 3));
    }

    #[test]
    fn test_read_font_later_duplicate_wins() {
        let text = "GLYPH: \"a\"\nX.\nGLYPH: \"a\"\n.X\n";
        let font = TextFontReader
            .read(text.as_bytes(), "dup.textfont", &LoadOptions::default())
            .unwrap();
        assert_eq!(font.len(), 1);
        assert_eq!(
            font.get_glyph("a", true).unwrap().to_text_rows('X', '.'),
            vec![".X"]
        );
        assert_eq!(font.path(), Some("dup.textfont"));
    }

    #[test]
    fn test_empty_glyph() {
        let glyphs = parse_textfont("GLYPH: \" \"\n", "space.textfont").unwrap();
        assert_eq!(glyphs[0].1.size(), Size::new(0, 0));
    }

    #[test]
    fn test_malformed_header() {
        let err = parse_textfont("# comment\nGLYPH: a\n", "bad.textfont").unwrap_err();
        assert_eq!(err.to_string(), "bad.textfont, line 2: Malformed glyph header");
    }

    #[test]
    fn test_mismatched_rows() {
        let err = parse_textfont("GLYPH: \"a\"\nX.\nX..\n", "bad.textfont").unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad.textfont, line 3: Glyph: \"a\": Mismatched line length"
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = parse_textfont("GLYPH: \"a\"\nXoX\n", "bad.textfont").unwrap_err();
        assert_eq!(err.to_string(), "bad.textfont, line 2: Unexpected character: 'o'");
    }

    #[test]
    fn test_too_tall() {
        let mut text = String::from("GLYPH: \"|\"\n");
        for _ in 0..=MAX_GLYPH_SIZE {
            text.push_str("X\n");
        }
        let err = parse_textfont(&text, "tall.textfont").unwrap_err();
        assert!(err.to_string().contains("exceeds maximum height (65 > 64)"));
    }

    #[test]
    fn test_too_wide() {
        let text = format!("GLYPH: \"_\"\n{}\n", "X".repeat(65));
        let err = parse_textfont(&text, "wide.textfont").unwrap_err();
        assert!(err.to_string().contains("exceeds maximum width (65 > 64)"));
    }
}
