//! Textfont writer.

use std::io::Write;

use tracing::debug;

use fontknife_font::RasterFont;

use super::{output_sequence, FormatWriter};
use crate::error::FormatError;
use crate::options::WriteOptions;
use crate::readers::{EMPTY_CHAR, GLYPH_HEADER, INK_CHAR};

/// Widest glyph a textfont line may hold, and the wrap column for comments.
pub const MAX_LINE_WIDTH: u32 = 80;

const COMMENT_PREFIX: &str = "# ";

/// Writes fonts in the textfont format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFontWriter;

impl FormatWriter for TextFontWriter {
    fn write(
        &self,
        font: &RasterFont,
        out: &mut dyn Write,
        options: &WriteOptions,
    ) -> Result<(), FormatError> {
        let glyphs = output_sequence(font, options);

        let mut bitmaps = Vec::with_capacity(glyphs.len());
        for key in &glyphs {
            bitmaps.push(font.get_glyph(key, false)?);
        }
        let max_width = bitmaps.iter().map(|b| b.width()).max().unwrap_or(0);
        let max_height = bitmaps.iter().map(|b| b.height()).max().unwrap_or(0);
        if max_width > MAX_LINE_WIDTH {
            return Err(FormatError::GlyphTooWide {
                width: max_width,
                max: MAX_LINE_WIDTH,
            });
        }

        let mut fields: Vec<(&str, String)> = Vec::new();
        if let Some(source) = &options.source_path {
            fields.push(("Original font", source.clone()));
        }
        if let Some(path) = font.path() {
            fields.push(("Data loaded from", path.to_string()));
        }
        if let Some(points) = font.size_points() {
            fields.push(("Font size in pts", points.to_string()));
        }
        fields.push(("Max dimensions", format!("{}x{} px", max_width, max_height)));
        fields.push(("Exported glyphs", String::new()));
        write_fields(out, &fields)?;

        let quoted: Vec<String> = glyphs.iter().map(|g| quote_repr(g)).collect();
        for line in wrap_list(&quoted, MAX_LINE_WIDTH as usize - COMMENT_PREFIX.len()) {
            writeln!(out, "{}{}", COMMENT_PREFIX, line)?;
        }

        for (key, bitmap) in glyphs.iter().zip(bitmaps) {
            let data_size = bitmap
                .ink_bbox()
                .map(|bbox| (bbox.right, bbox.bottom))
                .unwrap_or((0, 0));
            let escaped = serde_json::to_string(key).map_err(std::io::Error::other)?;

            // Control characters would break the header line, so they get no raw comment
            if key.chars().any(char::is_control) {
                writeln!(out, "{} {}", GLYPH_HEADER, escaped)?;
            } else {
                let raw_quote = if key.contains('"') { '\'' } else { '"' };
                writeln!(
                    out,
                    "{} {} # Raw glyph: {}{}{}",
                    GLYPH_HEADER, escaped, raw_quote, key, raw_quote
                )?;
            }
            writeln!(out, "# Glyph Size : ({}, {})", bitmap.width(), bitmap.height())?;
            writeln!(out, "# Data Size  : ({}, {})", data_size.0, data_size.1)?;
            for row in bitmap.to_text_rows(INK_CHAR, EMPTY_CHAR) {
                writeln!(out, "{}", row)?;
            }
        }

        debug!(glyphs = glyphs.len(), "wrote textfont");
        Ok(())
    }
}

/// Write `# label : value` lines with labels padded to a common width.
fn write_fields(out: &mut dyn Write, fields: &[(&str, String)]) -> std::io::Result<()> {
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in fields {
        let line = format!("{}{:<width$} : {}", COMMENT_PREFIX, label, value, width = width);
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Quote a glyph for display, preferring single quotes.
fn quote_repr(glyph: &str) -> String {
    let quote = if glyph.contains('\'') && !glyph.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(glyph.len() + 2);
    out.push(quote);
    for c in glyph.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Join items with `", "`, breaking lines so none exceeds `width`.
fn wrap_list(items: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for (i, item) in items.iter().enumerate() {
        let piece = if i + 1 < items.len() {
            format!("{},", item)
        } else {
            item.clone()
        };
        if !line.is_empty() && line.chars().count() + 1 + piece.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&piece);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::parse_textfont;
    use fontknife_font::{BoundingBox, GlyphBitmap};
    use pretty_assertions::assert_eq;

    fn font() -> RasterFont {
        let a = GlyphBitmap::from_text_rows(&[".X.", "X.X", "XXX", "..."], 'X');
        let quote = GlyphBitmap::from_text_rows(&["X.X", "...", "...", "..."], 'X');
        RasterFont::builder()
            .path("tiny.bdf")
            .glyph("A", a, BoundingBox::new(0, 0, 3, 4))
            .glyph("\"", quote, BoundingBox::new(0, 0, 3, 4))
            .build()
    }

    fn write(font: &RasterFont, options: &WriteOptions) -> String {
        let mut out = Vec::new();
        TextFontWriter.write(font, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_output_layout() {
        let text = write(&font(), &WriteOptions::default());
        let expected = "\
# Data loaded from : tiny.bdf
# Max dimensions   : 3x4 px
# Exported glyphs  :
# 'A', '\"'
GLYPH: \"A\" # Raw glyph: \"A\"
# Glyph Size : (3, 4)
# Data Size  : (3, 3)
.X.
X.X
XXX
...
GLYPH: \"\\\"\" # Raw glyph: '\"'
# Glyph Size : (3, 4)
# Data Size  : (3, 1)
X.X
...
...
...
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_source_path_and_point_size_fields() {
        let font = RasterFont::builder()
            .path("font.ttf")
            .size_points(Some(16))
            .glyph("a", GlyphBitmap::new(1, 1), BoundingBox::new(0, 0, 1, 1))
            .build();
        let text = write(&font, &WriteOptions::default().with_source_path("orig/font.ttf"));
        let header: Vec<&str> = text.lines().take(4).collect();
        assert_eq!(
            header,
            vec![
                "# Original font    : orig/font.ttf",
                "# Data loaded from : font.ttf",
                "# Font size in pts : 16",
                "# Max dimensions   : 1x1 px",
            ]
        );
    }

    #[test]
    fn test_round_trips_through_reader() {
        let font = font();
        let text = write(&font, &WriteOptions::default());
        let parsed = parse_textfont(&text, "out.textfont").unwrap();

        assert_eq!(parsed.len(), 2);
        for (key, bitmap) in parsed {
            assert_eq!(&bitmap, font.get_glyph(&key, true).unwrap());
        }
    }

    #[test]
    fn test_control_character_glyphs_round_trip() {
        let bitmap = GlyphBitmap::from_text_rows(&["X.", ".X"], 'X');
        let bbox = BoundingBox::new(0, 0, 2, 2);
        let mut builder = RasterFont::builder().path("ctrl.pcf");
        for key in ["\n", "\r", "\t", "#", "A"] {
            builder = builder.glyph(key, bitmap.clone(), bbox);
        }
        let font = builder.build();

        let text = write(&font, &WriteOptions::default());
        assert!(text.contains("GLYPH: \"\\n\"\n"));
        assert!(text.contains("GLYPH: \"#\" # Raw glyph: \"#\"\n"));

        let parsed = parse_textfont(&text, "ctrl.textfont").unwrap();
        let keys: Vec<&str> = parsed.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["\n", "\r", "\t", "#", "A"]);
        for (_, parsed_bitmap) in &parsed {
            assert_eq!(parsed_bitmap, &bitmap);
        }
    }

    #[test]
    fn test_glyph_list_wraps() {
        let items: Vec<String> = (0..30).map(|i| quote_repr(&i.to_string())).collect();
        let lines = wrap_list(&items, 78);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 78));
        assert!(lines[0].ends_with(','));
        assert_eq!(lines.join(" "), items.join(", "));
    }

    #[test]
    fn test_quote_repr() {
        assert_eq!(quote_repr("a"), "'a'");
        assert_eq!(quote_repr("'"), "\"'\"");
        assert_eq!(quote_repr("\\"), "'\\\\'");
        assert_eq!(quote_repr("\n"), "'\\n'");
    }

    #[test]
    fn test_too_wide_glyph() {
        let font = RasterFont::builder()
            .glyph("w", GlyphBitmap::new(81, 1), BoundingBox::new(0, 0, 81, 1))
            .build();
        let err = TextFontWriter
            .write(&font, &mut Vec::new(), &WriteOptions::default())
            .unwrap_err();
        assert!(matches!(err, FormatError::GlyphTooWide { width: 81, max: 80 }));
    }
}
