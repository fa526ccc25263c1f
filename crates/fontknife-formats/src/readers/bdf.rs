//! Glyph Bitmap Distribution Format (BDF 2.1) reader.

use fontknife_font::{GlyphBitmap, RasterFont};
use tracing::{debug, trace};

use super::bitmap_font::{build_raster_font, BitmapGlyph, ParsedBitmapFont};
use super::FormatReader;
use crate::error::FormatError;
use crate::options::LoadOptions;

const FORMAT: &str = "BDF";

/// Reads text BDF fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BdfReader;

impl FormatReader for BdfReader {
    fn read(
        &self,
        data: &[u8],
        origin: &str,
        options: &LoadOptions,
    ) -> Result<RasterFont, FormatError> {
        let text = String::from_utf8_lossy(data);
        let parsed = parse_bdf(&text)?;
        Ok(build_raster_font(parsed, options, FORMAT, origin))
    }
}

/// Black box of a glyph: width, height, x offset, y offset.
#[derive(Debug, Clone, Copy, Default)]
struct Bbx {
    width: u32,
    height: u32,
    x_offset: i32,
    y_offset: i32,
}

/// Numbered lines of a BDF file.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    line_no: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            line_no: 0,
        }
    }

    /// Next line split into keyword and the rest, skipping blanks and comments.
    fn next_statement(&mut self) -> Option<(&'a str, &'a str)> {
        for (index, line) in self.inner.by_ref() {
            self.line_no = index + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            if keyword == "COMMENT" {
                continue;
            }
            return Some((keyword, rest.trim()));
        }
        None
    }

    fn error(&self, message: impl Into<String>) -> FormatError {
        FormatError::parse_line(FORMAT, self.line_no, message)
    }

    fn ints(&self, keyword: &str, rest: &str, count: usize) -> Result<Vec<i32>, FormatError> {
        let values = rest
            .split_whitespace()
            .take(count)
            .map(|v| v.parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| self.error(format!("{} expects {} integers, got '{}'", keyword, count, rest)))?;
        if values.len() < count {
            return Err(self.error(format!(
                "{} expects {} integers, got '{}'",
                keyword, count, rest
            )));
        }
        Ok(values)
    }

    fn bbx(&self, keyword: &str, rest: &str) -> Result<Bbx, FormatError> {
        let v = self.ints(keyword, rest, 4)?;
        if v[0] < 0 || v[1] < 0 {
            return Err(self.error(format!("{} has a negative size: '{}'", keyword, rest)));
        }
        Ok(Bbx {
            width: v[0] as u32,
            height: v[1] as u32,
            x_offset: v[2],
            y_offset: v[3],
        })
    }
}

/// Parse BDF text into glyph black boxes and font properties.
pub fn parse_bdf(text: &str) -> Result<ParsedBitmapFont, FormatError> {
    let mut lines = Lines::new(text);
    let mut parsed = ParsedBitmapFont::default();
    let mut font_bbx = Bbx::default();
    let mut started = false;

    while let Some((keyword, rest)) = lines.next_statement() {
        match keyword {
            "STARTFONT" => started = true,
            _ if !started => return Err(lines.error("file does not begin with STARTFONT")),
            "FONT" => parsed.properties.push(("FONT".to_string(), rest.to_string())),
            "FONTBOUNDINGBOX" => font_bbx = lines.bbx(keyword, rest)?,
            "STARTPROPERTIES" => parse_properties(&mut lines, &mut parsed.properties)?,
            "STARTCHAR" => {
                if let Some(glyph) = parse_char(&mut lines, rest, font_bbx)? {
                    parsed.glyphs.push(glyph);
                }
            }
            "ENDFONT" => {
                debug!(glyphs = parsed.glyphs.len(), "parsed BDF font");
                return Ok(parsed);
            }
            // SIZE, CHARS and other global keywords do not affect layout
            _ => trace!(keyword, line = lines.line_no, "ignoring BDF keyword"),
        }
    }

    if !started {
        return Err(FormatError::parse(FORMAT, "file does not begin with STARTFONT"));
    }
    Err(lines.error("missing ENDFONT"))
}

fn parse_properties(
    lines: &mut Lines<'_>,
    properties: &mut Vec<(String, String)>,
) -> Result<(), FormatError> {
    while let Some((name, value)) = lines.next_statement() {
        if name == "ENDPROPERTIES" {
            return Ok(());
        }
        properties.push((name.to_string(), unquote(value)));
    }
    Err(lines.error("missing ENDPROPERTIES"))
}

/// Strip BDF string quoting, where `""` stands for a literal quote.
fn unquote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => value.to_string(),
    }
}

fn parse_char(
    lines: &mut Lines<'_>,
    name: &str,
    font_bbx: Bbx,
) -> Result<Option<BitmapGlyph>, FormatError> {
    let mut code_point: Option<i32> = None;
    let mut advance: Option<i32> = None;
    let mut bbx = font_bbx;

    loop {
        let Some((keyword, rest)) = lines.next_statement() else {
            return Err(lines.error(format!("glyph '{}' is missing ENDCHAR", name)));
        };
        match keyword {
            "ENCODING" => {
                let values: Vec<i32> = rest
                    .split_whitespace()
                    .map(|v| v.parse::<i32>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| lines.error(format!("invalid ENCODING '{}'", rest)))?;
                // "ENCODING -1 n" carries a non-standard code in its second field
                code_point = match values.as_slice() {
                    [code, ..] if *code >= 0 => Some(*code),
                    [-1, alternate] if *alternate >= 0 => Some(*alternate),
                    [] => return Err(lines.error("ENCODING has no value")),
                    _ => None,
                };
            }
            "DWIDTH" => advance = Some(lines.ints(keyword, rest, 1)?[0]),
            "BBX" => bbx = lines.bbx(keyword, rest)?,
            "BITMAP" => {
                let ink = parse_bitmap_rows(lines, bbx)?;
                expect_endchar(lines, name)?;

                let Some(code_point) = code_point else {
                    trace!(glyph = name, "skipping glyph without a usable encoding");
                    return Ok(None);
                };
                return Ok(Some(BitmapGlyph {
                    code_point: code_point as u32,
                    advance: advance.unwrap_or(bbx.width as i32),
                    x_offset: bbx.x_offset,
                    y_offset: bbx.y_offset,
                    ink,
                }));
            }
            "ENDCHAR" => return Err(lines.error(format!("glyph '{}' has no BITMAP", name))),
            _ => {}
        }
    }
}

fn parse_bitmap_rows(lines: &mut Lines<'_>, bbx: Bbx) -> Result<GlyphBitmap, FormatError> {
    let mut ink = GlyphBitmap::new(bbx.width, bbx.height);
    for y in 0..bbx.height {
        let Some((row, _)) = lines.next_statement() else {
            return Err(lines.error("unexpected end of file in BITMAP"));
        };
        if row == "ENDCHAR" {
            return Err(lines.error(format!(
                "BITMAP has {} rows, expected {}",
                y, bbx.height
            )));
        }
        let bytes = decode_hex_row(row).ok_or_else(|| lines.error(format!("invalid bitmap row '{}'", row)))?;
        for x in 0..bbx.width {
            let byte = bytes.get((x / 8) as usize).copied().unwrap_or(0);
            if byte & (0x80 >> (x % 8)) != 0 {
                ink.set(x, y, true);
            }
        }
    }
    Ok(ink)
}

fn expect_endchar(lines: &mut Lines<'_>, name: &str) -> Result<(), FormatError> {
    match lines.next_statement() {
        Some(("ENDCHAR", _)) => Ok(()),
        Some((other, _)) => Err(lines.error(format!(
            "expected ENDCHAR for glyph '{}', found '{}'",
            name, other
        ))),
        None => Err(lines.error(format!("glyph '{}' is missing ENDCHAR", name))),
    }
}

fn decode_hex_row(row: &str) -> Option<Vec<u8>> {
    if row.len() % 2 != 0 || !row.is_ascii() {
        return None;
    }
    (0..row.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&row[i..i + 2], 16).ok())
        .collect()
}
