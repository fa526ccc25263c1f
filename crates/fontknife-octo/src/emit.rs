//! Glyph table and routine generation.

use std::io::Write;

use fontknife_font::RasterFont;
use tracing::debug;

use crate::error::OctoError;
use crate::stream::OctoStream;

pub const DEFAULT_LABEL_PREFIX: &str = "smallfont";

/// Largest glyph width or height a sprite row byte can hold.
pub const MAX_GLYPH_SIZE: u32 = 8;

/// Glyphs addressable with a one-byte register.
pub const MAX_GLYPHS: usize = 256;

/// Pixels left between glyphs drawn by the draw routine.
const KERN_PX: u32 = 1;

const CHAR_REG: &str = "v0";
const X_REG: &str = "v1";
const Y_REG: &str = "v2";

/// Options for [`emit_octo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctoOptions {
    /// Prefix for every emitted label.
    pub label_prefix: String,
    /// Glyphs to include. `None` uses every glyph the font provides.
    pub glyph_sequence: Option<Vec<String>>,
}

impl Default for OctoOptions {
    fn default() -> Self {
        Self {
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            glyph_sequence: None,
        }
    }
}

impl OctoOptions {
    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    pub fn with_glyph_sequence(mut self, glyphs: Vec<String>) -> Self {
        self.glyph_sequence = Some(glyphs);
        self
    }
}

/// The validated code range a glyph table covers.
#[derive(Debug, Clone, Copy)]
struct TableRange {
    first: u8,
    last: u8,
    width: u32,
    height: u32,
}

fn validate(font: &RasterFont, options: &OctoOptions) -> Result<TableRange, OctoError> {
    let prefix = &options.label_prefix;
    if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
        return Err(OctoError::InvalidLabelPrefix(prefix.clone()));
    }

    let size = font.max_glyph_size();
    if size.width == 0 || size.height == 0 {
        return Err(OctoError::NoDimensions);
    }
    if size.width > MAX_GLYPH_SIZE {
        return Err(OctoError::TooWide {
            width: size.width,
            max: MAX_GLYPH_SIZE,
        });
    }
    if size.height > MAX_GLYPH_SIZE {
        return Err(OctoError::TooTall {
            height: size.height,
            max: MAX_GLYPH_SIZE,
        });
    }

    let provided;
    let sequence: &[String] = match &options.glyph_sequence {
        Some(glyphs) => glyphs,
        None => {
            provided = font.provided_glyphs();
            &provided
        }
    };
    if sequence.is_empty() {
        return Err(OctoError::NoDimensions);
    }
    if sequence.len() > MAX_GLYPHS {
        return Err(OctoError::TooManyGlyphs {
            count: sequence.len(),
            max: MAX_GLYPHS,
        });
    }

    let mut codes = Vec::with_capacity(sequence.len());
    for glyph in sequence {
        let mut chars = glyph.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => u8::try_from(c as u32).ok(),
            _ => None,
        };
        codes.push(code.ok_or_else(|| OctoError::UnaddressableGlyph(glyph.clone()))?);
    }

    let (first, last) = codes
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &c| (lo.min(c), hi.max(c)));

    Ok(TableRange {
        first,
        last,
        width: size.width,
        height: size.height,
    })
}

/// Pack a glyph's rows into bytes, leftmost pixel in the high bit.
///
/// Always yields `height` bytes; rows past the bitmap are blank.
fn glyph_rows(font: &RasterFont, key: &str, height: u32) -> Result<Vec<u8>, OctoError> {
    let bitmap = font.get_glyph(key, false)?;
    let width = bitmap.width().min(MAX_GLYPH_SIZE);
    Ok((0..height)
        .map(|y| {
            (0..width)
                .filter(|&x| bitmap.get(x, y))
                .fold(0u8, |row, x| row | (0x80 >> x))
        })
        .collect())
}

/// Printable form of the table glyphs for the header comment.
fn escape_glyphs(first: u8, last: u8) -> String {
    (first..=last)
        .map(|code| {
            let c = char::from(code);
            if c.is_control() {
                format!("\\x{:02X}", code)
            } else {
                c.to_string()
            }
        })
        .collect()
}

/// Emit Octo source for `font` to `out`.
///
/// The glyph table covers every code point between the lowest and highest
/// glyph in the sequence; gaps are filled with the font's tofu glyph.
/// Nothing is written if the font cannot be emitted.
pub fn emit_octo<W: Write>(
    out: W,
    font: &RasterFont,
    options: &OctoOptions,
) -> Result<(), OctoError> {
    let range = validate(font, options)?;
    let prefix = &options.label_prefix;
    let draw_func = format!("{}_draw_glyph", prefix);
    let width_func = format!("{}_glyph_width", prefix);
    let width_no_offset_func = format!("{}_glyph_width_no_offset", prefix);
    let width_table = format!("{}_width_table", prefix);
    let glyph_table = format!("{}_glyph_table", prefix);

    let offset = (256 - range.first as u32) % 256;
    let bounds_comment = format!(
        "Must not be called with {reg} < {} or {reg} > {}!",
        range.first,
        range.last,
        reg = CHAR_REG
    );

    let mut widths = Vec::new();
    let mut rows = Vec::new();
    for code in range.first..=range.last {
        let key = char::from(code).to_string();
        let width = font.get_glyph_metadata(&key).glyph_bbox.width();
        widths.push(width.min(u8::MAX as u32) as u8);
        rows.extend(glyph_rows(font, &key, range.height)?);
    }
    debug!(
        first = range.first,
        last = range.last,
        width = range.width,
        height = range.height,
        "emitting Octo glyph table"
    );

    let mut octo = OctoStream::new(out);

    octo.blank()?;
    octo.line(&format!(
        "# Font: {}  Table glyphs in order: {}",
        prefix,
        escape_glyphs(range.first, range.last)
    ))?;
    octo.blank()?;

    octo.comment(&format!(
        "Call with {} = ASCII character, {} = x, {} = y",
        CHAR_REG, X_REG, Y_REG
    ))?;
    octo.comment(&format!(
        "Returns with {} incremented by the width of the glyph plus {}",
        X_REG, KERN_PX
    ))?;
    octo.comment("Clobbers vF, I")?;
    octo.comment(&bounds_comment)?;
    octo.begin_func(&draw_func)?;
    octo.line(&format!("{} += {}", CHAR_REG, offset))?;
    octo.line(&format!("i := {}", glyph_table))?;
    // One add per row steps I to the glyph's first row
    let row_steps = vec![format!("i += {}", CHAR_REG); range.height as usize];
    octo.statements(&row_steps)?;
    octo.line(&format!("sprite {} {} {}", X_REG, Y_REG, range.height))?;
    octo.line(&width_no_offset_func)?;
    octo.line(&format!("{} += {}", X_REG, CHAR_REG))?;
    octo.line(&format!("{} += {}", X_REG, KERN_PX))?;
    octo.end_func()?;

    octo.blank()?;
    octo.comment(&format!("Call with {} = ASCII character", CHAR_REG))?;
    octo.comment(&format!("Returns {} = width of glyph in pixels", CHAR_REG))?;
    octo.comment("Clobbers vF, I")?;
    octo.comment(&bounds_comment)?;
    octo.label(&width_func)?;
    octo.indent();
    octo.line(&format!("{} += {}", CHAR_REG, offset))?;
    octo.dedent();
    octo.begin_func(&width_no_offset_func)?;
    octo.line(&format!("i := {}", width_table))?;
    octo.line(&format!("i += {}", CHAR_REG))?;
    octo.line(&format!("load {}", CHAR_REG))?;
    octo.end_func()?;

    octo.data_table(&width_table, &widths)?;
    octo.data_table(&glyph_table, &rows)?;
    octo.flush()?;
    Ok(())
}
