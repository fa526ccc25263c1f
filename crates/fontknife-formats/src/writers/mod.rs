//! Font writers.

mod spritesheet;
mod textfont;

pub use spritesheet::{sheet_grid, SpriteSheetWriter, DEFAULT_SHEET_COLUMNS, MAX_SHEET_PIXELS};
pub use textfont::{TextFontWriter, MAX_LINE_WIDTH as TEXTFONT_MAX_LINE_WIDTH};

use std::io::Write;

use fontknife_font::RasterFont;

use crate::error::FormatError;
use crate::options::WriteOptions;

/// Serializes a [`RasterFont`] into one output format.
pub trait FormatWriter {
    fn write(
        &self,
        font: &RasterFont,
        out: &mut dyn Write,
        options: &WriteOptions,
    ) -> Result<(), FormatError>;
}

/// The glyphs a writer should emit: the requested sequence, or every glyph
/// the font provides.
pub(crate) fn output_sequence(font: &RasterFont, options: &WriteOptions) -> Vec<String> {
    options
        .glyph_sequence
        .clone()
        .unwrap_or_else(|| font.provided_glyphs())
}
