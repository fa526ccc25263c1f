//! Font readers.

mod bdf;
mod bitmap_font;
mod pcf;
mod spritesheet;
mod textfont;
mod truetype;

pub use bdf::{parse_bdf, BdfReader};
pub use bitmap_font::{build_raster_font, BitmapGlyph, ParsedBitmapFont};
pub use pcf::{
    parse_pcf, PcfReader, PCF_BDF_ENCODINGS, PCF_BITMAPS, PCF_BIT_ORDER_MSB, PCF_BYTE_ORDER_MSB,
    PCF_MAGIC, PCF_METRICS, PCF_PROPERTIES,
};
pub use spritesheet::SpriteSheetReader;
pub use textfont::{parse_textfont, TextFontReader, MAX_GLYPH_SIZE as TEXTFONT_MAX_GLYPH_SIZE};
pub(crate) use textfont::{EMPTY_CHAR, GLYPH_HEADER, INK_CHAR};
pub use truetype::TrueTypeReader;

use fontknife_font::RasterFont;

use crate::error::FormatError;
use crate::options::LoadOptions;

/// Parses one source format into a [`RasterFont`].
pub trait FormatReader {
    /// Parse font data. `origin` names where the data came from and is
    /// recorded as the font's path.
    fn read(
        &self,
        data: &[u8],
        origin: &str,
        options: &LoadOptions,
    ) -> Result<RasterFont, FormatError>;
}
