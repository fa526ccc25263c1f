//! fontknife raster font model
//!
//! This crate holds the format-independent core shared by every fontknife
//! reader, writer and code emitter:
//!
//! - **Geometry**: [`Size`] and [`BoundingBox`] with union semantics
//! - **Bitmaps**: 1-bit [`GlyphBitmap`] masks with ink detection and pasting
//! - **Fonts**: the ordered [`RasterFont`] glyph table with missing-glyph
//!   ("tofu") fallback and text measurement
//! - **Graphemes**: Unicode grapheme cluster splitting for glyph sequences
//! - **Grids**: [`GridMapper`] for sprite-sheet tile addressing
//!
//! # Example
//!
//! ```
//! use fontknife_font::{BoundingBox, GlyphBitmap, RasterFont};
//!
//! let mut bar = GlyphBitmap::new(2, 3);
//! bar.set(0, 0, true);
//!
//! let font = RasterFont::builder()
//!     .glyph("a", bar.clone(), BoundingBox::new(0, 0, 2, 3))
//!     .glyph("b", bar, BoundingBox::new(0, 0, 2, 3))
//!     .tracking_px(1)
//!     .build();
//!
//! assert_eq!(font.getsize("ab").unwrap().width, 5);
//! ```

pub mod bitmap;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod graphemes;
pub mod grid;
pub mod raster_font;

pub use bitmap::GlyphBitmap;
pub use error::FontError;
pub use geometry::{BoundingBox, Coord, Size};
pub use glyph::{Glyph, GlyphMetadata};
pub use graphemes::{
    default_glyph_sequence, default_sheet_glyphs, graphemes, ordered_missing, parse_graphemes,
};
pub use grid::{GridMapper, GridSpec};
pub use raster_font::{RasterFont, RasterFontBuilder, PATH_METADATA_KEY};
