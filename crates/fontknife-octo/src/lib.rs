//! Octo code emitter for fontknife
//!
//! Turns a small raster font (at most 8x8 pixels per glyph, at most 256
//! glyphs, all single code points up to 255) into Octo assembly for the
//! CHIP-8 virtual machine: a glyph drawing routine, a width lookup routine
//! and the width and bitmap tables they read.
//!
//! # Example
//!
//! ```
//! use fontknife_font::{BoundingBox, GlyphBitmap, RasterFont};
//! use fontknife_octo::{emit_octo, OctoOptions};
//!
//! let bar = GlyphBitmap::from_text_rows(&["X", "X"], 'X');
//! let font = RasterFont::builder()
//!     .glyph("|", bar, BoundingBox::new(0, 0, 1, 2))
//!     .build();
//!
//! let mut out = Vec::new();
//! emit_octo(&mut out, &font, &OctoOptions::default()).unwrap();
//! let code = String::from_utf8(out).unwrap();
//! assert!(code.contains(": smallfont_glyph_table 0x80 0x80"));
//! ```

pub mod emit;
pub mod error;
pub mod stream;

pub use emit::{emit_octo, OctoOptions, DEFAULT_LABEL_PREFIX, MAX_GLYPHS, MAX_GLYPH_SIZE};
pub use error::OctoError;
pub use stream::OctoStream;
