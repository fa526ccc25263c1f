//! fontknife font formats
//!
//! Readers turn font files into a [`RasterFont`](fontknife_font::RasterFont),
//! writers turn one back into bytes:
//!
//! - **Readers**: BDF, PCF, TrueType/OpenType (rasterized), sprite-sheet
//!   images and textfont
//! - **Writers**: sprite-sheet images (PNG, JPEG, BMP, TGA) and textfont
//! - **Format resolution**: explicit names or guessing from file extensions
//! - **Deterministic PNG**: fixed encoder settings so the same font always
//!   produces the same sheet bytes
//!
//! # Example
//!
//! ```
//! use fontknife_formats::{readers::parse_textfont, OutputFormat, WriteOptions};
//!
//! let glyphs = parse_textfont("GLYPH: \"i\"\nX\n.\nX\n", "i.textfont").unwrap();
//! assert_eq!(glyphs[0].1.height(), 3);
//!
//! assert_eq!("textfont".parse::<OutputFormat>().unwrap(), OutputFormat::TextFont);
//! let _defaults = WriteOptions::default();
//! ```

pub mod canvas;
pub mod color;
pub mod error;
pub mod format;
pub mod loader;
pub mod options;
pub mod png;
pub mod readers;
pub mod writers;

pub use canvas::Canvas;
pub use color::Rgba;
pub use error::FormatError;
pub use format::{FontDestination, FontSource, ImageEncoding, OutputFormat, SourceFormat};
pub use loader::{load_font, load_font_from_bytes, read_source, write_font};
pub use options::{LoadOptions, WriteOptions, DEFAULT_FONT_SIZE_POINTS};
pub use readers::FormatReader;
pub use writers::FormatWriter;
