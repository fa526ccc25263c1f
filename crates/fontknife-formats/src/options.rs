//! Reader and writer options.

use fontknife_font::GridSpec;

use crate::color::Rgba;
use crate::format::ImageEncoding;

/// Default point size for rasterizing outline fonts.
pub const DEFAULT_FONT_SIZE_POINTS: u32 = 16;

/// Options shared by every font reader.
///
/// Readers ignore options that do not apply to their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Point size for outline fonts (1 point = 1 pixel).
    pub font_size_points: u32,
    /// Glyphs to load, in order. `None` uses the format's default selection.
    pub glyph_sequence: Option<Vec<String>>,
    /// Grid layout for sprite-sheet sources.
    pub grid: GridSpec,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            font_size_points: DEFAULT_FONT_SIZE_POINTS,
            glyph_sequence: None,
            grid: GridSpec::default(),
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size_points(mut self, points: u32) -> Self {
        self.font_size_points = points;
        self
    }

    pub fn with_glyph_sequence(mut self, glyphs: Vec<String>) -> Self {
        self.glyph_sequence = Some(glyphs);
        self
    }

    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }
}

/// Options shared by every font writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Glyphs to write, in order. `None` writes every glyph the font provides.
    pub glyph_sequence: Option<Vec<String>>,
    /// Grid layout overrides for sprite sheets.
    pub grid: GridSpec,
    /// Integer nearest-neighbor upscaling for sprite sheets.
    pub sheet_scale: u32,
    pub foreground: Rgba,
    pub background: Rgba,
    pub image_encoding: ImageEncoding,
    /// Path the font was originally loaded from, recorded in text output.
    pub source_path: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            glyph_sequence: None,
            grid: GridSpec::default(),
            sheet_scale: 1,
            foreground: Rgba::WHITE,
            background: Rgba::BLACK,
            image_encoding: ImageEncoding::Png,
            source_path: None,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_glyph_sequence(mut self, glyphs: Vec<String>) -> Self {
        self.glyph_sequence = Some(glyphs);
        self
    }

    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_sheet_scale(mut self, scale: u32) -> Self {
        self.sheet_scale = scale;
        self
    }

    pub fn with_colors(mut self, foreground: Rgba, background: Rgba) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    pub fn with_image_encoding(mut self, encoding: ImageEncoding) -> Self {
        self.image_encoding = encoding;
        self
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}
