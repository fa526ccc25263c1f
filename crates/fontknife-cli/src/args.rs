//! Command-line option groups shared by subcommands.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use fontknife_font::{parse_graphemes, BoundingBox, GridSpec, Size};
use fontknife_formats::{LoadOptions, OutputFormat, Rgba, SourceFormat, WriteOptions};
use fontknife_octo::{OctoOptions, DEFAULT_LABEL_PREFIX};

/// The only code output format.
pub const OCTO_CHIP8: &str = "octo-chip8";

fn parse_source_format(s: &str) -> Result<SourceFormat, String> {
    s.parse().map_err(|e: fontknife_formats::FormatError| e.to_string())
}

fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|e: fontknife_formats::FormatError| e.to_string())
}

fn parse_color(s: &str) -> Result<Rgba, String> {
    s.parse().map_err(|e: fontknife_formats::FormatError| e.to_string())
}

fn bounds(values: &Option<Vec<i32>>) -> Option<BoundingBox> {
    values
        .as_deref()
        .and_then(|v| <[i32; 4]>::try_from(v).ok())
        .map(BoundingBox::from)
}

fn size(values: &Option<Vec<u32>>) -> Option<Size> {
    values
        .as_deref()
        .and_then(|v| <[u32; 2]>::try_from(v).ok())
        .map(Size::from)
}

fn glyphs(sequence: &Option<String>, what: &str) -> Result<Option<Vec<String>>> {
    sequence
        .as_deref()
        .map(|s| parse_graphemes(s, None).with_context(|| format!("Invalid {} glyph sequence", what)))
        .transpose()
}

/// How the source font is read.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct SourceArgs {
    /// Source font format (guessed from the file extension if omitted)
    #[arg(short = 'F', long, value_parser = parse_source_format)]
    pub src_format: Option<SourceFormat>,

    /// Point size for rendering outline fonts
    #[arg(short = 'P', long, default_value_t = fontknife_formats::DEFAULT_FONT_SIZE_POINTS)]
    pub src_font_size_points: u32,

    /// Glyphs to load from the source font
    #[arg(short = 'G', long)]
    pub src_glyph_sequence: Option<String>,

    /// Pixel bounds of the grid in a source sprite sheet
    #[arg(
        short = 'B',
        long,
        num_args = 4,
        value_names = ["LEFT", "TOP", "RIGHT", "BOTTOM"],
        allow_negative_numbers = true
    )]
    pub src_sheet_bounds_px: Option<Vec<i32>>,

    /// Size in tiles of a source sprite sheet
    #[arg(short = 'C', long, num_args = 2, value_names = ["COLUMNS", "ROWS"])]
    pub src_sheet_size_tiles: Option<Vec<u32>>,

    /// Tile size of a source sprite sheet
    #[arg(short = 'T', long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub src_tile_size_px: Option<Vec<u32>>,

    /// Spacing between tiles of a source sprite sheet
    #[arg(short = 'S', long, num_args = 2, value_names = ["X", "Y"])]
    pub src_tile_spacing_px: Option<Vec<u32>>,
}

impl Default for SourceArgs {
    fn default() -> Self {
        Self {
            src_format: None,
            src_font_size_points: fontknife_formats::DEFAULT_FONT_SIZE_POINTS,
            src_glyph_sequence: None,
            src_sheet_bounds_px: None,
            src_sheet_size_tiles: None,
            src_tile_size_px: None,
            src_tile_spacing_px: None,
        }
    }
}

impl SourceArgs {
    pub fn grid(&self) -> GridSpec {
        GridSpec {
            sheet_bounds_px: bounds(&self.src_sheet_bounds_px),
            sheet_size_tiles: size(&self.src_sheet_size_tiles),
            tile_size_px: size(&self.src_tile_size_px),
            tile_spacing_px: size(&self.src_tile_spacing_px).unwrap_or_default(),
        }
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        let mut options = LoadOptions::new()
            .with_font_size_points(self.src_font_size_points)
            .with_grid(self.grid());
        if let Some(glyphs) = glyphs(&self.src_glyph_sequence, "source")? {
            options = options.with_glyph_sequence(glyphs);
        }
        Ok(options)
    }
}

/// How `convert` writes its output.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct OutputArgs {
    /// Output format (guessed from the file extension if omitted)
    #[arg(short = 'f', long, value_parser = parse_output_format)]
    pub out_format: Option<OutputFormat>,

    /// Glyphs to write, in order (defaults to every glyph in the font)
    #[arg(short = 'g', long)]
    pub out_glyph_sequence: Option<String>,

    /// Pixel bounds of the output sheet grid
    #[arg(
        short = 'b',
        long,
        num_args = 4,
        value_names = ["LEFT", "TOP", "RIGHT", "BOTTOM"],
        allow_negative_numbers = true
    )]
    pub out_sheet_bounds_px: Option<Vec<i32>>,

    /// Size in tiles of the output sheet
    #[arg(short = 'c', long, num_args = 2, value_names = ["COLUMNS", "ROWS"])]
    pub out_sheet_size_tiles: Option<Vec<u32>>,

    /// Tile size of the output sheet
    #[arg(short = 't', long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub out_tile_size_px: Option<Vec<u32>>,

    /// Spacing between output tiles
    #[arg(short = 's', long, num_args = 2, value_names = ["X", "Y"])]
    pub out_tile_spacing_px: Option<Vec<u32>>,

    /// Integer scale factor applied to the finished sheet
    #[arg(short = 'm', long, default_value_t = 1)]
    pub out_sheet_scale: u32,

    /// Glyph ink color (#RRGGBB or #RRGGBBAA)
    #[arg(long, default_value = "#FFFFFF", value_parser = parse_color)]
    pub out_foreground_color: Rgba,

    /// Sheet background color (#RRGGBB or #RRGGBBAA)
    #[arg(long, default_value = "#000000", value_parser = parse_color)]
    pub out_background_color: Rgba,
}

impl Default for OutputArgs {
    fn default() -> Self {
        Self {
            out_format: None,
            out_glyph_sequence: None,
            out_sheet_bounds_px: None,
            out_sheet_size_tiles: None,
            out_tile_size_px: None,
            out_tile_spacing_px: None,
            out_sheet_scale: 1,
            out_foreground_color: Rgba::WHITE,
            out_background_color: Rgba::BLACK,
        }
    }
}

impl OutputArgs {
    pub fn grid(&self) -> GridSpec {
        GridSpec {
            sheet_bounds_px: bounds(&self.out_sheet_bounds_px),
            sheet_size_tiles: size(&self.out_sheet_size_tiles),
            tile_size_px: size(&self.out_tile_size_px),
            tile_spacing_px: size(&self.out_tile_spacing_px).unwrap_or_default(),
        }
    }

    pub fn write_options(&self) -> Result<WriteOptions> {
        let mut options = WriteOptions::new()
            .with_grid(self.grid())
            .with_sheet_scale(self.out_sheet_scale)
            .with_colors(self.out_foreground_color, self.out_background_color);
        if let Some(glyphs) = glyphs(&self.out_glyph_sequence, "output")? {
            options = options.with_glyph_sequence(glyphs);
        }
        Ok(options)
    }
}

/// How `emit-code` writes its output.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct EmitArgs {
    /// Code output format
    #[arg(short = 'f', long, default_value = OCTO_CHIP8, value_parser = [OCTO_CHIP8])]
    pub out_format: String,

    /// Glyphs to emit, in order (defaults to every glyph in the font)
    #[arg(short = 'g', long)]
    pub out_glyph_sequence: Option<String>,

    /// Prefix for every emitted label
    #[arg(long, default_value = DEFAULT_LABEL_PREFIX)]
    pub out_label_prefix: String,
}

impl Default for EmitArgs {
    fn default() -> Self {
        Self {
            out_format: OCTO_CHIP8.to_string(),
            out_glyph_sequence: None,
            out_label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
        }
    }
}

impl EmitArgs {
    pub fn octo_options(&self) -> Result<OctoOptions> {
        let mut options = OctoOptions::default().with_label_prefix(&self.out_label_prefix);
        if let Some(glyphs) = glyphs(&self.out_glyph_sequence, "output")? {
            options = options.with_glyph_sequence(glyphs);
        }
        Ok(options)
    }
}

/// Parsed-font cache settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheOptions {
    pub enabled: bool,
    /// Overrides the default cache directory
    pub dir: Option<PathBuf>,
}

impl CacheOptions {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            dir: Some(dir.into()),
        }
    }
}
