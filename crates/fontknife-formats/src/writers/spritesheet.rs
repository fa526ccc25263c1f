//! Sprite-sheet image writer.

use std::io::{Cursor, Write};

use fontknife_font::{FontError, GridMapper, GridSpec, RasterFont, Size};
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};
use tracing::debug;

use super::{output_sequence, FormatWriter};
use crate::canvas::Canvas;
use crate::error::FormatError;
use crate::format::ImageEncoding;
use crate::options::WriteOptions;
use crate::png::{encode_rgba, PngConfig};

/// Columns in a sheet when neither the sheet size nor its bounds are given.
pub const DEFAULT_SHEET_COLUMNS: u32 = 16;

/// Largest sheet, after scaling, that will be allocated (16384x16384).
pub const MAX_SHEET_PIXELS: u64 = 1 << 28;

/// Writes glyphs into a grid of tiles on an image.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteSheetWriter;

/// Complete a grid spec for `glyph_count` glyphs of at most `max_glyph_size`.
///
/// When fewer than two of bounds, sheet size and tile size are set, the tile
/// size defaults to the largest glyph and then the sheet defaults to
/// [`DEFAULT_SHEET_COLUMNS`] columns with as many rows as needed.
pub fn sheet_grid(spec: GridSpec, max_glyph_size: Size, glyph_count: usize) -> GridSpec {
    let known = |s: &GridSpec| {
        [
            s.sheet_bounds_px.is_some(),
            s.sheet_size_tiles.is_some(),
            s.tile_size_px.is_some(),
        ]
        .into_iter()
        .filter(|&set| set)
        .count()
    };

    let mut spec = spec;
    if known(&spec) < 2 && spec.tile_size_px.is_none() {
        spec.tile_size_px = Some(max_glyph_size);
    }
    if known(&spec) < 2 && spec.sheet_size_tiles.is_none() {
        let rows = (glyph_count as u32).div_ceil(DEFAULT_SHEET_COLUMNS).max(1);
        spec.sheet_size_tiles = Some(Size::new(DEFAULT_SHEET_COLUMNS, rows));
    }
    spec
}

impl FormatWriter for SpriteSheetWriter {
    fn write(
        &self,
        font: &RasterFont,
        out: &mut dyn Write,
        options: &WriteOptions,
    ) -> Result<(), FormatError> {
        if options.sheet_scale == 0 {
            return Err(FontError::InvalidScale(options.sheet_scale).into());
        }

        let glyphs = output_sequence(font, options);
        let grid = sheet_grid(options.grid, font.max_glyph_size(), glyphs.len());
        let mapper = GridMapper::new(&grid)?;
        if glyphs.len() > mapper.len() {
            return Err(FormatError::TooManyGlyphs {
                glyphs: glyphs.len(),
                tiles: mapper.len(),
            });
        }

        let bounds = mapper.sheet_bounds_px();
        let sheet = Size::new(bounds.right.max(0) as u32, bounds.bottom.max(0) as u32);
        let scale = u64::from(options.sheet_scale);
        let too_large = || FormatError::SheetTooLarge {
            width: u64::from(sheet.width) * scale,
            height: u64::from(sheet.height) * scale,
            max_pixels: MAX_SHEET_PIXELS,
        };
        let fits = sheet
            .checked_scale(options.sheet_scale)
            .is_some_and(|size| size.pixel_count() <= MAX_SHEET_PIXELS);
        if !fits {
            return Err(too_large());
        }

        let mut canvas = Canvas::new(sheet.width, sheet.height, options.background);
        for (index, key) in glyphs.iter().enumerate() {
            let tile = mapper.bbox_for_sheet_index(index)?;
            let bitmap = font.get_glyph(key, false)?;
            canvas.draw_mask(bitmap, tile.left, tile.top, options.foreground);
        }
        let canvas = canvas.scaled(options.sheet_scale).ok_or_else(too_large)?;

        debug!(
            glyphs = glyphs.len(),
            sheet = %mapper.sheet_size_tiles(),
            tile = %mapper.tile_size_px(),
            width = canvas.width,
            height = canvas.height,
            encoding = ?options.image_encoding,
            "writing sprite sheet"
        );
        encode(&canvas, out, options.image_encoding)
    }
}

fn encode(canvas: &Canvas, out: &mut dyn Write, encoding: ImageEncoding) -> Result<(), FormatError> {
    let format = match encoding {
        ImageEncoding::Png => {
            out.write_all(&encode_rgba(canvas, &PngConfig::default())?)?;
            return Ok(());
        }
        ImageEncoding::Jpeg => ImageFormat::Jpeg,
        ImageEncoding::Bmp => ImageFormat::Bmp,
        ImageEncoding::Tga => ImageFormat::Tga,
    };

    let rgba = RgbaImage::from_raw(canvas.width, canvas.height, canvas.to_rgba8()).ok_or_else(
        || {
            ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))
        },
    )?;
    let image = match encoding {
        // JPEG has no alpha channel
        ImageEncoding::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => DynamicImage::ImageRgba8(rgba),
    };

    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format)?;
    out.write_all(buffer.get_ref())?;
    Ok(())
}
