//! Sprite-sheet image reader.

use fontknife_font::{default_sheet_glyphs, BoundingBox, GlyphBitmap, GridMapper, RasterFont};
use tracing::debug;

use super::FormatReader;
use crate::color::Rgba;
use crate::error::FormatError;
use crate::options::LoadOptions;
use crate::writers::MAX_SHEET_PIXELS;

/// Luminance and alpha at or above this are ink.
const INK_THRESHOLD: u8 = 128;

/// Reads a grid of glyph tiles from a PNG, JPEG, BMP or TGA image.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteSheetReader;

impl FormatReader for SpriteSheetReader {
    fn read(
        &self,
        data: &[u8],
        origin: &str,
        options: &LoadOptions,
    ) -> Result<RasterFont, FormatError> {
        let image = image::load_from_memory(data)?.to_rgba8();
        let (width, height) = image.dimensions();
        let ink = GlyphBitmap::from_fn(width, height, |x, y| {
            let pixel = Rgba::from(image.get_pixel(x, y).0);
            pixel.luminance() >= INK_THRESHOLD && pixel.a >= INK_THRESHOLD
        });

        let mut grid = options.grid;
        if grid.sheet_bounds_px.is_none()
            && (grid.sheet_size_tiles.is_none() || grid.tile_size_px.is_none())
        {
            grid.sheet_bounds_px = Some(BoundingBox::new(0, 0, width as i32, height as i32));
        }
        let mapper = GridMapper::new(&grid)?;
        debug!(
            image = %format!("{}x{}", width, height),
            tiles = mapper.len(),
            tile_size = %mapper.tile_size_px(),
            "reading sprite sheet"
        );

        let glyphs = options
            .glyph_sequence
            .clone()
            .unwrap_or_else(default_sheet_glyphs);
        if glyphs.len() > mapper.len() {
            return Err(FormatError::TooManyGlyphs {
                glyphs: glyphs.len(),
                tiles: mapper.len(),
            });
        }

        let tile_size = mapper.tile_size_px();
        if tile_size.pixel_count() > MAX_SHEET_PIXELS {
            return Err(FormatError::SheetTooLarge {
                width: u64::from(tile_size.width),
                height: u64::from(tile_size.height),
                max_pixels: MAX_SHEET_PIXELS,
            });
        }
        let tile = BoundingBox::from_size(tile_size);
        let mut builder = RasterFont::builder().path(origin);
        for (index, key) in glyphs.into_iter().enumerate() {
            let region = mapper.bbox_for_sheet_index(index)?;
            builder = builder.glyph(key, ink.crop(&region), tile);
        }
        Ok(builder.build())
    }
}
