//! Sprite-sheet tile addressing.
//!
//! A grid is described by its pixel bounds, its size in tiles, the size of a
//! single tile and the spacing between tiles. Any one of the first three may
//! be left out and is derived from the other two.

use serde::{Deserialize, Serialize};

use crate::error::FontError;
use crate::geometry::{BoundingBox, Coord, Size};

/// User-facing grid description with optional dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridSpec {
    pub sheet_bounds_px: Option<BoundingBox>,
    pub sheet_size_tiles: Option<Size>,
    pub tile_size_px: Option<Size>,
    #[serde(default)]
    pub tile_spacing_px: Size,
}

impl GridSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet_bounds_px(mut self, bounds: impl Into<BoundingBox>) -> Self {
        self.sheet_bounds_px = Some(bounds.into());
        self
    }

    pub fn with_sheet_size_tiles(mut self, size: impl Into<Size>) -> Self {
        self.sheet_size_tiles = Some(size.into());
        self
    }

    pub fn with_tile_size_px(mut self, size: impl Into<Size>) -> Self {
        self.tile_size_px = Some(size.into());
        self
    }

    pub fn with_tile_spacing_px(mut self, spacing: impl Into<Size>) -> Self {
        self.tile_spacing_px = spacing.into();
        self
    }

    /// Fill unset dimensions from defaults, keeping anything already set.
    pub fn or(self, defaults: GridSpec) -> GridSpec {
        GridSpec {
            sheet_bounds_px: self.sheet_bounds_px.or(defaults.sheet_bounds_px),
            sheet_size_tiles: self.sheet_size_tiles.or(defaults.sheet_size_tiles),
            tile_size_px: self.tile_size_px.or(defaults.tile_size_px),
            tile_spacing_px: self.tile_spacing_px,
        }
    }
}

/// A fully resolved grid mapping tile indices to pixel boxes.
///
/// Tiles are numbered left to right, then top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMapper {
    sheet_bounds_px: BoundingBox,
    sheet_size_tiles: Size,
    tile_size_px: Size,
    tile_spacing_px: Size,
}

impl GridMapper {
    /// Resolve a grid, deriving at most one missing dimension.
    pub fn new(spec: &GridSpec) -> Result<Self, FontError> {
        let spacing = spec.tile_spacing_px;

        let mut missing = Vec::new();
        if spec.sheet_bounds_px.is_none() {
            missing.push("sheet_bounds_px");
        }
        if spec.sheet_size_tiles.is_none() {
            missing.push("sheet_size_tiles");
        }
        if spec.tile_size_px.is_none() {
            missing.push("tile_size_px");
        }
        if missing.len() > 1 {
            return Err(FontError::GridArguments { missing });
        }

        let (bounds, sheet_size, tile_size) =
            match (spec.sheet_bounds_px, spec.sheet_size_tiles, spec.tile_size_px) {
                (Some(bounds), Some(sheet), Some(tile)) => (bounds, sheet, tile),
                (None, Some(sheet), Some(tile)) => {
                    let width = span_px(sheet.width, tile.width, spacing.width)?;
                    let height = span_px(sheet.height, tile.height, spacing.height)?;
                    (
                        BoundingBox::new(0, 0, width as i32, height as i32),
                        sheet,
                        tile,
                    )
                }
                (Some(bounds), None, Some(tile)) => {
                    let cols = tile_count(bounds.width(), tile.width, spacing.width)?;
                    let rows = tile_count(bounds.height(), tile.height, spacing.height)?;
                    (bounds, Size::new(cols, rows), tile)
                }
                (Some(bounds), Some(sheet), None) => {
                    let width = tile_extent(bounds.width(), sheet.width, spacing.width)?;
                    let height = tile_extent(bounds.height(), sheet.height, spacing.height)?;
                    (bounds, sheet, Size::new(width, height))
                }
                _ => return Err(FontError::GridArguments { missing }),
            };

        if sheet_size.is_empty() {
            return Err(FontError::InvalidGrid(format!(
                "sheet size of {} tiles holds no tiles",
                sheet_size
            )));
        }
        check_extent(bounds.left, sheet_size.width, tile_size.width, spacing.width)?;
        check_extent(bounds.top, sheet_size.height, tile_size.height, spacing.height)?;

        Ok(Self {
            sheet_bounds_px: bounds,
            sheet_size_tiles: sheet_size,
            tile_size_px: tile_size,
            tile_spacing_px: spacing,
        })
    }

    pub fn sheet_bounds_px(&self) -> BoundingBox {
        self.sheet_bounds_px
    }

    pub fn sheet_size_tiles(&self) -> Size {
        self.sheet_size_tiles
    }

    pub fn tile_size_px(&self) -> Size {
        self.tile_size_px
    }

    pub fn tile_spacing_px(&self) -> Size {
        self.tile_spacing_px
    }

    /// Number of tiles in the grid.
    pub fn len(&self) -> usize {
        self.sheet_size_tiles.area()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len()
    }

    /// Column and row of a tile index.
    pub fn coord_for_sheet_index(&self, index: usize) -> Result<Coord, FontError> {
        if !self.contains(index) {
            return Err(FontError::IndexOutOfGrid {
                index,
                len: self.len(),
            });
        }
        let cols = self.sheet_size_tiles.width as usize;
        Ok(((index % cols) as u32, (index / cols) as u32))
    }

    /// Pixel box of the tile at a column and row.
    ///
    /// Coordinates inside the grid always fit in `i32`; see [`check_extent`].
    pub fn bbox_for_tile_coord(&self, (col, row): Coord) -> BoundingBox {
        let step_x = i64::from(self.tile_size_px.width) + i64::from(self.tile_spacing_px.width);
        let step_y = i64::from(self.tile_size_px.height) + i64::from(self.tile_spacing_px.height);
        let left = i64::from(self.sheet_bounds_px.left) + i64::from(col) * step_x;
        let top = i64::from(self.sheet_bounds_px.top) + i64::from(row) * step_y;
        BoundingBox::new(
            left as i32,
            top as i32,
            (left + i64::from(self.tile_size_px.width)) as i32,
            (top + i64::from(self.tile_size_px.height)) as i32,
        )
    }

    /// Pixel box of the tile at a linear index.
    pub fn bbox_for_sheet_index(&self, index: usize) -> Result<BoundingBox, FontError> {
        let coord = self.coord_for_sheet_index(index)?;
        Ok(self.bbox_for_tile_coord(coord))
    }

    /// Pixel boxes of every tile, in index order.
    pub fn iter(&self) -> impl Iterator<Item = BoundingBox> + '_ {
        let cols = self.sheet_size_tiles.width.max(1) as usize;
        (0..self.len()).map(move |i| {
            self.bbox_for_tile_coord(((i % cols) as u32, (i / cols) as u32))
        })
    }
}

fn too_large(px: i128) -> FontError {
    FontError::SheetTooLarge(format!(
        "grid reaches {} px, past the limit of {} px",
        px,
        i32::MAX
    ))
}

/// Pixel span of `count` tiles with spacing between them.
fn span_px(count: u32, tile: u32, spacing: u32) -> Result<u32, FontError> {
    if count == 0 {
        return Err(FontError::InvalidGrid(
            "sheet size in tiles must be at least 1x1".to_string(),
        ));
    }
    let span = i128::from(count) * i128::from(tile) + i128::from(count - 1) * i128::from(spacing);
    if span > i128::from(i32::MAX) {
        return Err(too_large(span));
    }
    Ok(span as u32)
}

/// Reject grids whose last tile ends outside the `i32` pixel range.
fn check_extent(origin: i32, count: u32, tile: u32, spacing: u32) -> Result<(), FontError> {
    let step = i128::from(tile) + i128::from(spacing);
    let far = i128::from(origin) + i128::from(count.saturating_sub(1)) * step + i128::from(tile);
    if far > i128::from(i32::MAX) {
        return Err(too_large(far));
    }
    Ok(())
}

/// How many tiles with spacing fit in a pixel span.
fn tile_count(span: u32, tile: u32, spacing: u32) -> Result<u32, FontError> {
    if tile == 0 {
        return Err(FontError::InvalidGrid(
            "tile size must be at least 1x1 px".to_string(),
        ));
    }
    let step = u64::from(tile) + u64::from(spacing);
    // Never more than `span` tiles, so the count fits back in u32
    Ok(((u64::from(span) + u64::from(spacing)) / step) as u32)
}

/// Size of each of `count` tiles sharing a pixel span.
fn tile_extent(span: u32, count: u32, spacing: u32) -> Result<u32, FontError> {
    if count == 0 {
        return Err(FontError::InvalidGrid(
            "sheet size in tiles must be at least 1x1".to_string(),
        ));
    }
    let gaps = u64::from(count - 1) * u64::from(spacing);
    if u64::from(span) < gaps {
        return Err(FontError::InvalidGrid(format!(
            "{} px cannot hold {} tiles spaced {} px apart",
            span, count, spacing
        )));
    }
    Ok(((u64::from(span) - gaps) / u64::from(count)) as u32)
}
