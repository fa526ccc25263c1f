//! 1-bit glyph bitmaps.

use serde::{Deserialize, Serialize};

use crate::error::FontError;
use crate::geometry::{BoundingBox, Size};

/// A monochrome bitmap, row-major, one `bool` per pixel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlyphBitmap {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl GlyphBitmap {
    /// Create a blank bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    /// Create a bitmap from row-major pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<bool>) -> Result<Self, FontError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(FontError::BitmapLength {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut bitmap = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    bitmap.set(x, y, true);
                }
            }
        }
        bitmap
    }

    /// Build a bitmap from text rows, where `ink` marks a set pixel.
    ///
    /// Rows shorter than the longest row are padded with empty pixels.
    pub fn from_text_rows<S: AsRef<str>>(rows: &[S], ink: char) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0) as u32;
        let mut bitmap = Self::new(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.as_ref().chars().enumerate() {
                if c == ink {
                    bitmap.set(x as u32, y as u32, true);
                }
            }
        }
        bitmap
    }

    /// Generate a missing-glyph "tofu" rectangle outline.
    ///
    /// The outline is inset from the bitmap edge by `margin_px` on every side.
    /// Sizes too small to fit an outline produce a blank bitmap.
    pub fn tofu(size: Size, margin_px: u32) -> Self {
        let mut bitmap = Self::new(size.width, size.height);
        if size.width <= margin_px * 2 || size.height <= margin_px * 2 {
            return bitmap;
        }
        let (x0, y0) = (margin_px, margin_px);
        let x1 = size.width - 1 - margin_px;
        let y1 = size.height - 1 - margin_px;
        for x in x0..=x1 {
            bitmap.set(x, y0, true);
            bitmap.set(x, y1, true);
        }
        for y in y0..=y1 {
            bitmap.set(x0, y, true);
            bitmap.set(x1, y, true);
        }
        bitmap
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Length of the 8-bit mask representation (one byte per pixel).
    pub fn len_bytes(&self) -> usize {
        self.pixels.len()
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Get a pixel; coordinates outside the bitmap read as empty.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set a pixel; coordinates outside the bitmap are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) as usize;
        self.pixels[idx] = value;
    }

    /// Iterate over rows of pixels.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks(0) panics, and a zero-width bitmap has no pixels anyway
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Bounding box of the set pixels, or `None` if the bitmap is blank.
    pub fn ink_bbox(&self) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    let pixel = BoundingBox::new(x as i32, y as i32, x as i32 + 1, y as i32 + 1);
                    bbox = Some(match bbox {
                        Some(current) => current.union(&pixel),
                        None => pixel,
                    });
                }
            }
        }
        bbox
    }

    /// Whether any pixel is set.
    pub fn has_ink(&self) -> bool {
        self.pixels.iter().any(|&p| p)
    }

    /// Copy `source` into this bitmap with its top-left at `(x, y)`.
    ///
    /// Every source pixel replaces the destination pixel, including empty
    /// ones. Parts falling outside this bitmap are clipped.
    pub fn paste(&mut self, source: &GlyphBitmap, x: i32, y: i32) {
        for sy in 0..source.height {
            let dy = y + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..source.width {
                let dx = x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                self.set(dx as u32, dy as u32, source.get(sx, sy));
            }
        }
    }

    /// Cut out a region. Parts of the region outside the bitmap read as empty.
    pub fn crop(&self, region: &BoundingBox) -> GlyphBitmap {
        let size = region.size();
        GlyphBitmap::from_fn(size.width, size.height, |x, y| {
            let sx = region.left + x as i32;
            let sy = region.top + y as i32;
            sx >= 0 && sy >= 0 && self.get(sx as u32, sy as u32)
        })
    }

    /// Render as text rows using the given ink and empty characters.
    pub fn to_text_rows(&self, ink: char, empty: char) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); self.height as usize];
        }
        self.rows()
            .map(|row| row.iter().map(|&p| if p { ink } else { empty }).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        let result = GlyphBitmap::from_pixels(2, 2, vec![true; 3]);
        assert!(matches!(
            result,
            Err(FontError::BitmapLength {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_ink_bbox() {
        let bitmap = GlyphBitmap::from_text_rows(&["....", ".X..", "..X.", "...."], 'X');
        assert_eq!(bitmap.ink_bbox(), Some(BoundingBox::new(1, 1, 3, 3)));
        assert_eq!(GlyphBitmap::new(3, 3).ink_bbox(), None);
    }

    #[test]
    fn test_tofu_outline() {
        let tofu = GlyphBitmap::tofu(Size::new(5, 6), 1);
        assert_eq!(
            tofu.to_text_rows('X', '.'),
            vec![".....", ".XXX.", ".X.X.", ".X.X.", ".XXX.", "....."]
        );
    }

    #[test]
    fn test_tofu_too_small_is_blank() {
        let tofu = GlyphBitmap::tofu(Size::new(2, 6), 1);
        assert!(!tofu.has_ink());
        assert_eq!(tofu.size(), Size::new(2, 6));
    }

    #[test]
    fn test_paste_clips_and_replaces() {
        let mut dest = GlyphBitmap::from_fn(3, 3, |_, _| true);
        let source = GlyphBitmap::from_text_rows(&["X.", ".X"], 'X');
        dest.paste(&source, 2, 2);
        assert_eq!(dest.to_text_rows('X', '.'), vec!["XXX", "XXX", "XXX"]);

        dest.paste(&source, -1, 0);
        assert_eq!(dest.to_text_rows('X', '.'), vec![".XX", "XXX", "XXX"]);
    }

    #[test]
    fn test_crop_pads_outside_region() {
        let bitmap = GlyphBitmap::from_text_rows(&["XX", "XX"], 'X');
        let cropped = bitmap.crop(&BoundingBox::new(1, 1, 3, 3));
        assert_eq!(cropped.to_text_rows('X', '.'), vec!["X.", ".."]);
    }

    #[test]
    fn test_out_of_range_access_is_safe() {
        let mut bitmap = GlyphBitmap::new(1, 1);
        bitmap.set(5, 5, true);
        assert!(!bitmap.get(5, 5));
        assert!(!bitmap.has_ink());
    }
}
