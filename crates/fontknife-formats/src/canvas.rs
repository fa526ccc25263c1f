//! RGBA pixel canvas that sprite sheets are composed on.

use fontknife_font::GlyphBitmap;

use crate::color::Rgba;

/// A row-major RGBA image buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (RGBA, row-major).
    pub data: Vec<Rgba>,
}

impl Canvas {
    /// Create a new canvas filled with a color.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = color;
    }

    /// Draw the set pixels of a mask in `color`, top-left at `(x, y)`.
    ///
    /// Unset pixels leave the canvas untouched and anything falling outside
    /// the canvas is clipped.
    pub fn draw_mask(&mut self, mask: &GlyphBitmap, x: i32, y: i32, color: Rgba) {
        for my in 0..mask.height() {
            let cy = y + my as i32;
            if cy < 0 || cy >= self.height as i32 {
                continue;
            }
            for mx in 0..mask.width() {
                let cx = x + mx as i32;
                if cx < 0 || cx >= self.width as i32 {
                    continue;
                }
                if mask.get(mx, my) {
                    self.set(cx as u32, cy as u32, color);
                }
            }
        }
    }

    /// Scale up by an integer factor with nearest-neighbor sampling.
    ///
    /// Returns `None` if the scaled dimensions overflow `u32`.
    pub fn scaled(&self, factor: u32) -> Option<Canvas> {
        if factor <= 1 {
            return Some(self.clone());
        }
        let mut out = Canvas::new(
            self.width.checked_mul(factor)?,
            self.height.checked_mul(factor)?,
            Rgba::TRANSPARENT,
        );
        for y in 0..out.height {
            for x in 0..out.width {
                out.set(x, y, self.get(x / factor, y / factor));
            }
        }
        Some(out)
    }

    /// Convert to RGBA8 bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|c| c.to_array()).collect()
    }

    /// Convert to RGB8 bytes, dropping alpha.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }
}
