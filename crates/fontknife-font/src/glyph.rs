//! Glyphs and their layout metadata.

use serde::{Deserialize, Serialize};

use crate::bitmap::GlyphBitmap;
use crate::geometry::{BoundingBox, Size};

/// Layout and storage facts about a single glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMetadata {
    /// Layout box of the glyph cell, `(0, 0, advance, line_height)` for every
    /// reader in this workspace.
    pub glyph_bbox: BoundingBox,
    /// Box around the ink inside the bitmap, if any pixel is set.
    pub bitmap_bbox: Option<BoundingBox>,
    pub bitmap_size: Size,
    /// One byte per pixel, as in an 8-bit mask.
    pub bitmap_len_bytes: usize,
}

impl GlyphMetadata {
    /// Derive metadata for a bitmap laid out in `glyph_bbox`.
    pub fn for_bitmap(bitmap: &GlyphBitmap, glyph_bbox: BoundingBox) -> Self {
        Self {
            glyph_bbox,
            bitmap_bbox: bitmap.ink_bbox(),
            bitmap_size: bitmap.size(),
            bitmap_len_bytes: bitmap.len_bytes(),
        }
    }
}

/// A glyph key with its bitmap and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    /// A single code point or a grapheme cluster.
    pub key: String,
    pub bitmap: GlyphBitmap,
    pub metadata: GlyphMetadata,
}

impl Glyph {
    pub fn new(key: impl Into<String>, bitmap: GlyphBitmap, glyph_bbox: BoundingBox) -> Self {
        let metadata = GlyphMetadata::for_bitmap(&bitmap, glyph_bbox);
        Self {
            key: key.into(),
            bitmap,
            metadata,
        }
    }

    /// The single code point of this glyph, if its key is exactly one `char`.
    pub fn code_point(&self) -> Option<u32> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c as u32),
            _ => None,
        }
    }
}
