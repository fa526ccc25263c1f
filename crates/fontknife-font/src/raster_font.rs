//! The in-memory raster font shared by every reader and writer.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::bitmap::GlyphBitmap;
use crate::error::FontError;
use crate::geometry::{BoundingBox, Size};
use crate::glyph::{Glyph, GlyphMetadata};
use crate::graphemes::{graphemes, ordered_missing};

/// Margin between the tofu outline and the edge of its cell.
const TOFU_MARGIN_PX: u32 = 1;

/// Metadata key holding the path a font was loaded from.
pub const PATH_METADATA_KEY: &str = "path";

/// An ordered table of glyph bitmaps with metrics.
///
/// Glyph order is the order glyphs were provided in, and keys are unique.
/// Looking up a missing glyph non-strictly returns a "tofu" rectangle sized
/// to the largest glyph cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RasterFontParts", into = "RasterFontParts")]
pub struct RasterFont {
    glyphs: Vec<Glyph>,
    index: HashMap<String, usize>,
    tracking_px: u32,
    size_points: Option<u32>,
    metadata: BTreeMap<String, String>,
    max_glyph_bbox: Option<BoundingBox>,
    tofu: Glyph,
}

/// Serialized form of a [`RasterFont`]; derived tables are rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RasterFontParts {
    glyphs: Vec<Glyph>,
    #[serde(default)]
    tracking_px: u32,
    #[serde(default)]
    size_points: Option<u32>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

impl From<RasterFontParts> for RasterFont {
    fn from(parts: RasterFontParts) -> Self {
        let mut builder = RasterFont::builder()
            .tracking_px(parts.tracking_px)
            .size_points(parts.size_points);
        builder.metadata = parts.metadata;
        for glyph in parts.glyphs {
            builder = builder.push(glyph);
        }
        builder.build()
    }
}

impl From<RasterFont> for RasterFontParts {
    fn from(font: RasterFont) -> Self {
        Self {
            glyphs: font.glyphs,
            tracking_px: font.tracking_px,
            size_points: font.size_points,
            metadata: font.metadata,
        }
    }
}

impl Default for RasterFont {
    fn default() -> Self {
        RasterFont::builder().build()
    }
}

impl RasterFont {
    pub fn builder() -> RasterFontBuilder {
        RasterFontBuilder::default()
    }

    /// Number of glyphs provided by the font.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph keys in the order the font provides them.
    pub fn provided_glyphs(&self) -> Vec<String> {
        self.glyphs.iter().map(|g| g.key.clone()).collect()
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The stored glyph for a key, without tofu fallback.
    pub fn get(&self, key: &str) -> Option<&Glyph> {
        self.index.get(key).map(|&i| &self.glyphs[i])
    }

    /// Glyph for a key, falling back to tofu unless `strict` is set.
    pub fn glyph_or_tofu(&self, key: &str, strict: bool) -> Result<&Glyph, FontError> {
        match self.get(key) {
            Some(glyph) => Ok(glyph),
            None if strict => Err(FontError::MissingGlyphs {
                context: "Glyph not found in font".to_string(),
                missing: vec![key.to_string()],
            }),
            None => Ok(&self.tofu),
        }
    }

    /// Bitmap for a key, falling back to tofu unless `strict` is set.
    pub fn get_glyph(&self, key: &str, strict: bool) -> Result<&GlyphBitmap, FontError> {
        self.glyph_or_tofu(key, strict).map(|g| &g.bitmap)
    }

    /// Metadata for a key, or the tofu metadata if the font lacks it.
    pub fn get_glyph_metadata(&self, key: &str) -> &GlyphMetadata {
        match self.get(key) {
            Some(glyph) => &glyph.metadata,
            None => &self.tofu.metadata,
        }
    }

    /// The missing-glyph bitmap.
    pub fn tofu(&self) -> &GlyphBitmap {
        &self.tofu.bitmap
    }

    /// Size of the union of every glyph cell, `(0, 0)` for an empty font.
    pub fn max_glyph_size(&self) -> Size {
        self.max_glyph_bbox
            .map(|bbox| bbox.size())
            .unwrap_or_default()
    }

    pub fn tracking_px(&self) -> u32 {
        self.tracking_px
    }

    pub fn size_points(&self) -> Option<u32> {
        self.size_points
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Where the font was loaded from, if known.
    pub fn path(&self) -> Option<&str> {
        self.metadata.get(PATH_METADATA_KEY).map(String::as_str)
    }

    /// Return a copy recording a different load path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.insert(PATH_METADATA_KEY.to_string(), path.into());
        self
    }

    /// Return a copy with different tracking.
    pub fn with_tracking_px(mut self, tracking_px: u32) -> Self {
        self.tracking_px = tracking_px;
        self
    }

    /// Graphemes of `text`, or an error naming every grapheme the font lacks.
    fn require_glyphs(&self, text: &str, action: &str) -> Result<Vec<String>, FontError> {
        let clusters = graphemes(text);
        let missing = ordered_missing(clusters.iter().map(String::as_str), |g| self.contains(g));
        if !missing.is_empty() {
            return Err(FontError::MissingGlyphs {
                context: format!("Can't {} for {:?}", action, text),
                missing,
            });
        }
        Ok(clusters)
    }

    /// Pixel size of `text` laid out on one line.
    ///
    /// Width is the sum of glyph widths plus tracking between adjacent glyphs;
    /// height is the tallest glyph.
    pub fn getsize(&self, text: &str) -> Result<Size, FontError> {
        let clusters = self.require_glyphs(text, "calculate size")?;
        Ok(self.measure(&clusters))
    }

    fn measure(&self, clusters: &[String]) -> Size {
        let mut width = 0;
        let mut height = 0;
        for key in clusters {
            let size = self.get_glyph_metadata(key).bitmap_size;
            width += size.width;
            height = height.max(size.height);
        }
        if clusters.len() > 1 {
            width += self.tracking_px * (clusters.len() as u32 - 1);
        }
        Size::new(width, height)
    }

    /// Render `text` into a single bitmap, glyphs pasted left to right.
    pub fn getmask(&self, text: &str) -> Result<GlyphBitmap, FontError> {
        let clusters = self.require_glyphs(text, "render mask")?;
        let size = self.measure(&clusters);
        let mut mask = GlyphBitmap::new(size.width, size.height);

        let mut x = 0i32;
        for key in &clusters {
            let bitmap = self.get_glyph(key, true)?;
            mask.paste(bitmap, x, 0);
            x += (bitmap.width() + self.tracking_px) as i32;
        }
        Ok(mask)
    }

    /// Bounding box of `text` as laid out by [`RasterFont::getsize`].
    pub fn getbbox(&self, text: &str) -> Result<BoundingBox, FontError> {
        Ok(BoundingBox::from_size(self.getsize(text)?))
    }
}

/// Builds a [`RasterFont`] one glyph at a time.
#[derive(Debug, Clone, Default)]
pub struct RasterFontBuilder {
    glyphs: Vec<Glyph>,
    index: HashMap<String, usize>,
    tracking_px: u32,
    size_points: Option<u32>,
    metadata: BTreeMap<String, String>,
}

impl RasterFontBuilder {
    /// Add a glyph from a bitmap laid out in `glyph_bbox`.
    ///
    /// A key already present is replaced in place.
    pub fn glyph(
        self,
        key: impl Into<String>,
        bitmap: GlyphBitmap,
        glyph_bbox: BoundingBox,
    ) -> Self {
        self.push(Glyph::new(key, bitmap, glyph_bbox))
    }

    /// Add a prepared glyph, replacing any earlier glyph with the same key.
    pub fn push(mut self, glyph: Glyph) -> Self {
        self.insert(glyph);
        self
    }

    /// Add a glyph in place.
    pub fn insert(&mut self, glyph: Glyph) {
        match self.index.get(&glyph.key) {
            Some(&i) => self.glyphs[i] = glyph,
            None => {
                self.index.insert(glyph.key.clone(), self.glyphs.len());
                self.glyphs.push(glyph);
            }
        }
    }

    pub fn tracking_px(mut self, tracking_px: u32) -> Self {
        self.tracking_px = tracking_px;
        self
    }

    pub fn size_points(mut self, size_points: Option<u32>) -> Self {
        self.size_points = size_points;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn path(self, path: impl Into<String>) -> Self {
        self.metadata(PATH_METADATA_KEY, path)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn build(self) -> RasterFont {
        let max_glyph_bbox =
            BoundingBox::enclosing_all(self.glyphs.iter().map(|g| &g.metadata.glyph_bbox));
        let max_size = max_glyph_bbox.map(|b| b.size()).unwrap_or_default();
        let tofu = Glyph::new(
            "",
            GlyphBitmap::tofu(max_size, TOFU_MARGIN_PX),
            BoundingBox::from_size(max_size),
        );

        RasterFont {
            glyphs: self.glyphs,
            index: self.index,
            tracking_px: self.tracking_px,
            size_points: self.size_points,
            metadata: self.metadata,
            max_glyph_bbox,
            tofu,
        }
    }
}
