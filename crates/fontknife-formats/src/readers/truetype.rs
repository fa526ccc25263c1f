//! Outline font (TTF/OTF) rasterization.

use fontknife_font::{default_glyph_sequence, BoundingBox, GlyphBitmap, RasterFont, Size};
use swash::scale::{Render, ScaleContext, Scaler, Source};
use swash::zeno::Format;
use swash::{FontRef, GlyphId};
use tracing::{debug, warn};

use super::FormatReader;
use crate::error::FormatError;
use crate::options::LoadOptions;

const FORMAT: &str = "TrueType";

/// Coverage at or above this alpha becomes ink.
const INK_THRESHOLD: u8 = 128;

const TOFU_MARGIN_PX: u32 = 1;

/// Rasterizes TrueType and OpenType fonts at a fixed point size.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueTypeReader;

impl FormatReader for TrueTypeReader {
    fn read(
        &self,
        data: &[u8],
        origin: &str,
        options: &LoadOptions,
    ) -> Result<RasterFont, FormatError> {
        let font = FontRef::from_index(data, 0)
            .ok_or_else(|| FormatError::parse(FORMAT, "not a TrueType or OpenType font"))?;
        let points = options.font_size_points;
        if points == 0 {
            return Err(FormatError::parse(FORMAT, "font size must be at least 1 point"));
        }
        let px = points as f32;

        let metrics = font.metrics(&[]).scale(px);
        let ascent = metrics.ascent.ceil().max(0.0) as i32;
        let descent = metrics.descent.abs().ceil() as i32;
        let line_height = (ascent + descent) as u32;
        let advances = font.glyph_metrics(&[]).scale(px);
        debug!(points, ascent, descent, "rasterizing outline font");

        let mut context = ScaleContext::new();
        let mut scaler = context.builder(font).size(px).hint(false).build();
        let charmap = font.charmap();

        let sequence = options
            .glyph_sequence
            .clone()
            .unwrap_or_else(default_glyph_sequence);

        let mut builder = RasterFont::builder().path(origin).size_points(Some(points));
        for key in sequence {
            let ids: Option<Vec<GlyphId>> = key
                .chars()
                .map(|c| {
                    let id = charmap.map(c);
                    (id != 0).then_some(id)
                })
                .collect();

            let cell = match ids {
                Some(ids) if !ids.is_empty() => {
                    let width: f32 = ids.iter().map(|&id| advances.advance_width(id)).sum();
                    let mut cell = GlyphBitmap::new(width.ceil().max(0.0) as u32, line_height);
                    let mut pen = 0.0f32;
                    for id in ids {
                        draw_glyph(&mut cell, &mut scaler, id, pen.round() as i32, ascent);
                        pen += advances.advance_width(id);
                    }
                    cell
                }
                _ => {
                    warn!(glyph = %key, "glyph not found in font, using tofu");
                    // .notdef sets the width of placeholder cells
                    let width = advances.advance_width(0).ceil().max(1.0) as u32;
                    GlyphBitmap::tofu(Size::new(width, line_height), TOFU_MARGIN_PX)
                }
            };

            let bbox = BoundingBox::from_size(cell.size());
            builder = builder.glyph(key, cell, bbox);
        }

        Ok(builder.build())
    }
}

/// Render one glyph's coverage mask into `cell` with its origin at
/// `(pen_x, baseline)`.
fn draw_glyph(cell: &mut GlyphBitmap, scaler: &mut Scaler, id: GlyphId, pen_x: i32, baseline: i32) {
    let Some(image) = Render::new(&[Source::Outline])
        .format(Format::Alpha)
        .render(scaler, id)
    else {
        return;
    };

    let placement = image.placement;
    let left = pen_x + placement.left;
    let top = baseline - placement.top;
    for y in 0..placement.height {
        for x in 0..placement.width {
            let alpha = image
                .data
                .get((y * placement.width + x) as usize)
                .copied()
                .unwrap_or(0);
            if alpha < INK_THRESHOLD {
                continue;
            }
            let (cx, cy) = (left + x as i32, top + y as i32);
            if cx >= 0 && cy >= 0 {
                cell.set(cx as u32, cy as u32, true);
            }
        }
    }
}
