use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::{GaugeError, GaugeResult};
use crate::render::Canvas;

/// Where a text command's `(x, y)` sits relative to the drawn string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Center,
    TopCenter,
}

/// A loaded font, cheap to clone.
#[derive(Clone)]
pub struct Typeface {
    font: Arc<Font<'static>>,
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl Typeface {
    pub fn from_bytes(data: Vec<u8>, origin: &str) -> GaugeResult<Self> {
        let font = Font::try_from_vec(data).ok_or_else(|| GaugeError::Font {
            path: origin.to_string(),
        })?;
        Ok(Self {
            font: Arc::new(font),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> GaugeResult<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let data = std::fs::read(path).map_err(|source| GaugeError::Io {
            path: shown.clone(),
            source,
        })?;
        Self::from_bytes(data, &shown)
    }

    fn layout(&self, text: &str, size: f32) -> Vec<PositionedGlyph<'static>> {
        let scale = Scale::uniform(size);
        let v_metrics = self.font.v_metrics(scale);
        self.font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect()
    }

    /// Pixel bounding box `(min_x, max_x, min_y, max_y)` of laid out glyphs.
    fn bounds(glyphs: &[PositionedGlyph<'static>]) -> (i32, i32, i32, i32) {
        glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |(min_x, max_x, min_y, max_y), bb| {
                (
                    min_x.min(bb.min.x),
                    max_x.max(bb.max.x),
                    min_y.min(bb.min.y),
                    max_y.max(bb.max.y),
                )
            },
        )
    }

    pub fn draw(
        &self,
        canvas: &mut Canvas,
        x: f64,
        y: f64,
        text: &str,
        size: f32,
        anchor: TextAnchor,
        color: Color,
    ) {
        let glyphs = self.layout(text, size);
        let (min_x, max_x, min_y, max_y) = Self::bounds(&glyphs);
        let width_px = if min_x < max_x { max_x - min_x } else { 0 };
        let height_px = if min_y < max_y { max_y - min_y } else { 0 };
        let offset_x = x.round() as i32 - width_px / 2;
        let offset_y = match anchor {
            TextAnchor::Center => y.round() as i32 - height_px / 2,
            TextAnchor::TopCenter => y.round() as i32,
        };
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    canvas.blend(px, py, color, v);
                });
            }
        }
    }
}
