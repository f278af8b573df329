//! Static dial layer: arc, ticks and labels, plus the raster cache.

use tracing::debug;

use crate::config::GaugeStyle;
use crate::geometry::{tick_marks, DialGeometry, TickKind, SWEEP, SWEEP_START};
use crate::render::text::{TextAnchor, Typeface};
use crate::render::{DrawCommand, Raster, Scene};

/// Describe the static layer for `(min, max)` at the given size.
pub fn dial_scene(min: f64, max: f64, width: u32, height: u32, style: &GaugeStyle) -> Scene {
    let dial = DialGeometry::new(width, height, style);
    let color = style.dial_color;
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(style.background));
    scene.add_command(DrawCommand::Arc {
        cx: dial.cx,
        cy: dial.cy,
        radius: dial.radius,
        thickness: style.arc_thickness,
        start_angle: SWEEP_START,
        sweep: SWEEP,
        color,
    });

    let tick_outer = dial.radius - style.tick_outer_inset;
    for mark in tick_marks(min, max, style.major_tick_step, style.minor_tick_step) {
        let (inset, thickness) = match mark.kind {
            TickKind::Major => (style.major_tick_inset, style.major_tick_thickness),
            TickKind::Minor => (style.minor_tick_inset, style.minor_tick_thickness),
        };
        let (x0, y0) = dial.point_at(mark.angle, dial.radius - inset);
        let (x1, y1) = dial.point_at(mark.angle, tick_outer);
        scene.add_command(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            thickness,
            color,
        });

        if mark.kind == TickKind::Major {
            let (x, y) = dial.point_at(mark.angle, dial.radius - style.label_inset);
            scene.add_command(DrawCommand::Text {
                x,
                y,
                text: mark.value.to_string(),
                font_size: style.label_font_size,
                anchor: TextAnchor::Center,
                color,
            });
        }
    }
    scene
}

/// Rasterize the static layer. Returns `None` for an unsized surface.
pub fn build_static_layer(
    min: f64,
    max: f64,
    width: u32,
    height: u32,
    style: &GaugeStyle,
    typeface: Option<&Typeface>,
) -> Option<Raster> {
    if width == 0 || height == 0 {
        return None;
    }
    let mut raster = Raster::new(width, height, style.background);
    dial_scene(min, max, width, height, style).render(&mut raster.canvas(), typeface);
    Some(raster)
}

/// Everything the static layer depends on that can change at runtime.
///
/// Bounds are compared bit-for-bit so `-0.0` and `0.0` are distinct keys,
/// which only ever costs an extra rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerKey {
    min_bits: u64,
    max_bits: u64,
    width: u32,
    height: u32,
}

impl LayerKey {
    pub fn new(min: f64, max: f64, width: u32, height: u32) -> Self {
        Self {
            min_bits: min.to_bits(),
            max_bits: max.to_bits(),
            width,
            height,
        }
    }
}

/// Single-entry cache for the static layer raster.
#[derive(Debug, Default)]
pub struct StaticLayerCache {
    key: Option<LayerKey>,
    raster: Option<Raster>,
    builds: u64,
}

impl StaticLayerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_for(&self, key: &LayerKey) -> bool {
        self.raster.is_some() && self.key.as_ref() == Some(key)
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.raster = None;
    }

    /// Number of rasters built so far.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Return the raster for `key`, running `build` only on a miss.
    /// A build that yields nothing leaves the cache empty.
    pub fn get_or_build<F>(&mut self, key: LayerKey, build: F) -> Option<&Raster>
    where
        F: FnOnce() -> Option<Raster>,
    {
        if !self.is_valid_for(&key) {
            self.invalidate();
            if let Some(raster) = build() {
                self.builds += 1;
                debug!(
                    width = raster.width(),
                    height = raster.height(),
                    builds = self.builds,
                    "static layer rebuilt"
                );
                self.key = Some(key);
                self.raster = Some(raster);
            }
        }
        self.raster.as_ref()
    }
}
