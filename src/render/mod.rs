// ============================================================================
// RETAINED MODE SCENE & SOFTWARE RASTERIZER
// ============================================================================
//
// Layers are described as a list of draw commands first and rasterized into
// an RGBA8 buffer afterwards. The static dial and the needle overlay share
// the same primitives.

pub mod dial;
pub mod overlay;
pub mod text;

use std::f64::consts::TAU;

use crate::config::Color;
use text::{TextAnchor, Typeface};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        thickness: f64,
        start_angle: f64,
        sweep: f64,
        color: Color,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f64,
        color: Color,
    },
    Disc {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f32,
        anchor: TextAnchor,
        color: Color,
    },
}

#[derive(Debug, Default, Clone)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Rasterize every command in order. Text is skipped without a typeface.
    pub fn render(&self, canvas: &mut Canvas, typeface: Option<&Typeface>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Arc {
                    cx,
                    cy,
                    radius,
                    thickness,
                    start_angle,
                    sweep,
                    color,
                } => canvas.draw_arc(*cx, *cy, *radius, *thickness, *start_angle, *sweep, *color),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    color,
                } => canvas.draw_thick_line_aa(*x0, *y0, *x1, *y1, *thickness, *color),
                DrawCommand::Disc {
                    cx,
                    cy,
                    radius,
                    color,
                } => canvas.draw_disc(*cx, *cy, *radius, *color),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    anchor,
                    color,
                } => {
                    if let Some(face) = typeface {
                        face.draw(canvas, *x, *y, text, *font_size, *anchor, *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// PIXEL BUFFERS
// ============================================================================

/// Owned RGBA8 image, used for the cached static layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let len = width as usize * height as usize;
        let data = fill.as_rgba().repeat(len);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(&mut self.data, self.width as usize, self.height as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.data[idx..idx + 4]);
        Some(out)
    }
}

/// Borrowed RGBA8 drawing surface.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = color.as_rgba();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Source-over blend of `color` at `alpha` into one pixel.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        if idx + 4 > self.frame.len() {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r, color.g, color.b];
        for (channel, s) in self.frame[idx..idx + 3].iter_mut().zip(src) {
            *channel = (f32::from(s) * a + f32::from(*channel) * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    pub fn draw_thick_line_aa(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f64,
        color: Color,
    ) {
        let pad = thickness.ceil() + 1.0;
        let min_x = (x0.min(x1) - pad).floor() as i32;
        let max_x = (x0.max(x1) + pad).ceil() as i32;
        let min_y = (y0.min(y1) - pad).floor() as i32;
        let max_y = (y0.max(y1) + pad).ceil() as i32;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 - x0;
                let py = y as f64 - y0;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = ((lx - x as f64).powi(2) + (ly - y as f64).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    pub fn draw_disc(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let reach = radius + 1.0;
        for y in (cy - reach).floor() as i32..=(cy + reach).ceil() as i32 {
            for x in (cx - reach).floor() as i32..=(cx + reach).ceil() as i32 {
                let dist = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
                let aa = if dist > radius {
                    1.0 - (dist - radius).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Stroke the ring of `radius` between `start_angle` and
    /// `start_angle + sweep`, centered on the radius.
    pub fn draw_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        thickness: f64,
        start_angle: f64,
        sweep: f64,
        color: Color,
    ) {
        let outer = radius + thickness / 2.0;
        let inner = (radius - thickness / 2.0).max(0.0);
        let reach = outer + 1.0;
        for y in (cy - reach).floor() as i32..=(cy + reach).ceil() as i32 {
            for x in (cx - reach).floor() as i32..=(cx + reach).ceil() as i32 {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > outer + 1.0 || dist < inner - 1.0 {
                    continue;
                }
                let rel = (dy.atan2(dx) - start_angle).rem_euclid(TAU);
                if rel > sweep {
                    continue;
                }
                let aa = (outer + 0.5 - dist)
                    .clamp(0.0, 1.0)
                    .min((dist - inner + 0.5).clamp(0.0, 1.0));
                if aa > 0.01 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }
}
