//! Dynamic layer: needle, hub and the digital readout.

use crate::config::GaugeStyle;
use crate::geometry::{angle_from_value, DialGeometry};
use crate::render::text::TextAnchor;
use crate::render::{DrawCommand, Scene};

/// Text shown by the digital readout.
pub fn format_readout(value: f64) -> String {
    format!("{value:.2}")
}

pub fn overlay_scene(
    anim_value: f64,
    min: f64,
    max: f64,
    show_digital: bool,
    width: u32,
    height: u32,
    style: &GaugeStyle,
) -> Scene {
    let dial = DialGeometry::new(width, height, style);
    let angle = angle_from_value(anim_value, min, max);
    let (tip_x, tip_y) = dial.point_at(angle, dial.radius - style.needle_inset);

    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Line {
        x0: dial.cx,
        y0: dial.cy,
        x1: tip_x,
        y1: tip_y,
        thickness: style.needle_width,
        color: style.needle_color,
    });
    scene.add_command(DrawCommand::Disc {
        cx: dial.cx,
        cy: dial.cy,
        radius: style.hub_radius,
        color: style.needle_color,
    });

    if show_digital {
        scene.add_command(DrawCommand::Text {
            x: f64::from(width) / 2.0,
            y: f64::from(height) * style.readout_y_factor,
            text: format_readout(anim_value),
            font_size: style.readout_font_size,
            anchor: TextAnchor::TopCenter,
            color: style.dial_color,
        });
    }
    scene
}
