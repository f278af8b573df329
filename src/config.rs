use bon::Builder;

use crate::render::text::Typeface;

/// Opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

/// Visual layout of the dial and needle.
///
/// Lengths are in pixels, factors are fractions of the surface size.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct GaugeStyle {
    #[builder(default = Color::WHITE)]
    pub background: Color,
    #[builder(default = Color::new(0x1a, 0x1a, 0x1a))]
    pub dial_color: Color,
    #[builder(default = Color::new(0xe6, 0x33, 0x33))]
    pub needle_color: Color,

    // Layout
    #[builder(default = 0.62)]
    pub center_y_factor: f64,
    #[builder(default = 0.42)]
    pub radius_factor: f64,
    #[builder(default = 2.0)]
    pub arc_thickness: f64,

    // Ticks
    #[builder(default = 20)]
    pub major_tick_step: u32,
    #[builder(default = 10)]
    pub minor_tick_step: u32,
    #[builder(default = 12.0)]
    pub major_tick_inset: f64,
    #[builder(default = 8.0)]
    pub minor_tick_inset: f64,
    #[builder(default = 2.0)]
    pub tick_outer_inset: f64,
    #[builder(default = 2.0)]
    pub major_tick_thickness: f64,
    #[builder(default = 1.5)]
    pub minor_tick_thickness: f64,

    // Labels
    #[builder(default = 28.0)]
    pub label_inset: f64,
    #[builder(default = 13.0)]
    pub label_font_size: f32,

    // Needle
    #[builder(default = 20.0)]
    pub needle_inset: f64,
    #[builder(default = 3.0)]
    pub needle_width: f64,
    #[builder(default = 4.5)]
    pub hub_radius: f64,

    // Readout
    #[builder(default = 0.66)]
    pub readout_y_factor: f64,
    #[builder(default = 19.0)]
    pub readout_font_size: f32,

    /// Minimum and natural size reported by `measure`.
    #[builder(default = 240)]
    pub natural_size: u32,
}

impl Default for GaugeStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Initial state and timing of a gauge.
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = (0.0, 100.0))]
    pub range: (f64, f64),
    #[builder(default = 0.0)]
    pub value: f64,
    #[builder(default = true)]
    pub show_digital: bool,

    /// Animation duration for a 50-unit change.
    #[builder(default = 600.0)]
    pub base_duration_ms: f64,
    /// Tick period requested from the host frame clock.
    #[builder(default = 16)]
    pub frame_period_ms: u64,

    #[builder(default)]
    pub style: GaugeStyle,
    pub font: Option<Typeface>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
