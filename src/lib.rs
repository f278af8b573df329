//! Animated semicircular dial gauge.
//!
//! A [`Gauge`] maps a value onto a 180° dial and eases its needle toward new
//! values instead of jumping. It is host-agnostic: the host supplies a
//! monotonic clock, per-frame callbacks and a pixel buffer through
//! [`FrameScheduler`] and [`Widget`], and the gauge hands back RGBA pixels.
//!
//! ```no_run
//! use gauge::{Gauge, GaugeConfig, ManualScheduler, Widget};
//!
//! let mut host = ManualScheduler::new();
//! let mut gauge = Gauge::new(GaugeConfig::builder().base_duration_ms(400.0).build())?;
//! gauge.map(&mut host);
//! gauge.set_value(75.0, &mut host)?;
//!
//! host.advance_ms(16);
//! for handle in host.live_handles().to_vec() {
//!     gauge.tick(handle, &mut host);
//! }
//! let mut frame = vec![0; 240 * 240 * 4];
//! gauge.paint(&mut frame, 240, 240);
//! # Ok::<(), gauge::GaugeError>(())
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod animation;
pub mod config;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod render;
pub mod scheduler;
pub mod widget;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use animation::{AnimationState, TickOutcome};
pub use config::{Color, GaugeConfig, GaugeStyle};
pub use error::{GaugeError, GaugeResult};
pub use gauge::{Gauge, GaugeCommand, HostEvent};
pub use geometry::angle_from_value;
pub use render::text::Typeface;
pub use scheduler::{FrameScheduler, ManualScheduler, Micros, TickHandle};
pub use widget::{Orientation, PaintOutcome, SizeRequest, SkipReason, Widget};
