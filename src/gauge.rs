//! The gauge widget: property surface, lifecycle and painting.
//!
//! A gauge starts unmapped. While unmapped the needle sits on the logical
//! value and nothing is scheduled; [`Gauge::map`] resynchronises and asks
//! for one redraw. Every setter validates its input before touching state.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::animation::{AnimationController, AnimationState, TickOutcome};
use crate::config::{GaugeConfig, GaugeStyle};
use crate::error::{ensure_finite, GaugeResult};
use crate::geometry::clamp_to_range;
use crate::render::dial::{build_static_layer, LayerKey, StaticLayerCache};
use crate::render::overlay::overlay_scene;
use crate::render::text::Typeface;
use crate::render::Canvas;
use crate::scheduler::{FrameScheduler, TickHandle};
use crate::widget::{Orientation, PaintOutcome, SizeRequest, SkipReason, Widget};

/// Owner-side updates, e.g. sent from a data source over a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeCommand {
    SetRange(f64, f64),
    SetValue(f64),
    SetShowDigital(bool),
    SetBaseDurationMs(f64),
}

/// Host-side notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Tick(TickHandle),
    Map,
    Unmap,
}

/// A semicircular dial whose needle eases toward the latest value.
#[derive(Debug)]
pub struct Gauge {
    min: f64,
    max: f64,
    value: f64,
    show_digital: bool,
    mapped: bool,
    style: GaugeStyle,
    typeface: Option<Typeface>,
    animation: AnimationController,
    cache: StaticLayerCache,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> GaugeResult<Self> {
        let (min, max) = config.range;
        let min = ensure_finite("min", min)?;
        let max = ensure_finite("max", max)?;
        let value = clamp_to_range(ensure_finite("value", config.value)?, min, max);
        let base_duration_ms = ensure_finite("base duration", config.base_duration_ms)?;
        if max <= min {
            warn!(min, max, "degenerate gauge range; needle will rest at the midpoint");
        }
        if config.font.is_none() {
            info!("no typeface configured; labels and readout are not drawn");
        }

        Ok(Self {
            min,
            max,
            value,
            show_digital: config.show_digital,
            mapped: false,
            style: config.style,
            typeface: config.font,
            animation: AnimationController::new(
                value,
                base_duration_ms,
                Duration::from_millis(config.frame_period_ms.max(1)),
            ),
            cache: StaticLayerCache::new(),
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Logical value, not the one currently drawn.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value the needle is drawn at.
    pub fn anim_value(&self) -> f64 {
        self.animation.anim_value()
    }

    pub fn show_digital(&self) -> bool {
        self.show_digital
    }

    pub fn base_duration_ms(&self) -> f64 {
        self.animation.base_duration_ms()
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animation.state()
    }

    pub fn style(&self) -> &GaugeStyle {
        &self.style
    }

    /// Number of static layer rasters built so far.
    pub fn static_layer_builds(&self) -> u64 {
        self.cache.builds()
    }

    /// Replace both bounds. The logical and animated values are clamped into
    /// the new range but no animation is started.
    pub fn set_range<H>(&mut self, min: f64, max: f64, host: &mut H) -> GaugeResult<()>
    where
        H: FrameScheduler + ?Sized,
    {
        let min = ensure_finite("min", min)?;
        let max = ensure_finite("max", max)?;
        if max <= min {
            warn!(min, max, "degenerate gauge range; needle will rest at the midpoint");
        }
        self.min = min;
        self.max = max;
        self.value = clamp_to_range(self.value, min, max);
        self.animation.clamp_into(min, max, host);
        self.cache.invalidate();
        if self.mapped {
            host.request_redraw();
        }
        Ok(())
    }

    /// Set the logical value and animate the needle toward it.
    pub fn set_value<H>(&mut self, value: f64, host: &mut H) -> GaugeResult<()>
    where
        H: FrameScheduler + ?Sized,
    {
        let value = clamp_to_range(ensure_finite("value", value)?, self.min, self.max);
        self.value = value;
        if self.mapped {
            self.animation.retarget(value, host);
        } else {
            self.animation.snap(value, host);
        }
        Ok(())
    }

    pub fn set_show_digital<H>(&mut self, show: bool, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        if self.show_digital != show {
            self.show_digital = show;
            if self.mapped {
                host.request_redraw();
            }
        }
    }

    /// Floors at 1 ms; applies from the next animation run.
    pub fn set_base_duration_ms(&mut self, ms: f64) -> GaugeResult<()> {
        self.animation
            .set_base_duration_ms(ensure_finite("base duration", ms)?);
        Ok(())
    }

    /// The widget became visible: snap to the logical value and repaint once.
    pub fn map<H>(&mut self, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        self.mapped = true;
        self.animation.snap(self.value, host);
        host.request_redraw();
    }

    /// The widget was hidden: stop ticking and snap to the logical value.
    pub fn unmap<H>(&mut self, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        self.mapped = false;
        self.animation.snap(self.value, host);
    }

    /// Release the tick registration before the gauge goes away.
    pub fn teardown<H>(mut self, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        self.animation.cancel(host);
    }

    /// Frame-clock entry point.
    pub fn tick<H>(&mut self, handle: TickHandle, host: &mut H) -> TickOutcome
    where
        H: FrameScheduler + ?Sized,
    {
        self.animation.tick(handle, host)
    }

    pub fn apply<H>(&mut self, command: GaugeCommand, host: &mut H) -> GaugeResult<()>
    where
        H: FrameScheduler + ?Sized,
    {
        match command {
            GaugeCommand::SetRange(min, max) => self.set_range(min, max, host),
            GaugeCommand::SetValue(value) => self.set_value(value, host),
            GaugeCommand::SetShowDigital(show) => {
                self.set_show_digital(show, host);
                Ok(())
            }
            GaugeCommand::SetBaseDurationMs(ms) => self.set_base_duration_ms(ms),
        }
    }

    pub fn handle_event<H>(&mut self, event: HostEvent, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        match event {
            HostEvent::Tick(handle) => {
                self.tick(handle, host);
            }
            HostEvent::Map => self.map(host),
            HostEvent::Unmap => self.unmap(host),
        }
    }
}

impl Widget for Gauge {
    fn measure(&self, _orientation: Orientation, _for_size: Option<u32>) -> SizeRequest {
        SizeRequest {
            minimum: self.style.natural_size,
            natural: self.style.natural_size,
        }
    }

    fn paint(&mut self, frame: &mut [u8], width: u32, height: u32) -> PaintOutcome {
        if width == 0 || height == 0 {
            debug!(width, height, "skipping paint of unsized gauge");
            return PaintOutcome::Skipped(SkipReason::Unsized);
        }
        let expected = width as usize * height as usize * 4;
        if frame.len() != expected {
            warn!(expected, actual = frame.len(), "frame does not match gauge size");
            return PaintOutcome::Skipped(SkipReason::FrameMismatch {
                expected,
                actual: frame.len(),
            });
        }

        let (min, max) = (self.min, self.max);
        let key = LayerKey::new(min, max, width, height);
        let rebuilt = !self.cache.is_valid_for(&key);
        let style = &self.style;
        let typeface = self.typeface.as_ref();
        let Some(layer) = self.cache.get_or_build(key, || {
            build_static_layer(min, max, width, height, style, typeface)
        }) else {
            return PaintOutcome::Skipped(SkipReason::Unsized);
        };
        frame.copy_from_slice(layer.as_bytes());

        let mut canvas = Canvas::new(frame, width as usize, height as usize);
        overlay_scene(
            self.animation.anim_value(),
            min,
            max,
            self.show_digital,
            width,
            height,
            style,
        )
        .render(&mut canvas, typeface);

        PaintOutcome::Painted {
            rebuilt_static_layer: rebuilt,
        }
    }
}
