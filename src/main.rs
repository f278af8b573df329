//! Demo host: a window with one gauge driven by a random data source.
//!
//! The window plays the role of the host toolkit. It owns the frame clock,
//! delivers ticks for the gauge's live handle, forwards occlusion as
//! map/unmap and paints into a `pixels` framebuffer.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use pixels::{Pixels, SurfaceTexture};
use rand::Rng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use gauge::{
    FrameScheduler, Gauge, GaugeCommand, GaugeConfig, HostEvent, Micros, TickHandle, Typeface,
    Widget,
};

#[derive(Parser, Debug)]
#[command(name = "gauge-demo", about = "Animated dial gauge demo")]
struct Args {
    /// Lower bound of the dial
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    min: f64,

    /// Upper bound of the dial
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    max: f64,

    /// Animation duration for a 50-unit change
    #[arg(long, default_value_t = 600.0)]
    base_duration_ms: f64,

    /// TrueType/OpenType font for labels and the readout
    #[arg(long)]
    font: Option<PathBuf>,

    /// Hide the digital readout
    #[arg(long)]
    no_digital: bool,

    /// Milliseconds between random target values
    #[arg(long, default_value_t = 1500)]
    interval_ms: u64,

    #[arg(long, default_value_t = 320)]
    width: u32,

    #[arg(long, default_value_t = 320)]
    height: u32,

    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    #[arg(long, default_value = "Gauge")]
    title: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Frame clock backed by the window's event loop.
struct WindowClock {
    origin: Instant,
    next_id: u64,
    live: Option<TickHandle>,
    period: Duration,
    last_tick: Instant,
    redraw_pending: bool,
}

impl WindowClock {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            next_id: 0,
            live: None,
            period: Duration::from_millis(16),
            last_tick: now,
            redraw_pending: false,
        }
    }

    /// Handle to fire if a frame period has passed since the last tick.
    fn due(&mut self) -> Option<TickHandle> {
        let handle = self.live?;
        if self.last_tick.elapsed() < self.period {
            return None;
        }
        self.last_tick = Instant::now();
        Some(handle)
    }

    fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }
}

impl FrameScheduler for WindowClock {
    fn now(&self) -> Micros {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    fn schedule(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        self.live = Some(handle);
        self.period = period;
        self.last_tick = Instant::now();
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.live == Some(handle) {
            self.live = None;
        }
    }

    fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }
}

fn spawn_source(min: f64, max: f64, interval: Duration) -> Receiver<GaugeCommand> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            thread::sleep(interval);
            let value = if min < max {
                rng.random_range(min..max)
            } else {
                min
            };
            if sender.send(GaugeCommand::SetValue(value)).is_err() {
                break;
            }
        }
    });
    receiver
}

fn drain_commands(gauge: &mut Gauge, receiver: &Receiver<GaugeCommand>, clock: &mut WindowClock) {
    while let Ok(command) = receiver.try_recv() {
        if let Err(err) = gauge.apply(command, clock) {
            warn!(%err, "dropping gauge command");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gauge={0},gauge_demo={0}", args.log_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let font = args.font.as_ref().map(Typeface::from_file).transpose()?;
    let config = GaugeConfig::builder()
        .range((args.min, args.max))
        .value(args.min)
        .show_digital(!args.no_digital)
        .base_duration_ms(args.base_duration_ms)
        .frame_period_ms((1000.0 / args.fps.max(1.0)).round() as u64)
        .maybe_font(font)
        .build();
    let mut gauge = Gauge::new(config)?;
    let receiver = spawn_source(args.min, args.max, Duration::from_millis(args.interval_ms));

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&args.title)
        .with_inner_size(LogicalSize::new(args.width as f64, args.height as f64))
        .build(&event_loop)?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let mut fb_width = size.width;
    let mut fb_height = size.height;
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

    let mut clock = WindowClock::new();
    gauge.handle_event(HostEvent::Map, &mut clock);
    info!(min = args.min, max = args.max, "gauge demo running");

    let window_clone = window.clone();
    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    gauge.handle_event(HostEvent::Unmap, &mut clock);
                    window_target.exit();
                }
                WindowEvent::Occluded(hidden) if hidden == gauge.is_mapped() => {
                    let event = if hidden { HostEvent::Unmap } else { HostEvent::Map };
                    gauge.handle_event(event, &mut clock);
                }
                WindowEvent::Resized(new_size) => {
                    fb_width = new_size.width;
                    fb_height = new_size.height;
                    if fb_width > 0 && fb_height > 0 {
                        if let Err(err) = pixels.resize_buffer(fb_width, fb_height) {
                            warn!(%err, "failed to resize pixel buffer");
                        }
                        if let Err(err) = pixels.resize_surface(fb_width, fb_height) {
                            warn!(%err, "failed to resize surface");
                        }
                    }
                    clock.request_redraw();
                }
                WindowEvent::RedrawRequested => {
                    gauge.paint(pixels.frame_mut(), fb_width, fb_height);
                    if let Err(err) = pixels.render() {
                        error!(%err, "render failed");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                drain_commands(&mut gauge, &receiver, &mut clock);
                if let Some(handle) = clock.due() {
                    gauge.handle_event(HostEvent::Tick(handle), &mut clock);
                }
                if clock.take_redraw() {
                    window_clone.request_redraw();
                } else {
                    thread::sleep(Duration::from_millis(1));
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
