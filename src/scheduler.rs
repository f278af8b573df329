//! Host frame-clock abstraction.
//!
//! The gauge never owns a timer. It asks the host for a per-frame callback,
//! holds the returned [`TickHandle`], and the host delivers ticks back by
//! handle. A tick whose handle is not the gauge's live handle is ignored.

use std::time::Duration;

/// Monotonic timestamp in microseconds.
pub type Micros = u64;

/// Identifies one periodic callback registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Services a gauge needs from its host.
pub trait FrameScheduler {
    /// Current monotonic time. Must never go backwards.
    fn now(&self) -> Micros;

    /// Register a per-frame callback firing roughly every `period`.
    fn schedule(&mut self, period: Duration) -> TickHandle;

    /// Drop a registration. Unknown or already cancelled handles are a no-op.
    fn cancel(&mut self, handle: TickHandle);

    /// Ask for a repaint on the next frame.
    fn request_redraw(&mut self);
}

/// A scheduler whose clock only moves when told to.
///
/// Used by headless hosts and tests: time is advanced explicitly and the
/// caller decides when to deliver ticks for the live handles.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Micros,
    next_id: u64,
    live: Vec<TickHandle>,
    redraws: usize,
    scheduled: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        let micros = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        self.now = self.now.saturating_add(micros);
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Handles currently registered, oldest first.
    pub fn live_handles(&self) -> &[TickHandle] {
        &self.live
    }

    pub fn is_live(&self, handle: TickHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Redraw requests since the last call.
    pub fn take_redraws(&mut self) -> usize {
        std::mem::take(&mut self.redraws)
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn now(&self) -> Micros {
        self.now
    }

    fn schedule(&mut self, _period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        self.live.push(handle);
        self.scheduled += 1;
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let before = self.live.len();
        self.live.retain(|h| *h != handle);
        if self.live.len() != before {
            self.cancelled += 1;
        }
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}
