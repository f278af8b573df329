//! Time-based needle animation.
//!
//! The needle eases from wherever it currently is toward the latest target
//! along an ease-out cubic curve. Duration scales linearly with the size of
//! the jump: a change of [`REFERENCE_DELTA`] units takes the configured base
//! duration, twice that takes twice as long, and nothing is faster than
//! [`MIN_DURATION_MS`]. There is no upper cap.
//!
//! Retargeting mid-flight samples the running curve first and starts the
//! new run from that point, so the needle never jumps.

use std::time::Duration;

use tracing::debug;

use crate::geometry::clamp_to_range;
use crate::scheduler::{FrameScheduler, Micros, TickHandle};

/// Change magnitude that takes exactly the base duration.
pub const REFERENCE_DELTA: f64 = 50.0;
/// Shortest run, in milliseconds.
pub const MIN_DURATION_MS: f64 = 1.0;

/// Ease-out cubic: `1 - (1 - t)^3`, with `t` clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Run length for a jump of `delta` units.
pub fn duration_ms_for(delta: f64, base_duration_ms: f64) -> f64 {
    (delta.abs() / REFERENCE_DELTA * base_duration_ms).max(MIN_DURATION_MS)
}

/// One in-flight animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRun {
    pub start_value: f64,
    pub target_value: f64,
    pub start_time: Micros,
    pub duration_us: u64,
}

impl AnimationRun {
    pub fn new(start_value: f64, target_value: f64, start_time: Micros, base_duration_ms: f64) -> Self {
        let duration_ms = duration_ms_for(target_value - start_value, base_duration_ms);
        Self {
            start_value,
            target_value,
            start_time,
            duration_us: ((duration_ms * 1000.0).round() as u64).max(1),
        }
    }

    /// Normalized elapsed time; `>= 1` once the run is over.
    pub fn progress(&self, now: Micros) -> f64 {
        now.saturating_sub(self.start_time) as f64 / self.duration_us as f64
    }

    /// Interpolated value at `now`, or `None` when the run has finished.
    pub fn sample(&self, now: Micros) -> Option<f64> {
        let t = self.progress(now);
        if t >= 1.0 {
            return None;
        }
        let u = ease_out_cubic(t);
        Some(self.start_value + (self.target_value - self.start_value) * u)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Animating,
}

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Handle was stale or no run is active; nothing happened.
    Ignored,
    /// The needle moved and a redraw was requested.
    Advanced(f64),
    /// The run completed at the target and the tick was cancelled.
    Finished(f64),
}

/// Owns the animated needle value and the gauge's single tick registration.
#[derive(Debug, Clone)]
pub struct AnimationController {
    anim_value: f64,
    base_duration_ms: f64,
    frame_period: Duration,
    run: Option<AnimationRun>,
    tick: Option<TickHandle>,
}

impl AnimationController {
    pub fn new(initial: f64, base_duration_ms: f64, frame_period: Duration) -> Self {
        Self {
            anim_value: initial,
            base_duration_ms: base_duration_ms.max(MIN_DURATION_MS),
            frame_period,
            run: None,
            tick: None,
        }
    }

    pub fn anim_value(&self) -> f64 {
        self.anim_value
    }

    pub fn base_duration_ms(&self) -> f64 {
        self.base_duration_ms
    }

    /// Takes effect on the next run.
    pub fn set_base_duration_ms(&mut self, ms: f64) {
        self.base_duration_ms = ms.max(MIN_DURATION_MS);
    }

    pub fn state(&self) -> AnimationState {
        match self.run {
            Some(_) => AnimationState::Animating,
            None => AnimationState::Idle,
        }
    }

    pub fn run(&self) -> Option<&AnimationRun> {
        self.run.as_ref()
    }

    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.tick
    }

    /// Start or restart a run toward `target` from the current animated value.
    pub fn retarget<H>(&mut self, target: f64, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        let now = host.now();
        if let Some(run) = self.run {
            self.anim_value = run.sample(now).unwrap_or(run.target_value);
        }

        if target == self.anim_value {
            self.run = None;
            self.cancel(host);
            return;
        }

        let run = AnimationRun::new(self.anim_value, target, now, self.base_duration_ms);
        debug!(
            from = run.start_value,
            to = run.target_value,
            duration_ms = run.duration_us as f64 / 1000.0,
            "needle animation started"
        );
        self.run = Some(run);
        if self.tick.is_none() {
            let handle = host.schedule(self.frame_period);
            debug!(tick = handle.id(), "frame tick registered");
            self.tick = Some(handle);
        }
    }

    /// Advance the active run. Ticks carrying any handle other than the
    /// live one are ignored without side effects.
    pub fn tick<H>(&mut self, handle: TickHandle, host: &mut H) -> TickOutcome
    where
        H: FrameScheduler + ?Sized,
    {
        if self.tick != Some(handle) {
            return TickOutcome::Ignored;
        }
        let Some(run) = self.run else {
            self.cancel(host);
            return TickOutcome::Ignored;
        };

        match run.sample(host.now()) {
            Some(value) => {
                self.anim_value = value;
                host.request_redraw();
                TickOutcome::Advanced(value)
            }
            None => {
                self.anim_value = run.target_value;
                self.run = None;
                host.request_redraw();
                self.cancel(host);
                debug!(value = run.target_value, "needle animation finished");
                TickOutcome::Finished(run.target_value)
            }
        }
    }

    /// Drop any run and jump straight to `value`.
    pub fn snap<H>(&mut self, value: f64, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        self.run = None;
        self.cancel(host);
        self.anim_value = value;
    }

    /// Pull the needle and any in-flight target inside a new range.
    ///
    /// A live run restarts from the clamped position at the current time,
    /// or settles if that position already is the clamped target.
    pub fn clamp_into<H>(&mut self, min: f64, max: f64, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        let Some(run) = self.run else {
            self.anim_value = clamp_to_range(self.anim_value, min, max);
            return;
        };
        let now = host.now();
        let current = run.sample(now).unwrap_or(run.target_value);
        self.anim_value = clamp_to_range(current, min, max);
        let target = clamp_to_range(run.target_value, min, max);
        if target == self.anim_value {
            self.run = None;
            self.cancel(host);
            return;
        }
        self.run = Some(AnimationRun::new(
            self.anim_value,
            target,
            now,
            self.base_duration_ms,
        ));
    }

    /// Unregister the tick callback. Safe to call when nothing is scheduled.
    pub fn cancel<H>(&mut self, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        if let Some(handle) = self.tick.take() {
            host.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use proptest::prelude::*;

    fn controller(base_ms: f64) -> AnimationController {
        AnimationController::new(0.0, base_ms, Duration::from_millis(16))
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        assert_eq!(ease_out_cubic(-3.0), 0.0);
        assert_eq!(ease_out_cubic(7.0), 1.0);
    }

    #[test]
    fn duration_scales_with_the_jump() {
        assert_eq!(duration_ms_for(50.0, 2000.0), 2000.0);
        assert_eq!(duration_ms_for(100.0, 2000.0), 4000.0);
        assert_eq!(duration_ms_for(-100.0, 2000.0), 4000.0);
        assert_eq!(duration_ms_for(1000.0, 2000.0), 40_000.0);
        assert_eq!(duration_ms_for(0.001, 1.0), MIN_DURATION_MS);
    }

    #[test]
    fn run_samples_along_the_curve() {
        let run = AnimationRun::new(0.0, 100.0, 1_000, 2000.0);
        assert_eq!(run.duration_us, 4_000_000);
        assert_eq!(run.sample(1_000), Some(0.0));
        let mid = run.sample(1_000 + 2_000_000).unwrap();
        assert!((mid - 87.5).abs() < 1e-9);
        assert_eq!(run.sample(1_000 + 4_000_000), None);
    }

    #[test]
    fn retarget_schedules_once() {
        let mut host = ManualScheduler::new();
        let mut anim = controller(600.0);
        anim.retarget(40.0, &mut host);
        anim.retarget(60.0, &mut host);
        assert_eq!(host.scheduled_count(), 1);
        assert_eq!(anim.state(), AnimationState::Animating);
        assert!(anim.tick_handle().is_some());
    }

    #[test]
    fn retarget_to_current_value_settles() {
        let mut host = ManualScheduler::new();
        let mut anim = controller(600.0);
        anim.retarget(0.0, &mut host);
        assert_eq!(anim.state(), AnimationState::Idle);
        assert_eq!(host.scheduled_count(), 0);
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut host = ManualScheduler::new();
        let mut anim = controller(600.0);
        anim.retarget(50.0, &mut host);
        host.advance_ms(100);
        let outcome = anim.tick(TickHandle::new(999), &mut host);
        assert_eq!(outcome, TickOutcome::Ignored);
        assert_eq!(anim.anim_value(), 0.0);
        assert_eq!(host.take_redraws(), 0);
    }

    #[test]
    fn snap_cancels_and_jumps() {
        let mut host = ManualScheduler::new();
        let mut anim = controller(600.0);
        anim.retarget(50.0, &mut host);
        anim.snap(50.0, &mut host);
        anim.snap(50.0, &mut host);
        assert_eq!(anim.anim_value(), 50.0);
        assert_eq!(anim.state(), AnimationState::Idle);
        assert!(host.live_handles().is_empty());
        assert_eq!(host.cancelled_count(), 1);
    }

    #[test]
    fn clamp_into_restarts_from_the_current_position() {
        let mut host = ManualScheduler::new();
        let mut anim = controller(1000.0);
        anim.retarget(100.0, &mut host);
        host.advance_ms(500);
        let before = anim.run().unwrap().sample(host.now()).unwrap();

        anim.clamp_into(0.0, 80.0, &mut host);
        let run = *anim.run().unwrap();
        assert_eq!(run.start_value, before);
        assert_eq!(run.start_time, host.now());
        assert_eq!(run.target_value, 80.0);
        assert_eq!(anim.anim_value(), before);
        assert_eq!(host.scheduled_count(), 1);
    }

    #[test]
    fn clamp_into_settles_when_already_past_the_new_max() {
        let mut host = ManualScheduler::new();
        let mut anim = controller(1000.0);
        anim.retarget(100.0, &mut host);
        host.advance_ms(500);
        let handle = anim.tick_handle().unwrap();

        anim.clamp_into(0.0, 20.0, &mut host);
        assert_eq!(anim.anim_value(), 20.0);
        assert_eq!(anim.state(), AnimationState::Idle);
        assert!(!host.is_live(handle));
        host.advance_ms(16);
        assert_eq!(anim.tick(handle, &mut host), TickOutcome::Ignored);
        assert_eq!(anim.anim_value(), 20.0);
    }

    #[test]
    fn clamp_into_without_a_run_only_clamps() {
        let mut host = ManualScheduler::new();
        let mut anim = AnimationController::new(70.0, 600.0, Duration::from_millis(16));
        anim.clamp_into(0.0, 50.0, &mut host);
        assert_eq!(anim.anim_value(), 50.0);
        assert_eq!(host.scheduled_count(), 0);
        assert_eq!(host.take_redraws(), 0);
    }

    #[test]
    fn base_duration_floors_at_one_ms() {
        let mut anim = controller(0.0);
        assert_eq!(anim.base_duration_ms(), 1.0);
        anim.set_base_duration_ms(-20.0);
        assert_eq!(anim.base_duration_ms(), 1.0);
    }

    proptest! {
        #[test]
        fn easing_is_monotonic(a in 0.0_f64..=1.0, b in 0.0_f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ease_out_cubic(lo) <= ease_out_cubic(hi));
        }

        #[test]
        fn samples_stay_between_endpoints(
            start in -500.0_f64..500.0,
            target in -500.0_f64..500.0,
            elapsed_us in 0_u64..50_000_000,
        ) {
            let run = AnimationRun::new(start, target, 0, 600.0);
            if let Some(v) = run.sample(elapsed_us) {
                let (lo, hi) = if start <= target { (start, target) } else { (target, start) };
                prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
            }
        }
    }
}
