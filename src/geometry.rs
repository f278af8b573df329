//! Value-to-angle mapping and dial layout.
//!
//! The dial sweeps 180° across the top of a semicircle in screen
//! coordinates (Y grows downward): `min` points left (π), `max` points
//! right (2π) and the midpoint points straight up (3π/2). Tick marks and the
//! needle both go through [`angle_from_value`], so they always agree.

use std::f64::consts::PI;

use tracing::warn;

use crate::config::GaugeStyle;

/// Angle of the `min` end of the sweep.
pub const SWEEP_START: f64 = PI;
/// Angular extent of the sweep.
pub const SWEEP: f64 = PI;
/// Angle of the `max` end of the sweep.
pub const SWEEP_END: f64 = SWEEP_START + SWEEP;
/// Angle used whenever the range is degenerate.
pub const SWEEP_MID: f64 = SWEEP_START + SWEEP / 2.0;

/// Upper bound on tick marks generated for one layer.
pub const MAX_TICKS: usize = 2000;

/// Clamp `v` into `[min, max]` without panicking on an inverted range.
///
/// `f64::clamp` asserts `min <= max`; a degenerate gauge must still be
/// able to clamp, so this resolves an inverted range to `max`.
pub fn clamp_to_range(v: f64, min: f64, max: f64) -> f64 {
    v.max(min).min(max)
}

/// Map `v` onto the dial sweep.
///
/// Returns [`SWEEP_MID`] when `max - min <= 0` or the range is not finite.
pub fn angle_from_value(v: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if !(range > 0.0 && range.is_finite()) || v.is_nan() {
        return SWEEP_MID;
    }
    let frac = ((clamp_to_range(v, min, max) - min) / range).clamp(0.0, 1.0);
    SWEEP_START + frac * SWEEP
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Major,
    Minor,
}

/// One tick position on the dial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMark {
    pub value: i64,
    pub kind: TickKind,
    pub angle: f64,
}

/// Enumerate major and minor ticks over the integer values in `[min, max]`.
///
/// Majors sit every `major_step` units from `ceil(min)`, minors every
/// `minor_step` units from the same origin, skipping positions a major
/// already occupies. When the range would need more than [`MAX_TICKS`]
/// marks, both steps are multiplied by the same factor so the ticks still
/// span the whole range. An inverted or non-finite range yields no ticks.
pub fn tick_marks(min: f64, max: f64, major_step: u32, minor_step: u32) -> Vec<TickMark> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Vec::new();
    }
    let start = min.ceil() as i64;
    let end = max.floor() as i64;
    if start > end {
        return Vec::new();
    }
    let span = i128::from(end) - i128::from(start);
    let mut major_step = i128::from(major_step.max(1));
    let mut minor_step = i128::from(minor_step.max(1));

    let wanted = span as f64 / minor_step as f64 + span as f64 / major_step as f64;
    let budget = (MAX_TICKS - 2) as f64;
    if wanted > budget {
        let factor = (wanted / budget).ceil() as i128;
        major_step = major_step.saturating_mul(factor);
        minor_step = minor_step.saturating_mul(factor);
        warn!(
            min,
            max,
            major_step = major_step as f64,
            minor_step = minor_step as f64,
            "tick steps coarsened to fit the tick limit"
        );
    }

    let mut marks = Vec::new();
    let mut push_run = |step: i128, kind: TickKind| {
        let mut offset = 0;
        while offset <= span {
            let covered = kind == TickKind::Minor && offset % major_step == 0;
            if !covered {
                let v = (i128::from(start) + offset) as i64;
                marks.push(TickMark {
                    value: v,
                    kind,
                    angle: angle_from_value(v as f64, min, max),
                });
            }
            offset += step;
        }
    };
    push_run(major_step, TickKind::Major);
    push_run(minor_step, TickKind::Minor);
    marks
}

/// Pixel-space layout of the dial for a given surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl DialGeometry {
    pub fn new(width: u32, height: u32, style: &GaugeStyle) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        Self {
            cx: w / 2.0,
            cy: h * style.center_y_factor,
            radius: w.min(h) * style.radius_factor,
        }
    }

    /// Point at `angle` and distance `radius` from the dial center.
    pub fn point_at(&self, angle: f64, radius: f64) -> (f64, f64) {
        (self.cx + angle.cos() * radius, self.cy + angle.sin() * radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn endpoints_hit_the_sweep_exactly() {
        assert_eq!(angle_from_value(0.0, 0.0, 100.0), SWEEP_START);
        assert_eq!(angle_from_value(100.0, 0.0, 100.0), SWEEP_END);
        assert_eq!(angle_from_value(-40.0, -40.0, 7.5), SWEEP_START);
        assert_eq!(angle_from_value(7.5, -40.0, 7.5), SWEEP_END);
    }

    #[test]
    fn midpoint_points_up() {
        let a = angle_from_value(50.0, 0.0, 100.0);
        assert!((a - SWEEP_MID).abs() < 1e-12);
        let geo = DialGeometry {
            cx: 100.0,
            cy: 100.0,
            radius: 50.0,
        };
        let (x, y) = geo.point_at(a, 50.0);
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(angle_from_value(-10.0, 0.0, 100.0), SWEEP_START);
        assert_eq!(angle_from_value(1e9, 0.0, 100.0), SWEEP_END);
    }

    #[test]
    fn degenerate_range_returns_midpoint() {
        for (min, max) in [(5.0, 5.0), (10.0, 0.0), (0.0, f64::INFINITY)] {
            for v in [-1.0, 0.0, 5.0, 100.0] {
                let a = angle_from_value(v, min, max);
                assert_eq!(a, SWEEP_MID);
                assert!(a.is_finite());
            }
        }
    }

    #[test]
    fn clamp_tolerates_inverted_range() {
        assert_eq!(clamp_to_range(50.0, 0.0, 100.0), 50.0);
        assert_eq!(clamp_to_range(150.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp_to_range(5.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn default_range_ticks() {
        let marks = tick_marks(0.0, 100.0, 20, 10);
        let majors: Vec<i64> = marks
            .iter()
            .filter(|m| m.kind == TickKind::Major)
            .map(|m| m.value)
            .collect();
        let minors: Vec<i64> = marks
            .iter()
            .filter(|m| m.kind == TickKind::Minor)
            .map(|m| m.value)
            .collect();
        assert_eq!(majors, vec![0, 20, 40, 60, 80, 100]);
        assert_eq!(minors, vec![10, 30, 50, 70, 90]);
    }

    #[test]
    fn fractional_bounds_stay_inside_the_range() {
        let marks = tick_marks(-5.5, 34.2, 20, 10);
        assert!(marks.iter().all(|m| (m.value as f64) >= -5.5 && (m.value as f64) <= 34.2));
        assert_eq!(marks.first().map(|m| m.value), Some(-5));
    }

    #[test]
    fn inverted_range_has_no_ticks() {
        assert!(tick_marks(100.0, 0.0, 20, 10).is_empty());
        assert!(tick_marks(f64::NAN, 10.0, 20, 10).is_empty());
        assert!(tick_marks(0.4, 0.6, 20, 10).is_empty());
    }

    #[test]
    fn wide_range_coarsens_across_the_whole_dial() {
        let marks = tick_marks(0.0, 50_000.0, 20, 10);
        assert!(marks.len() <= MAX_TICKS);
        let majors: Vec<i64> = marks
            .iter()
            .filter(|m| m.kind == TickKind::Major)
            .map(|m| m.value)
            .collect();
        assert_eq!(majors.first(), Some(&0));
        assert_eq!(majors.last(), Some(&50_000));
        assert!(marks.iter().any(|m| m.kind == TickKind::Minor));
        let step = majors[1] - majors[0];
        assert!(majors.windows(2).all(|w| w[1] - w[0] == step));
    }

    #[test]
    fn huge_range_reaches_the_far_end() {
        let max = 1e12;
        let marks = tick_marks(0.0, max, 20, 10);
        assert!(marks.len() <= MAX_TICKS);
        let last = marks.iter().map(|m| m.value).max().unwrap();
        assert!(last as f64 >= max * 0.99);
        let far = marks.iter().map(|m| m.angle).fold(SWEEP_START, f64::max);
        assert!(SWEEP_END - far < SWEEP * 0.01);
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let marks = tick_marks(-1e300, 1e300, 20, 10);
        assert!(!marks.is_empty());
        assert!(marks.len() <= MAX_TICKS);
    }

    proptest! {
        #[test]
        fn mapping_is_monotonic_and_inside_sweep(
            min in -1e6_f64..1e6,
            span in 1e-3_f64..1e6,
            a in 0.0_f64..1.0,
            b in 0.0_f64..1.0,
        ) {
            let max = min + span;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let v_lo = min + lo * span;
            let v_hi = min + hi * span;
            let ang_lo = angle_from_value(v_lo, min, max);
            let ang_hi = angle_from_value(v_hi, min, max);
            prop_assert!(ang_lo <= ang_hi);
            prop_assert!((SWEEP_START..=SWEEP_END).contains(&ang_lo));
            prop_assert!((SWEEP_START..=SWEEP_END).contains(&ang_hi));
        }

        #[test]
        fn mapping_is_deterministic(v in -1e3_f64..1e3, min in -1e3_f64..0.0, max in 1.0_f64..1e3) {
            prop_assert_eq!(angle_from_value(v, min, max), angle_from_value(v, min, max));
        }
    }
}
