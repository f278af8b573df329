use gauge::geometry::{angle_from_value, DialGeometry, SWEEP_MID};
use gauge::{Gauge, GaugeConfig, ManualScheduler, PaintOutcome, Widget};

const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const NEEDLE: [u8; 4] = [0xe6, 0x33, 0x33, 0xff];

fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * width + x) * 4) as usize;
    [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
}

fn frame(width: u32, height: u32) -> Vec<u8> {
    vec![0; (width * height * 4) as usize]
}

#[test]
fn repeated_paints_reuse_the_static_layer() {
    let mut gauge = Gauge::new(GaugeConfig::default()).unwrap();
    let mut buf = frame(200, 160);

    assert_eq!(
        gauge.paint(&mut buf, 200, 160),
        PaintOutcome::Painted {
            rebuilt_static_layer: true
        }
    );
    assert_eq!(
        gauge.paint(&mut buf, 200, 160),
        PaintOutcome::Painted {
            rebuilt_static_layer: false
        }
    );
    assert_eq!(gauge.static_layer_builds(), 1);

    let mut wider = frame(201, 160);
    gauge.paint(&mut wider, 201, 160);
    assert_eq!(gauge.static_layer_builds(), 2);
    gauge.paint(&mut wider, 201, 160);
    assert_eq!(gauge.static_layer_builds(), 2);
}

#[test]
fn only_range_changes_invalidate_the_layer() {
    let mut host = ManualScheduler::new();
    let mut gauge = Gauge::new(GaugeConfig::default()).unwrap();
    gauge.map(&mut host);
    let mut buf = frame(120, 120);
    gauge.paint(&mut buf, 120, 120);

    gauge.set_value(60.0, &mut host).unwrap();
    gauge.set_show_digital(false, &mut host);
    gauge.paint(&mut buf, 120, 120);
    assert_eq!(gauge.static_layer_builds(), 1);

    gauge.set_range(0.0, 200.0, &mut host).unwrap();
    gauge.paint(&mut buf, 120, 120);
    assert_eq!(gauge.static_layer_builds(), 2);
}

#[test]
fn unsized_paint_does_not_build() {
    let mut gauge = Gauge::new(GaugeConfig::default()).unwrap();
    let mut empty = Vec::new();
    assert!(matches!(
        gauge.paint(&mut empty, 0, 0),
        PaintOutcome::Skipped(_)
    ));
    assert_eq!(gauge.static_layer_builds(), 0);
}

#[test]
fn needle_follows_the_animated_value() {
    let (w, h) = (200, 200);
    let mut host = ManualScheduler::new();
    let mut gauge = Gauge::new(GaugeConfig::default()).unwrap();
    gauge.map(&mut host);

    let dial = DialGeometry::new(w, h, gauge.style());
    let reach = dial.radius * 0.5;
    let left = (
        (dial.cx - reach).round() as u32,
        dial.cy.round() as u32,
    );
    let right = (
        (dial.cx + reach).round() as u32,
        dial.cy.round() as u32,
    );

    let mut buf = frame(w, h);
    gauge.paint(&mut buf, w, h);
    assert_eq!(pixel(&buf, w, left.0, left.1), NEEDLE);
    assert_eq!(pixel(&buf, w, right.0, right.1), WHITE);

    gauge.set_value(100.0, &mut host).unwrap();
    let handle = host.live_handles()[0];
    host.advance_ms(60_000);
    gauge.tick(handle, &mut host);
    gauge.paint(&mut buf, w, h);
    assert_eq!(pixel(&buf, w, left.0, left.1), WHITE);
    assert_eq!(pixel(&buf, w, right.0, right.1), NEEDLE);
}

#[test]
fn degenerate_range_parks_the_needle_upright() {
    let mut host = ManualScheduler::new();
    let mut gauge = Gauge::new(GaugeConfig::default()).unwrap();
    gauge.map(&mut host);
    gauge.set_range(80.0, 20.0, &mut host).unwrap();

    for v in [-5.0, 20.0, 50.0, 80.0, 1e9] {
        let angle = angle_from_value(v, gauge.min(), gauge.max());
        assert_eq!(angle, SWEEP_MID);
    }

    let (w, h) = (200, 200);
    let dial = DialGeometry::new(w, h, gauge.style());
    let mut buf = frame(w, h);
    gauge.paint(&mut buf, w, h);
    let above = (dial.cy - dial.radius * 0.5).round() as u32;
    assert_eq!(pixel(&buf, w, dial.cx.round() as u32, above), NEEDLE);
}
