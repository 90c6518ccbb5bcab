use scratch_card::{
    Color, FrameBuffer, ManualClock, Point, ScratchConfig, ScratchState, ScratchSurface, SolidPainter,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

struct Fired {
    changes: Rc<RefCell<Vec<f32>>>,
    thresholds: Rc<Cell<u32>>,
}

fn card(config: ScratchConfig) -> (ScratchSurface<ManualClock>, Fired) {
    let mut surface = ScratchSurface::with_clock(&config, ManualClock::new());
    surface.set_painter(SolidPainter(Color::rgb(200, 200, 200)));
    surface.resize(500, 500);

    let fired = Fired { changes: Rc::new(RefCell::new(Vec::new())), thresholds: Rc::new(Cell::new(0)) };
    let changes = fired.changes.clone();
    surface.on_change(move |pct| changes.borrow_mut().push(pct));
    let thresholds = fired.thresholds.clone();
    surface.on_threshold(move || thresholds.set(thresholds.get() + 1));
    (surface, fired)
}

/// Visit cell centers of the 50x50 grid row by row, `count` of them.
fn sweep(surface: &mut ScratchSurface<ManualClock>, count: usize) {
    surface.pointer_down(Point::new(5.0, 5.0));
    for i in 1..count {
        let (col, row) = (i % 50, i / 50);
        surface.pointer_move(Point::new(col as f32 * 10.0 + 5.0, row as f32 * 10.0 + 5.0));
    }
    surface.pointer_up();
}

#[test]
fn single_point_is_one_percent() {
    let (mut s, fired) = card(ScratchConfig::default());
    s.pointer_down(Point::new(250.0, 250.0));
    s.pointer_up();
    assert_eq!(s.coverage(), 1.0);
    assert_eq!(fired.changes.borrow().as_slice(), &[1.0]);
    assert_eq!(fired.thresholds.get(), 0);
}

#[test]
fn five_hundred_cells_fire_threshold_once() {
    let (mut s, fired) = card(ScratchConfig { brush_size: 0.0, ..ScratchConfig::default() });
    sweep(&mut s, 500);
    assert_eq!(s.coverage(), 20.0);
    assert_eq!(fired.thresholds.get(), 1);

    // More scratching above the threshold never fires it again.
    s.pointer_down(Point::new(495.0, 495.0));
    s.pointer_move(Point::new(485.0, 495.0));
    s.pointer_up();
    assert!(s.coverage() > 20.0);
    assert_eq!(fired.thresholds.get(), 1);

    let changes = fired.changes.borrow();
    assert!(changes.windows(2).all(|w| w[0] <= w[1]), "coverage went down: {changes:?}");
}

#[test]
fn out_of_bounds_points_are_clamped() {
    let (mut s, _fired) = card(ScratchConfig::default());
    s.pointer_down(Point::new(-100.0, 250.0));
    s.pointer_move(Point::new(900.0, 9999.0));
    let pts = s.strokes()[0].points();
    assert_eq!(pts[0], Point::new(0.0, 250.0));
    assert_eq!(pts[1], Point::new(500.0, 500.0));
    assert!(s.coverage() > 0.0);
}

#[test]
fn reset_clears_everything_and_rearms_threshold() {
    let (mut s, fired) = card(ScratchConfig { threshold: 1.0, ..ScratchConfig::default() });
    s.pointer_down(Point::new(250.0, 250.0));
    s.pointer_move(Point::new(251.0, 250.0));
    assert_eq!(fired.thresholds.get(), 1);
    s.reveal(Duration::from_millis(300));

    s.reset();
    assert_eq!(s.coverage(), 0.0);
    assert!(!s.threshold_reached());
    assert_eq!(s.state(), ScratchState::Idle);
    assert!(s.strokes().is_empty());

    s.pointer_down(Point::new(100.0, 100.0));
    s.pointer_move(Point::new(101.0, 100.0));
    assert_eq!(fired.thresholds.get(), 2);
}

#[test]
fn ticks_after_reset_do_nothing() {
    let (mut s, _fired) = card(ScratchConfig::default());
    s.reveal(Duration::from_millis(100));
    s.reset();
    s.clock_mut().advance(Duration::from_millis(500));
    assert!(!s.pump());
    assert_eq!(s.state(), ScratchState::Idle);
    assert_eq!(s.opacity(), 1.0);
    assert_eq!(s.reveal_progress(), 0.0);
}

#[test]
fn new_reveal_replaces_old_one() {
    let (mut s, _fired) = card(ScratchConfig::default());
    s.reveal(Duration::from_millis(100));
    s.clock_mut().advance(Duration::from_millis(80));
    s.pump();
    s.reveal(Duration::from_millis(1000));
    assert_eq!(s.reveal_progress(), 0.0);
    s.clock_mut().advance(Duration::from_millis(100));
    s.pump();
    assert_eq!(s.state(), ScratchState::Revealing);
    assert!((s.opacity() - 0.9).abs() < 1e-4);
}

#[test]
fn tap_erases_disc_in_the_frame() {
    let (mut s, _fired) = card(ScratchConfig::default());
    s.pointer_down(Point::new(100.0, 100.0));
    s.pointer_up();

    let mut content = FrameBuffer::new(500, 500);
    content.fill(0x00_0A_0B_0C);
    let mut out = FrameBuffer::new(500, 500);
    s.compose(&content, &mut out).unwrap();

    let at = |x: usize, y: usize| out.pixels[y * 500 + x];
    assert_eq!(at(100, 100), 0x00_0A_0B_0C);
    assert_eq!(at(113, 100), 0x00_0A_0B_0C);
    assert_eq!(at(117, 100), 0x00_C8_C8_C8);
    // Disc, not square: the bounding-box corner is still covered.
    assert_eq!(at(112, 112), 0x00_C8_C8_C8);
}

#[test]
fn input_before_layout_is_dropped() {
    let mut s = ScratchSurface::with_clock(&ScratchConfig::default(), ManualClock::new());
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    s.on_change(move |_| c.set(c.get() + 1));
    s.pointer_down(Point::new(10.0, 10.0));
    s.pointer_move(Point::new(20.0, 20.0));
    s.pointer_up();
    assert_eq!(calls.get(), 0);
    assert_eq!(s.coverage(), 0.0);
    assert!(s.strokes().is_empty());

    // Nothing recorded, so the first layout has nothing to re-map.
    s.resize(100, 100);
    assert_eq!(calls.get(), 0);
    assert_eq!(s.coverage(), 0.0);

    s.pointer_down(Point::new(10.0, 10.0));
    s.pointer_up();
    assert_eq!(calls.get(), 1);
    assert_eq!(s.strokes()[0].points()[0], Point::new(10.0, 10.0));
}

#[test]
fn unbounded_brush_scratches_everything() {
    let (mut s, fired) = card(ScratchConfig::default());
    s.set_brush_size(f32::INFINITY);
    s.pointer_down(Point::new(250.0, 250.0));
    s.pointer_up();
    assert_eq!(s.coverage(), 100.0);
    assert_eq!(fired.thresholds.get(), 1);

    let content = FrameBuffer::new(500, 500);
    let mut out = FrameBuffer::new(500, 500);
    out.fill(0x00_FF_FF_FF);
    s.compose(&content, &mut out).unwrap();
    assert!(out.pixels.iter().all(|&p| p == 0));
}
