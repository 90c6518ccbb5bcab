// Coarse "how much has been scratched" estimate.
//
// The surface is split into `grid_size x grid_size` cells no matter how many
// pixels it has. Each raw stroke point clears the rectangle of cells its
// brush half-width reaches. The rectangle (not a disc) is intentional: it is
// what decides when the threshold fires, so it must not be "fixed".

use crate::stroke::Stroke;
use crate::types::Size;

/// Fired after every recomputation with the percentage (0..=100).
pub type ChangeCallback = Box<dyn FnMut(f32)>;
/// Fired once per session when the percentage first reaches the threshold.
pub type ThresholdCallback = Box<dyn FnMut()>;

/// Fixed-resolution boolean grid. Cells only ever go false -> true.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    size: usize,
    cells: Vec<bool>,
    cleared: usize,
}

impl OccupancyGrid {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self { size, cells: vec![false; size * size], cleared: 0 }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total(&self) -> usize {
        self.cells.len()
    }

    pub fn cleared(&self) -> usize {
        self.cleared
    }

    pub fn is_cleared(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size && self.cells[row * self.size + col]
    }

    /// Mark one cell; returns true if it was newly cleared.
    fn mark(&mut self, col: usize, row: usize) -> bool {
        let cell = &mut self.cells[row * self.size + col];
        if *cell {
            return false;
        }
        *cell = true;
        self.cleared += 1;
        true
    }

    /// cleared / total x 100. Integer numerator keeps exact cases exact.
    pub fn percentage(&self) -> f32 {
        (self.cleared * 100) as f32 / self.total() as f32
    }

    fn clear(&mut self) {
        self.cells.fill(false);
        self.cleared = 0;
    }
}

/// Owns the grid, the threshold latch and the outward callbacks.
pub struct CoverageEstimator {
    grid: OccupancyGrid,
    threshold: f32,
    latched: bool,
    last: f32,
    on_change: Option<ChangeCallback>,
    on_threshold: Option<ThresholdCallback>,
}

impl std::fmt::Debug for CoverageEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverageEstimator")
            .field("grid_size", &self.grid.size())
            .field("cleared", &self.grid.cleared())
            .field("threshold", &self.threshold)
            .field("latched", &self.latched)
            .finish_non_exhaustive()
    }
}

impl CoverageEstimator {
    pub fn new(grid_size: usize, threshold: f32) -> Self {
        Self {
            grid: OccupancyGrid::new(grid_size),
            threshold: crate::config::clamp_threshold(threshold),
            latched: false,
            last: 0.0,
            on_change: None,
            on_threshold: None,
        }
    }

    pub fn set_on_change(&mut self, cb: impl FnMut(f32) + 'static) {
        self.on_change = Some(Box::new(cb));
    }

    pub fn set_on_threshold(&mut self, cb: impl FnMut() + 'static) {
        self.on_threshold = Some(Box::new(cb));
    }

    /// Drop both callbacks (and whatever they captured).
    pub fn clear_callbacks(&mut self) {
        self.on_change = None;
        self.on_threshold = None;
    }

    /// Changing the threshold does not un-latch an already fired one.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = crate::config::clamp_threshold(threshold);
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn threshold_reached(&self) -> bool {
        self.latched
    }

    /// Last computed percentage (0 before the first update).
    pub fn percentage(&self) -> f32 {
        self.last
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Re-run every stroke point against the grid and report coverage.
    ///
    /// With an unknown surface size this is a no-op: nothing fires and the
    /// previous value is returned.
    pub fn update(&mut self, strokes: &[Stroke], brush_size: f32, size: Size) -> f32 {
        if !size.is_known() {
            return self.last;
        }

        let n = self.grid.size();
        let cell_w = size.width as f32 / n as f32;
        let cell_h = size.height as f32 / n as f32;
        let half = brush_size.max(0.0) * 0.5;
        // Saturating casts: an unbounded brush just covers the whole grid.
        let span_x = ((half / cell_w).ceil() as usize).min(n);
        let span_y = ((half / cell_h).ceil() as usize).min(n);
        let last_cell = n - 1;

        let mut fresh = 0usize;
        for point in strokes.iter().flat_map(Stroke::points) {
            // Points are clamped to [0, width], so x == width lands one past
            // the end; pull it back onto the last column/row.
            let col = ((point.x / cell_w).floor().max(0.0) as usize).min(last_cell);
            let row = ((point.y / cell_h).floor().max(0.0) as usize).min(last_cell);

            let (c0, c1) = (col.saturating_sub(span_x), col.saturating_add(span_x).min(last_cell));
            let (r0, r1) = (row.saturating_sub(span_y), row.saturating_add(span_y).min(last_cell));
            for r in r0..=r1 {
                for c in c0..=c1 {
                    if self.grid.mark(c, r) {
                        fresh += 1;
                    }
                }
            }
        }

        let pct = self.grid.percentage();
        if fresh > 0 {
            tracing::trace!(fresh, cleared = self.grid.cleared(), pct, "coverage grew");
        }
        self.last = pct;

        if let Some(cb) = self.on_change.as_mut() {
            cb(pct);
        }
        if !self.latched && pct >= self.threshold {
            self.latched = true;
            tracing::info!(pct, threshold = self.threshold, "scratch threshold reached");
            if let Some(cb) = self.on_threshold.as_mut() {
                cb();
            }
        }
        pct
    }

    /// Back to an untouched grid with the latch released. Callbacks stay.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.latched = false;
        self.last = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;
    use std::cell::Cell;
    use std::rc::Rc;

    const SURFACE: Size = Size::new(500, 500);

    fn stroke(points: &[(f32, f32)]) -> Stroke {
        let mut rec = crate::stroke::StrokeRecorder::new();
        rec.start_stroke(Point::new(points[0].0, points[0].1), SURFACE);
        for &(x, y) in &points[1..] {
            rec.append_point(Point::new(x, y), SURFACE);
        }
        rec.strokes()[0].clone()
    }

    #[test]
    fn test_single_point_clears_five_by_five() {
        let mut est = CoverageEstimator::new(50, 20.0);
        let pct = est.update(&[stroke(&[(250.0, 250.0)])], 30.0, SURFACE);
        assert_eq!(est.grid().cleared(), 25);
        assert_eq!(pct, 1.0);
        assert!(est.grid().is_cleared(23, 23));
        assert!(est.grid().is_cleared(27, 27));
        assert!(!est.grid().is_cleared(28, 25));
        assert!(!est.threshold_reached());
    }

    #[test]
    fn test_rectangular_not_circular_footprint() {
        let mut est = CoverageEstimator::new(50, 20.0);
        est.update(&[stroke(&[(250.0, 250.0)])], 30.0, SURFACE);
        // Corner cells of the 5x5 block are outside a 15 px disc but still cleared.
        assert!(est.grid().is_cleared(23, 23));
        assert!(est.grid().is_cleared(27, 23));
    }

    #[test]
    fn test_corner_point_is_clipped_to_grid() {
        let mut est = CoverageEstimator::new(50, 20.0);
        let pct = est.update(&[stroke(&[(500.0, 500.0)])], 30.0, SURFACE);
        // Column 49 (clamped), span 2 -> columns 47..=49 on both axes.
        assert_eq!(est.grid().cleared(), 9);
        assert_eq!(pct, 9.0 * 100.0 / 2500.0);
    }

    #[test]
    fn test_unknown_size_is_noop() {
        let calls = Rc::new(Cell::new(0));
        let mut est = CoverageEstimator::new(50, 20.0);
        let c = calls.clone();
        est.set_on_change(move |_| c.set(c.get() + 1));
        let pct = est.update(&[stroke(&[(0.0, 0.0)])], 30.0, Size::new(0, 500));
        assert_eq!(pct, 0.0);
        assert_eq!(calls.get(), 0);
        assert_eq!(est.grid().cleared(), 0);
    }

    #[test]
    fn test_idempotent_and_monotonic() {
        let mut est = CoverageEstimator::new(50, 20.0);
        let mut strokes = vec![stroke(&[(100.0, 100.0), (140.0, 100.0)])];
        let a = est.update(&strokes, 30.0, SURFACE);
        let b = est.update(&strokes, 30.0, SURFACE);
        assert_eq!(a, b);

        strokes.push(stroke(&[(400.0, 400.0)]));
        let c = est.update(&strokes, 30.0, SURFACE);
        assert!(c > b);
    }

    #[test]
    fn test_threshold_fires_exactly_once_at_twenty_percent() {
        let fired = Rc::new(Cell::new(0));
        let changes = Rc::new(Cell::new(0));
        let mut est = CoverageEstimator::new(50, 20.0);
        let f = fired.clone();
        est.set_on_threshold(move || f.set(f.get() + 1));
        let ch = changes.clone();
        est.set_on_change(move |_| ch.set(ch.get() + 1));

        // Brush 0 -> span 0: each point clears exactly its own cell.
        // 500 distinct cells = rows 0..10 of a 50-wide grid.
        let pts: Vec<(f32, f32)> = (0..500)
            .map(|i| ((i % 50) as f32 * 10.0 + 5.0, (i / 50) as f32 * 10.0 + 5.0))
            .collect();
        let strokes = vec![stroke(&pts[..499])];
        assert!(est.update(&strokes, 0.0, SURFACE) < 20.0);
        assert_eq!(fired.get(), 0);

        let strokes = vec![stroke(&pts)];
        assert_eq!(est.update(&strokes, 0.0, SURFACE), 20.0);
        assert_eq!(fired.get(), 1);

        for _ in 0..5 {
            est.update(&strokes, 0.0, SURFACE);
        }
        assert_eq!(fired.get(), 1);
        assert_eq!(changes.get(), 7);
    }

    #[test]
    fn test_reset_allows_threshold_again() {
        let fired = Rc::new(Cell::new(0));
        let mut est = CoverageEstimator::new(10, 5.0);
        let f = fired.clone();
        est.set_on_threshold(move || f.set(f.get() + 1));

        let strokes = vec![stroke(&[(250.0, 250.0)])];
        est.update(&strokes, 30.0, SURFACE);
        assert_eq!(fired.get(), 1);

        est.reset();
        assert_eq!(est.percentage(), 0.0);
        assert!(!est.threshold_reached());
        est.update(&strokes, 30.0, SURFACE);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_never_fires_below_threshold() {
        let fired = Rc::new(Cell::new(false));
        let mut est = CoverageEstimator::new(50, 100.0);
        let f = fired.clone();
        est.set_on_threshold(move || f.set(true));
        est.update(&[stroke(&[(10.0, 10.0), (490.0, 490.0)])], 30.0, SURFACE);
        assert!(!fired.get());
    }

    #[test]
    fn test_resize_keeps_cleared_cells() {
        let mut est = CoverageEstimator::new(50, 20.0);
        let strokes = vec![stroke(&[(250.0, 250.0)])];
        let before = est.update(&strokes, 30.0, SURFACE);
        // Bigger surface -> smaller spans, but nothing is un-cleared.
        let after = est.update(&strokes, 30.0, Size::new(1000, 1000));
        assert!(after >= before);
    }

    #[test]
    fn test_unbounded_brush_clears_whole_grid() {
        for brush in [f32::INFINITY, 1e30] {
            let mut est = CoverageEstimator::new(50, 20.0);
            let pct = est.update(&[stroke(&[(250.0, 250.0)])], brush, SURFACE);
            assert_eq!(pct, 100.0);
            assert_eq!(est.grid().cleared(), est.grid().total());
        }
    }
}
