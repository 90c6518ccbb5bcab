// Pointer gestures recorded as raw polylines.

use crate::types::{Point, Size};

/// One continuous drag, in the order the points arrived.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub fn new(first: Point) -> Self {
        Self { points: vec![first] }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Collects strokes for one session.
///
/// Every stored point is clamped to the surface bounds, so everything
/// downstream (coverage, erasure) can assume in-bounds geometry.
/// Strokes are only ever appended; `clear` is the reset path.
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    strokes: Vec<Stroke>,
    active: bool,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down: open a new stroke with its first point.
    pub fn start_stroke(&mut self, point: Point, bounds: Size) {
        self.strokes.push(Stroke::new(bounds.clamp(point)));
        self.active = true;
    }

    /// Pointer move: extend the open stroke.
    /// Returns false (and stores nothing) when no gesture is open.
    pub fn append_point(&mut self, point: Point, bounds: Size) -> bool {
        if !self.active {
            return false;
        }
        match self.strokes.last_mut() {
            Some(stroke) => {
                stroke.points.push(bounds.clamp(point));
                true
            }
            None => false,
        }
    }

    /// Pointer up: the open stroke becomes read-only history.
    pub fn end_stroke(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total recorded points across every stroke.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Size = Size::new(200, 100);

    #[test]
    fn test_gestures_become_separate_strokes() {
        let mut rec = StrokeRecorder::new();
        rec.start_stroke(Point::new(1.0, 1.0), BOUNDS);
        assert!(rec.append_point(Point::new(2.0, 2.0), BOUNDS));
        rec.end_stroke();
        rec.start_stroke(Point::new(50.0, 50.0), BOUNDS);

        assert_eq!(rec.strokes().len(), 2);
        assert_eq!(rec.strokes()[0].len(), 2);
        assert_eq!(rec.strokes()[1].points(), &[Point::new(50.0, 50.0)]);
        assert_eq!(rec.point_count(), 3);
    }

    #[test]
    fn test_points_are_clamped() {
        let mut rec = StrokeRecorder::new();
        rec.start_stroke(Point::new(-10.0, 500.0), BOUNDS);
        rec.append_point(Point::new(250.0, -3.0), BOUNDS);
        let pts = rec.strokes()[0].points();
        assert_eq!(pts[0], Point::new(0.0, 100.0));
        assert_eq!(pts[1], Point::new(200.0, 0.0));
    }

    #[test]
    fn test_move_without_down_is_dropped() {
        let mut rec = StrokeRecorder::new();
        assert!(!rec.append_point(Point::new(5.0, 5.0), BOUNDS));
        rec.start_stroke(Point::new(1.0, 1.0), BOUNDS);
        rec.end_stroke();
        assert!(!rec.append_point(Point::new(5.0, 5.0), BOUNDS));
        assert_eq!(rec.point_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut rec = StrokeRecorder::new();
        rec.start_stroke(Point::new(1.0, 1.0), BOUNDS);
        rec.clear();
        assert!(rec.is_empty());
        assert!(!rec.is_active());
    }
}
