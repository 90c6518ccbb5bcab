// Quadratic midpoint smoothing of raw strokes.
//
// Rendering only: coverage always works on the raw points.

use crate::types::Point;

/// One drawing command after `start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    /// Quadratic Bezier from the current point through `ctrl` to `to`.
    Quad { ctrl: Point, to: Point },
    /// Straight line from the current point to `to`.
    Line { to: Point },
}

/// What a stroke looks like once smoothed.
#[derive(Clone, Debug, PartialEq)]
pub enum SmoothPath {
    /// A tap: filled disc.
    Dot { center: Point, radius: f32 },
    /// A drag: stroked with round caps and joins.
    Curve { start: Point, segments: Vec<Segment> },
}

/// Build the drawable shape for `points` (returns `None` for an empty slice).
///
/// Every interior point becomes a control point, and each curve segment ends
/// at the midpoint between that control point and the next raw point. The
/// last segment is a straight line onto the final raw point.
pub fn smooth(points: &[Point], brush_size: f32) -> Option<SmoothPath> {
    match points {
        [] => None,
        [only] => Some(SmoothPath::Dot { center: *only, radius: brush_size * 0.5 }),
        [first, .., last] => {
            let mut segments = Vec::with_capacity(points.len() - 1);
            // windows over p1.. pair each interior point with its successor
            for pair in points[1..].windows(2) {
                let (ctrl, next) = (pair[0], pair[1]);
                segments.push(Segment::Quad { ctrl, to: ctrl.midpoint(next) });
            }
            segments.push(Segment::Line { to: *last });
            Some(SmoothPath::Curve { start: *first, segments })
        }
    }
}

impl SmoothPath {
    /// Turn the curve into a polyline for the rasterizer.
    ///
    /// `tolerance` is roughly the max pixel step between emitted points.
    /// A `Dot` flattens to its single center point.
    pub fn flatten(&self, tolerance: f32) -> Vec<Point> {
        let step = tolerance.max(0.05);
        match self {
            SmoothPath::Dot { center, .. } => vec![*center],
            SmoothPath::Curve { start, segments } => {
                let mut out = Vec::with_capacity(segments.len() * 4 + 1);
                out.push(*start);
                let mut cur = *start;
                for seg in segments {
                    match *seg {
                        Segment::Line { to } => {
                            out.push(to);
                            cur = to;
                        }
                        Segment::Quad { ctrl, to } => {
                            // Control polygon length bounds the arc length.
                            let hull = cur.distance(ctrl) + ctrl.distance(to);
                            let n = ((hull / step).ceil() as usize).clamp(1, 256);
                            for i in 1..n {
                                out.push(quad_at(cur, ctrl, to, i as f32 / n as f32));
                            }
                            out.push(to);
                            cur = to;
                        }
                    }
                }
                out
            }
        }
    }
}

#[inline]
fn quad_at(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt;
    let b = 2.0 * mt * t;
    let c = t * t;
    Point::new(a * p0.x + b * p1.x + c * p2.x, a * p0.y + b * p1.y + c * p2.y)
}
