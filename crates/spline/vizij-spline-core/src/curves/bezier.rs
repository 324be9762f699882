//! Cubic Bezier segments between control points with explicit tangent handles.

use super::{clamp_segment, Interpolate};
use crate::point::SplinePoint;
use crate::store::ControlPoint;

/// One control point with its handles resolved to absolute positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BezierKnot<P> {
    pub pre: P,
    pub point: P,
    pub post: P,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BezierCurve<P> {
    knots: Vec<BezierKnot<P>>,
    looped: bool,
}

/// `(1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3` with `t` clamped to `[0, 1]`.
#[inline]
pub fn cubic_bezier<P: SplinePoint>(p0: P, p1: P, p2: P, p3: P, t: f32) -> P {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

impl<P: SplinePoint> BezierCurve<P> {
    /// Two points may loop (out and back along two curved segments).
    pub fn new(points: &[ControlPoint<P>], looping: bool) -> Self {
        let knots = points
            .iter()
            .map(|cp| BezierKnot {
                pre: cp.pre_handle(),
                point: cp.position,
                post: cp.post_handle(),
            })
            .collect::<Vec<_>>();
        let looped = looping && knots.len() >= 2;
        Self { knots, looped }
    }

    pub fn knots(&self) -> &[BezierKnot<P>] {
        &self.knots
    }

    #[inline]
    fn control_polygon(&self, segment: usize) -> [P; 4] {
        let n = self.knots.len();
        let i = clamp_segment(segment, self.segment_count());
        let a = &self.knots[i];
        let b = &self.knots[(i + 1) % n];
        [a.point, a.post, b.pre, b.point]
    }
}

impl<P: SplinePoint> Interpolate<P> for BezierCurve<P> {
    fn segment_count(&self) -> usize {
        match self.knots.len() {
            0 | 1 => 0,
            n if self.looped => n,
            n => n - 1,
        }
    }

    fn interpolate(&self, segment: usize, local_t: f32) -> P {
        match self.knots.len() {
            0 => P::ZERO,
            1 => self.knots[0].point,
            _ => {
                let [p0, p1, p2, p3] = self.control_polygon(segment);
                cubic_bezier(p0, p1, p2, p3, local_t)
            }
        }
    }

    fn straight_segment(&self, segment: usize) -> Option<(P, P)> {
        if self.knots.len() < 2 {
            return None;
        }
        // Handles sitting on their points give a straight (eased) segment.
        let [p0, p1, p2, p3] = self.control_polygon(segment);
        (p1 == p0 && p2 == p3).then_some((p0, p3))
    }
}
