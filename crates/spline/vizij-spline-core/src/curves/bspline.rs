//! Uniform quadratic B-spline.
//!
//! Each piece blends a control point with the midpoints of its two adjacent
//! chords. Open splines are clamped: the first piece starts on the first
//! control point and the last piece ends on the last one.

use super::{clamp_segment, quadratic, wrap_index, Interpolate};
use crate::point::SplinePoint;

#[derive(Clone, Debug, PartialEq)]
pub struct BSplineCurve<P> {
    points: Vec<P>,
    looped: bool,
}

impl<P: SplinePoint> BSplineCurve<P> {
    pub fn new(points: Vec<P>, looping: bool) -> Self {
        Self {
            looped: looping && points.len() > 2,
            points,
        }
    }

    /// Quadratic control polygon for `segment`.
    fn piece(&self, segment: usize) -> (P, P, P) {
        let n = self.points.len();
        if self.looped {
            let i = segment as isize;
            let a = self.points[wrap_index(i, n)];
            let b = self.points[wrap_index(i + 1, n)];
            let c = self.points[wrap_index(i + 2, n)];
            return (a.midpoint(b), b, b.midpoint(c));
        }
        let (a, b, c) = (
            self.points[segment],
            self.points[segment + 1],
            self.points[segment + 2],
        );
        let start = if segment == 0 { a } else { a.midpoint(b) };
        let end = if segment + 3 == n { c } else { b.midpoint(c) };
        (start, b, end)
    }
}

impl<P: SplinePoint> Interpolate<P> for BSplineCurve<P> {
    fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            2 => 1,
            n if self.looped => n,
            n => n - 2,
        }
    }

    fn interpolate(&self, segment: usize, local_t: f32) -> P {
        let t = local_t.clamp(0.0, 1.0);
        match self.points.len() {
            0 => P::ZERO,
            1 => self.points[0],
            2 => self.points[0].lerp_to(self.points[1], t),
            _ => {
                let (a, b, c) = self.piece(clamp_segment(segment, self.segment_count()));
                quadratic(a, b, c, t)
            }
        }
    }

    fn straight_segment(&self, _segment: usize) -> Option<(P, P)> {
        match self.points.as_slice() {
            [a, b] => Some((*a, *b)),
            _ => None,
        }
    }
}
