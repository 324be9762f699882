//! Piecewise-linear interpolation between consecutive control points.

use super::{clamp_segment, Interpolate};
use crate::point::SplinePoint;

#[derive(Clone, Debug, PartialEq)]
pub struct LinearCurve<P> {
    points: Vec<P>,
    looped: bool,
}

impl<P: SplinePoint> LinearCurve<P> {
    /// Looping needs at least three points; two points always form one segment.
    pub fn new(points: Vec<P>, looping: bool) -> Self {
        let looped = looping && points.len() > 2;
        Self { points, looped }
    }

    #[inline]
    fn endpoints(&self, segment: usize) -> (P, P) {
        let n = self.points.len();
        let i = clamp_segment(segment, self.segment_count());
        (self.points[i], self.points[(i + 1) % n])
    }
}

impl<P: SplinePoint> Interpolate<P> for LinearCurve<P> {
    fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.looped => n,
            n => n - 1,
        }
    }

    fn interpolate(&self, segment: usize, local_t: f32) -> P {
        match self.points.len() {
            0 => P::ZERO,
            1 => self.points[0],
            _ => {
                let (a, b) = self.endpoints(segment);
                a.lerp_to(b, local_t.clamp(0.0, 1.0))
            }
        }
    }

    fn straight_segment(&self, segment: usize) -> Option<(P, P)> {
        (self.points.len() >= 2).then(|| self.endpoints(segment))
    }
}
