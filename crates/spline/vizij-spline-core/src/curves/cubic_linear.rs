//! Tangent-smoothed linear path.
//!
//! Each control point gets a node and a tangent derived from its neighbours:
//! interior nodes sit at the midpoint of the two adjacent segment midpoints,
//! `(P[j-1] + 2 P[j] + P[j+1]) / 4`, with tangent `(P[j+1] - P[j-1]) / 2`.
//! Open ends keep the true endpoint and use the adjacent chord as tangent.
//! Segment `i` is the cubic from node `i` to node `i + 1` built from those
//! tangents, so neighbouring segments meet with matching direction (C1) and no
//! tangents are stored on the points themselves. Evenly spaced collinear
//! points reproduce plain linear motion.

use super::{clamp_segment, cubic_lerp, wrap_index, Interpolate};
use crate::point::SplinePoint;

#[derive(Clone, Debug, PartialEq)]
pub struct CubicLinearCurve<P> {
    nodes: Vec<P>,
    tangents: Vec<P>,
    looped: bool,
}

impl<P: SplinePoint> CubicLinearCurve<P> {
    pub fn new(points: &[P], looping: bool) -> Self {
        let n = points.len();
        let looped = looping && n > 2;
        let mut nodes = Vec::with_capacity(n);
        let mut tangents = Vec::with_capacity(n);
        for j in 0..n {
            let open_start = !looped && j == 0;
            let open_end = !looped && j + 1 == n;
            if n < 2 {
                nodes.push(points[j]);
                tangents.push(P::ZERO);
            } else if open_start {
                nodes.push(points[0]);
                tangents.push(points[1] - points[0]);
            } else if open_end {
                nodes.push(points[j]);
                tangents.push(points[j] - points[j - 1]);
            } else {
                let prev = points[wrap_index(j as isize - 1, n)];
                let next = points[(j + 1) % n];
                nodes.push((prev + points[j] * 2.0 + next) * 0.25);
                tangents.push((next - prev) * 0.5);
            }
        }
        Self {
            nodes,
            tangents,
            looped,
        }
    }

    /// Node positions the curve passes through.
    pub fn nodes(&self) -> &[P] {
        &self.nodes
    }
}

impl<P: SplinePoint> Interpolate<P> for CubicLinearCurve<P> {
    fn segment_count(&self) -> usize {
        match self.nodes.len() {
            0 | 1 => 0,
            n if self.looped => n,
            n => n - 1,
        }
    }

    fn interpolate(&self, segment: usize, local_t: f32) -> P {
        let n = self.nodes.len();
        match n {
            0 => P::ZERO,
            1 => self.nodes[0],
            2 => self.nodes[0].lerp_to(self.nodes[1], local_t.clamp(0.0, 1.0)),
            _ => {
                let i = clamp_segment(segment, self.segment_count());
                let j = (i + 1) % n;
                let (n0, n1) = (self.nodes[i], self.nodes[j]);
                let b1 = n0 + self.tangents[i] * (1.0 / 3.0);
                let b2 = n1 - self.tangents[j] * (1.0 / 3.0);
                cubic_lerp(n0, b1, b2, n1, local_t.clamp(0.0, 1.0))
            }
        }
    }

    fn straight_segment(&self, _segment: usize) -> Option<(P, P)> {
        (self.nodes.len() == 2).then(|| (self.nodes[0], self.nodes[1]))
    }
}
