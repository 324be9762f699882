//! Curve family evaluators.
//!
//! Every family implements [`Interpolate`]: a segment count, a position for
//! `(segment, local_t)`, and a per-segment length. [`Curve`] is the closed set
//! of families a spline can hold; callers that evaluate many queries should
//! match it once (see [`dispatch_curve!`]) and run the concrete evaluator.

pub mod bezier;
pub mod bspline;
pub mod catmull_rom;
pub mod cubic_linear;
pub mod linear;
pub mod natural_cubic;
pub mod point_to_point;

use serde::{Deserialize, Serialize};

use crate::config::SplineKind;
use crate::error::SplineError;
use crate::point::SplinePoint;
use crate::store::PointStore;

pub use bezier::BezierCurve;
pub use bspline::BSplineCurve;
pub use catmull_rom::CatmullRomCurve;
pub use cubic_linear::CubicLinearCurve;
pub use linear::LinearCurve;
pub use natural_cubic::NaturalCubicCurve;
pub use point_to_point::PointToPointCurve;

/// Position evaluation for one curve family.
pub trait Interpolate<P: SplinePoint> {
    /// Number of interpolatable segments.
    fn segment_count(&self) -> usize;

    /// Position at `local_t` in `[0, 1]` within `segment`.
    fn interpolate(&self, segment: usize, local_t: f32) -> P;

    /// Endpoints of `segment` when it is a straight line, so its length can be
    /// measured exactly instead of sampled.
    fn straight_segment(&self, _segment: usize) -> Option<(P, P)> {
        None
    }

    /// Length of `segment`, summing `samples` straight pieces for curved ones.
    fn segment_length(&self, segment: usize, samples: usize) -> f32 {
        if let Some((a, b)) = self.straight_segment(segment) {
            return a.distance_to(b);
        }
        let samples = samples.max(1);
        let inv = 1.0 / samples as f32;
        let mut prev = self.interpolate(segment, 0.0);
        let mut total = 0.0f32;
        for k in 1..=samples {
            let next = self.interpolate(segment, k as f32 * inv);
            total += prev.distance_to(next);
            prev = next;
        }
        total
    }

    fn start(&self) -> P {
        self.interpolate(0, 0.0)
    }

    fn end(&self) -> P {
        self.interpolate(self.segment_count().saturating_sub(1), 1.0)
    }
}

/// Zero or one control point.
#[derive(Clone, Debug, PartialEq)]
pub struct DegenerateCurve<P> {
    point: Option<P>,
}

impl<P: SplinePoint> DegenerateCurve<P> {
    pub fn empty() -> Self {
        Self { point: None }
    }

    pub fn single(point: P) -> Self {
        Self { point: Some(point) }
    }
}

impl<P: SplinePoint> Interpolate<P> for DegenerateCurve<P> {
    fn segment_count(&self) -> usize {
        0
    }

    fn interpolate(&self, _segment: usize, _local_t: f32) -> P {
        self.point.unwrap_or(P::ZERO)
    }

    fn segment_length(&self, _segment: usize, _samples: usize) -> f32 {
        0.0
    }
}

/// Family tag, derived from configuration and control point count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineFamily {
    Empty,
    Single,
    Linear,
    CubicLinear,
    Bezier,
    Cubic,
    BSpline,
    CatmullRom,
    PointToPoint,
}

impl SplineFamily {
    pub fn derive(kind: SplineKind, point_count: usize) -> Self {
        match point_count {
            0 => Self::Empty,
            1 => Self::Single,
            _ => match kind {
                SplineKind::Linear => Self::Linear,
                SplineKind::CubicLinear => Self::CubicLinear,
                SplineKind::Bezier => Self::Bezier,
                SplineKind::Cubic => Self::Cubic,
                SplineKind::BSpline => Self::BSpline,
                SplineKind::CatmullRom => Self::CatmullRom,
                SplineKind::PointToPoint => Self::PointToPoint,
            },
        }
    }
}

/// A built curve of one family.
#[derive(Clone, Debug)]
pub enum Curve<P: SplinePoint> {
    Degenerate(DegenerateCurve<P>),
    Linear(LinearCurve<P>),
    CubicLinear(CubicLinearCurve<P>),
    Bezier(BezierCurve<P>),
    Cubic(NaturalCubicCurve<P>),
    BSpline(BSplineCurve<P>),
    CatmullRom(CatmullRomCurve<P>),
    PointToPoint(PointToPointCurve<P>),
}

/// Match a [`Curve`] once and run `$body` with `$c` bound to the concrete
/// evaluator.
#[macro_export]
macro_rules! dispatch_curve {
    ($curve:expr, |$c:ident| $body:expr) => {
        match $curve {
            $crate::curves::Curve::Degenerate($c) => $body,
            $crate::curves::Curve::Linear($c) => $body,
            $crate::curves::Curve::CubicLinear($c) => $body,
            $crate::curves::Curve::Bezier($c) => $body,
            $crate::curves::Curve::Cubic($c) => $body,
            $crate::curves::Curve::BSpline($c) => $body,
            $crate::curves::Curve::CatmullRom($c) => $body,
            $crate::curves::Curve::PointToPoint($c) => $body,
        }
    };
}

impl<P: SplinePoint> Curve<P> {
    /// Build the evaluator for `kind` from the current control points. Only the
    /// natural cubic family can fail (solver failure).
    pub fn build(kind: SplineKind, store: &PointStore<P>, looping: bool) -> Result<Self, SplineError> {
        let positions = store.positions();
        let curve = match positions.len() {
            0 => Curve::Degenerate(DegenerateCurve::empty()),
            1 => Curve::Degenerate(DegenerateCurve::single(positions[0])),
            _ => match kind {
                SplineKind::Linear => Curve::Linear(LinearCurve::new(positions, looping)),
                SplineKind::CubicLinear => {
                    Curve::CubicLinear(CubicLinearCurve::new(&positions, looping))
                }
                SplineKind::Bezier => Curve::Bezier(BezierCurve::new(store.as_slice(), looping)),
                SplineKind::Cubic => Curve::Cubic(NaturalCubicCurve::fit(positions)?),
                SplineKind::BSpline => Curve::BSpline(BSplineCurve::new(positions, looping)),
                SplineKind::CatmullRom => {
                    Curve::CatmullRom(CatmullRomCurve::new(positions, looping))
                }
                SplineKind::PointToPoint => {
                    Curve::PointToPoint(PointToPointCurve::new(positions, looping))
                }
            },
        };
        Ok(curve)
    }
}

impl<P: SplinePoint> Interpolate<P> for Curve<P> {
    fn segment_count(&self) -> usize {
        dispatch_curve!(self, |c| c.segment_count())
    }

    fn interpolate(&self, segment: usize, local_t: f32) -> P {
        dispatch_curve!(self, |c| c.interpolate(segment, local_t))
    }

    fn straight_segment(&self, segment: usize) -> Option<(P, P)> {
        dispatch_curve!(self, |c| c.straight_segment(segment))
    }

    fn segment_length(&self, segment: usize, samples: usize) -> f32 {
        dispatch_curve!(self, |c| c.segment_length(segment, samples))
    }
}

/// Wrap a possibly negative index into `0..n`.
#[inline]
pub(crate) fn wrap_index(index: isize, n: usize) -> usize {
    index.rem_euclid(n as isize) as usize
}

/// Clamp a segment index to the valid range of a curve with `count` segments.
#[inline]
pub(crate) fn clamp_segment(segment: usize, count: usize) -> usize {
    segment.min(count.saturating_sub(1))
}

/// Quadratic blend as two nested lerps.
#[inline]
pub(crate) fn quadratic<P: SplinePoint>(a: P, b: P, c: P, t: f32) -> P {
    a.lerp_to(b, t).lerp_to(b.lerp_to(c, t), t)
}

/// Cubic Bezier by repeated lerps (de Casteljau).
#[inline]
pub(crate) fn cubic_lerp<P: SplinePoint>(b0: P, b1: P, b2: P, b3: P, t: f32) -> P {
    let q0 = quadratic(b0, b1, b2, t);
    let q1 = quadratic(b1, b2, b3, t);
    q0.lerp_to(q1, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn family_tag_follows_point_count() {
        assert_eq!(SplineFamily::derive(SplineKind::Bezier, 0), SplineFamily::Empty);
        assert_eq!(SplineFamily::derive(SplineKind::Bezier, 1), SplineFamily::Single);
        assert_eq!(SplineFamily::derive(SplineKind::Bezier, 2), SplineFamily::Bezier);
        assert_eq!(SplineFamily::derive(SplineKind::Cubic, 9), SplineFamily::Cubic);
    }

    #[test]
    fn degenerate_curve_returns_zero_or_point() {
        let empty = DegenerateCurve::<Vec2>::empty();
        assert_eq!(empty.interpolate(0, 0.7), Vec2::ZERO);
        let single = DegenerateCurve::single(Vec2::new(3.0, 4.0));
        assert_eq!(single.interpolate(5, 0.2), Vec2::new(3.0, 4.0));
        assert_eq!(single.segment_count(), 0);
    }

    #[test]
    fn wrap_index_handles_negatives() {
        assert_eq!(wrap_index(-1, 4), 3);
        assert_eq!(wrap_index(5, 4), 1);
    }

    #[test]
    fn cubic_lerp_matches_bernstein_form() {
        let (p0, p1, p2, p3) = (
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 2.0),
            Vec2::new(4.0, 0.0),
        );
        let t = 0.3f32;
        let u = 1.0 - t;
        let expected = p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t);
        assert!(cubic_lerp(p0, p1, p2, p3, t).abs_diff_eq(expected, 1e-5));
    }
}
