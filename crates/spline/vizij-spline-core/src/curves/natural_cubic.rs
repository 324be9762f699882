//! Natural cubic spline over points sorted by x.
//!
//! Every axis other than x is fitted as a function of x with zero second
//! derivative at both ends. The `(n-2) x (n-2)` system for the interior second
//! derivatives depends only on the x spacing, so all axes share one matrix and
//! are solved as separate right-hand sides. Fewer than four points degrade:
//! two points interpolate linearly, three points blend as a quadratic.
//! Looping does not apply to this family.

use super::{clamp_segment, quadratic, Interpolate};
use crate::error::SplineError;
use crate::point::SplinePoint;
use crate::solver::LinearSystem;

/// `f(dx) = a + b dx + c dx^2 + d dx^3` per non-x axis, over `[x0, x1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment<P> {
    pub x0: f32,
    pub x1: f32,
    pub a: P,
    pub b: P,
    pub c: P,
    pub d: P,
}

impl<P: SplinePoint> CubicSegment<P> {
    #[inline]
    pub fn position(&self, t: f32) -> P {
        let x = self.x0 + (self.x1 - self.x0) * t;
        let dx = x - self.x0;
        let mut p = self.a + self.b * dx + self.c * (dx * dx) + self.d * (dx * dx * dx);
        p.set_axis(0, x);
        p
    }
}

#[derive(Clone, Debug, PartialEq)]
enum CubicForm<P> {
    Degenerate(Option<P>),
    Line(P, P),
    Quadratic(P, P, P),
    Fitted(Vec<CubicSegment<P>>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NaturalCubicCurve<P> {
    form: CubicForm<P>,
}

impl<P: SplinePoint> NaturalCubicCurve<P> {
    /// Fit the spline. Fails when the system cannot be solved, typically for
    /// control points sharing (or nearly sharing) an x coordinate.
    pub fn fit(mut points: Vec<P>) -> Result<Self, SplineError> {
        let form = match points.len() {
            0 => CubicForm::Degenerate(None),
            1 => CubicForm::Degenerate(Some(points[0])),
            2 => CubicForm::Line(points[0], points[1]),
            3 => CubicForm::Quadratic(points[0], points[1], points[2]),
            _ => {
                points.sort_by(|a, b| a.axis(0).total_cmp(&b.axis(0)));
                CubicForm::Fitted(fit_segments(&points)?)
            }
        };
        Ok(Self { form })
    }

    /// Fitted segments, empty for the degraded forms.
    pub fn segments(&self) -> &[CubicSegment<P>] {
        match &self.form {
            CubicForm::Fitted(segments) => segments,
            _ => &[],
        }
    }
}

fn fit_segments<P: SplinePoint>(points: &[P]) -> Result<Vec<CubicSegment<P>>, SplineError> {
    let n = points.len();
    let axes = P::DIM - 1;
    let x: Vec<f64> = points.iter().map(|p| p.axis(0) as f64).collect();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let value = |i: usize, axis: usize| points[i].axis(axis + 1) as f64;

    let m = n - 2;
    let mut system = LinearSystem::new(m, axes);
    for r in 0..m {
        let i = r + 1;
        if r > 0 {
            system.set_a(r, r - 1, h[i - 1]);
        }
        system.set_a(r, r, 2.0 * (h[i - 1] + h[i]));
        if r + 1 < m {
            system.set_a(r, r + 1, h[i]);
        }
        for axis in 0..axes {
            let slope_next = (value(i + 1, axis) - value(i, axis)) / h[i];
            let slope_prev = (value(i, axis) - value(i - 1, axis)) / h[i - 1];
            system.set_rhs(axis, r, 6.0 * (slope_next - slope_prev));
        }
    }
    let interior = system.solve()?;

    // Second derivatives including the zero natural boundary values.
    let second: Vec<Vec<f64>> = interior
        .into_iter()
        .map(|col| {
            let mut full = Vec::with_capacity(n);
            full.push(0.0);
            full.extend(col);
            full.push(0.0);
            full
        })
        .collect();

    let mut segments = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        let mut a = P::ZERO;
        let mut b = P::ZERO;
        let mut c = P::ZERO;
        let mut d = P::ZERO;
        for axis in 0..axes {
            let (m0, m1) = (second[axis][i], second[axis][i + 1]);
            let (y0, y1) = (value(i, axis), value(i + 1, axis));
            a.set_axis(axis + 1, y0 as f32);
            b.set_axis(
                axis + 1,
                ((y1 - y0) / h[i] - h[i] * (2.0 * m0 + m1) / 6.0) as f32,
            );
            c.set_axis(axis + 1, (m0 / 2.0) as f32);
            d.set_axis(axis + 1, ((m1 - m0) / (6.0 * h[i])) as f32);
        }
        if !(a.all_finite() && b.all_finite() && c.all_finite() && d.all_finite()) {
            return Err(SplineError::solver(format!(
                "non-finite coefficients for segment {i}"
            )));
        }
        segments.push(CubicSegment {
            x0: x[i] as f32,
            x1: x[i + 1] as f32,
            a,
            b,
            c,
            d,
        });
    }
    Ok(segments)
}

impl<P: SplinePoint> Interpolate<P> for NaturalCubicCurve<P> {
    fn segment_count(&self) -> usize {
        match &self.form {
            CubicForm::Degenerate(_) => 0,
            CubicForm::Line(..) | CubicForm::Quadratic(..) => 1,
            CubicForm::Fitted(segments) => segments.len(),
        }
    }

    fn interpolate(&self, segment: usize, local_t: f32) -> P {
        let t = local_t.clamp(0.0, 1.0);
        match &self.form {
            CubicForm::Degenerate(point) => point.unwrap_or(P::ZERO),
            CubicForm::Line(a, b) => a.lerp_to(*b, t),
            CubicForm::Quadratic(a, b, c) => quadratic(*a, *b, *c, t),
            CubicForm::Fitted(segments) => {
                segments[clamp_segment(segment, segments.len())].position(t)
            }
        }
    }

    fn straight_segment(&self, _segment: usize) -> Option<(P, P)> {
        match &self.form {
            CubicForm::Line(a, b) => Some((*a, *b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn passes_through_every_point_in_x_order() {
        let pts = vec![
            Vec2::new(3.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(2.0, -1.0),
        ];
        let curve = NaturalCubicCurve::fit(pts).unwrap();
        assert_eq!(curve.segment_count(), 3);
        assert!(curve.start().abs_diff_eq(Vec2::new(0.0, 0.0), 1e-5));
        assert!(curve.interpolate(1, 0.0).abs_diff_eq(Vec2::new(1.0, 2.0), 1e-5));
        assert!(curve.interpolate(1, 1.0).abs_diff_eq(Vec2::new(2.0, -1.0), 1e-5));
        assert!(curve.end().abs_diff_eq(Vec2::new(3.0, 1.0), 1e-5));
    }

    #[test]
    fn collinear_points_fit_a_line() {
        let pts: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32, 2.0 * i as f32)).collect();
        let curve = NaturalCubicCurve::fit(pts).unwrap();
        let p = curve.interpolate(2, 0.25);
        assert!(p.abs_diff_eq(Vec2::new(2.25, 4.5), 1e-5), "{p:?}");
    }

    #[test]
    fn end_second_derivatives_are_zero() {
        let pts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(4.0, 2.0),
        ];
        let curve = NaturalCubicCurve::fit(pts).unwrap();
        let first = curve.segments()[0];
        assert!(first.c.y.abs() < 1e-6);
        // f''(x1) = 2c + 6d dx on the last segment
        let last = curve.segments()[2];
        let dx = last.x1 - last.x0;
        assert!((2.0 * last.c.y + 6.0 * last.d.y * dx).abs() < 1e-4);
    }

    #[test]
    fn every_axis_besides_x_is_fitted() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 1.0, 4.0),
            Vec3::new(2.0, 0.0, 3.0),
            Vec3::new(3.0, 1.0, 2.0),
        ];
        let curve = NaturalCubicCurve::fit(pts).unwrap();
        let p = curve.interpolate(1, 1.0);
        assert!(p.abs_diff_eq(Vec3::new(2.0, 0.0, 3.0), 1e-5), "{p:?}");
    }

    #[test]
    fn duplicate_x_is_a_solver_failure() {
        let pts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(2.0, 0.0),
        ];
        let err = NaturalCubicCurve::fit(pts).unwrap_err();
        assert!(matches!(err, SplineError::SolverFailure { .. }));
    }

    #[test]
    fn small_point_counts_degrade() {
        let line = NaturalCubicCurve::fit(vec![Vec2::ZERO, Vec2::new(2.0, 2.0)]).unwrap();
        assert_eq!(line.interpolate(0, 0.5), Vec2::new(1.0, 1.0));
        let quad = NaturalCubicCurve::fit(vec![
            Vec2::ZERO,
            Vec2::new(1.0, 2.0),
            Vec2::new(2.0, 0.0),
        ])
        .unwrap();
        assert!(quad.interpolate(0, 0.5).abs_diff_eq(Vec2::new(1.0, 1.0), 1e-6));
    }
}
