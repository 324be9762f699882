//! Centripetal Catmull-Rom (alpha = 0.5), evaluated with the Barry-Goldman
//! pyramid over non-uniform knots.
//!
//! Open splines have no real neighbour before the first point or after the
//! last one, so a virtual point is placed there: the adjacent chord rotated a
//! quarter turn counter-clockwise (XY plane) and halved.

use super::{clamp_segment, wrap_index, Interpolate};
use crate::point::SplinePoint;

pub const ALPHA: f32 = 0.5;

/// Smallest knot interval; keeps coincident points from dividing by zero.
const MIN_KNOT_INTERVAL: f32 = 1e-4;

#[derive(Clone, Debug, PartialEq)]
pub struct CatmullRomCurve<P> {
    points: Vec<P>,
    virtual_start: P,
    virtual_end: P,
    looped: bool,
}

impl<P: SplinePoint> CatmullRomCurve<P> {
    pub fn new(points: Vec<P>, looping: bool) -> Self {
        let n = points.len();
        let (virtual_start, virtual_end) = if n >= 2 {
            let first = points[0];
            let last = points[n - 1];
            (
                first + (first - points[1]).rotate_90() * 0.5,
                last + (last - points[n - 2]).rotate_90() * 0.5,
            )
        } else {
            (P::ZERO, P::ZERO)
        };
        Self {
            looped: looping && n > 2,
            points,
            virtual_start,
            virtual_end,
        }
    }

    /// Point used before the first control point on open splines.
    pub fn virtual_start(&self) -> P {
        self.virtual_start
    }

    /// Point used after the last control point on open splines.
    pub fn virtual_end(&self) -> P {
        self.virtual_end
    }

    /// The four points driving `segment`.
    fn neighbourhood(&self, segment: usize) -> [P; 4] {
        let n = self.points.len();
        let i = segment as isize;
        if self.looped {
            return [
                self.points[wrap_index(i - 1, n)],
                self.points[wrap_index(i, n)],
                self.points[wrap_index(i + 1, n)],
                self.points[wrap_index(i + 2, n)],
            ];
        }
        let p0 = if segment == 0 {
            self.virtual_start
        } else {
            self.points[segment - 1]
        };
        let p3 = if segment + 2 >= n {
            self.virtual_end
        } else {
            self.points[segment + 2]
        };
        [p0, self.points[segment], self.points[segment + 1], p3]
    }
}

#[inline]
fn next_knot<P: SplinePoint>(t: f32, a: P, b: P) -> f32 {
    t + a.distance_to(b).powf(ALPHA).max(MIN_KNOT_INTERVAL)
}

#[inline]
fn blend<P: SplinePoint>(a: P, b: P, ta: f32, tb: f32, t: f32) -> P {
    a * ((tb - t) / (tb - ta)) + b * ((t - ta) / (tb - ta))
}

/// Barry-Goldman evaluation of the span between `p[1]` and `p[2]`.
pub fn centripetal<P: SplinePoint>(p: [P; 4], u: f32) -> P {
    let t0 = 0.0;
    let t1 = next_knot(t0, p[0], p[1]);
    let t2 = next_knot(t1, p[1], p[2]);
    let t3 = next_knot(t2, p[2], p[3]);
    let t = t1 + (t2 - t1) * u;

    let a1 = blend(p[0], p[1], t0, t1, t);
    let a2 = blend(p[1], p[2], t1, t2, t);
    let a3 = blend(p[2], p[3], t2, t3, t);
    let b1 = blend(a1, a2, t0, t2, t);
    let b2 = blend(a2, a3, t1, t3, t);
    blend(b1, b2, t1, t2, t)
}

impl<P: SplinePoint> Interpolate<P> for CatmullRomCurve<P> {
    fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.looped => n,
            n => n - 1,
        }
    }

    fn interpolate(&self, segment: usize, local_t: f32) -> P {
        let n = self.points.len();
        match n {
            0 => return P::ZERO,
            1 => return self.points[0],
            2 => return self.points[0].lerp_to(self.points[1], local_t.clamp(0.0, 1.0)),
            _ => {}
        }
        let segment = clamp_segment(segment, self.segment_count());
        let p = self.neighbourhood(segment);
        // Pin the knots exactly; the pyramid only reproduces them to rounding.
        if local_t <= 0.0 {
            return p[1];
        }
        if local_t >= 1.0 {
            return p[2];
        }
        centripetal(p, local_t)
    }

    fn straight_segment(&self, _segment: usize) -> Option<(P, P)> {
        match self.points.as_slice() {
            [a, b] => Some((*a, *b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn passes_through_control_points() {
        let pts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 2.0),
            Vec2::new(4.0, 0.0),
        ];
        let curve = CatmullRomCurve::new(pts.clone(), false);
        assert_eq!(curve.segment_count(), 3);
        for (i, p) in pts.iter().enumerate().take(3) {
            assert_eq!(curve.interpolate(i, 0.0), *p);
        }
        assert_eq!(curve.end(), pts[3]);
        assert!(curve.interpolate(1, 0.5).is_finite());
    }

    #[test]
    fn virtual_points_follow_counter_clockwise_rotation() {
        // counter-clockwise corner
        let ccw = CatmullRomCurve::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0)],
            false,
        );
        assert_eq!(ccw.virtual_start(), Vec2::new(0.0, -1.0));
        assert_eq!(ccw.virtual_end(), Vec2::new(1.0, 2.0));

        // the clockwise mirror image does not mirror its virtual start
        let cw = CatmullRomCurve::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, -2.0)],
            false,
        );
        assert_eq!(cw.virtual_start(), Vec2::new(0.0, -1.0));
        assert_eq!(cw.virtual_end(), Vec2::new(3.0, -2.0));
    }

    #[test]
    fn both_windings_stay_finite_and_hit_their_ends() {
        for sign in [1.0f32, -1.0] {
            let pts = vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(2.0, 2.0 * sign),
                Vec2::new(0.0, 2.0 * sign),
            ];
            let curve = CatmullRomCurve::new(pts.clone(), false);
            for k in 0..=20 {
                let t = k as f32 / 20.0;
                for seg in 0..curve.segment_count() {
                    assert!(curve.interpolate(seg, t).is_finite());
                }
            }
            assert_eq!(curve.start(), pts[0]);
            assert_eq!(curve.end(), pts[3]);
        }
    }

    #[test]
    fn looped_curve_closes() {
        let pts = vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let curve = CatmullRomCurve::new(pts, true);
        assert_eq!(curve.segment_count(), 4);
        assert_eq!(curve.end(), Vec2::ZERO);
    }

    #[test]
    fn two_points_are_a_line() {
        let curve = CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)], true);
        assert_eq!(curve.segment_count(), 1);
        assert_eq!(curve.interpolate(0, 0.25), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let curve = CatmullRomCurve::new(vec![Vec2::ZERO, Vec2::ZERO, Vec2::X], false);
        assert!(curve.interpolate(0, 0.5).is_finite());
        assert!(curve.interpolate(1, 0.5).is_finite());
    }
}
