//! Straight hops between consecutive control points.
//!
//! This family measures itself exactly and keeps its own absolute distance
//! table, which callers can query in world units with
//! [`PointToPointCurve::point_at_distance`].

use super::{clamp_segment, Interpolate};
use crate::point::SplinePoint;

#[derive(Clone, Debug, PartialEq)]
pub struct PointToPointCurve<P> {
    points: Vec<P>,
    looped: bool,
    /// Distance travelled at the end of each segment.
    distances: Vec<f32>,
}

impl<P: SplinePoint> PointToPointCurve<P> {
    pub fn new(points: Vec<P>, looping: bool) -> Self {
        let looped = looping && points.len() > 2;
        let mut curve = Self {
            points,
            looped,
            distances: Vec::new(),
        };
        let mut total = 0.0f32;
        curve.distances = (0..curve.segment_count())
            .map(|i| {
                let (a, b) = curve.endpoints(i);
                total += a.distance_to(b);
                total
            })
            .collect();
        curve
    }

    fn endpoints(&self, segment: usize) -> (P, P) {
        let n = self.points.len();
        (self.points[segment], self.points[(segment + 1) % n])
    }

    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    pub fn total_distance(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Position after travelling `distance` along the path, clamped to its ends.
    pub fn point_at_distance(&self, distance: f32) -> P {
        if self.distances.is_empty() {
            return self.points.first().copied().unwrap_or(P::ZERO);
        }
        let last = self.distances.len() - 1;
        let segment = self
            .distances
            .partition_point(|&d| d < distance)
            .min(last);
        let start = if segment == 0 { 0.0 } else { self.distances[segment - 1] };
        let span = self.distances[segment] - start;
        let t = if span > 0.0 { (distance - start) / span } else { 0.0 };
        self.interpolate(segment, t)
    }
}

impl<P: SplinePoint> Interpolate<P> for PointToPointCurve<P> {
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
                let (a, b) = self.endpoints(clamp_segment(segment, self.segment_count()));
                a.lerp_to(b, local_t.clamp(0.0, 1.0))
            }
        }
    }

    fn straight_segment(&self, segment: usize) -> Option<(P, P)> {
        (self.points.len() > 1).then(|| self.endpoints(clamp_segment(segment, self.segment_count())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn keeps_absolute_distances() {
        let curve = PointToPointCurve::new(
            vec![Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(3.0, 4.0)],
            false,
        );
        assert_eq!(curve.distances(), &[3.0, 7.0]);
        assert_eq!(curve.point_at_distance(5.0), Vec2::new(3.0, 2.0));
        assert_eq!(curve.point_at_distance(-1.0), Vec2::ZERO);
        assert_eq!(curve.point_at_distance(100.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn looped_adds_closing_hop() {
        let curve = PointToPointCurve::new(
            vec![Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(3.0, 4.0)],
            true,
        );
        assert_eq!(curve.segment_count(), 3);
        assert_eq!(curve.total_distance(), 12.0);
        assert_eq!(curve.end(), Vec2::ZERO);
    }
}
