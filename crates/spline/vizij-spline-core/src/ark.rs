//! Constant-speed ("ark") re-parameterization.
//!
//! A post-process over plain evaluation: the path is walked in small progress
//! steps, chord distances are accumulated, and requested progress is then read
//! as a fraction of distance and mapped back to the progress that reaches it.
//! Every segment boundary is a sample, so no chord cuts across a corner.

use serde::{Deserialize, Serialize};

use crate::point::SplinePoint;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArkTable {
    /// Sampled progress values, increasing from `0.0` to `1.0`.
    progress: Vec<f32>,
    /// Normalized distance reached at each sample; ends in exactly `1.0`.
    distance: Vec<f32>,
}

impl ArkTable {
    /// Walk `evaluate` over `[0, 1]`.
    ///
    /// `knots` are the progress values where segments end (the arc-length
    /// table). Each knot interval gets a share of `steps` proportional to its
    /// width, at least one.
    pub fn build<P, F>(knots: &[f32], steps: usize, evaluate: F) -> Self
    where
        P: SplinePoint,
        F: Fn(f32) -> P,
    {
        let steps = steps.max(1);
        let mut progress = vec![0.0f32];
        let mut distance = vec![0.0f32];
        let mut prev = evaluate(0.0);
        let mut total = 0.0f32;
        let mut start = 0.0f32;
        let ends = knots
            .iter()
            .copied()
            .filter(|k| k.is_finite() && *k < 1.0)
            .chain(std::iter::once(1.0));
        for end in ends {
            if end <= start {
                continue;
            }
            let width = end - start;
            let count = ((width * steps as f32).ceil() as usize).max(1);
            for k in 1..=count {
                let t = if k == count {
                    end
                } else {
                    start + width * (k as f32 / count as f32)
                };
                let next = evaluate(t);
                total += prev.distance_to(next);
                progress.push(t);
                distance.push(total);
                prev = next;
            }
            start = end;
        }
        if total > 0.0 && total.is_finite() {
            for d in &mut distance {
                *d /= total;
            }
        } else {
            distance.copy_from_slice(&progress);
        }
        let last = distance.len() - 1;
        distance[last] = 1.0;
        Self { progress, distance }
    }

    /// Number of sampled intervals.
    #[inline]
    pub fn steps(&self) -> usize {
        self.distance.len() - 1
    }

    /// Progress at which the path has covered `fraction` of its length.
    pub fn map(&self, fraction: f32) -> f32 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }
        let hi = self
            .distance
            .partition_point(|&d| d < fraction)
            .clamp(1, self.steps());
        let (d0, d1) = (self.distance[hi - 1], self.distance[hi]);
        let (p0, p1) = (self.progress[hi - 1], self.progress[hi]);
        let span = d1 - d0;
        let local = if span > 0.0 { (fraction - d0) / span } else { 0.0 };
        p0 + (p1 - p0) * local
    }
}
