//! Three-lane ("variance") Bezier splines.
//!
//! A center lane plus a left and right lane share control point indices. A
//! signed variance in `[-1, 1]` picks the side by its sign and blends from
//! the center toward that side by its magnitude.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{SplineConfig, SplineKind};
use crate::error::Result;
use crate::point::{EditMode, SplinePoint};
use crate::snapshot::SplineSnapshot;
use crate::spline::Spline;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    #[default]
    Center,
    Left,
    Right,
}

/// Clamp to `[-1, 1]`; NaN reads as the center lane.
#[inline]
fn clamp_variance(variance: f32) -> f32 {
    if variance.is_nan() {
        0.0
    } else {
        variance.clamp(-1.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct VarianceSpline<P: SplinePoint> {
    center: Spline<P>,
    left: Spline<P>,
    right: Spline<P>,
}

impl<P: SplinePoint> Default for VarianceSpline<P> {
    fn default() -> Self {
        Self::new(SplineConfig::new(SplineKind::Bezier))
    }
}

impl<P: SplinePoint> VarianceSpline<P> {
    /// Every lane is a Bezier spline; `config.kind` is overridden.
    pub fn new(config: SplineConfig) -> Self {
        let config = SplineConfig {
            kind: SplineKind::Bezier,
            ..config
        };
        Self {
            center: Spline::new(config.clone()),
            left: Spline::new(config.clone()),
            right: Spline::new(config),
        }
    }

    pub fn lane(&self, lane: Lane) -> &Spline<P> {
        match lane {
            Lane::Center => &self.center,
            Lane::Left => &self.left,
            Lane::Right => &self.right,
        }
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut Spline<P> {
        match lane {
            Lane::Center => &mut self.center,
            Lane::Left => &mut self.left,
            Lane::Right => &mut self.right,
        }
    }

    fn lanes_mut(&mut self) -> [&mut Spline<P>; 3] {
        [&mut self.center, &mut self.left, &mut self.right]
    }

    #[inline]
    pub fn control_point_count(&self) -> usize {
        self.center.control_point_count()
    }

    pub fn add_control_point(&mut self, center: P, left: P, right: P) {
        self.center.add_control_point(center);
        self.left.add_control_point(left);
        self.right.add_control_point(right);
    }

    pub fn insert_control_point(&mut self, index: usize, center: P, left: P, right: P) -> Result<()> {
        // All lanes have the same length, so the first insert decides success.
        self.center.insert_control_point(index, center)?;
        self.left.insert_control_point(index, left)?;
        self.right.insert_control_point(index, right)
    }

    pub fn update_control_point(&mut self, lane: Lane, index: usize, point: P, mode: EditMode) -> Result<()> {
        self.lane_mut(lane).update_control_point(index, point, mode)
    }

    /// Remove `index` from every lane, returning the removed center point.
    pub fn remove_control_point(&mut self, index: usize) -> Result<P> {
        let center = self.center.remove_control_point(index)?;
        self.left.remove_control_point(index)?;
        self.right.remove_control_point(index)?;
        Ok(center)
    }

    pub fn get_control_point(&self, lane: Lane, index: usize, mode: EditMode) -> Result<P> {
        self.lane(lane).get_control_point(index, mode)
    }

    pub fn edit_mode(&self, index: usize) -> Result<EditMode> {
        self.center.edit_mode(index)
    }

    /// Apply the mode to the point on every lane.
    pub fn set_edit_mode(&mut self, index: usize, mode: EditMode) -> Result<()> {
        for lane in self.lanes_mut() {
            lane.set_edit_mode(index, mode)?;
        }
        Ok(())
    }

    pub fn set_looping(&mut self, looping: bool) {
        for lane in self.lanes_mut() {
            lane.set_looping(looping);
        }
    }

    pub fn set_ark(&mut self, ark: bool) {
        for lane in self.lanes_mut() {
            lane.set_ark(ark);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.center.is_dirty() || self.left.is_dirty() || self.right.is_dirty()
    }

    /// Snapshots of all three lanes, rebuilding the dirty ones.
    pub fn snapshot(&mut self) -> Result<Arc<VarianceSnapshot<P>>> {
        Ok(Arc::new(VarianceSnapshot {
            center: self.center.snapshot()?,
            left: self.left.snapshot()?,
            right: self.right.snapshot()?,
        }))
    }

    pub fn evaluate(&mut self, progress: f32, variance: f32) -> Result<P> {
        let variance = clamp_variance(variance);
        let center = self.center.evaluate(progress)?;
        let side = match variance {
            v if v < 0.0 => self.left.evaluate(progress)?,
            v if v > 0.0 => self.right.evaluate(progress)?,
            _ => return Ok(center),
        };
        Ok(center.lerp_to(side, variance.abs()))
    }

    /// Length of the blended lane, interpolated from the lane lengths.
    pub fn length(&mut self, variance: f32) -> Result<f32> {
        let variance = clamp_variance(variance);
        let center = self.center.length()?;
        let side = match variance {
            v if v < 0.0 => self.left.length()?,
            v if v > 0.0 => self.right.length()?,
            _ => return Ok(center),
        };
        Ok(center + (side - center) * variance.abs())
    }
}

/// Frozen state of all three lanes.
#[derive(Clone, Debug)]
pub struct VarianceSnapshot<P: SplinePoint> {
    pub center: Arc<SplineSnapshot<P>>,
    pub left: Arc<SplineSnapshot<P>>,
    pub right: Arc<SplineSnapshot<P>>,
}

impl<P: SplinePoint> VarianceSnapshot<P> {
    pub fn evaluate(&self, progress: f32, variance: f32) -> P {
        let variance = clamp_variance(variance);
        let center = self.center.evaluate(progress);
        if variance < 0.0 {
            center.lerp_to(self.left.evaluate(progress), -variance)
        } else if variance > 0.0 {
            center.lerp_to(self.right.evaluate(progress), variance)
        } else {
            center
        }
    }

    pub fn length(&self, variance: f32) -> f32 {
        let variance = clamp_variance(variance);
        let center = self.center.length();
        let side = if variance < 0.0 {
            self.left.length()
        } else {
            self.right.length()
        };
        center + (side - center) * variance.abs()
    }
}
