//! Spline configuration: curve family, topology flags and sampling resolution.

use serde::{Deserialize, Serialize};

use crate::error::SplineError;

/// Pivot magnitude below which elimination swaps in the next row.
pub const PIVOT_EPSILON: f64 = 1e-8;

/// Magnitude treated as overflow during elimination.
pub const OVERFLOW_LIMIT: f64 = 1e260;

/// Curve family selected for a spline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineKind {
    #[default]
    Linear,
    CubicLinear,
    Bezier,
    /// Natural cubic spline fitted over x.
    Cubic,
    BSpline,
    CatmullRom,
    PointToPoint,
}

/// Samples per segment used when measuring arc length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub linear: usize,
    pub cubic_linear: usize,
    pub bezier: usize,
    pub cubic: usize,
    pub bspline: usize,
    pub catmull_rom: usize,
    /// Progress steps used to build the constant-speed table when `ark` is on.
    pub ark_steps: usize,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            linear: 64,
            cubic_linear: 96,
            bezier: 128,
            cubic: 128,
            bspline: 96,
            catmull_rom: 128,
            ark_steps: 256,
        }
    }
}

impl Resolution {
    /// Samples per segment for `kind`. Point-to-point segments are measured
    /// exactly, so a single step suffices.
    pub fn samples_for(&self, kind: SplineKind) -> usize {
        match kind {
            SplineKind::Linear => self.linear,
            SplineKind::CubicLinear => self.cubic_linear,
            SplineKind::Bezier => self.bezier,
            SplineKind::Cubic => self.cubic,
            SplineKind::BSpline => self.bspline,
            SplineKind::CatmullRom => self.catmull_rom,
            SplineKind::PointToPoint => 1,
        }
    }
}

/// Per-spline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplineConfig {
    pub kind: SplineKind,
    /// Connect the last control point back to the first.
    #[serde(default)]
    pub looping: bool,
    /// Constant-speed re-parameterization over the whole path.
    #[serde(default)]
    pub ark: bool,
    #[serde(default)]
    pub resolution: Resolution,
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            kind: SplineKind::default(),
            looping: false,
            ark: false,
            resolution: Resolution::default(),
        }
    }
}

impl SplineConfig {
    pub fn new(kind: SplineKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_ark(mut self, ark: bool) -> Self {
        self.ark = ark;
        self
    }

    /// Reject resolutions that would produce empty sample sets.
    pub fn validate(&self) -> Result<(), SplineError> {
        let r = &self.resolution;
        let fields = [
            ("linear", r.linear),
            ("cubic_linear", r.cubic_linear),
            ("bezier", r.bezier),
            ("cubic", r.cubic),
            ("bspline", r.bspline),
            ("catmull_rom", r.catmull_rom),
        ];
        for (name, samples) in fields {
            if samples == 0 {
                return Err(SplineError::config(format!(
                    "resolution.{name} must be > 0"
                )));
            }
        }
        if self.ark && r.ark_steps < 2 {
            return Err(SplineError::config("resolution.ark_steps must be >= 2"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resolution_is_family_dependent() {
        let r = Resolution::default();
        assert_eq!(r.samples_for(SplineKind::Linear), 64);
        assert_eq!(r.samples_for(SplineKind::Bezier), 128);
        assert_eq!(r.samples_for(SplineKind::PointToPoint), 1);
    }

    #[test]
    fn validate_rejects_zero_samples() {
        let mut cfg = SplineConfig::new(SplineKind::Cubic);
        assert!(cfg.validate().is_ok());
        cfg.resolution.cubic = 0;
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn validate_checks_ark_steps_only_when_enabled() {
        let mut cfg = SplineConfig::new(SplineKind::Linear);
        cfg.resolution.ark_steps = 0;
        assert!(cfg.validate().is_ok());
        cfg.ark = true;
        assert!(cfg.validate().is_err());
    }
}
