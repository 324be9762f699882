//! Baking API: sample a spline at fixed progress steps for drawing or export.

use serde::{Deserialize, Serialize};

use crate::point::{SplinePoint, SplineTransform};
use crate::snapshot::SplineSnapshot;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakingConfig {
    /// Number of steps; `step_count + 1` samples are produced, ends included.
    pub step_count: usize,
    /// Also estimate the tangent at every sample.
    pub tangents: bool,
    /// Bake in world space instead of the spline's local space.
    pub transform: Option<SplineTransform>,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            step_count: 64,
            tangents: false,
            transform: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedSpline<P> {
    pub progress: Vec<f32>,
    pub positions: Vec<P>,
    pub tangents: Option<Vec<P>>,
    /// Arc length of the source spline in local units.
    pub length: f32,
}

impl<P> BakedSpline<P> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Bake a snapshot using the provided config.
pub fn bake_snapshot<P: SplinePoint>(
    snapshot: &SplineSnapshot<P>,
    cfg: &BakingConfig,
) -> BakedSpline<P> {
    let steps = cfg.step_count.max(1);
    let inv = 1.0 / steps as f32;
    let progress: Vec<f32> = (0..=steps).map(|k| (k as f32 * inv).min(1.0)).collect();

    let positions = progress
        .iter()
        .map(|&p| match &cfg.transform {
            Some(xf) => snapshot.evaluate_world(p, xf),
            None => snapshot.evaluate(p),
        })
        .collect();

    // Tangents are directions, so only the rotation applies in world space.
    let tangents = cfg.tangents.then(|| {
        progress
            .iter()
            .map(|&p| {
                let t = snapshot.tangent(p);
                match &cfg.transform {
                    Some(xf) => t.to_world(&SplineTransform::new(glam::Vec3::ZERO, xf.rotation)),
                    None => t,
                }
            })
            .collect()
    });

    BakedSpline {
        progress,
        positions,
        tangents,
        length: snapshot.length(),
    }
}

/// Export baked data as serde_json::Value (stable schema for FFI/serialization).
pub fn export_baked_json<P: SplinePoint + Serialize>(baked: &BakedSpline<P>) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}
