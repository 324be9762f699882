//! Immutable spline state shared with readers.
//!
//! A snapshot is built once per rebuild and handed out behind an `Arc`.
//! Readers keep evaluating the snapshot they hold while the owning spline is
//! edited and rebuilt; they never see a partially built table.

use crate::arc_length::ArcLengthTable;
use crate::ark::ArkTable;
use crate::config::{SplineConfig, SplineKind};
use crate::curves::{Curve, Interpolate, SplineFamily};
use crate::error::Result;
use crate::point::{SplinePoint, SplineTransform};
use crate::store::PointStore;

/// Finite-difference step used by [`SplineSnapshot::tangent`].
pub const TANGENT_EPSILON: f32 = 1e-3;

#[derive(Clone, Debug)]
pub struct SplineSnapshot<P: SplinePoint> {
    family: SplineFamily,
    looping: bool,
    point_count: usize,
    revision: u64,
    curve: Curve<P>,
    table: ArcLengthTable,
    ark: Option<ArkTable>,
}

impl<P: SplinePoint> SplineSnapshot<P> {
    /// Build the evaluator, measure it and, when enabled, walk it for the
    /// constant-speed table.
    pub fn build(store: &PointStore<P>, config: &SplineConfig) -> Result<Self> {
        config.validate()?;
        let curve = Curve::build(config.kind, store, config.looping)?;
        let table = match &curve {
            Curve::PointToPoint(c) => ArcLengthTable::from_distances(c.distances()),
            _ => ArcLengthTable::build::<P, _>(&curve, config.resolution.samples_for(config.kind)),
        };
        let ark = if config.ark && curve.segment_count() > 0 {
            Some(ArkTable::build(table.table(), config.resolution.ark_steps, |p| {
                evaluate_on::<P, _>(&curve, &table, None, p)
            }))
        } else {
            None
        };
        Ok(Self {
            family: SplineFamily::derive(config.kind, store.count()),
            looping: config.looping,
            point_count: store.count(),
            revision: store.revision(),
            curve,
            table,
            ark,
        })
    }

    /// Position at `progress` in `[0, 1]`; values outside clamp to the ends.
    pub fn evaluate(&self, progress: f32) -> P {
        evaluate_on(&self.curve, &self.table, self.ark.as_ref(), progress)
    }

    pub fn evaluate_world(&self, progress: f32, transform: &SplineTransform) -> P {
        self.evaluate(progress).to_world(transform)
    }

    /// Derivative of position with respect to progress, by symmetric finite
    /// differences clamped to the path ends.
    pub fn tangent(&self, progress: f32) -> P {
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let forward = (progress + TANGENT_EPSILON).min(1.0);
        let backward = (progress - TANGENT_EPSILON).max(0.0);
        let span = forward - backward;
        (self.evaluate(forward) - self.evaluate(backward)) * (1.0 / span)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.table.length()
    }

    pub fn segment_length(&self, segment: usize) -> Result<f32> {
        self.table.segment_length(segment)
    }

    pub fn segment_range(&self, segment: usize) -> Result<(f32, f32)> {
        self.table.segment_range(segment)
    }

    #[inline]
    pub fn family(&self) -> SplineFamily {
        self.family
    }

    #[inline]
    pub fn kind(&self) -> Option<SplineKind> {
        match self.family {
            SplineFamily::Empty | SplineFamily::Single => None,
            SplineFamily::Linear => Some(SplineKind::Linear),
            SplineFamily::CubicLinear => Some(SplineKind::CubicLinear),
            SplineFamily::Bezier => Some(SplineKind::Bezier),
            SplineFamily::Cubic => Some(SplineKind::Cubic),
            SplineFamily::BSpline => Some(SplineKind::BSpline),
            SplineFamily::CatmullRom => Some(SplineKind::CatmullRom),
            SplineFamily::PointToPoint => Some(SplineKind::PointToPoint),
        }
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Store revision this snapshot was built from.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn curve(&self) -> &Curve<P> {
        &self.curve
    }

    pub fn table(&self) -> &ArcLengthTable {
        &self.table
    }

    pub fn ark(&self) -> Option<&ArkTable> {
        self.ark.as_ref()
    }
}

/// Evaluate against an already-matched curve evaluator.
pub(crate) fn evaluate_on<P, C>(
    curve: &C,
    table: &ArcLengthTable,
    ark: Option<&ArkTable>,
    progress: f32,
) -> P
where
    P: SplinePoint,
    C: Interpolate<P>,
{
    if curve.segment_count() == 0 {
        return curve.interpolate(0, 0.0);
    }
    // NaN has no position on the path; treat it as the start.
    if progress.is_nan() || progress <= 0.0 {
        return curve.start();
    }
    if progress >= 1.0 {
        return curve.end();
    }
    let progress = match ark {
        Some(ark) => ark.map(progress),
        None => progress,
    };
    let (segment, local_t) = table.resolve(progress);
    curve.interpolate(segment, local_t)
}
