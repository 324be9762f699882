//! Spline facade: control point editing, cache state and evaluation.

use std::sync::Arc;

use crate::baking::{bake_snapshot, BakedSpline, BakingConfig};
use crate::config::{Resolution, SplineConfig, SplineKind};
use crate::curves::SplineFamily;
use crate::error::{Result, SplineError};
use crate::point::{EditMode, SplinePoint, SplineTransform};
use crate::snapshot::SplineSnapshot;
use crate::store::PointStore;

/// Cache lifecycle. Any edit or configuration change moves back to `Dirty`.
#[derive(Clone, Debug)]
enum CacheState<P: SplinePoint> {
    Dirty,
    Clean(Arc<SplineSnapshot<P>>),
    /// The last rebuild failed; the error is reported until the next edit.
    Failed(SplineError),
}

/// An editable spline with a lazily rebuilt arc-length cache.
///
/// Mutating methods take `&mut self`, so a single writer is enforced by the
/// borrow checker. Readers on other threads take an `Arc` snapshot through
/// [`Spline::snapshot`] and evaluate it without locking.
#[derive(Clone, Debug)]
pub struct Spline<P: SplinePoint> {
    store: PointStore<P>,
    config: SplineConfig,
    cache: CacheState<P>,
}

pub type Spline2 = Spline<glam::Vec2>;
pub type Spline3 = Spline<glam::Vec3>;

impl<P: SplinePoint> Default for Spline<P> {
    fn default() -> Self {
        Self::new(SplineConfig::default())
    }
}

impl<P: SplinePoint> Spline<P> {
    pub fn new(config: SplineConfig) -> Self {
        Self {
            store: PointStore::new(),
            config,
            cache: CacheState::Dirty,
        }
    }

    pub fn with_kind(kind: SplineKind) -> Self {
        Self::new(SplineConfig::new(kind))
    }

    pub fn from_points(config: SplineConfig, points: impl IntoIterator<Item = P>) -> Self {
        Self {
            store: PointStore::from_positions(points),
            config,
            cache: CacheState::Dirty,
        }
    }

    pub fn config(&self) -> &SplineConfig {
        &self.config
    }

    pub fn store(&self) -> &PointStore<P> {
        &self.store
    }

    #[inline]
    fn mark_dirty(&mut self) {
        self.cache = CacheState::Dirty;
    }

    /// True until the next successful rebuild after an edit.
    pub fn is_dirty(&self) -> bool {
        !matches!(self.cache, CacheState::Clean(_))
    }

    // --- editing ---

    pub fn add_control_point(&mut self, point: P) {
        self.store.append(point);
        self.mark_dirty();
    }

    pub fn insert_control_point(&mut self, index: usize, point: P) -> Result<()> {
        self.store.insert(index, point)?;
        self.mark_dirty();
        Ok(())
    }

    /// Write the point (`Standard`/`Point`) or one of its handles (`Pre`/`Post`).
    pub fn update_control_point(&mut self, index: usize, point: P, mode: EditMode) -> Result<()> {
        self.store.set(index, point, mode)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn remove_control_point(&mut self, index: usize) -> Result<P> {
        let removed = self.store.remove(index)?;
        self.mark_dirty();
        Ok(removed.position)
    }

    pub fn get_control_point(&self, index: usize, mode: EditMode) -> Result<P> {
        self.store.get(index).map(|cp| cp.get(mode))
    }

    pub fn edit_mode(&self, index: usize) -> Result<EditMode> {
        self.store.mode(index)
    }

    pub fn set_edit_mode(&mut self, index: usize, mode: EditMode) -> Result<()> {
        self.store.set_mode(index, mode)?;
        self.mark_dirty();
        Ok(())
    }

    #[inline]
    pub fn control_point_count(&self) -> usize {
        self.store.count()
    }

    // --- configuration ---

    pub fn set_looping(&mut self, looping: bool) {
        if self.config.looping != looping {
            self.config.looping = looping;
            self.mark_dirty();
        }
    }

    pub fn set_ark(&mut self, ark: bool) {
        if self.config.ark != ark {
            self.config.ark = ark;
            self.mark_dirty();
        }
    }

    pub fn set_kind(&mut self, kind: SplineKind) {
        if self.config.kind != kind {
            self.config.kind = kind;
            self.mark_dirty();
        }
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        if self.config.resolution != resolution {
            self.config.resolution = resolution;
            self.mark_dirty();
        }
    }

    /// Family tag derived from the current configuration and point count.
    pub fn spline_family_tag(&self) -> SplineFamily {
        SplineFamily::derive(self.config.kind, self.store.count())
    }

    // --- cache ---

    /// Rebuild the cache from the current control points, replacing any
    /// previous snapshot or failure.
    pub fn rebuild(&mut self) -> Result<Arc<SplineSnapshot<P>>> {
        match SplineSnapshot::build(&self.store, &self.config) {
            Ok(snapshot) => {
                log::debug!(
                    "spline rebuilt: family={:?} points={} length={}",
                    snapshot.family(),
                    snapshot.point_count(),
                    snapshot.length()
                );
                let snapshot = Arc::new(snapshot);
                self.cache = CacheState::Clean(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(err) => {
                log::warn!(
                    "spline rebuild failed ({}): {err}; family={:?} points={}",
                    err.category(),
                    self.spline_family_tag(),
                    self.store.count()
                );
                self.cache = CacheState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Current snapshot, rebuilding first if the spline is dirty.
    pub fn snapshot(&mut self) -> Result<Arc<SplineSnapshot<P>>> {
        match &self.cache {
            CacheState::Clean(snapshot) => Ok(Arc::clone(snapshot)),
            CacheState::Failed(err) => Err(err.clone()),
            CacheState::Dirty => self.rebuild(),
        }
    }

    /// Snapshot without rebuilding; fails with `StaleSnapshot` when dirty.
    pub fn clean_snapshot(&self) -> Result<&Arc<SplineSnapshot<P>>> {
        match &self.cache {
            CacheState::Clean(snapshot) => Ok(snapshot),
            CacheState::Failed(err) => Err(err.clone()),
            CacheState::Dirty => Err(SplineError::StaleSnapshot),
        }
    }

    // --- evaluation ---

    pub fn evaluate(&mut self, progress: f32) -> Result<P> {
        Ok(self.snapshot()?.evaluate(progress))
    }

    /// Evaluate through a shared reference; requires a clean cache.
    pub fn evaluate_clean(&self, progress: f32) -> Result<P> {
        Ok(self.clean_snapshot()?.evaluate(progress))
    }

    pub fn evaluate_world(&mut self, progress: f32, transform: &SplineTransform) -> Result<P> {
        Ok(self.snapshot()?.evaluate_world(progress, transform))
    }

    pub fn tangent(&mut self, progress: f32) -> Result<P> {
        Ok(self.snapshot()?.tangent(progress))
    }

    pub fn length(&mut self) -> Result<f32> {
        Ok(self.snapshot()?.length())
    }

    pub fn segment_length(&mut self, segment: usize) -> Result<f32> {
        self.snapshot()?.segment_length(segment)
    }

    pub fn segment_range(&mut self, segment: usize) -> Result<(f32, f32)> {
        self.snapshot()?.segment_range(segment)
    }

    /// `step_count + 1` evenly spaced positions along the path.
    pub fn bake(&mut self, step_count: usize) -> Result<BakedSpline<P>> {
        let cfg = BakingConfig {
            step_count,
            ..BakingConfig::default()
        };
        let snapshot = self.snapshot()?;
        Ok(bake_snapshot(&*snapshot, &cfg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn edits_mark_dirty_and_evaluation_cleans() {
        let mut spline = Spline2::with_kind(SplineKind::Linear);
        spline.add_control_point(Vec2::ZERO);
        spline.add_control_point(Vec2::new(2.0, 0.0));
        assert!(spline.is_dirty());
        assert_eq!(spline.evaluate(0.5).unwrap(), Vec2::new(1.0, 0.0));
        assert!(!spline.is_dirty());

        spline.update_control_point(1, Vec2::new(4.0, 0.0), EditMode::Standard).unwrap();
        assert!(spline.is_dirty());
        assert_eq!(spline.evaluate_clean(0.5), Err(SplineError::StaleSnapshot));
        assert_eq!(spline.length().unwrap(), 4.0);
        assert_eq!(spline.evaluate_clean(0.5).unwrap(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn unchanged_flags_keep_the_cache() {
        let mut spline = Spline2::from_points(SplineConfig::default(), [Vec2::ZERO, Vec2::X]);
        spline.rebuild().unwrap();
        spline.set_looping(false);
        spline.set_kind(SplineKind::Linear);
        assert!(!spline.is_dirty());
        spline.set_ark(true);
        assert!(spline.is_dirty());
    }

    #[test]
    fn held_snapshot_survives_edits() {
        let mut spline = Spline2::from_points(SplineConfig::default(), [Vec2::ZERO, Vec2::X]);
        let before = spline.snapshot().unwrap();
        spline.add_control_point(Vec2::new(1.0, 5.0));
        let after = spline.snapshot().unwrap();
        assert_eq!(before.point_count(), 2);
        assert_eq!(after.point_count(), 3);
        assert_eq!(before.evaluate(1.0), Vec2::X);
    }

    #[test]
    fn failed_rebuild_is_reported_until_edited() {
        let mut spline = Spline2::from_points(
            SplineConfig::new(SplineKind::Cubic),
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 3.0),
                Vec2::new(2.0, 0.0),
            ],
        );
        let err = spline.evaluate(0.5).unwrap_err();
        assert_eq!(err.category(), "numerical");
        assert!(spline.is_dirty());
        assert!(spline.evaluate_clean(0.5).is_err());

        spline.update_control_point(2, Vec2::new(1.5, 3.0), EditMode::Standard).unwrap();
        assert!(spline.evaluate(0.5).is_ok());
    }

    #[test]
    fn family_tag_tracks_point_count() {
        let mut spline = Spline2::with_kind(SplineKind::Bezier);
        assert_eq!(spline.spline_family_tag(), SplineFamily::Empty);
        spline.add_control_point(Vec2::ZERO);
        assert_eq!(spline.spline_family_tag(), SplineFamily::Single);
        spline.add_control_point(Vec2::X);
        assert_eq!(spline.spline_family_tag(), SplineFamily::Bezier);
        spline.remove_control_point(0).unwrap();
        assert_eq!(spline.spline_family_tag(), SplineFamily::Single);
    }

    #[test]
    fn invalid_config_fails_rebuild() {
        let mut cfg = SplineConfig::default();
        cfg.resolution.linear = 0;
        let mut spline = Spline2::from_points(cfg, [Vec2::ZERO, Vec2::X]);
        assert_eq!(spline.rebuild().unwrap_err().category(), "config");
    }
}
