//! Batched and parallel evaluation over frozen snapshots.
//!
//! A batch matches the snapshot's curve family once and then runs the
//! concrete evaluator for every query. Parallel batches split the queries
//! into contiguous chunks on scoped threads; results keep query order.

use std::sync::Arc;
use std::thread;

use crate::arc_length::ArcLengthTable;
use crate::ark::ArkTable;
use crate::curves::{Interpolate, SplineFamily};
use crate::dispatch_curve;
use crate::point::{SplinePoint, SplineTransform};
use crate::snapshot::{evaluate_on, SplineSnapshot};
use crate::variance::VarianceSnapshot;

/// Below this many queries per worker a parallel batch runs inline.
pub const MIN_QUERIES_PER_WORKER: usize = 64;

/// Evaluation job bound to one concrete curve evaluator.
pub struct EvaluateJob<'a, C> {
    curve: &'a C,
    table: &'a ArcLengthTable,
    ark: Option<&'a ArkTable>,
    transform: Option<&'a SplineTransform>,
}

impl<'a, C> EvaluateJob<'a, C> {
    pub fn new(curve: &'a C, table: &'a ArcLengthTable, ark: Option<&'a ArkTable>) -> Self {
        Self {
            curve,
            table,
            ark,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: Option<&'a SplineTransform>) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    pub fn evaluate<P>(&self, progress: f32) -> P
    where
        P: SplinePoint,
        C: Interpolate<P>,
    {
        let local: P = evaluate_on::<P, C>(self.curve, self.table, self.ark, progress);
        match self.transform {
            Some(xf) => local.to_world(xf),
            None => local,
        }
    }

    pub fn run_into<P>(&self, progress: &[f32], out: &mut [P])
    where
        P: SplinePoint,
        C: Interpolate<P>,
    {
        debug_assert_eq!(out.len(), progress.len());
        for (slot, &p) in out.iter_mut().zip(progress) {
            *slot = self.evaluate(p);
        }
    }
}

fn run_chunk<P: SplinePoint>(
    snapshot: &SplineSnapshot<P>,
    transform: Option<&SplineTransform>,
    progress: &[f32],
    out: &mut [P],
) {
    let table = snapshot.table();
    let ark = snapshot.ark();
    dispatch_curve!(snapshot.curve(), |c| {
        EvaluateJob::new(c, table, ark)
            .with_transform(transform)
            .run_into(progress, out)
    })
}

/// Evaluate every progress value against `snapshot`, in order.
pub fn evaluate_batch<P: SplinePoint>(snapshot: &SplineSnapshot<P>, progress: &[f32]) -> Vec<P> {
    let mut out = Vec::new();
    evaluate_batch_into(snapshot, progress, &mut out);
    out
}

/// Like [`evaluate_batch`], reusing `out`'s allocation.
pub fn evaluate_batch_into<P: SplinePoint>(
    snapshot: &SplineSnapshot<P>,
    progress: &[f32],
    out: &mut Vec<P>,
) {
    out.clear();
    out.resize(progress.len(), P::ZERO);
    run_chunk(snapshot, None, progress, out);
}

/// Split the batch across up to `workers` scoped threads.
pub fn evaluate_parallel<P: SplinePoint>(
    snapshot: &SplineSnapshot<P>,
    progress: &[f32],
    workers: usize,
) -> Vec<P> {
    evaluate_parallel_with(snapshot, None, progress, workers)
}

fn evaluate_parallel_with<P: SplinePoint>(
    snapshot: &SplineSnapshot<P>,
    transform: Option<&SplineTransform>,
    progress: &[f32],
    workers: usize,
) -> Vec<P> {
    let mut out = vec![P::ZERO; progress.len()];
    let workers = workers
        .min(progress.len() / MIN_QUERIES_PER_WORKER)
        .max(1);
    log::trace!(
        "batch dispatch: family={:?} queries={} workers={}",
        snapshot.family(),
        progress.len(),
        workers
    );
    if workers == 1 {
        run_chunk(snapshot, transform, progress, &mut out);
        return out;
    }
    let chunk = progress.len().div_ceil(workers);
    thread::scope(|scope| {
        for (queries, slots) in progress.chunks(chunk).zip(out.chunks_mut(chunk)) {
            scope.spawn(move || run_chunk(snapshot, transform, queries, slots));
        }
    });
    out
}

/// Batch job owning its snapshot, so it can be moved to another thread.
///
/// The family is read from the snapshot when the job runs, not when it is
/// created.
#[derive(Clone, Debug)]
pub struct DynamicEvaluateJob<P: SplinePoint> {
    snapshot: Arc<SplineSnapshot<P>>,
    progress: Vec<f32>,
    transform: Option<SplineTransform>,
}

impl<P: SplinePoint> DynamicEvaluateJob<P> {
    pub fn new(snapshot: Arc<SplineSnapshot<P>>, progress: Vec<f32>) -> Self {
        Self {
            snapshot,
            progress,
            transform: None,
        }
    }

    /// Produce world-space positions.
    pub fn with_transform(mut self, transform: SplineTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn family(&self) -> SplineFamily {
        self.snapshot.family()
    }

    pub fn run(&self) -> Vec<P> {
        self.run_parallel(1)
    }

    pub fn run_parallel(&self, workers: usize) -> Vec<P> {
        evaluate_parallel_with(
            &self.snapshot,
            self.transform.as_ref(),
            &self.progress,
            workers,
        )
    }
}

/// One variance query: path progress and signed lane offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VarianceQuery {
    pub progress: f32,
    pub variance: f32,
}

/// Batch job over a three-lane variance snapshot.
#[derive(Clone, Debug)]
pub struct VarianceEvaluateJob<P: SplinePoint> {
    snapshot: Arc<VarianceSnapshot<P>>,
    queries: Vec<VarianceQuery>,
}

impl<P: SplinePoint> VarianceEvaluateJob<P> {
    pub fn new(snapshot: Arc<VarianceSnapshot<P>>, queries: Vec<VarianceQuery>) -> Self {
        Self { snapshot, queries }
    }

    pub fn run(&self) -> Vec<P> {
        log::trace!(
            "variance batch dispatch: queries={}",
            self.queries.len()
        );
        self.queries
            .iter()
            .map(|q| self.snapshot.evaluate(q.progress, q.variance))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SplineConfig, SplineKind};
    use crate::store::PointStore;
    use glam::{Vec2, Vec3};

    fn snapshot(kind: SplineKind) -> SplineSnapshot<Vec2> {
        let store = PointStore::from_positions([
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(4.0, 3.0),
            Vec2::new(6.0, 0.0),
        ]);
        SplineSnapshot::build(&store, &SplineConfig::new(kind)).unwrap()
    }

    #[test]
    fn batch_matches_single_evaluation() {
        let snap = snapshot(SplineKind::CatmullRom);
        let progress: Vec<f32> = (0..=50).map(|i| i as f32 / 50.0).collect();
        let batch = evaluate_batch(&snap, &progress);
        for (p, got) in progress.iter().zip(&batch) {
            assert_eq!(*got, snap.evaluate(*p));
        }
    }

    #[test]
    fn parallel_preserves_order() {
        let snap = snapshot(SplineKind::Bezier);
        let progress: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.37).fract()).collect();
        let sequential = evaluate_batch(&snap, &progress);
        assert_eq!(evaluate_parallel(&snap, &progress, 4), sequential);
        assert_eq!(evaluate_parallel(&snap, &progress, 0), sequential);
    }

    #[test]
    fn batch_into_reuses_buffer() {
        let snap = snapshot(SplineKind::Linear);
        let mut out = vec![Vec2::ONE; 10];
        evaluate_batch_into(&snap, &[0.0, 1.0], &mut out);
        assert_eq!(out, vec![Vec2::ZERO, Vec2::new(6.0, 0.0)]);
    }

    #[test]
    fn dynamic_job_applies_transform() {
        let store = PointStore::from_positions([Vec3::ZERO, Vec3::X]);
        let snap = Arc::new(
            SplineSnapshot::build(&store, &SplineConfig::new(SplineKind::Linear)).unwrap(),
        );
        let job = DynamicEvaluateJob::new(snap, vec![0.0, 0.5, 1.0])
            .with_transform(SplineTransform::from_translation(Vec3::new(0.0, 0.0, 2.0)));
        assert_eq!(job.family(), SplineFamily::Linear);
        assert_eq!(
            job.run(),
            vec![
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::new(0.5, 0.0, 2.0),
                Vec3::new(1.0, 0.0, 2.0)
            ]
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn run_into_rejects_mismatched_output() {
        let snap = snapshot(SplineKind::Linear);
        let job = EvaluateJob::new(snap.curve(), snap.table(), snap.ark());
        let mut out = vec![Vec2::ZERO; 1];
        job.run_into(&[0.25, 0.75], &mut out);
    }
}
