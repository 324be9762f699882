use std::sync::Arc;
use std::thread;

use glam::Vec2;
use vizij_spline_core::{
    evaluate_batch, evaluate_parallel, DynamicEvaluateJob, Lane, Spline2, SplineConfig,
    SplineKind, VarianceEvaluateJob, VarianceQuery, VarianceSpline,
};

fn wave(kind: SplineKind) -> Spline2 {
    Spline2::from_points(
        SplineConfig::new(kind),
        (0..12).map(|i| Vec2::new(i as f32, (i as f32 * 0.7).sin() * 3.0)),
    )
}

fn progress(count: usize) -> Vec<f32> {
    (0..count).map(|i| i as f32 / (count - 1) as f32).collect()
}

#[test]
fn parallel_batches_match_sequential_for_every_family() {
    for kind in [
        SplineKind::Linear,
        SplineKind::CubicLinear,
        SplineKind::Bezier,
        SplineKind::Cubic,
        SplineKind::BSpline,
        SplineKind::CatmullRom,
        SplineKind::PointToPoint,
    ] {
        let snap = wave(kind).snapshot().unwrap();
        let queries = progress(2_000);
        let sequential: Vec<Vec2> = queries.iter().map(|&p| snap.evaluate(p)).collect();
        assert_eq!(evaluate_batch(&snap, &queries), sequential, "{kind:?}");
        assert_eq!(evaluate_parallel(&snap, &queries, 8), sequential, "{kind:?}");
    }
}

#[test]
fn readers_keep_their_snapshot_across_edits() {
    let mut spline = wave(SplineKind::CatmullRom);
    let snap = spline.snapshot().unwrap();
    let expected = evaluate_batch(&snap, &progress(256));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let snap = Arc::clone(&snap);
            thread::spawn(move || evaluate_batch(&snap, &progress(256)))
        })
        .collect();

    // the writer edits and rebuilds while readers run
    spline.add_control_point(Vec2::new(20.0, 0.0));
    let rebuilt = spline.snapshot().unwrap();
    assert_eq!(rebuilt.point_count(), 13);

    for reader in readers {
        assert_eq!(reader.join().unwrap(), expected);
    }
    assert_eq!(snap.point_count(), 12);
}

#[test]
fn dynamic_job_runs_on_another_thread() {
    let snap = wave(SplineKind::Bezier).snapshot().unwrap();
    let job = DynamicEvaluateJob::new(Arc::clone(&snap), progress(300));
    let expected = evaluate_batch(&snap, &progress(300));
    let got = thread::spawn(move || job.run_parallel(3)).join().unwrap();
    assert_eq!(got, expected);
}

#[test]
fn variance_job_blends_lanes() {
    let mut road = VarianceSpline::<Vec2>::default();
    for i in 0..4 {
        let x = i as f32 * 5.0;
        road.add_control_point(Vec2::new(x, 0.0), Vec2::new(x, 1.0), Vec2::new(x, -1.0));
    }
    road.update_control_point(Lane::Left, 0, Vec2::new(0.0, 2.0), vizij_spline_core::EditMode::Standard)
        .unwrap();
    let snap = road.snapshot().unwrap();
    let queries: Vec<VarianceQuery> = [-1.0, -0.5, 0.0, 0.5, 1.0]
        .iter()
        .map(|&variance| VarianceQuery { progress: 0.5, variance })
        .collect();
    let out = VarianceEvaluateJob::new(Arc::clone(&snap), queries.clone()).run();
    for (q, p) in queries.iter().zip(&out) {
        assert_eq!(*p, road.evaluate(q.progress, q.variance).unwrap());
    }
    assert!(out[0].y > out[1].y && out[1].y > out[2].y);
    assert!(out[2].y > out[3].y && out[3].y > out[4].y);
}
