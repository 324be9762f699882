//! Vizij Spline Core (engine-agnostic)
//!
//! Curve evaluation and arc-length parameterization for paths built from
//! ordered control points. A [`Spline`] owns its control points and a lazily
//! rebuilt cache; evaluation resolves global progress to a segment and local
//! parameter through the cache, then runs the selected curve family.
//! Rebuilds produce immutable [`SplineSnapshot`]s that any number of threads
//! can evaluate concurrently (see [`jobs`]).

pub mod arc_length;
pub mod ark;
pub mod baking;
pub mod config;
pub mod curves;
pub mod error;
pub mod jobs;
pub mod point;
pub mod snapshot;
pub mod solver;
pub mod spline;
pub mod store;
pub mod variance;

// Re-exports for consumers (adapters)
pub use arc_length::ArcLengthTable;
pub use ark::ArkTable;
pub use baking::{bake_snapshot, export_baked_json, BakedSpline, BakingConfig};
pub use config::{Resolution, SplineConfig, SplineKind};
pub use curves::{Curve, Interpolate, SplineFamily};
pub use error::{Result, SplineError};
pub use jobs::{
    evaluate_batch, evaluate_batch_into, evaluate_parallel, DynamicEvaluateJob, EvaluateJob,
    VarianceEvaluateJob, VarianceQuery,
};
pub use point::{EditMode, SplinePoint, SplineTransform};
pub use snapshot::SplineSnapshot;
pub use spline::{Spline, Spline2, Spline3};
pub use store::{ControlPoint, PointStore};
pub use variance::{Lane, VarianceSnapshot, VarianceSpline};
