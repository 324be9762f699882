//! Error types for spline editing and evaluation

use serde::{Deserialize, Serialize};

/// Errors surfaced by the spline engine.
///
/// Degenerate topology (zero/one control point, zero-length segments) is not an
/// error: those cases resolve to documented fallback positions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SplineError {
    /// Control point index outside `0..len`
    #[error("Control point index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Natural cubic fitting could not be solved for the current points
    #[error("Solver failure: {reason}")]
    SolverFailure { reason: String },

    /// A read-only evaluation was attempted while the cache is dirty
    #[error("Spline cache is stale; rebuild before evaluating through a shared reference")]
    StaleSnapshot,

    /// Configuration rejected by validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type Result<T> = std::result::Result<T, SplineError>;

impl SplineError {
    pub fn solver(reason: impl Into<String>) -> Self {
        Self::SolverFailure {
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Only a stale cache can be fixed by retrying (after a rebuild). Solver
    /// failures reproduce deterministically for the same control points.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::StaleSnapshot)
    }

    /// Error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "index",
            Self::SolverFailure { .. } => "numerical",
            Self::StaleSnapshot => "state",
            Self::InvalidConfig { .. } => "config",
        }
    }
}
