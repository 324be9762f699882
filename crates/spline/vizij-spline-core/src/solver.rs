//! Dense Gaussian elimination for the natural cubic spline system.
//!
//! The matrix is built fresh for each rebuild and dropped afterwards; nothing
//! is shared between concurrent rebuilds. Elimination runs in double precision
//! so the overflow guard can observe magnitudes far beyond `f32` range before
//! the result is narrowed.

use crate::config::{OVERFLOW_LIMIT, PIVOT_EPSILON};
use crate::error::SplineError;

/// Square system `A * x = y` with one or more right-hand sides sharing `A`.
#[derive(Clone, Debug)]
pub struct LinearSystem {
    n: usize,
    a: Vec<f64>,
    rhs: Vec<Vec<f64>>,
    eliminated: bool,
    failed: Option<SplineError>,
}

impl LinearSystem {
    /// Zeroed `n x n` system with `rhs_count` right-hand side columns.
    pub fn new(n: usize, rhs_count: usize) -> Self {
        Self {
            n,
            a: vec![0.0; n * n],
            rhs: vec![vec![0.0; n]; rhs_count],
            eliminated: false,
            failed: None,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn a(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.n + col]
    }

    #[inline]
    pub fn set_a(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.n + col] = value;
    }

    #[inline]
    pub fn set_rhs(&mut self, column: usize, row: usize, value: f64) {
        self.rhs[column][row] = value;
    }

    fn swap_rows(&mut self, r0: usize, r1: usize) {
        let n = self.n;
        for c in 0..n {
            self.a.swap(r0 * n + c, r1 * n + c);
        }
        for col in &mut self.rhs {
            col.swap(r0, r1);
        }
    }

    /// Forward elimination to upper-triangular form.
    ///
    /// A pivot smaller than `PIVOT_EPSILON` is swapped with the next row. Any
    /// entry whose magnitude exceeds `OVERFLOW_LIMIT` (or is not finite) zeroes
    /// the offending pivot and fails the elimination. A failure is final: later
    /// calls return the same error without touching the matrix.
    pub fn eliminate(&mut self) -> Result<(), SplineError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        if self.eliminated {
            return Ok(());
        }
        let n = self.n;
        for k in 0..n {
            if self.a(k, k).abs() < PIVOT_EPSILON && k + 1 < n {
                self.swap_rows(k, k + 1);
            }
            let pivot = self.a(k, k);
            for i in (k + 1)..n {
                let factor = self.a(i, k) / pivot;
                if !factor.is_finite() || factor.abs() > OVERFLOW_LIMIT {
                    return Err(self.fail(k));
                }
                if factor == 0.0 {
                    continue;
                }
                for j in k..n {
                    let v = self.a(i, j) - factor * self.a(k, j);
                    if !v.is_finite() || v.abs() > OVERFLOW_LIMIT {
                        return Err(self.fail(k));
                    }
                    self.set_a(i, j, v);
                }
                for col in &mut self.rhs {
                    col[i] -= factor * col[k];
                }
            }
        }
        self.eliminated = true;
        Ok(())
    }

    fn fail(&mut self, pivot_row: usize) -> SplineError {
        self.set_a(pivot_row, pivot_row, 0.0);
        let err = SplineError::solver(format!("elimination overflow at pivot row {pivot_row}"));
        self.failed = Some(err.clone());
        err
    }

    /// Back substitution; eliminates first if needed. Returns one solution
    /// vector per right-hand side.
    pub fn solve(&mut self) -> Result<Vec<Vec<f64>>, SplineError> {
        self.eliminate()?;
        let n = self.n;
        let mut solutions = Vec::with_capacity(self.rhs.len());
        for col in &self.rhs {
            let mut x = vec![0.0f64; n];
            for i in (0..n).rev() {
                let mut sum = col[i];
                for j in (i + 1)..n {
                    sum -= self.a(i, j) * x[j];
                }
                let value = sum / self.a(i, i);
                if !value.is_finite() {
                    return Err(SplineError::solver(format!(
                        "non-finite solution for unknown {i}"
                    )));
                }
                x[i] = value;
            }
            solutions.push(x);
        }
        Ok(solutions)
    }
}
