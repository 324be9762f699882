//! Arc-length cache and progress resolver.
//!
//! The cache stores each segment's measured length and a cumulative table
//! normalized to `[0, 1]`. The last entry is written as exactly `1.0` so the
//! resolver's terminal-segment lookup never falls off the end through
//! rounding.

use serde::{Deserialize, Serialize};

use crate::curves::Interpolate;
use crate::error::{Result, SplineError};
use crate::point::SplinePoint;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcLengthTable {
    cumulative: Vec<f32>,
    segment_lengths: Vec<f32>,
    length: f32,
}

impl Default for ArcLengthTable {
    fn default() -> Self {
        Self::degenerate()
    }
}

impl ArcLengthTable {
    /// Table for a curve without segments: length 0, table `[1.0]`.
    pub fn degenerate() -> Self {
        Self {
            cumulative: vec![1.0],
            segment_lengths: Vec::new(),
            length: 0.0,
        }
    }

    /// Measure every segment of `curve` with `samples` polyline steps.
    pub fn build<P: SplinePoint, C: Interpolate<P>>(curve: &C, samples: usize) -> Self {
        let count = curve.segment_count();
        if count == 0 {
            return Self::degenerate();
        }
        let lengths = (0..count)
            .map(|i| curve.segment_length(i, samples))
            .collect();
        Self::from_segment_lengths(lengths)
    }

    /// Normalize precomputed segment lengths. A path with no measurable length
    /// gets uniform fractions.
    pub fn from_segment_lengths(segment_lengths: Vec<f32>) -> Self {
        let count = segment_lengths.len();
        if count == 0 {
            return Self::degenerate();
        }
        let total: f32 = segment_lengths.iter().sum();
        let mut cumulative = Vec::with_capacity(count);
        if total > 0.0 && total.is_finite() {
            let mut running = 0.0f32;
            for len in &segment_lengths {
                running += len;
                cumulative.push(running / total);
            }
        } else {
            cumulative.extend((1..=count).map(|i| i as f32 / count as f32));
        }
        cumulative[count - 1] = 1.0;
        Self {
            cumulative,
            segment_lengths,
            length: if total.is_finite() { total } else { 0.0 },
        }
    }

    /// Build from absolute distances at the end of each segment.
    pub fn from_distances(distances: &[f32]) -> Self {
        let mut prev = 0.0f32;
        let lengths = distances
            .iter()
            .map(|&d| {
                let len = (d - prev).max(0.0);
                prev = d;
                len
            })
            .collect();
        Self::from_segment_lengths(lengths)
    }

    /// Total path length.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Normalized cumulative table; the last entry is exactly `1.0`.
    #[inline]
    pub fn table(&self) -> &[f32] {
        &self.cumulative
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    pub fn segment_length(&self, segment: usize) -> Result<f32> {
        self.segment_lengths
            .get(segment)
            .copied()
            .ok_or(SplineError::IndexOutOfRange {
                index: segment,
                len: self.segment_lengths.len(),
            })
    }

    /// Normalized `(start, end)` progress covered by `segment`.
    pub fn segment_range(&self, segment: usize) -> Result<(f32, f32)> {
        if segment >= self.segment_lengths.len() {
            return Err(SplineError::IndexOutOfRange {
                index: segment,
                len: self.segment_lengths.len(),
            });
        }
        let start = if segment == 0 {
            0.0
        } else {
            self.cumulative[segment - 1]
        };
        Ok((start, self.cumulative[segment]))
    }

    /// Map global progress to `(segment, local_t)`.
    pub fn resolve(&self, progress: f32) -> (usize, f32) {
        let table = &self.cumulative;
        if table.len() <= 1 {
            return (0, progress);
        }
        let last = table.len() - 1;
        let segment = table.partition_point(|&c| c < progress).min(last);
        let (start, end) = if segment == 0 {
            (0.0, table[0])
        } else {
            (table[segment - 1], table[segment])
        };
        let span = end - start;
        let local_t = if span > 0.0 {
            (progress - start) / span
        } else {
            0.0
        };
        if local_t.is_finite() {
            (segment, local_t.clamp(0.0, 1.0))
        } else {
            (segment, 0.0)
        }
    }
}
