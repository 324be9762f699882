//! Point Store: the ordered, mutable list of control points.
//!
//! Each control point carries two tangent handles stored as offsets from the
//! point, plus an [`EditMode`] tag. Only the Bezier family reads the handles.
//! Every successful mutation bumps `revision`, which the spline facade compares
//! against the revision its cache was built from.

use serde::{Deserialize, Serialize};

use crate::error::SplineError;
use crate::point::{EditMode, SplinePoint};

/// One logical control point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint<P> {
    pub position: P,
    /// Incoming handle, relative to `position`.
    pub pre: P,
    /// Outgoing handle, relative to `position`.
    pub post: P,
    pub mode: EditMode,
}

impl<P: SplinePoint> ControlPoint<P> {
    /// A point whose handles coincide with it.
    pub fn new(position: P) -> Self {
        Self {
            position,
            pre: P::ZERO,
            post: P::ZERO,
            mode: EditMode::Standard,
        }
    }

    #[inline]
    pub fn pre_handle(&self) -> P {
        self.position + self.pre
    }

    #[inline]
    pub fn post_handle(&self) -> P {
        self.position + self.post
    }

    /// Read the point or one of its handles in absolute coordinates.
    pub fn get(&self, target: EditMode) -> P {
        match target {
            EditMode::Standard | EditMode::Point => self.position,
            EditMode::Pre => self.pre_handle(),
            EditMode::Post => self.post_handle(),
        }
    }

    /// Write the point or one of its handles. Handle writes respect the
    /// point's own mode tag.
    pub fn set(&mut self, value: P, target: EditMode) {
        match target {
            EditMode::Standard | EditMode::Point => self.position = value,
            EditMode::Pre => {
                self.pre = value - self.position;
                match self.mode {
                    EditMode::Standard => self.post = -self.pre,
                    EditMode::Post => self.pre = P::ZERO,
                    EditMode::Point | EditMode::Pre => {}
                }
            }
            EditMode::Post => {
                self.post = value - self.position;
                match self.mode {
                    EditMode::Standard => self.pre = -self.post,
                    EditMode::Pre => self.post = P::ZERO,
                    EditMode::Point | EditMode::Post => {}
                }
            }
        }
    }

    /// Change the mode tag and re-derive the handles it constrains.
    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
        match mode {
            EditMode::Standard => {
                // Keep whichever handle is set; the outgoing one wins a tie.
                if self.post != P::ZERO {
                    self.pre = -self.post;
                } else {
                    self.post = -self.pre;
                }
            }
            EditMode::Pre => self.post = P::ZERO,
            EditMode::Post => self.pre = P::ZERO,
            EditMode::Point => {}
        }
    }
}

/// Ordered control point storage with bounds-checked editing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointStore<P> {
    points: Vec<ControlPoint<P>>,
    #[serde(skip)]
    revision: u64,
}

impl<P: SplinePoint> PointStore<P> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            revision: 0,
        }
    }

    pub fn from_positions(positions: impl IntoIterator<Item = P>) -> Self {
        Self {
            points: positions.into_iter().map(ControlPoint::new).collect(),
            revision: 0,
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Monotonic edit counter.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    fn check(&self, index: usize) -> Result<(), SplineError> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(SplineError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
        }
    }

    #[inline]
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn get(&self, index: usize) -> Result<&ControlPoint<P>, SplineError> {
        self.check(index)?;
        Ok(&self.points[index])
    }

    pub fn position(&self, index: usize) -> Result<P, SplineError> {
        self.get(index).map(|cp| cp.position)
    }

    /// Overwrite the point or a handle (see [`ControlPoint::set`]).
    pub fn set(&mut self, index: usize, value: P, target: EditMode) -> Result<(), SplineError> {
        self.check(index)?;
        self.points[index].set(value, target);
        self.touch();
        Ok(())
    }

    /// Insert before `index`. Unlike `get`/`set`, `index == count()` is rejected
    /// as well; use [`PointStore::append`] to extend the list.
    pub fn insert(&mut self, index: usize, value: P) -> Result<(), SplineError> {
        self.check(index)?;
        self.points.insert(index, ControlPoint::new(value));
        self.touch();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<ControlPoint<P>, SplineError> {
        self.check(index)?;
        let removed = self.points.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn append(&mut self, value: P) {
        self.points.push(ControlPoint::new(value));
        self.touch();
    }

    pub fn mode(&self, index: usize) -> Result<EditMode, SplineError> {
        self.get(index).map(|cp| cp.mode)
    }

    pub fn set_mode(&mut self, index: usize, mode: EditMode) -> Result<(), SplineError> {
        self.check(index)?;
        self.points[index].set_mode(mode);
        self.touch();
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlPoint<P>> {
        self.points.iter()
    }

    pub fn positions(&self) -> Vec<P> {
        self.points.iter().map(|cp| cp.position).collect()
    }

    pub fn as_slice(&self) -> &[ControlPoint<P>] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut store = PointStore::from_positions([Vec2::ZERO, Vec2::X]);
        assert_eq!(
            store.get(2).unwrap_err(),
            SplineError::IndexOutOfRange { index: 2, len: 2 }
        );
        assert!(store.set(5, Vec2::ONE, EditMode::Standard).is_err());
        assert!(store.insert(2, Vec2::ONE).is_err());
        assert!(store.remove(9).is_err());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn mutations_bump_revision() {
        let mut store = PointStore::new();
        let r0 = store.revision();
        store.append(Vec2::ZERO);
        store.append(Vec2::X);
        store.insert(1, Vec2::Y).unwrap();
        assert_eq!(store.positions(), vec![Vec2::ZERO, Vec2::Y, Vec2::X]);
        store.remove(0).unwrap();
        assert_eq!(store.revision(), r0 + 4);

        // failed edits leave the revision alone
        let before = store.revision();
        let _ = store.remove(10);
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn standard_mode_mirrors_handles() {
        let mut cp = ControlPoint::new(Vec2::new(1.0, 1.0));
        cp.set(Vec2::new(3.0, 1.0), EditMode::Post);
        assert_eq!(cp.post_handle(), Vec2::new(3.0, 1.0));
        assert_eq!(cp.pre_handle(), Vec2::new(-1.0, 1.0));

        // moving the point carries both handles
        cp.set(Vec2::new(2.0, 2.0), EditMode::Standard);
        assert_eq!(cp.post_handle(), Vec2::new(4.0, 2.0));
        assert_eq!(cp.pre_handle(), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn point_mode_keeps_handles_independent() {
        let mut cp = ControlPoint::new(Vec2::ZERO);
        cp.set_mode(EditMode::Point);
        cp.set(Vec2::new(1.0, 0.0), EditMode::Post);
        cp.set(Vec2::new(0.0, 1.0), EditMode::Pre);
        assert_eq!(cp.post_handle(), Vec2::new(1.0, 0.0));
        assert_eq!(cp.pre_handle(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn one_sided_modes_collapse_the_other_handle() {
        let mut cp = ControlPoint::new(Vec2::ZERO);
        cp.set(Vec2::new(2.0, 0.0), EditMode::Post);
        cp.set_mode(EditMode::Post);
        assert_eq!(cp.pre_handle(), Vec2::ZERO);
        assert_eq!(cp.post_handle(), Vec2::new(2.0, 0.0));

        cp.set_mode(EditMode::Pre);
        assert_eq!(cp.post_handle(), Vec2::ZERO);
        cp.set(Vec2::new(5.0, 5.0), EditMode::Post);
        assert_eq!(cp.post_handle(), Vec2::ZERO);
    }

    #[test]
    fn standard_round_trip_returns_written_value() {
        let mut store = PointStore::from_positions([Vec2::ZERO, Vec2::X]);
        let p = Vec2::new(4.5, -2.0);
        store.set(1, p, EditMode::Standard).unwrap();
        assert_eq!(store.get(1).unwrap().get(EditMode::Standard), p);
    }
}
