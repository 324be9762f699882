//! Control point vectors, edit modes and the world transform.
//!
//! Splines are generic over [`SplinePoint`], implemented for `glam::Vec2` and
//! `glam::Vec3`. All math is single precision.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A 2D or 3D position supporting the operations the curve families need.
pub trait SplinePoint:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Neg<Output = Self>
    + 'static
{
    const ZERO: Self;
    const DIM: usize;

    fn lerp_to(self, other: Self, t: f32) -> Self;
    fn distance_to(self, other: Self) -> f32;

    /// Rotate 90 degrees counter-clockwise in the XY plane (Z is kept).
    fn rotate_90(self) -> Self;

    fn axis(self, index: usize) -> f32;
    fn set_axis(&mut self, index: usize, value: f32);

    fn all_finite(self) -> bool;

    /// Apply rotation then translation.
    fn to_world(self, transform: &SplineTransform) -> Self;

    #[inline]
    fn midpoint(self, other: Self) -> Self {
        self.lerp_to(other, 0.5)
    }
}

impl SplinePoint for Vec2 {
    const ZERO: Self = Vec2::ZERO;
    const DIM: usize = 2;

    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }

    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        self.distance(other)
    }

    #[inline]
    fn rotate_90(self) -> Self {
        self.perp()
    }

    #[inline]
    fn axis(self, index: usize) -> f32 {
        self[index]
    }

    #[inline]
    fn set_axis(&mut self, index: usize, value: f32) {
        self[index] = value;
    }

    #[inline]
    fn all_finite(self) -> bool {
        self.is_finite()
    }

    fn to_world(self, transform: &SplineTransform) -> Self {
        (transform.rotation * self.extend(0.0)).truncate() + transform.translation.truncate()
    }
}

impl SplinePoint for Vec3 {
    const ZERO: Self = Vec3::ZERO;
    const DIM: usize = 3;

    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }

    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        self.distance(other)
    }

    #[inline]
    fn rotate_90(self) -> Self {
        Vec3::new(-self.y, self.x, self.z)
    }

    #[inline]
    fn axis(self, index: usize) -> f32 {
        self[index]
    }

    #[inline]
    fn set_axis(&mut self, index: usize, value: f32) {
        self[index] = value;
    }

    #[inline]
    fn all_finite(self) -> bool {
        self.is_finite()
    }

    fn to_world(self, transform: &SplineTransform) -> Self {
        transform.rotation * self + transform.translation
    }
}

/// Owning object's placement, used for world-space evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplineTransform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for SplineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SplineTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

/// Per-point handle behaviour for Bezier splines.
///
/// Stored on a point it decides how the tangent handles couple:
/// - `Standard`: handles mirror each other through the point.
/// - `Point`: handles move independently.
/// - `Pre`: only the incoming handle is kept; the outgoing one sits on the point.
/// - `Post`: only the outgoing handle is kept; the incoming one sits on the point.
///
/// Passed to `update_control_point` / `get_control_point` it selects what is
/// addressed: `Standard` and `Point` address the point, `Pre` and `Post` the
/// respective handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Standard,
    Point,
    Pre,
    Post,
}
