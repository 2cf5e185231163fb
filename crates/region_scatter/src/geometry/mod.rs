//! Geometry primitives shared by samplers, the snap filter and the engine.
//!
//! World space is Z-up. Yaw is measured in degrees around +Z, starting at +X
//! and turning towards +Y.
use glam::{Quat, Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod spline;

pub use spline::{PathShape, Spline, SplinePoint, SplinePointType};

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Tolerance used for "nearly equal" comparisons on angles and lengths.
pub const NEARLY_ZERO: f32 = 1.0e-4;

/// Position and rotation of a placement or a region frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// A transform at `position` rotated by `yaw_deg` around +Z.
    pub fn from_position_yaw(position: Vec3, yaw_deg: f32) -> Self {
        Self {
            position,
            rotation: yaw_quat(yaw_deg),
        }
    }

    /// Maps a point from this frame's local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.rotation * local + self.position
    }

    /// Heading of the rotated +X axis, in degrees within (-180, 180].
    pub fn yaw_degrees(&self) -> f32 {
        yaw_of(self.rotation)
    }

    /// Returns true when the frame has no pitch or roll, i.e. its up axis is world up.
    pub fn is_flat(&self) -> bool {
        (self.rotation * WORLD_UP).z >= 1.0 - NEARLY_ZERO
    }
}

/// Quaternion for a rotation of `yaw_deg` degrees around world up.
#[inline]
pub fn yaw_quat(yaw_deg: f32) -> Quat {
    Quat::from_rotation_z(yaw_deg.to_radians())
}

/// Heading in degrees of the rotated +X axis projected onto the XY plane.
pub fn yaw_of(rotation: Quat) -> f32 {
    let forward = rotation * Vec3::X;
    forward.y.atan2(forward.x).to_degrees()
}

/// Returns true when `yaw_deg` is a multiple of 90 degrees (within tolerance).
pub fn is_axis_aligned_yaw(yaw_deg: f32) -> bool {
    let rem = yaw_deg.rem_euclid(90.0);
    rem.abs() < NEARLY_ZERO || (90.0 - rem).abs() < NEARLY_ZERO
}

/// Axis-aligned bounding box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing all `points`; `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Footprint area (X by Y) in squared world units.
    pub fn footprint_area(&self) -> f32 {
        let size = self.size();
        size.x * size.y
    }

    pub fn contains_xy(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}
