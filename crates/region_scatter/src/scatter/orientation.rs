//! Final rotation of a placement: surface alignment composed with a sampled yaw.
use std::f32::consts::PI;

use glam::{Quat, Vec3};

use crate::geometry::{yaw_quat, NEARLY_ZERO, WORLD_UP};
use crate::sampling::RandomStream;
use crate::scatter::request::RotationRange;

/// Rotation taking world up onto `normal`.
///
/// Missing, zero or non-finite normals and normals pointing (nearly) straight up give
/// identity. Normals pointing (nearly) straight down give a half turn about world X.
pub fn align_to_normal(normal: Option<Vec3>) -> Quat {
    let Some(n) = normal.map(Vec3::normalize_or_zero) else {
        return Quat::IDENTITY;
    };
    if n == Vec3::ZERO || !n.is_finite() {
        return Quat::IDENTITY;
    }
    let d = WORLD_UP.dot(n);
    if d >= 1.0 - NEARLY_ZERO {
        return Quat::IDENTITY;
    }
    if d <= -1.0 + NEARLY_ZERO {
        return Quat::from_axis_angle(Vec3::X, PI);
    }
    let axis = WORLD_UP.cross(n).normalize();
    Quat::from_axis_angle(axis, d.clamp(-1.0, 1.0).acos())
}

/// Turns a resolved normal and an optional path heading into a rotation.
#[derive(Debug, Clone, Copy)]
pub struct OrientationComposer {
    rotation: RotationRange,
    follow_tangent: bool,
}

impl OrientationComposer {
    pub fn new(rotation: RotationRange, follow_tangent: bool) -> Self {
        Self {
            rotation,
            follow_tangent,
        }
    }

    /// Draws one yaw from `stream` and returns `align * yaw`.
    ///
    /// The yaw is applied in the surface-aligned frame, so instances spin around the
    /// surface normal rather than world up.
    pub fn compose(&self, normal: Option<Vec3>, yaw_hint: Option<f32>, stream: &mut RandomStream) -> Quat {
        let mut yaw = stream.next_float(self.rotation.min, self.rotation.max);
        if self.follow_tangent {
            yaw += yaw_hint.unwrap_or(0.0);
        }
        align_to_normal(normal) * yaw_quat(yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn upward_and_missing_normals_are_identity() {
        assert_eq!(align_to_normal(None), Quat::IDENTITY);
        assert_eq!(align_to_normal(Some(WORLD_UP)), Quat::IDENTITY);
        assert_eq!(align_to_normal(Some(Vec3::new(0.0, 0.0, 7.0))), Quat::IDENTITY);
        assert_eq!(align_to_normal(Some(Vec3::ZERO)), Quat::IDENTITY);
        assert_eq!(align_to_normal(Some(Vec3::splat(f32::NAN))), Quat::IDENTITY);
    }

    #[test]
    fn downward_normal_is_half_turn_about_x() {
        let q = align_to_normal(Some(-WORLD_UP));
        assert!(approx(q * WORLD_UP, -WORLD_UP));
        assert!(approx(q * Vec3::X, Vec3::X));
    }

    #[test]
    fn tilted_normal_maps_up_onto_normal() {
        let n = Vec3::new(1.0, 0.0, 1.0).normalize();
        let q = align_to_normal(Some(n));
        assert!(approx(q * WORLD_UP, n));
        // Axis is perpendicular to both up and the normal.
        assert!(approx(q * Vec3::Y, Vec3::Y));
    }

    #[test]
    fn yaw_is_applied_before_alignment() {
        let n = Vec3::new(0.0, 1.0, 1.0).normalize();
        let composer = OrientationComposer::new(RotationRange::fixed(90.0), false);
        let mut stream = RandomStream::new(1);
        let q = composer.compose(Some(n), None, &mut stream);

        let expected = align_to_normal(Some(n)) * yaw_quat(90.0);
        assert!(q.abs_diff_eq(expected, 1e-5));
        // Up still lands on the normal, and local +X spins around it.
        assert!(approx(q * WORLD_UP, n));
        assert!(approx(q * Vec3::X, align_to_normal(Some(n)) * Vec3::Y));
    }

    #[test]
    fn tangent_hint_only_applies_when_following() {
        let mut stream = RandomStream::new(3);
        let still = OrientationComposer::new(RotationRange::fixed(10.0), false)
            .compose(None, Some(45.0), &mut stream);
        assert!(still.abs_diff_eq(yaw_quat(10.0), 1e-5));

        let follow = OrientationComposer::new(RotationRange::fixed(10.0), true)
            .compose(None, Some(45.0), &mut stream);
        assert!(follow.abs_diff_eq(yaw_quat(55.0), 1e-5));

        let no_hint = OrientationComposer::new(RotationRange::fixed(10.0), true)
            .compose(None, None, &mut stream);
        assert!(no_hint.abs_diff_eq(yaw_quat(10.0), 1e-5));
    }

    #[test]
    fn every_compose_draws_once() {
        let composer = OrientationComposer::new(RotationRange::new(0.0, 360.0), false);
        let mut a = RandomStream::new(42);
        let mut b = RandomStream::new(42);
        composer.compose(None, None, &mut a);
        b.next_unit();
        assert_eq!(a.next_unit(), b.next_unit());
    }
}
