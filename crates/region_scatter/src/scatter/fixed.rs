//! Deterministic placement at a fixed spacing along a path.
use glam::Vec3;

use crate::error::{Error, Result};
use crate::geometry::{yaw_quat, PathShape, Transform};

/// Spacing used by spawners that do not set one, in world units.
pub const DEFAULT_FIXED_SPACING: f32 = 1000.0;

/// Transforms at distances `0, spacing, 2 * spacing, ...` up to the path length,
/// each turned to the path heading at that distance.
///
/// Fails when the spacing is not positive, exceeds the path length, or would
/// produce more than `max_placements` transforms.
pub fn fixed_along_path(
    path: &dyn PathShape,
    spacing: f32,
    max_placements: usize,
) -> Result<Vec<Transform>> {
    let length = path.total_length();
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "spacing must be > 0, got {spacing}"
        )));
    }
    if !length.is_finite() || spacing > length {
        return Err(Error::InvalidConfig(format!(
            "spacing ({spacing}) is greater than the path length ({length})"
        )));
    }

    let count = ((length / spacing).floor() as usize)
        .checked_add(1)
        .filter(|&n| n <= max_placements)
        .ok_or_else(|| {
            Error::InvalidConfig(format!(
                "spacing ({spacing}) over a path of length {length} exceeds {max_placements} placements"
            ))
        })?;

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let distance = (i as f32 * spacing).min(length);
        let position = Vec3::from(path.location_at_distance(distance));
        let yaw = path.tangent_yaw_at_distance(distance);
        out.push(Transform::new(position, yaw_quat(yaw)));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Spline;

    const LIMIT: usize = 1_000_000;

    fn straight(len: f32) -> Spline {
        Spline::polyline([Vec3::ZERO, Vec3::new(len, 0.0, 0.0)], false)
    }

    #[test]
    fn places_at_multiples_of_spacing() {
        let path = straight(2500.0);
        let transforms = fixed_along_path(&path, 1000.0, LIMIT).expect("valid");
        let xs: Vec<f32> = transforms.iter().map(|t| t.position.x).collect();
        assert_eq!(xs.len(), 3);
        for (x, expected) in xs.iter().zip([0.0, 1000.0, 2000.0]) {
            assert!((x - expected).abs() < 1e-2, "{x} vs {expected}");
        }
    }

    #[test]
    fn includes_endpoint_when_length_divides_evenly() {
        let path = straight(3000.0);
        let transforms = fixed_along_path(&path, DEFAULT_FIXED_SPACING, LIMIT).expect("valid");
        assert_eq!(transforms.len(), 4);
        assert!((transforms[3].position.x - 3000.0).abs() < 1e-2);
    }

    #[test]
    fn rotation_follows_heading() {
        let path = Spline::polyline([Vec3::ZERO, Vec3::new(0.0, 500.0, 0.0)], false);
        for t in fixed_along_path(&path, 100.0, LIMIT).expect("valid") {
            assert!((t.yaw_degrees() - 90.0).abs() < 1e-3);
        }
    }

    #[test]
    fn bad_spacing_is_a_config_error() {
        let path = straight(500.0);
        assert!(matches!(
            fixed_along_path(&path, 0.0, LIMIT),
            Err(Error::InvalidConfig(_))
        ));
        assert!(fixed_along_path(&path, -3.0, LIMIT).is_err());
        assert!(fixed_along_path(&path, f32::NAN, LIMIT).is_err());
        assert!(fixed_along_path(&path, 600.0, LIMIT).is_err());
    }

    #[test]
    fn placement_count_is_bounded() {
        let path = straight(500.0);
        assert!(matches!(
            fixed_along_path(&path, 1.0e-30, LIMIT),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(fixed_along_path(&path, 100.0, 6).expect("valid").len(), 6);
        assert!(fixed_along_path(&path, 100.0, 5).is_err());
    }
}
