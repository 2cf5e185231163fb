//! Box region sampling.
//!
//! Axis-aligned boxes (yaw a multiple of 90 degrees) are sampled directly inside their
//! world bounds. Rotated boxes are sampled inside an unrotated rectangle of the same
//! size and mapped through the box transform, so the distribution stays uniform over
//! the box instead of over its enclosing bounds.
use glam::{Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{is_axis_aligned_yaw, Aabb, Transform, NEARLY_ZERO};
use crate::sampling::{attempt_budget, Candidate, RandomStream, ShapeSampler, MAX_RESERVE};
use crate::scatter::request::DensityRange;

/// An oriented box; only its top face is sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxRegion {
    /// Box center and world rotation.
    pub transform: Transform,
    /// Scaled half extents in world units.
    pub half_extents: Vec3,
}

impl BoxRegion {
    pub fn new(transform: Transform, half_extents: Vec3) -> Self {
        Self {
            transform,
            half_extents,
        }
    }

    /// Axis-aligned box centered at `center`.
    pub fn centered(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(Transform::from_position(center), half_extents)
    }

    /// Returns true when the box yaw is not a multiple of 90 degrees.
    pub fn is_rotated(&self) -> bool {
        !is_axis_aligned_yaw(self.transform.yaw_degrees())
    }

    pub fn is_planar(&self) -> bool {
        self.half_extents.z.abs() <= NEARLY_ZERO
    }

    /// World-space bounds of all eight corners.
    pub fn world_bounds(&self) -> Aabb {
        let e = self.half_extents;
        let corners = [-1.0f32, 1.0].into_iter().flat_map(|sx| {
            [-1.0f32, 1.0].into_iter().flat_map(move |sy| {
                [-1.0f32, 1.0]
                    .into_iter()
                    .map(move |sz| Vec3::new(sx * e.x, sy * e.y, sz * e.z))
            })
        });
        let t = self.transform;
        Aabb::from_points(corners.map(|c| t.transform_point(c)))
            .unwrap_or(Aabb::new(t.position, t.position))
    }

    pub fn is_finite(&self) -> bool {
        self.transform.position.is_finite()
            && self.transform.rotation.is_finite()
            && self.half_extents.is_finite()
    }
}

/// Rectangle candidates are drawn from, plus how to lift them into world space.
#[derive(Debug, Clone, Copy)]
struct SampleRect {
    min: Vec2,
    max: Vec2,
    z: f32,
    local: bool,
}

/// [`ShapeSampler`] for a [`BoxRegion`].
pub struct BoxSampler<'a> {
    region: &'a BoxRegion,
    units_per_meter: f32,
}

impl<'a> BoxSampler<'a> {
    pub fn new(region: &'a BoxRegion, units_per_meter: f32) -> Self {
        Self {
            region,
            units_per_meter,
        }
    }

    fn sample_rect(&self) -> SampleRect {
        let e = self.region.half_extents.abs();
        if self.region.is_rotated() {
            SampleRect {
                min: Vec2::new(-e.x, -e.y),
                max: Vec2::new(e.x, e.y),
                z: e.z,
                local: true,
            }
        } else {
            let bounds = self.region.world_bounds();
            SampleRect {
                min: bounds.min.truncate(),
                max: bounds.max.truncate(),
                z: bounds.max.z,
                local: false,
            }
        }
    }
}

impl ShapeSampler for BoxSampler<'_> {
    fn metric(&self) -> f32 {
        let rect = self.sample_rect();
        let size = (rect.max - rect.min) / self.units_per_meter;
        size.x * size.y
    }

    fn candidates(&self, density: &DensityRange, stream: &mut RandomStream) -> Vec<Candidate> {
        let rect = self.sample_rect();
        let metric = self.metric();
        let count = attempt_budget(metric, stream.next_float(density.min, density.max));

        let mut out = Vec::with_capacity(count.min(MAX_RESERVE));
        for _ in 0..count {
            let x = stream.next_float(rect.min.x, rect.max.x);
            let y = stream.next_float(rect.min.y, rect.max.y);
            let p = Vec3::new(x, y, rect.z);
            let position = if rect.local {
                self.region.transform.transform_point(p)
            } else {
                p
            };
            out.push(Candidate::at(position));
        }
        out
    }

    fn geometry_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.region.is_planar() {
            warnings.push(format!(
                "Box is not planar (half height {}); sampling its top face only.",
                self.region.half_extents.z
            ));
        }
        if !self.region.transform.is_flat() {
            warnings.push(
                "Box is not flat; pitch and roll should be 0. Sampling in the box frame.".into(),
            );
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn density(v: f32) -> DensityRange {
        DensityRange::new(v, v)
    }

    #[test]
    fn metric_is_footprint_in_square_meters() {
        let region = BoxRegion::centered(Vec3::ZERO, Vec3::new(500.0, 250.0, 0.0));
        let sampler = BoxSampler::new(&region, 100.0);
        assert!((sampler.metric() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn zero_extent_box_yields_no_candidates() {
        let region = BoxRegion::centered(Vec3::ZERO, Vec3::ZERO);
        let sampler = BoxSampler::new(&region, 100.0);
        let mut stream = RandomStream::new(1);
        assert!(sampler.candidates(&density(5.0), &mut stream).is_empty());
        assert!(sampler.geometry_warnings().is_empty());
    }

    #[test]
    fn axis_aligned_candidates_stay_in_world_bounds_on_top_face() {
        let region = BoxRegion::centered(Vec3::new(1000.0, -200.0, 50.0), Vec3::new(300.0, 100.0, 20.0));
        let sampler = BoxSampler::new(&region, 100.0);
        let mut stream = RandomStream::new(11);
        let candidates = sampler.candidates(&density(2.0), &mut stream);
        assert_eq!(candidates.len(), 24);
        for c in candidates {
            assert!((700.0..=1300.0).contains(&c.position.x));
            assert!((-300.0..=-100.0).contains(&c.position.y));
            assert!((c.position.z - 70.0).abs() < 1e-3);
            assert!(c.yaw_hint.is_none());
        }
    }

    #[test]
    fn quarter_turn_box_uses_swapped_world_bounds() {
        let region = BoxRegion::new(
            Transform::from_position_yaw(Vec3::ZERO, 90.0),
            Vec3::new(400.0, 100.0, 0.0),
        );
        assert!(!region.is_rotated());
        let sampler = BoxSampler::new(&region, 100.0);
        let mut stream = RandomStream::new(3);
        for c in sampler.candidates(&density(1.0), &mut stream) {
            assert!(c.position.x.abs() <= 100.0 + 1e-2);
            assert!(c.position.y.abs() <= 400.0 + 1e-2);
        }
    }

    #[test]
    fn rotated_box_candidates_lie_inside_the_rotated_rectangle() {
        let transform = Transform::from_position_yaw(Vec3::new(50.0, 50.0, 10.0), 30.0);
        let region = BoxRegion::new(transform, Vec3::new(400.0, 100.0, 0.0));
        assert!(region.is_rotated());
        let sampler = BoxSampler::new(&region, 100.0);
        let mut stream = RandomStream::new(8);
        let candidates = sampler.candidates(&density(3.0), &mut stream);
        assert!(!candidates.is_empty());
        let inverse = transform.rotation.inverse();
        for c in candidates {
            let local = inverse * (c.position - transform.position);
            assert!(local.x.abs() <= 400.0 + 1e-2, "{local:?}");
            assert!(local.y.abs() <= 100.0 + 1e-2, "{local:?}");
            assert!((c.position.z - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn rotation_does_not_change_metric() {
        let extents = Vec3::new(350.0, 120.0, 0.0);
        let straight = BoxRegion::centered(Vec3::ZERO, extents);
        let turned = BoxRegion::new(Transform::from_position_yaw(Vec3::ZERO, 45.0), extents);
        let a = BoxSampler::new(&straight, 100.0).metric();
        let b = BoxSampler::new(&turned, 100.0).metric();
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn non_planar_box_reports_warning() {
        let region = BoxRegion::centered(Vec3::ZERO, Vec3::new(100.0, 100.0, 100.0));
        let warnings = BoxSampler::new(&region, 100.0).geometry_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not planar"));
    }
}
