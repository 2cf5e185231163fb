//! Arc-length parameterized paths.
//!
//! [`PathShape`] is the capability the spline sampler consumes. Hosts with their own
//! spline implementation can implement it directly; [`Spline`] is a self-contained
//! implementation built from control points.
use glam::Vec3;
use mint::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A path that can be queried by distance travelled along it.
pub trait PathShape: Send + Sync {
    /// Total arc length in world units.
    fn total_length(&self) -> f32;

    /// World position at `distance` along the path, clamped to `[0, total_length]`.
    fn location_at_distance(&self, distance: f32) -> Vector3<f32>;

    /// Heading in degrees of the path direction at `distance`.
    fn tangent_yaw_at_distance(&self, distance: f32) -> f32;

    /// Whether every quantity describing the path is finite.
    fn is_finite(&self) -> bool {
        self.total_length().is_finite()
    }
}

/// Interpolation mode of the segment leaving a control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplinePointType {
    /// Straight line to the next point.
    Linear,
    /// Cubic Hermite curve using the leave/arrive tangents.
    #[default]
    Curve,
    /// Holds the point's position until the next point.
    Constant,
}

/// Control point of a [`Spline`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplinePoint {
    pub position: Vec3,
    pub arrive_tangent: Vec3,
    pub leave_tangent: Vec3,
    pub point_type: SplinePointType,
}

impl SplinePoint {
    pub fn linear(position: Vec3) -> Self {
        Self {
            position,
            arrive_tangent: Vec3::ZERO,
            leave_tangent: Vec3::ZERO,
            point_type: SplinePointType::Linear,
        }
    }

    /// Curve point with the same arrive and leave tangent.
    pub fn curve(position: Vec3, tangent: Vec3) -> Self {
        Self {
            position,
            arrive_tangent: tangent,
            leave_tangent: tangent,
            point_type: SplinePointType::Curve,
        }
    }

    pub fn with_tangents(mut self, arrive: Vec3, leave: Vec3) -> Self {
        self.arrive_tangent = arrive;
        self.leave_tangent = leave;
        self
    }
}

pub const DEFAULT_STEPS_PER_SEGMENT: usize = 32;

#[derive(Debug, Clone, Copy)]
struct DistanceSample {
    distance: f32,
    segment: usize,
    t: f32,
}

/// Piecewise spline through ordered control points with a precomputed distance table.
#[derive(Debug, Clone)]
pub struct Spline {
    points: Vec<SplinePoint>,
    closed_loop: bool,
    steps_per_segment: usize,
    table: Vec<DistanceSample>,
}

impl Spline {
    pub fn new(points: Vec<SplinePoint>, closed_loop: bool) -> Self {
        Self::with_steps_per_segment(points, closed_loop, DEFAULT_STEPS_PER_SEGMENT)
    }

    /// Creates a spline whose distance table uses `steps` samples per segment.
    pub fn with_steps_per_segment(points: Vec<SplinePoint>, closed_loop: bool, steps: usize) -> Self {
        let mut spline = Self {
            points,
            closed_loop,
            steps_per_segment: steps.max(1),
            table: Vec::new(),
        };
        spline.rebuild_table();
        spline
    }

    /// Polyline through `positions`.
    pub fn polyline(positions: impl IntoIterator<Item = Vec3>, closed_loop: bool) -> Self {
        Self::new(
            positions.into_iter().map(SplinePoint::linear).collect(),
            closed_loop,
        )
    }

    pub fn points(&self) -> &[SplinePoint] {
        &self.points
    }

    pub fn is_closed_loop(&self) -> bool {
        self.closed_loop
    }

    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed_loop => n,
            n => n - 1,
        }
    }

    fn segment_ends(&self, segment: usize) -> (&SplinePoint, &SplinePoint) {
        let start = &self.points[segment];
        let end = &self.points[(segment + 1) % self.points.len()];
        (start, end)
    }

    fn position_on_segment(&self, segment: usize, t: f32) -> Vec3 {
        let (a, b) = self.segment_ends(segment);
        match a.point_type {
            SplinePointType::Linear => a.position.lerp(b.position, t),
            SplinePointType::Constant => a.position,
            SplinePointType::Curve => {
                let t2 = t * t;
                let t3 = t2 * t;
                let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
                let h10 = t3 - 2.0 * t2 + t;
                let h01 = -2.0 * t3 + 3.0 * t2;
                let h11 = t3 - t2;
                a.position * h00 + a.leave_tangent * h10 + b.position * h01 + b.arrive_tangent * h11
            }
        }
    }

    fn derivative_on_segment(&self, segment: usize, t: f32) -> Vec3 {
        let (a, b) = self.segment_ends(segment);
        match a.point_type {
            SplinePointType::Linear | SplinePointType::Constant => b.position - a.position,
            SplinePointType::Curve => {
                let t2 = t * t;
                let d00 = 6.0 * t2 - 6.0 * t;
                let d10 = 3.0 * t2 - 4.0 * t + 1.0;
                let d01 = -6.0 * t2 + 6.0 * t;
                let d11 = 3.0 * t2 - 2.0 * t;
                a.position * d00 + a.leave_tangent * d10 + b.position * d01 + b.arrive_tangent * d11
            }
        }
    }

    fn rebuild_table(&mut self) {
        self.table.clear();
        let segments = self.segment_count();
        if segments == 0 {
            return;
        }
        let steps = self.steps_per_segment;
        self.table.reserve(segments * steps + 1);
        self.table.push(DistanceSample {
            distance: 0.0,
            segment: 0,
            t: 0.0,
        });

        let mut travelled = 0.0f32;
        for segment in 0..segments {
            let mut prev = self.position_on_segment(segment, 0.0);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                let p = self.position_on_segment(segment, t);
                travelled += p.distance(prev);
                prev = p;
                self.table.push(DistanceSample {
                    distance: travelled,
                    segment,
                    t,
                });
            }
        }
    }

    /// Converts a distance along the path into `(segment, t)`.
    fn locate(&self, distance: f32) -> Option<(usize, f32)> {
        let last = self.table.last()?;
        let d = distance.clamp(0.0, last.distance);
        let idx = self.table.partition_point(|s| s.distance < d);
        if idx == 0 {
            let first = self.table[0];
            return Some((first.segment, first.t));
        }
        let hi = self.table[idx.min(self.table.len() - 1)];
        let lo = self.table[idx - 1];
        let span = hi.distance - lo.distance;
        if hi.segment != lo.segment {
            // `lo` closes the previous segment, `hi` is a sample of the next one.
            let alpha = if span > 0.0 { (d - lo.distance) / span } else { 1.0 };
            return Some((hi.segment, hi.t * alpha));
        }
        let alpha = if span > 0.0 { (d - lo.distance) / span } else { 0.0 };
        Some((hi.segment, lo.t + (hi.t - lo.t) * alpha))
    }

    /// World position at `distance` along the spline.
    pub fn position_at_distance(&self, distance: f32) -> Vec3 {
        match self.locate(distance) {
            Some((segment, t)) => self.position_on_segment(segment, t),
            None => self.points.first().map(|p| p.position).unwrap_or(Vec3::ZERO),
        }
    }

    /// Unit direction of travel at `distance`, or zero where the path is degenerate.
    pub fn direction_at_distance(&self, distance: f32) -> Vec3 {
        match self.locate(distance) {
            Some((segment, t)) => self
                .derivative_on_segment(segment, t)
                .try_normalize()
                .unwrap_or(Vec3::ZERO),
            None => Vec3::ZERO,
        }
    }

    pub fn length(&self) -> f32 {
        self.table.last().map(|s| s.distance).unwrap_or(0.0)
    }
}

impl PathShape for Spline {
    fn total_length(&self) -> f32 {
        self.length()
    }

    fn location_at_distance(&self, distance: f32) -> Vector3<f32> {
        self.position_at_distance(distance).into()
    }

    fn tangent_yaw_at_distance(&self, distance: f32) -> f32 {
        let dir = self.direction_at_distance(distance);
        if dir.x == 0.0 && dir.y == 0.0 {
            return 0.0;
        }
        dir.y.atan2(dir.x).to_degrees()
    }

    fn is_finite(&self) -> bool {
        self.points.iter().all(|p| {
            p.position.is_finite() && p.arrive_tangent.is_finite() && p.leave_tangent.is_finite()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_length_is_sum_of_segments() {
        let s = Spline::polyline(
            [
                Vec3::ZERO,
                Vec3::new(300.0, 0.0, 0.0),
                Vec3::new(300.0, 400.0, 0.0),
            ],
            false,
        );
        assert_eq!(s.segment_count(), 2);
        assert!((s.length() - 700.0).abs() < 1e-2);
    }

    #[test]
    fn closed_loop_adds_return_segment() {
        let s = Spline::polyline(
            [
                Vec3::ZERO,
                Vec3::new(100.0, 0.0, 0.0),
                Vec3::new(100.0, 100.0, 0.0),
                Vec3::new(0.0, 100.0, 0.0),
            ],
            true,
        );
        assert_eq!(s.segment_count(), 4);
        assert!((s.length() - 400.0).abs() < 1e-2);
        let back = s.position_at_distance(350.0);
        assert!((back - Vec3::new(0.0, 50.0, 0.0)).length() < 1e-2);
    }

    #[test]
    fn location_is_arc_length_parameterized() {
        let s = Spline::polyline([Vec3::ZERO, Vec3::new(1000.0, 0.0, 0.0)], false);
        for d in [0.0, 125.0, 500.0, 999.0, 1000.0] {
            let p = s.position_at_distance(d);
            assert!((p.x - d).abs() < 1e-2, "d={d} -> {p:?}");
        }
        // Out-of-range distances clamp to the ends.
        assert_eq!(s.position_at_distance(-5.0), Vec3::ZERO);
        assert!((s.position_at_distance(5000.0).x - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn tangent_yaw_follows_segment_direction() {
        let s = Spline::polyline(
            [
                Vec3::ZERO,
                Vec3::new(100.0, 0.0, 0.0),
                Vec3::new(100.0, 100.0, 0.0),
            ],
            false,
        );
        assert!(s.tangent_yaw_at_distance(50.0).abs() < 1e-3);
        assert!((s.tangent_yaw_at_distance(150.0) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn curve_with_straight_tangents_stays_on_line() {
        let dir = Vec3::new(200.0, 0.0, 0.0);
        let s = Spline::new(
            vec![
                SplinePoint::curve(Vec3::ZERO, dir),
                SplinePoint::curve(Vec3::new(200.0, 0.0, 0.0), dir),
            ],
            false,
        );
        assert!((s.length() - 200.0).abs() < 0.5);
        let mid = s.position_at_distance(100.0);
        assert!(mid.y.abs() < 1e-3 && (mid.x - 100.0).abs() < 1.0);
    }

    #[test]
    fn degenerate_splines_have_zero_length() {
        assert_eq!(Spline::polyline(std::iter::empty(), false).length(), 0.0);
        let single = Spline::polyline([Vec3::new(1.0, 2.0, 3.0)], true);
        assert_eq!(single.length(), 0.0);
        assert_eq!(single.position_at_distance(10.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(single.tangent_yaw_at_distance(0.0), 0.0);
    }

    #[test]
    fn constant_segments_contribute_no_length() {
        let mut held = SplinePoint::linear(Vec3::ZERO);
        held.point_type = SplinePointType::Constant;
        let s = Spline::new(
            vec![
                held,
                SplinePoint::linear(Vec3::new(50.0, 0.0, 0.0)),
                SplinePoint::linear(Vec3::new(50.0, 80.0, 0.0)),
            ],
            false,
        );
        assert!((s.length() - 80.0).abs() < 1e-2);
    }
}
