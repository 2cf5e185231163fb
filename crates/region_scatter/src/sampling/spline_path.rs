//! Path sampling by arc length.
use glam::Vec3;

use crate::geometry::PathShape;
use crate::sampling::{attempt_budget, Candidate, RandomStream, ShapeSampler, MAX_RESERVE};
use crate::scatter::request::DensityRange;

/// [`ShapeSampler`] drawing candidates uniformly by distance along a [`PathShape`].
pub struct SplineSampler<'a> {
    path: &'a dyn PathShape,
    units_per_meter: f32,
}

impl<'a> SplineSampler<'a> {
    pub fn new(path: &'a dyn PathShape, units_per_meter: f32) -> Self {
        Self {
            path,
            units_per_meter,
        }
    }
}

impl ShapeSampler for SplineSampler<'_> {
    fn metric(&self) -> f32 {
        self.path.total_length() / self.units_per_meter
    }

    fn candidates(&self, density: &DensityRange, stream: &mut RandomStream) -> Vec<Candidate> {
        let length = self.path.total_length();
        let count = attempt_budget(self.metric(), stream.next_float(density.min, density.max));

        let mut out = Vec::with_capacity(count.min(MAX_RESERVE));
        for _ in 0..count {
            let distance = stream.next_float(0.0, length);
            let position = Vec3::from(self.path.location_at_distance(distance));
            let yaw = self.path.tangent_yaw_at_distance(distance);
            out.push(Candidate::at(position).with_yaw_hint(yaw));
        }
        out
    }
}
