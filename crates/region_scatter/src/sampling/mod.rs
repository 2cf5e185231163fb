//! Candidate generation for the supported region shapes.
//!
//! Every sampler turns a region plus a density range into an attempt budget and a
//! candidate sequence, drawing from a call-scoped [`RandomStream`]. Draw order is part
//! of the reproducibility contract: density first, then per-candidate coordinates.
use glam::Vec3;
use rand::Rng;

use crate::scatter::request::DensityRange;
use crate::surface::SurfaceId;

pub mod actor_set;
pub mod box_region;
pub mod random;
pub mod spline_path;

pub use actor_set::{ActorBounds, ActorSetSampler};
pub use box_region::{BoxRegion, BoxSampler};
pub use random::RandomStream;
pub use spline_path::SplineSampler;

/// Metrics at or below this value are treated as empty regions.
pub const DEGENERATE_METRIC: f32 = 1.0e-6;

/// Upper bound on the capacity a sampler reserves up front.
pub(crate) const MAX_RESERVE: usize = 1 << 16;

/// A proposed placement before surface resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Nominal world position; Z is the probe origin when snapping.
    pub position: Vec3,
    /// Path heading at the candidate, in degrees.
    pub yaw_hint: Option<f32>,
    /// Surface the probe must hit for the candidate to be accepted.
    pub required_owner: Option<SurfaceId>,
}

impl Candidate {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw_hint: None,
            required_owner: None,
        }
    }

    pub fn with_yaw_hint(mut self, yaw: f32) -> Self {
        self.yaw_hint = Some(yaw);
        self
    }

    pub fn with_required_owner(mut self, owner: SurfaceId) -> Self {
        self.required_owner = Some(owner);
        self
    }
}

/// Region-specific candidate generation.
pub trait ShapeSampler {
    /// Size of the region in square meters (areas) or meters (paths).
    fn metric(&self) -> f32;

    /// Draws the attempt budget and the candidates for one call.
    fn candidates(&self, density: &DensityRange, stream: &mut RandomStream) -> Vec<Candidate>;

    /// Largest attempt budget any density in `density` can produce.
    fn attempt_bound(&self, density: &DensityRange) -> usize {
        attempt_budget(self.metric(), density.max)
    }

    /// Non-fatal geometry problems to report before sampling.
    fn geometry_warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Number of attempts for a region of size `metric` at `density` items per unit.
///
/// Products too large for `usize` saturate to `usize::MAX`.
pub fn attempt_budget(metric: f32, density: f32) -> usize {
    if !(metric > DEGENERATE_METRIC) || !(density > 0.0) {
        return 0;
    }
    (metric * density).floor() as usize
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let v = (rng.next_u32() >> 8) as f32;
    v / (1u32 << 24) as f32
}
