//! Sampling over the footprints of existing world actors.
//!
//! Each actor gets its own attempt budget from its bounding-box footprint. All actors
//! share one stream, processed in the order supplied, so the concatenated sequence is
//! reproducible as a whole.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Aabb;
use crate::sampling::{attempt_budget, Candidate, RandomStream, ShapeSampler, MAX_RESERVE};
use crate::scatter::request::DensityRange;
use crate::surface::SurfaceId;

/// An actor that candidates are scattered over, identified by the surface id its
/// probe hits report.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActorBounds {
    pub owner: SurfaceId,
    pub bounds: Aabb,
}

impl ActorBounds {
    pub fn new(owner: SurfaceId, bounds: Aabb) -> Self {
        Self { owner, bounds }
    }
}

/// [`ShapeSampler`] over a list of [`ActorBounds`].
pub struct ActorSetSampler<'a> {
    actors: &'a [ActorBounds],
    units_per_meter: f32,
    top_offset: f32,
}

impl<'a> ActorSetSampler<'a> {
    /// `top_offset` lifts candidates above each actor's bounds so the probe starts outside it.
    pub fn new(actors: &'a [ActorBounds], units_per_meter: f32, top_offset: f32) -> Self {
        Self {
            actors,
            units_per_meter,
            top_offset,
        }
    }

    fn actor_metric(&self, actor: &ActorBounds) -> f32 {
        actor.bounds.footprint_area() / (self.units_per_meter * self.units_per_meter)
    }
}

impl ShapeSampler for ActorSetSampler<'_> {
    fn metric(&self) -> f32 {
        self.actors.iter().map(|a| self.actor_metric(a)).sum()
    }

    fn attempt_bound(&self, density: &DensityRange) -> usize {
        self.actors.iter().fold(0usize, |total, actor| {
            total.saturating_add(attempt_budget(self.actor_metric(actor), density.max))
        })
    }

    fn candidates(&self, density: &DensityRange, stream: &mut RandomStream) -> Vec<Candidate> {
        let mut out = Vec::new();
        for actor in self.actors {
            let count = attempt_budget(
                self.actor_metric(actor),
                stream.next_float(density.min, density.max),
            );
            let b = actor.bounds;
            let z = b.max.z + self.top_offset;
            out.reserve(count.min(MAX_RESERVE));
            for _ in 0..count {
                let x = stream.next_float(b.min.x, b.max.x);
                let y = stream.next_float(b.min.y, b.max.y);
                out.push(Candidate::at(Vec3::new(x, y, z)).with_required_owner(actor.owner));
            }
        }
        out
    }
}
