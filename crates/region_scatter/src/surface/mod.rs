//! Surface queries: the downward probe capability, a static patch set implementing it,
//! the snap filter built on top, and name/tag based surface selection.
use glam::{Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, WORLD_UP};

pub mod selector;
pub mod snap;

pub use selector::{MatchBy, SurfaceActor, SurfaceSelector};
pub use snap::{RejectReason, SnapFilter, SnapMode, SnapOutcome, Snapped};

/// Identifier of a world surface (actor) reported by probe hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceId(pub u64);

/// Blocking hit returned by a [`SurfaceProbe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Impact point in world space.
    pub point: Vec3,
    /// Surface normal at the impact point.
    pub normal: Vec3,
    /// Surface that was hit, when the host can tell.
    pub owner: Option<SurfaceId>,
}

/// Downward ray query against the host world.
///
/// Implementations trace from `origin` straight down for at most `max_distance` world
/// units and return the first blocking hit, or `None` on a miss.
pub trait SurfaceProbe {
    fn probe(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit>;
}

impl<F> SurfaceProbe for F
where
    F: Fn(Vec3, f32) -> Option<SurfaceHit>,
{
    #[inline]
    fn probe(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        (self)(origin, max_distance)
    }
}

/// A planar surface patch bounded by a footprint rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfacePatch {
    pub id: SurfaceId,
    /// Only the XY extent is used.
    pub footprint: Aabb,
    /// Any point on the plane.
    pub anchor: Vec3,
    /// Upward-facing plane normal.
    pub normal: Vec3,
}

impl SurfacePatch {
    /// Horizontal patch at `height` over `footprint`.
    pub fn flat(id: SurfaceId, footprint: Aabb, height: f32) -> Self {
        let c = footprint.center();
        Self {
            id,
            footprint,
            anchor: Vec3::new(c.x, c.y, height),
            normal: WORLD_UP,
        }
    }

    /// Tilted patch through `anchor` with the given normal.
    pub fn sloped(id: SurfaceId, footprint: Aabb, anchor: Vec3, normal: Vec3) -> Self {
        Self {
            id,
            footprint,
            anchor,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Plane height under `xy`, or `None` outside the footprint or for vertical planes.
    pub fn height_at(&self, xy: Vec2) -> Option<f32> {
        if !self.footprint.contains_xy(xy) || self.normal.z <= f32::EPSILON {
            return None;
        }
        let n = self.normal;
        let dx = xy.x - self.anchor.x;
        let dy = xy.y - self.anchor.y;
        Some(self.anchor.z - (n.x * dx + n.y * dy) / n.z)
    }
}

/// In-memory [`SurfaceProbe`] over a fixed set of planar patches.
#[derive(Debug, Clone, Default)]
pub struct StaticSurfaces {
    patches: Vec<SurfacePatch>,
}

impl StaticSurfaces {
    pub fn new() -> Self {
        Self {
            patches: Vec::new(),
        }
    }

    pub fn with_patch(mut self, patch: SurfacePatch) -> Self {
        self.patches.push(patch);
        self
    }

    pub fn push(&mut self, patch: SurfacePatch) {
        self.patches.push(patch);
    }

    pub fn patches(&self) -> &[SurfacePatch] {
        &self.patches
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

impl SurfaceProbe for StaticSurfaces {
    fn probe(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        let xy = origin.truncate();
        let lowest = origin.z - max_distance;
        let mut best: Option<(f32, &SurfacePatch)> = None;
        for patch in &self.patches {
            let Some(h) = patch.height_at(xy) else {
                continue;
            };
            if h > origin.z || h < lowest {
                continue;
            }
            if best.is_none_or(|(bh, _)| h > bh) {
                best = Some((h, patch));
            }
        }
        best.map(|(h, patch)| SurfaceHit {
            point: Vec3::new(xy.x, xy.y, h),
            normal: patch.normal,
            owner: Some(patch.id),
        })
    }
}
