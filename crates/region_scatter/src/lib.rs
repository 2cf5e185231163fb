#![forbid(unsafe_code)]
//! region_scatter: Seeded placement of instances over boxes, paths and actor footprints.
//!
//! Modules:
//! - geometry: transforms, bounds, and arc-length parameterized splines
//! - sampling: random stream, attempt budgets, and per-region candidate samplers
//! - surface: downward probe trait, static patch probe, snap filter, surface selection
//! - scatter: requests, orientation, the placement engine and its events
//!
//! The same seed and inputs always produce the same placements.
pub mod error;
pub mod geometry;
pub mod sampling;
pub mod scatter;
pub mod surface;

/// Convenient re-exports for common types. Import with `use region_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{
        yaw_quat, Aabb, PathShape, Spline, SplinePoint, SplinePointType, Transform, WORLD_UP,
    };
    pub use crate::sampling::{
        attempt_budget, ActorBounds, ActorSetSampler, BoxRegion, BoxSampler, Candidate,
        RandomStream, ShapeSampler, SplineSampler,
    };
    pub use crate::scatter::engine::{PlacementEngine, PlacementResult, ScatterConfig};
    pub use crate::scatter::events::{
        EventSink, FnSink, MultiSink, ScatterEvent, ScatterEventKind, VecSink,
    };
    pub use crate::scatter::fixed::{fixed_along_path, DEFAULT_FIXED_SPACING};
    pub use crate::scatter::orientation::{align_to_normal, OrientationComposer};
    pub use crate::scatter::request::{
        clamp_density_boundary, DensityRange, PlacementRequest, Region, RotationRange,
    };
    pub use crate::surface::{
        MatchBy, RejectReason, SnapFilter, SnapMode, SnapOutcome, Snapped, StaticSurfaces,
        SurfaceActor, SurfaceHit, SurfaceId, SurfacePatch, SurfaceProbe, SurfaceSelector,
    };
}
