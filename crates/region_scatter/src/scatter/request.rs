//! Per-call inputs: region, ranges, seed and snapping options.
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::PathShape;
use crate::sampling::{
    ActorBounds, ActorSetSampler, BoxRegion, BoxSampler, ShapeSampler, SplineSampler,
};
use crate::scatter::engine::ScatterConfig;
use crate::surface::{SnapMode, SurfaceId};

pub const DEFAULT_DENSITY_MIN: f32 = 0.0;
pub const DEFAULT_DENSITY_MAX: f32 = 0.2;
pub const DEFAULT_ROTATION_MIN: f32 = 0.0;
pub const DEFAULT_ROTATION_MAX: f32 = 360.0;

/// Items per square meter (areas) or per meter (paths).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DensityRange {
    pub min: f32,
    pub max: f32,
}

impl Default for DensityRange {
    fn default() -> Self {
        Self::new(DEFAULT_DENSITY_MIN, DEFAULT_DENSITY_MAX)
    }
}

impl DensityRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<()> {
        validate_range("Density", self.min, self.max)
    }

    /// Clamps both bounds into `[lower, upper]`, returning a message per clamped bound.
    pub fn clamped(&self, lower: f32, upper: f32) -> (Self, Vec<String>) {
        let mut messages = Vec::new();
        let (min, msg) = clamp_density_boundary(self.min, lower, upper, "DensityMin");
        messages.extend(msg);
        let (max, msg) = clamp_density_boundary(self.max, lower, upper, "DensityMax");
        messages.extend(msg);
        (Self { min, max }, messages)
    }
}

/// Yaw range in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RotationRange {
    pub min: f32,
    pub max: f32,
}

impl Default for RotationRange {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_MIN, DEFAULT_ROTATION_MAX)
    }
}

impl RotationRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that always yields `yaw`.
    pub fn fixed(yaw: f32) -> Self {
        Self { min: yaw, max: yaw }
    }

    pub fn validate(&self) -> Result<()> {
        validate_range("Rotation", self.min, self.max)
    }
}

fn validate_range(name: &'static str, min: f32, max: f32) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(Error::InvalidRange { name, min, max });
    }
    Ok(())
}

/// Clamps an imported density bound into `[min, max]`.
///
/// Returns the clamped value and, when clamping happened, the warning to show.
pub fn clamp_density_boundary(
    density: f32,
    min: f32,
    max: f32,
    label: &str,
) -> (f32, Option<String>) {
    if density < min {
        return (
            min,
            Some(format!(
                "The imported {label} ({density}) is lower than {min} and will be clamped to {min}."
            )),
        );
    }
    if density > max {
        return (
            max,
            Some(format!(
                "The imported {label} ({density}) is greater than {max} and will be clamped to {max}."
            )),
        );
    }
    (density, None)
}

/// The domain sampled by one call.
#[derive(Clone)]
pub enum Region {
    /// Top face of an oriented box.
    Box(BoxRegion),
    /// A path sampled by arc length.
    Spline(Arc<dyn PathShape>),
    /// Footprints of existing actors, sampled one after another.
    ActorSet(Vec<ActorBounds>),
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Box(b) => f.debug_tuple("Box").field(b).finish(),
            Region::Spline(path) => f
                .debug_struct("Spline")
                .field("length", &path.total_length())
                .finish(),
            Region::ActorSet(actors) => f.debug_tuple("ActorSet").field(actors).finish(),
        }
    }
}

impl Region {
    pub fn spline(path: impl PathShape + 'static) -> Self {
        Region::Spline(Arc::new(path))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Region::Box(_) => "box",
            Region::Spline(_) => "spline",
            Region::ActorSet(_) => "actor_set",
        }
    }

    /// Rejects regions carrying non-finite or negative geometry.
    pub fn validate(&self) -> Result<()> {
        match self {
            Region::Box(b) => {
                if !b.is_finite() {
                    return Err(Error::InvalidRegion("box has non-finite geometry".into()));
                }
                if b.half_extents.min_element() < 0.0 {
                    return Err(Error::InvalidRegion(format!(
                        "box half extents must be >= 0, got {}",
                        b.half_extents
                    )));
                }
            }
            Region::Spline(path) => {
                if !path.is_finite() {
                    return Err(Error::InvalidRegion("spline has non-finite control points".into()));
                }
                let length = path.total_length();
                if !length.is_finite() || length < 0.0 {
                    return Err(Error::InvalidRegion(format!(
                        "spline length must be finite and >= 0, got {length}"
                    )));
                }
            }
            Region::ActorSet(actors) => {
                if let Some(a) = actors.iter().find(|a| !a.bounds.is_finite()) {
                    return Err(Error::InvalidRegion(format!(
                        "actor {:?} has non-finite bounds",
                        a.owner
                    )));
                }
            }
        }
        Ok(())
    }

    /// Builds the sampler for this region.
    pub fn sampler<'a>(&'a self, config: &ScatterConfig) -> Box<dyn ShapeSampler + 'a> {
        match self {
            Region::Box(b) => Box::new(BoxSampler::new(b, config.units_per_meter)),
            Region::Spline(path) => Box::new(SplineSampler::new(path.as_ref(), config.units_per_meter)),
            Region::ActorSet(actors) => Box::new(ActorSetSampler::new(
                actors,
                config.units_per_meter,
                config.actor_top_offset,
            )),
        }
    }
}

/// Everything one placement call needs besides the probe.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    pub region: Region,
    /// Surfaces a probe hit must belong to; empty accepts any surface.
    /// Ignored for actor sets, whose candidates must land on their own actor.
    pub target_surfaces: Vec<SurfaceId>,
    pub seed: i32,
    pub density: DensityRange,
    pub rotation: RotationRange,
    pub snap: SnapMode,
    /// Add the path heading to the sampled yaw (spline regions only).
    pub follow_tangent: bool,
}

impl PlacementRequest {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            target_surfaces: Vec::new(),
            seed: 0,
            density: DensityRange::default(),
            rotation: RotationRange::default(),
            snap: SnapMode::Off,
            follow_tangent: false,
        }
    }

    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_density(mut self, min: f32, max: f32) -> Self {
        self.density = DensityRange::new(min, max);
        self
    }

    pub fn with_rotation(mut self, min: f32, max: f32) -> Self {
        self.rotation = RotationRange::new(min, max);
        self
    }

    pub fn with_snap(mut self, snap: SnapMode) -> Self {
        self.snap = snap;
        self
    }

    pub fn with_target_surfaces(mut self, targets: impl IntoIterator<Item = SurfaceId>) -> Self {
        self.target_surfaces = targets.into_iter().collect();
        self
    }

    pub fn with_follow_tangent(mut self, follow: bool) -> Self {
        self.follow_tangent = follow;
        self
    }

    /// Checks ranges first, then the region.
    pub fn validate(&self) -> Result<()> {
        self.density.validate()?;
        self.rotation.validate()?;
        self.region.validate()
    }
}
