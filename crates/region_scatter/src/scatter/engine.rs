//! Placement engine: sampling, snapping and orientation for one call.
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{PathShape, Transform};
use crate::sampling::RandomStream;
use crate::scatter::events::{EventSink, ScatterEvent, ScatterEventKind};
use crate::scatter::fixed::fixed_along_path;
use crate::scatter::orientation::OrientationComposer;
use crate::scatter::request::PlacementRequest;
use crate::surface::{SnapFilter, SnapOutcome, SurfaceProbe};

pub const DEFAULT_UNITS_PER_METER: f32 = 100.0;
pub const DEFAULT_PROBE_MAX_DISTANCE: f32 = 100_000.0;
pub const DEFAULT_ACTOR_TOP_OFFSET: f32 = 1.0;
pub const DEFAULT_HIGH_DENSITY_WARNING: f32 = 3.0;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// Engine-wide settings shared by all calls.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScatterConfig {
    /// World units per meter; densities are per meter or per square meter.
    pub units_per_meter: f32,
    /// Length of each downward probe in world units.
    pub probe_max_distance: f32,
    /// Height above an actor's bounds where its probes start.
    pub actor_top_offset: f32,
    /// Maximum density above which a performance warning is logged.
    pub high_density_warning: f32,
    /// Largest number of candidates or fixed placements one call may produce.
    pub max_attempts: usize,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            units_per_meter: DEFAULT_UNITS_PER_METER,
            probe_max_distance: DEFAULT_PROBE_MAX_DISTANCE,
            actor_top_offset: DEFAULT_ACTOR_TOP_OFFSET,
            high_density_warning: DEFAULT_HIGH_DENSITY_WARNING,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ScatterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units_per_meter(mut self, units_per_meter: f32) -> Self {
        self.units_per_meter = units_per_meter;
        self
    }

    pub fn with_probe_max_distance(mut self, probe_max_distance: f32) -> Self {
        self.probe_max_distance = probe_max_distance;
        self
    }

    pub fn with_actor_top_offset(mut self, actor_top_offset: f32) -> Self {
        self.actor_top_offset = actor_top_offset;
        self
    }

    pub fn with_high_density_warning(mut self, high_density_warning: f32) -> Self {
        self.high_density_warning = high_density_warning;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.units_per_meter.is_finite() && self.units_per_meter > 0.0) {
            return Err(Error::InvalidConfig("units_per_meter must be > 0".into()));
        }
        if !(self.probe_max_distance.is_finite() && self.probe_max_distance > 0.0) {
            return Err(Error::InvalidConfig(
                "probe_max_distance must be > 0".into(),
            ));
        }
        if !self.actor_top_offset.is_finite() {
            return Err(Error::InvalidConfig(
                "actor_top_offset must be finite".into(),
            ));
        }
        if self.high_density_warning.is_nan() || self.high_density_warning <= 0.0 {
            return Err(Error::InvalidConfig(
                "high_density_warning must be > 0".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be > 0".into()));
        }
        Ok(())
    }
}

/// Output of one placement call.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementResult {
    /// Accepted transforms in candidate generation order.
    pub placements: Vec<Transform>,
    /// Number of candidates drawn.
    pub attempts: usize,
    /// Number of candidates dropped by the snap filter.
    pub rejected: usize,
}

impl PlacementResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Runs placement requests against an injected [`SurfaceProbe`].
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    config: ScatterConfig,
}

impl PlacementEngine {
    pub fn try_new(config: ScatterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn new(config: ScatterConfig) -> Self {
        debug_assert!(
            config.units_per_meter > 0.0,
            "units_per_meter must be > 0"
        );
        debug_assert!(
            config.probe_max_distance > 0.0,
            "probe_max_distance must be > 0"
        );
        Self { config }
    }

    pub fn config(&self) -> &ScatterConfig {
        &self.config
    }

    /// Generates placements for `request`. Invalid requests yield an empty result.
    pub fn generate(&self, request: &PlacementRequest, probe: &dyn SurfaceProbe) -> PlacementResult {
        self.generate_internal(request, probe, &mut ())
    }

    pub fn generate_with_events(
        &self,
        request: &PlacementRequest,
        probe: &dyn SurfaceProbe,
        sink: &mut dyn EventSink,
    ) -> PlacementResult {
        self.generate_internal(request, probe, sink)
    }

    /// Places one transform every `spacing` world units along `path`.
    pub fn generate_fixed_along_path(&self, path: &dyn PathShape, spacing: f32) -> PlacementResult {
        self.generate_fixed_internal(path, spacing, &mut ())
    }

    pub fn generate_fixed_along_path_with_events(
        &self,
        path: &dyn PathShape,
        spacing: f32,
        sink: &mut dyn EventSink,
    ) -> PlacementResult {
        self.generate_fixed_internal(path, spacing, sink)
    }

    fn generate_internal(
        &self,
        request: &PlacementRequest,
        probe: &dyn SurfaceProbe,
        sink: &mut dyn EventSink,
    ) -> PlacementResult {
        let region = request.region.kind_name();
        if let Err(e) = request.validate() {
            warn!("Placement request for {} region rejected: {}.", region, e);
            emit_warning(sink, "request", e.to_string());
            return finish(sink, PlacementResult::new());
        }

        let sampler = request.region.sampler(&self.config);
        let bound = sampler.attempt_bound(&request.density);
        if bound > self.config.max_attempts {
            let e = Error::InvalidConfig(format!(
                "density {} over the {} region allows up to {} attempts, limit is {}",
                request.density.max, region, bound, self.config.max_attempts
            ));
            warn!("Placement request for {} region rejected: {}.", region, e);
            emit_warning(sink, "request", e.to_string());
            return finish(sink, PlacementResult::new());
        }
        for message in sampler.geometry_warnings() {
            warn!("{}", message);
            emit_warning(sink, format!("region:{region}"), message);
        }
        if request.density.max > self.config.high_density_warning {
            warn!(
                "Density {} exceeds {} items per unit; generation may be slow.",
                request.density.max, self.config.high_density_warning
            );
            emit_warning(
                sink,
                "request",
                format!(
                    "High density ({}) may have a large performance impact",
                    request.density.max
                ),
            );
        }

        if sink.wants(ScatterEventKind::GenerationStarted) {
            sink.send(ScatterEvent::GenerationStarted {
                region,
                seed: request.seed,
            });
        }

        let mut stream = RandomStream::new(request.seed);
        let metric = sampler.metric();
        let candidates = sampler.candidates(&request.density, &mut stream);
        debug!(
            "Region {} | metric: {:.3} | attempts: {} | seed: {}.",
            region,
            metric,
            candidates.len(),
            request.seed
        );
        if sink.wants(ScatterEventKind::CandidatesGenerated) {
            sink.send(ScatterEvent::CandidatesGenerated {
                attempts: candidates.len(),
                metric,
            });
        }

        let filter = SnapFilter::new(
            probe,
            &request.target_surfaces,
            request.snap,
            self.config.probe_max_distance,
        );
        let composer = OrientationComposer::new(request.rotation, request.follow_tangent);

        let mut result = PlacementResult {
            placements: Vec::with_capacity(candidates.len()),
            attempts: candidates.len(),
            rejected: 0,
        };
        for (index, candidate) in candidates.iter().enumerate() {
            match filter.evaluate(candidate) {
                SnapOutcome::Accepted(snapped) => {
                    let rotation = composer.compose(snapped.normal, candidate.yaw_hint, &mut stream);
                    let transform = Transform::new(snapped.position, rotation);
                    if sink.wants(ScatterEventKind::PlacementMade) {
                        sink.send(ScatterEvent::PlacementMade { index, transform });
                    }
                    result.placements.push(transform);
                }
                SnapOutcome::Rejected(reason) => {
                    result.rejected += 1;
                    if sink.wants(ScatterEventKind::CandidateRejected) {
                        sink.send(ScatterEvent::CandidateRejected {
                            index,
                            position: candidate.position,
                            reason,
                        });
                    }
                }
            }
        }

        debug!(
            "Region {} | placed: {} | rejected: {}.",
            region,
            result.placements.len(),
            result.rejected
        );
        finish(sink, result)
    }

    fn generate_fixed_internal(
        &self,
        path: &dyn PathShape,
        spacing: f32,
        sink: &mut dyn EventSink,
    ) -> PlacementResult {
        let placements = match fixed_along_path(path, spacing, self.config.max_attempts) {
            Ok(p) => p,
            Err(e) => {
                warn!("Fixed placement along path skipped: {}.", e);
                emit_warning(sink, "fixed_path", e.to_string());
                return finish(sink, PlacementResult::new());
            }
        };
        if sink.wants(ScatterEventKind::PlacementMade) {
            for (index, transform) in placements.iter().copied().enumerate() {
                sink.send(ScatterEvent::PlacementMade { index, transform });
            }
        }
        finish(
            sink,
            PlacementResult {
                attempts: placements.len(),
                rejected: 0,
                placements,
            },
        )
    }
}

fn emit_warning(sink: &mut dyn EventSink, context: impl Into<String>, message: impl Into<String>) {
    if sink.wants(ScatterEventKind::Warning) {
        sink.send(ScatterEvent::warning(context, message));
    }
}

fn finish(sink: &mut dyn EventSink, result: PlacementResult) -> PlacementResult {
    if sink.wants(ScatterEventKind::GenerationFinished) {
        sink.send(ScatterEvent::GenerationFinished {
            result: result.clone(),
        });
    }
    result
}
