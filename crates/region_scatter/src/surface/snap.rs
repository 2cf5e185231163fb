//! Accept/reject decision for candidates against the probe.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::Candidate;
use crate::surface::{SurfaceId, SurfaceProbe};

/// Whether candidates are dropped onto the surface below them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SnapMode {
    /// Keep nominal heights unless target surfaces are given.
    #[default]
    Off,
    /// Always probe and snap to the first surface below.
    On,
}

/// Geometry resolved for an accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub position: Vec3,
    /// Surface normal when the candidate was probed.
    pub normal: Option<Vec3>,
    pub owner: Option<SurfaceId>,
}

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    /// The probe found no blocking surface within range.
    NoHit,
    /// The probe hit a surface that is not an accepted target.
    OwnerMismatch { owner: Option<SurfaceId> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapOutcome {
    Accepted(Snapped),
    Rejected(RejectReason),
}

/// Evaluates candidates one probe call at a time.
pub struct SnapFilter<'a> {
    probe: &'a dyn SurfaceProbe,
    targets: &'a [SurfaceId],
    mode: SnapMode,
    max_distance: f32,
}

impl<'a> SnapFilter<'a> {
    pub fn new(
        probe: &'a dyn SurfaceProbe,
        targets: &'a [SurfaceId],
        mode: SnapMode,
        max_distance: f32,
    ) -> Self {
        Self {
            probe,
            targets,
            mode,
            max_distance,
        }
    }

    /// Returns true when `candidate` needs a probe call.
    pub fn requires_probe(&self, candidate: &Candidate) -> bool {
        self.mode == SnapMode::On || !self.targets.is_empty() || candidate.required_owner.is_some()
    }

    /// Issues at most one probe for `candidate` and decides whether it is kept.
    pub fn evaluate(&self, candidate: &Candidate) -> SnapOutcome {
        if !self.requires_probe(candidate) {
            return SnapOutcome::Accepted(Snapped {
                position: candidate.position,
                normal: None,
                owner: None,
            });
        }

        let Some(hit) = self.probe.probe(candidate.position, self.max_distance) else {
            return SnapOutcome::Rejected(RejectReason::NoHit);
        };

        let owner_ok = match (candidate.required_owner, hit.owner) {
            (Some(required), owner) => owner == Some(required),
            (None, _) if self.targets.is_empty() => true,
            (None, Some(owner)) => self.targets.contains(&owner),
            (None, None) => false,
        };
        if !owner_ok {
            return SnapOutcome::Rejected(RejectReason::OwnerMismatch { owner: hit.owner });
        }

        SnapOutcome::Accepted(Snapped {
            position: candidate.position.with_z(hit.point.z),
            normal: Some(hit.normal),
            owner: hit.owner,
        })
    }
}
