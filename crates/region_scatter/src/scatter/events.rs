//! Event types and sinks for observing placement calls.
//!
//! This module defines [`ScatterEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while running
//! [`crate::scatter::engine::PlacementEngine::generate_with_events`].
use glam::Vec3;

use crate::geometry::Transform;
use crate::scatter::engine::PlacementResult;
use crate::surface::RejectReason;

/// Describes events emitted during a placement call.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ScatterEvent {
    /// Emitted when a call passed validation and starts sampling.
    GenerationStarted {
        /// Region variant name (`box`, `spline`, `actor_set`).
        region: &'static str,
        /// Seed of the call's random stream.
        seed: i32,
    },

    /// Emitted once the candidate list is built.
    CandidatesGenerated {
        /// Attempt budget, i.e. number of candidates.
        attempts: usize,
        /// Region size in square meters or meters.
        metric: f32,
    },

    /// Emitted when the snap filter drops a candidate.
    CandidateRejected {
        /// Index of the candidate in generation order.
        index: usize,
        /// Nominal candidate position.
        position: Vec3,
        reason: RejectReason,
    },

    /// Emitted when a placement is made.
    PlacementMade {
        /// Index of the candidate in generation order.
        index: usize,
        transform: Transform,
    },

    /// Emitted when the call returns, including calls that failed validation.
    GenerationFinished {
        result: PlacementResult,
    },

    /// Non-fatal warning generated during a call.
    Warning {
        /// Context string (e.g. `request`, `region:box`).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`ScatterEvent`], used by sinks to opt out of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScatterEventKind {
    GenerationStarted,
    CandidatesGenerated,
    CandidateRejected,
    PlacementMade,
    GenerationFinished,
    Warning,
}

impl ScatterEvent {
    pub fn kind(&self) -> ScatterEventKind {
        match self {
            ScatterEvent::GenerationStarted { .. } => ScatterEventKind::GenerationStarted,
            ScatterEvent::CandidatesGenerated { .. } => ScatterEventKind::CandidatesGenerated,
            ScatterEvent::CandidateRejected { .. } => ScatterEventKind::CandidateRejected,
            ScatterEvent::PlacementMade { .. } => ScatterEventKind::PlacementMade,
            ScatterEvent::GenerationFinished { .. } => ScatterEventKind::GenerationFinished,
            ScatterEvent::Warning { .. } => ScatterEventKind::Warning,
        }
    }

    pub fn warning(context: impl Into<String>, message: impl Into<String>) -> Self {
        ScatterEvent::Warning {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// A generic event sink that accepts [`ScatterEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ScatterEvent);

    /// Returns false to skip building events of `kind`.
    #[inline]
    fn wants(&self, _kind: ScatterEventKind) -> bool {
        true
    }
}

/// Lets borrowed sinks, including `&mut dyn EventSink`, go into a [`MultiSink`].
impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: ScatterEventKind) -> bool {
        (**self).wants(kind)
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ScatterEvent) {}

    #[inline]
    fn wants(&self, _kind: ScatterEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ScatterEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<ScatterEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ScatterEvent] {
        &self.events
    }

    /// Messages of all collected [`ScatterEvent::Warning`]s, in order.
    pub fn warnings(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ScatterEvent::Warning { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, kind: ScatterEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: ScatterEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
