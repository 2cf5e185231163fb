//! Placement pipeline: per-call requests, orientation, the engine and its events.
pub mod engine;
pub mod events;
pub mod fixed;
pub mod orientation;
pub mod request;

pub use engine::{PlacementEngine, PlacementResult, ScatterConfig};
pub use request::{DensityRange, PlacementRequest, Region, RotationRange};
