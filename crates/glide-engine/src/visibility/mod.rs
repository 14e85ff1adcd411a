//! Viewport visibility.
//!
//! Mirrors the browser's intersection-observer model: elements are observed with
//! a set of ratio thresholds and a callback that fires whenever the visible
//! fraction crosses one of them. Hosts without intersection support get a gate
//! that reports everything as visible, so nothing gated by it stays off forever.

mod gate;
mod record;

pub use gate::{Observation, VisibilityCallback, VisibilityGate};
pub use record::{ElementId, IntersectionEntry, Thresholds, VisibilityRecord};
