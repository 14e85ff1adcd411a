//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into [`ScrollInput`]s and hands them
//! to the listeners registered through [`crate::host::InputHost`].

pub(crate) mod platform;
mod state;
mod types;

pub use state::TouchTracker;
pub use types::{MouseWheelDelta, ScrollInput, ScrollKey, TouchPhase};
