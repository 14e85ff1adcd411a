//! Smooth scrolling.
//!
//! Raw wheel/touch/keyboard/scrollbar input is turned into a single damped,
//! clamped scalar: the *virtual scroll position*. Everything that moves with the
//! page (the 3D scene, visibility of media) reads that value instead of the
//! host's native scroll offset.
//!
//! Layers:
//! - [`SmoothScroll`]: the integrator, plain data, no globals
//! - [`TeaseAnimation`]: scripted "nudge and return" motion on top of it
//! - [`SmoothScrollController`]: the one live instance for this event loop,
//!   reached through [`ScrollHandle`]

mod config;
mod controller;
mod smooth;
mod tease;

pub use config::{ScrollConfig, TeaseConfig};
pub use controller::{ScrollHandle, SmoothScrollController};
pub use smooth::{ScrollBounds, ScrollState, SmoothScroll};
pub use tease::{TeaseAnimation, TeaseId};
