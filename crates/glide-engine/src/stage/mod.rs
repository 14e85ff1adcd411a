//! One mount of the presentation engine.
//!
//! A [`Stage`] wires the components together for the lifetime of a mount:
//! smooth scroll feeds the scene camera and the visibility gate, and the gate
//! drives media playback. Teardown runs in reverse order, once.

mod config;
mod lifecycle;
mod mount;

pub use config::StageConfig;
pub use lifecycle::{FrameOutcome, LifecycleEvent};
pub use mount::Stage;
