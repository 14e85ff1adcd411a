//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime:
//! - `FrameClock` produces clamped frame deltas, one tick per presented frame
//! - `FrameLoop` guards the per-frame callback (never re-entered, dead after teardown)
//! - `easing` holds the curves used by scripted scroll motion

pub mod easing;
mod frame_clock;
mod frame_loop;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_loop::{FrameLoop, FrameToken};
