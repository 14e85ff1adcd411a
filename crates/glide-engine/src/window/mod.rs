//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the window, mounts the application into it
//! and forwards scroll input to the registered listeners.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
