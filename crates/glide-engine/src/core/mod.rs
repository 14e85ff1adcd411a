//! Contracts between the runtime (platform loop) and the application.
//!
//! The runtime owns the window and the event loop; the application owns the
//! engine state for one mount and is driven through [`App`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, MountCtx};
