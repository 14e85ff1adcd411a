use crate::coords::Viewport;
use crate::device::Gpu;
use crate::host::{HostCapabilities, InputHost};
use crate::time::FrameTime;

/// Handed to [`App::mount`](super::App::mount).
///
/// The app takes ownership of the GPU context; the runtime keeps only the window.
pub struct MountCtx<'a> {
    pub gpu: Gpu,
    pub viewport: Viewport,
    pub capabilities: HostCapabilities,
    pub input: &'a mut dyn InputHost,
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
pub struct FrameCtx<'a> {
    pub time: FrameTime,
    pub viewport: Viewport,
    pub input: &'a mut dyn InputHost,
}
