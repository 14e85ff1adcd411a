use winit::event::WindowEvent;

use crate::coords::Viewport;
use crate::host::InputHost;

use super::ctx::{FrameCtx, MountCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`crate::window::Runtime`].
///
/// Call order: `mount` once, then any interleaving of `on_resize`,
/// `on_window_event` and `on_frame`, then `unmount` once. Nothing is called
/// after `unmount`.
pub trait App {
    /// The window and GPU exist. Failing here ends the runtime.
    fn mount(&mut self, ctx: MountCtx<'_>) -> anyhow::Result<()>;

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// New logical viewport.
    fn on_resize(&mut self, viewport: Viewport) -> AppControl {
        let _ = viewport;
        AppControl::Continue
    }

    /// Raw window events, after scroll input has gone to the listeners.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Tear down everything `mount` set up, including listeners on `input`.
    fn unmount(&mut self, input: &mut dyn InputHost);
}
