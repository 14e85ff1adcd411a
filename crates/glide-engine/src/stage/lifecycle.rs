use crate::visibility::ElementId;

/// A step in a stage's life, recorded in order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LifecycleEvent {
    ScrollAttached,
    PresenterInitialized,
    MediaBound(ElementId),
    FrameRendered(u64),
    /// The backend skipped the frame; the stage keeps running.
    FrameSkipped(u64),
    Resized { width: f32, height: f32 },
    MediaUnbound(ElementId),
    PresenterDisposed,
    ScrollDetached,
}

/// What [`Stage::frame`](super::Stage::frame) did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Rendered,
    /// Recoverable backend condition; try again next frame.
    Skipped,
    /// The stage is unmounted or a frame is already running.
    Idle,
}
