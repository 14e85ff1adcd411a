use crate::scene::SceneError;

/// What the caller should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame may render.
    Reconfigured,
    /// Transient; skip this frame.
    SkipFrame,
    /// Out of memory or similar; stop rendering.
    Fatal,
}

impl SurfaceErrorAction {
    /// Scene-level error for a frame that could not be drawn.
    pub fn into_scene_error(self, err: &wgpu::SurfaceError) -> SceneError {
        match self {
            SurfaceErrorAction::Fatal => SceneError::Fatal(err.to_string()),
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                SceneError::FrameSkipped(err.to_string())
            }
        }
    }
}
