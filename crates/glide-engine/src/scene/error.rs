use thiserror::Error;

use super::backend::ResourceHandle;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("viewport {width}x{height} cannot be rendered")]
    InvalidViewport { width: f32, height: f32 },

    #[error("backend does not own {0:?}")]
    UnknownResource(ResourceHandle),

    #[error("invalid resource description: {0}")]
    InvalidResource(String),

    /// Transient; the next frame may succeed.
    #[error("frame skipped: {0}")]
    FrameSkipped(String),

    /// The renderer cannot continue.
    #[error("renderer lost: {0}")]
    Fatal(String),
}

impl SceneError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, SceneError::Fatal(_))
    }
}
