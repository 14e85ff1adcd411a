//! 3D scene presentation.
//!
//! - `ScenePresenter` owns the camera, the content planes and the post chain
//! - `SceneBackend` is the renderer seam (`render::WgpuSceneBackend` on a GPU,
//!   `HeadlessBackend` without one)
//! - all sizing goes through `coords::metrics`

mod backend;
mod camera;
mod chain;
mod config;
mod content;
mod error;
mod headless;
mod presenter;

pub use backend::{
    DrawItem, FrameSubmission, GeometryDesc, MaterialDesc, MeshVertex, PostUniforms,
    ResourceHandle, ResourceKind, SceneBackend, SurfaceSize, TextureDesc,
};
pub use camera::CameraParams;
pub use chain::{PostChain, PostEffect, PostPass};
pub use config::SceneConfig;
pub use content::ContentPlane;
pub use error::SceneError;
pub use headless::{HeadlessBackend, HeadlessLedger, SubmissionRecord};
pub use presenter::{ScenePresenter, SceneResources};
