//! wgpu rendering for the scene.
//!
//! `WgpuSceneBackend` implements `scene::SceneBackend` on top of `device::Gpu`.
//! Conventions:
//! - plane geometry is world space, projected by the camera uniform
//! - post passes are full-screen triangles sampling the previous target

mod backend;
mod pipelines;
mod shaders;
mod targets;

pub use backend::WgpuSceneBackend;
