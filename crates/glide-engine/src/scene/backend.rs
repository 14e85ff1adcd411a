//! Renderer seam.
//!
//! The presenter decides *what* to draw and owns the lifetime of every handle
//! it acquires; a [`SceneBackend`] turns that into GPU work. The wgpu
//! implementation lives in `render`; tests use an in-memory recorder.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::camera::CameraParams;
use super::chain::PostPass;
use super::error::SceneError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
    Pass,
}

/// Backend-issued resource id. Must be handed back through
/// [`SceneBackend::release`] exactly once.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResourceHandle {
    kind: ResourceKind,
    id: u64,
}

impl ResourceHandle {
    pub const fn new(kind: ResourceKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn kind(self) -> ResourceKind {
        self.kind
    }

    pub fn id(self) -> u64 {
        self.id
    }
}

/// Renderer output size in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDesc {
    pub label: &'static str,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl GeometryDesc {
    /// Unit plane centered on the origin in the XY plane, `segments` quads per side.
    pub fn plane(segments: u16) -> Self {
        let n = segments.max(1);
        let step = 1.0 / f32::from(n);

        let mut vertices = Vec::with_capacity(usize::from(n + 1).pow(2));
        for row in 0..=n {
            for col in 0..=n {
                let u = f32::from(col) * step;
                let v = f32::from(row) * step;
                vertices.push(MeshVertex {
                    position: [u - 0.5, 0.5 - v, 0.0],
                    uv: [u, v],
                });
            }
        }

        let stride = n + 1;
        let mut indices = Vec::with_capacity(usize::from(n).pow(2) * 6);
        for row in 0..n {
            for col in 0..n {
                let tl = row * stride + col;
                let tr = tl + 1;
                let bl = tl + stride;
                let br = bl + 1;
                indices.extend_from_slice(&[tl, bl, br, tl, br, tr]);
            }
        }

        Self { label: "plane", vertices, indices }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaterialDesc {
    pub tint: [f32; 4],
    pub texture: ResourceHandle,
}

/// One mesh draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawItem {
    pub geometry: ResourceHandle,
    pub material: ResourceHandle,
    pub model: Mat4,
}

/// Values every post pass sees.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PostUniforms {
    /// Seconds since the presenter initialized.
    pub time: f32,
    /// Scroll velocity, px/s.
    pub scroll_velocity: f32,
    pub resolution: [f32; 2],
}

/// Everything the backend needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameSubmission<'a> {
    pub clear_color: [f32; 4],
    pub camera: CameraParams,
    pub draws: &'a [DrawItem],
    /// Post passes in chain order, excluding the render pass.
    pub passes: &'a [ResourceHandle],
    pub uniforms: PostUniforms,
}

impl FrameSubmission<'_> {
    pub fn view_projection(&self) -> Mat4 {
        self.camera.view_projection()
    }
}

pub trait SceneBackend {
    /// Resizes output and offscreen targets; old targets are released.
    fn resize(&mut self, size: SurfaceSize) -> Result<(), SceneError>;

    fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<ResourceHandle, SceneError>;

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<ResourceHandle, SceneError>;

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<ResourceHandle, SceneError>;

    /// Compiles one chain pass. `PostPass::Render` is never passed here.
    fn create_pass(&mut self, pass: &PostPass) -> Result<ResourceHandle, SceneError>;

    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), SceneError>;

    /// Frees a handle. Unknown handles are ignored.
    fn release(&mut self, handle: ResourceHandle);
}
