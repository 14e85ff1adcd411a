use serde::{Deserialize, Serialize};

use super::chain::{PostChain, PostEffect};
use super::content::ContentPlane;

/// Scene presenter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_z: f32,
    /// World z of the content planes.
    pub content_depth: f32,
    /// Linear RGBA.
    pub clear_color: [f32; 4],
    /// Side length of the generated plane textures.
    pub texture_size: u32,
    pub planes: Vec<ContentPlane>,
    pub post: Vec<PostEffect>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            camera_z: 0.0,
            content_depth: -5.0,
            clear_color: [0.02, 0.02, 0.03, 1.0],
            texture_size: 64,
            planes: Vec::new(),
            post: PostChain::default().effects().copied().collect(),
        }
    }
}

impl SceneConfig {
    pub fn post_chain(&self) -> PostChain {
        PostChain::new(&self.post)
    }
}
