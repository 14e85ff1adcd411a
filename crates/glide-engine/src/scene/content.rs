use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::coords::metrics::{ViewportFrame, VisibleExtent};
use crate::coords::Rect;

use super::backend::TextureDesc;

/// One textured plane in the scene.
///
/// Layout is expressed against the viewport, not in pixels or world units, so
/// a plane keeps its on-screen proportions at any resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPlane {
    /// Host element id used for visibility and media binding.
    pub id: u64,
    /// Width as a fraction of the visible width at the content depth.
    pub width_fraction: f32,
    /// Width / height of the plane.
    pub aspect: f32,
    /// Horizontal center in `-1..=1` of the visible width.
    pub x: f32,
    /// Vertical page position of the plane center, in viewport heights below
    /// the first screen's center.
    pub page_offset: f32,
    pub tint: [f32; 4],
}

impl Default for ContentPlane {
    fn default() -> Self {
        Self {
            id: 0,
            width_fraction: 0.5,
            aspect: 16.0 / 9.0,
            x: 0.0,
            page_offset: 0.0,
            tint: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl ContentPlane {
    /// World-space size at a depth whose visible extent is `extent`.
    pub fn world_size(&self, extent: VisibleExtent) -> (f32, f32) {
        let width = self.width_fraction.max(0.0) * extent.width;
        let height = if self.aspect > 0.0 { width / self.aspect } else { 0.0 };
        (width, height)
    }

    /// Model matrix for the unit plane geometry, placed at `depth`.
    pub fn model(&self, frame: ViewportFrame, extent: VisibleExtent, depth: f32) -> Mat4 {
        let (w, h) = self.world_size(extent);
        let center = Vec3::new(
            self.x * extent.width * 0.5,
            -self.page_offset * frame.height * extent.units_per_pixel(frame),
            depth,
        );
        Mat4::from_scale_rotation_translation(Vec3::new(w, h, 1.0), Quat::IDENTITY, center)
    }

    /// Page-space rect (logical pixels, top-left origin) the plane covers.
    pub fn page_rect(&self, frame: ViewportFrame) -> Rect {
        let width = self.width_fraction.max(0.0) * frame.width;
        let height = if self.aspect > 0.0 { width / self.aspect } else { 0.0 };
        let cx = frame.width * 0.5 * (1.0 + self.x);
        let cy = frame.height * (self.page_offset + 0.5);
        Rect::new(cx - width * 0.5, cy - height * 0.5, width, height)
    }

    /// Lowest page coordinate the plane reaches.
    pub fn page_bottom(&self, frame: ViewportFrame) -> f32 {
        self.page_rect(frame).max().y
    }

    /// Procedural texture: a vertical gradient from white to a darker tone.
    pub fn texture(&self, size: u32) -> TextureDesc {
        let size = size.max(1);
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            let shade = 1.0 - 0.45 * (y as f32 / size as f32);
            let byte = (shade * 255.0).round() as u8;
            for _ in 0..size {
                rgba.extend_from_slice(&[byte, byte, byte, 255]);
            }
        }
        TextureDesc {
            label: format!("plane {} texture", self.id),
            width: size,
            height: size,
            rgba,
        }
    }
}
