use glam::{Mat4, Vec3};

use crate::coords::metrics::{self, ViewportFrame, VisibleExtent};

/// Perspective camera looking down -Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraParams {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub position: Vec3,
}

impl CameraParams {
    pub fn new(fov_degrees: f32, near: f32, far: f32, frame: ViewportFrame) -> Self {
        Self {
            fov_degrees,
            near,
            far,
            aspect: frame.aspect_ratio,
            position: Vec3::ZERO,
        }
    }

    pub fn set_aspect(&mut self, frame: ViewportFrame) {
        self.aspect = frame.aspect_ratio;
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World extent visible at world-space `depth`.
    pub fn visible_extent(&self, frame: ViewportFrame, depth: f32) -> VisibleExtent {
        metrics::visible_extent(frame, self.fov_degrees, depth, self.position.z)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec4;

    use super::*;
    use crate::coords::Viewport;

    fn camera() -> (CameraParams, ViewportFrame) {
        let frame = ViewportFrame::from_viewport(Viewport::new(1600.0, 900.0));
        (CameraParams::new(75.0, 0.1, 100.0, frame), frame)
    }

    #[test]
    fn visible_extent_edges_land_on_clip_edges() {
        let (cam, frame) = camera();
        let extent = cam.visible_extent(frame, -5.0);

        let corner = Vec4::new(extent.width * 0.5, extent.height * 0.5, -5.0, 1.0);
        let clip = cam.view_projection() * corner;
        assert_abs_diff_eq!(clip.x / clip.w, 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(clip.y / clip.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn moving_camera_keeps_extent_relative() {
        let (mut cam, frame) = camera();
        cam.position = Vec3::new(0.0, -3.0, 1.0);
        assert_abs_diff_eq!(
            cam.visible_extent(frame, -5.0).height,
            metrics::visible_height(75.0, 6.0, 0.0),
            epsilon = 1e-5
        );
    }
}
