//! Viewport metrics.
//!
//! Every consumer that needs "how big is the screen" or "how much world does the
//! camera see at depth z" goes through these functions so that all scene
//! elements are laid out from the same formula and inputs.
//!
//! Nothing here caches. A [`ViewportFrame`] is a projection of the host's current
//! viewport and is meant to be re-queried after every resize.

use crate::host::ViewportSource;

use super::Viewport;

/// Derived view of the current rendering surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportFrame {
    pub width: f32,
    pub height: f32,
    /// `width / height`; `1.0` for a degenerate (zero-height) viewport.
    pub aspect_ratio: f32,
}

impl ViewportFrame {
    pub fn from_viewport(viewport: Viewport) -> Self {
        let aspect_ratio = if viewport.height > 0.0 && viewport.width.is_finite() {
            viewport.width / viewport.height
        } else {
            1.0
        };
        Self {
            width: viewport.width,
            height: viewport.height,
            aspect_ratio,
        }
    }

    /// Queries the host and derives a fresh frame.
    pub fn query(source: &dyn ViewportSource) -> Self {
        Self::from_viewport(source.viewport())
    }

    pub fn viewport(self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

/// World-space size visible through a perspective camera at some distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibleExtent {
    pub width: f32,
    pub height: f32,
}

impl VisibleExtent {
    /// World units per logical pixel at this distance (vertical axis).
    ///
    /// Used to map page-space scroll offsets onto world-space motion.
    pub fn units_per_pixel(self, frame: ViewportFrame) -> f32 {
        if frame.height > 0.0 { self.height / frame.height } else { 0.0 }
    }
}

/// Visible height at `depth` for a camera with vertical field of view `fov_degrees`
/// positioned at `camera_z`.
///
/// `2 * tan(fov / 2) * |depth - camera_z|`
pub fn visible_height(fov_degrees: f32, depth: f32, camera_z: f32) -> f32 {
    let half_fov = fov_degrees.to_radians() * 0.5;
    2.0 * half_fov.tan() * (depth - camera_z).abs()
}

/// Visible width at `depth`: the visible height scaled by the aspect ratio.
pub fn visible_width(fov_degrees: f32, depth: f32, camera_z: f32, aspect_ratio: f32) -> f32 {
    visible_height(fov_degrees, depth, camera_z) * aspect_ratio
}

/// Both visible dimensions at `depth` for the given frame.
pub fn visible_extent(
    frame: ViewportFrame,
    fov_degrees: f32,
    depth: f32,
    camera_z: f32,
) -> VisibleExtent {
    VisibleExtent {
        width: visible_width(fov_degrees, depth, camera_z, frame.aspect_ratio),
        height: visible_height(fov_degrees, depth, camera_z),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn visible_height_closed_form() {
        // 2 * tan(37.5°) * 5
        assert_abs_diff_eq!(visible_height(75.0, 5.0, 0.0), 7.673_269, epsilon = 1e-3);
        assert_abs_diff_eq!(
            visible_height(75.0, 5.0, 0.0),
            2.0 * 37.5_f32.to_radians().tan() * 5.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn depth_sign_does_not_matter() {
        assert_abs_diff_eq!(
            visible_height(75.0, -5.0, 0.0),
            visible_height(75.0, 5.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn camera_offset_shortens_distance() {
        assert_abs_diff_eq!(
            visible_height(60.0, -5.0, 1.0),
            visible_height(60.0, 6.0, 0.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn full_hd_width_at_depth_five() {
        let frame = ViewportFrame::from_viewport(Viewport::new(1920.0, 1080.0));
        assert_abs_diff_eq!(frame.aspect_ratio, 1.7778, epsilon = 1e-3);

        let extent = visible_extent(frame, 75.0, -5.0, 0.0);
        assert_abs_diff_eq!(extent.height, 7.673, epsilon = 1e-3);
        assert_abs_diff_eq!(extent.width, extent.height * 1920.0 / 1080.0, epsilon = 1e-4);
        assert_abs_diff_eq!(extent.width, 13.64, epsilon = 0.03);
    }

    #[test]
    fn visible_width_scales_height_by_aspect() {
        assert_abs_diff_eq!(visible_width(75.0, -5.0, 0.0, 1920.0 / 1080.0), 13.641, epsilon = 1e-2);
        assert_abs_diff_eq!(
            visible_width(75.0, -5.0, 0.0, 1.0),
            visible_height(75.0, -5.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn query_reads_the_source_each_time() {
        struct Resizable(std::cell::Cell<Viewport>);

        impl ViewportSource for Resizable {
            fn viewport(&self) -> Viewport {
                self.0.get()
            }
        }

        let host = Resizable(std::cell::Cell::new(Viewport::new(1600.0, 900.0)));
        let before = ViewportFrame::query(&host);
        host.0.set(Viewport::new(900.0, 900.0));
        let after = ViewportFrame::query(&host);

        assert_abs_diff_eq!(before.aspect_ratio, 16.0 / 9.0, epsilon = 1e-6);
        assert_eq!(after.aspect_ratio, 1.0);
        assert_eq!(after.viewport(), Viewport::new(900.0, 900.0));
    }

    #[test]
    fn zero_height_viewport_has_unit_aspect() {
        let frame = ViewportFrame::from_viewport(Viewport::new(800.0, 0.0));
        assert_eq!(frame.aspect_ratio, 1.0);
        assert_eq!(visible_extent(frame, 75.0, -5.0, 0.0).units_per_pixel(frame), 0.0);
    }

    #[test]
    fn units_per_pixel_maps_viewport_height_to_extent() {
        let frame = ViewportFrame::from_viewport(Viewport::new(1000.0, 500.0));
        let extent = visible_extent(frame, 75.0, -5.0, 0.0);
        assert_abs_diff_eq!(extent.units_per_pixel(frame) * 500.0, extent.height, epsilon = 1e-5);
    }
}
