/// Viewport size in logical pixels.
///
/// This is what the host reports on demand. Consumers derive a
/// [`ViewportFrame`](super::ViewportFrame) from it per query instead of holding
/// on to a snapshot across resizes.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Viewport as a page-space rect scrolled down by `scroll_y`.
    #[inline]
    pub fn page_rect(self, scroll_y: f32) -> super::Rect {
        super::Rect::new(0.0, scroll_y, self.width, self.height)
    }
}
