use super::Vec2;

/// Axis-aligned rectangle in page-space logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn area(self) -> f32 {
        if self.is_empty() { 0.0 } else { self.size.x * self.size.y }
    }

    /// Overlap of two rects, `None` when they do not overlap with positive area.
    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = self.origin.x.max(other.origin.x);
        let y0 = self.origin.y.max(other.origin.y);
        let x1 = (self.origin.x + self.size.x).min(other.origin.x + other.size.x);
        let y1 = (self.origin.y + self.size.y).min(other.origin.y + other.size.y);

        let w = x1 - x0;
        let h = y1 - y0;

        if w <= 0.0 || h <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, w, h))
        }
    }

    /// Fraction of this rect's area that lies inside `bounds`, in `[0, 1]`.
    ///
    /// Empty rects report `0.0`.
    pub fn coverage_in(self, bounds: Rect) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.intersect(bounds)
            .map_or(0.0, |overlap| (overlap.area() / area).clamp(0.0, 1.0))
    }
}
