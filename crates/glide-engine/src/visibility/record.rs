/// Identity of an observed element, assigned by the host.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(pub u64);

/// Raw measurement delivered by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub element: ElementId,
    /// Visible fraction of the element's area.
    pub ratio: f32,
}

/// Last state reported for an element.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibilityRecord {
    pub element: ElementId,
    pub is_intersecting: bool,
    pub ratio: f32,
}

/// Sorted, deduplicated ratio thresholds in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds(Vec<f32>);

impl Thresholds {
    pub fn new(values: &[f32]) -> Self {
        let mut v: Vec<f32> = values
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .collect();
        if v.is_empty() {
            v.push(0.0);
        }
        v.sort_by(f32::total_cmp);
        v.dedup();
        Self(v)
    }

    /// Ratio from which an element counts as intersecting: the smallest
    /// positive threshold, or "anything visible" when all thresholds are zero.
    pub fn activation(&self) -> f32 {
        self.0.iter().copied().find(|t| *t > 0.0).unwrap_or(0.0)
    }

    /// Which band `ratio` falls in; a change of band is a crossing.
    pub fn band(&self, ratio: f32) -> usize {
        self.0
            .iter()
            .filter(|t| if **t == 0.0 { ratio > 0.0 } else { ratio >= **t })
            .count()
    }

    pub fn is_intersecting(&self, ratio: f32) -> bool {
        ratio > 0.0 && ratio >= self.activation()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}
