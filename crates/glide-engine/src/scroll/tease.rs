use crate::time::easing::ease_in_out_cubic;

/// Identifies one tease run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TeaseId(pub u64);

/// "Nudge forward, then come back" motion.
///
/// The offset rises from `0` to `distance` over the first leg and falls back to
/// exactly `0` over the second, each leg eased. The animation only ever reports
/// an offset; the owner adds it to `origin` and clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TeaseAnimation {
    id: TeaseId,
    origin: f32,
    distance: f32,
    leg_duration: f32,
    elapsed: f32,
}

impl TeaseAnimation {
    pub fn new(id: TeaseId, origin: f32, distance: f32, leg_duration: f32) -> Self {
        Self {
            id,
            origin,
            distance,
            leg_duration: leg_duration.max(1e-3),
            elapsed: 0.0,
        }
    }

    pub fn id(&self) -> TeaseId {
        self.id
    }

    /// Position the tease started from; restored on cancel and on completion.
    pub fn origin(&self) -> f32 {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: f32) {
        self.origin = origin;
    }

    /// Overall progress in `[0, 1]` across both legs.
    pub fn progress(&self) -> f32 {
        (self.elapsed / (2.0 * self.leg_duration)).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= 2.0 * self.leg_duration
    }

    /// Advances by `dt` seconds and returns the current offset from `origin`.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        self.offset()
    }

    pub fn offset(&self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        if self.elapsed < self.leg_duration {
            self.distance * ease_in_out_cubic(self.elapsed / self.leg_duration)
        } else {
            let back = (self.elapsed - self.leg_duration) / self.leg_duration;
            self.distance * (1.0 - ease_in_out_cubic(back))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peaks_at_end_of_first_leg() {
        let mut t = TeaseAnimation::new(TeaseId(1), 100.0, 50.0, 0.5);
        let offset = t.advance(0.5);
        assert!((offset - 50.0).abs() < 1e-4);
        assert!((t.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn returns_exactly_to_zero() {
        let mut t = TeaseAnimation::new(TeaseId(1), 100.0, 50.0, 0.5);
        t.advance(0.7);
        assert_eq!(t.advance(0.4), 0.0);
        assert!(t.is_finished());
    }
}
