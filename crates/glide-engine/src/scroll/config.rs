use serde::{Deserialize, Serialize};

/// Smooth-scroll tuning.
///
/// Defaults match the feel of the marketing pages this engine was built for:
/// a light lerp, smoothed wheel, touch slightly amplified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Fraction of the remaining motion covered per 60 Hz frame, in `(0, 1]`.
    ///
    /// `1.0` disables inertia entirely.
    pub damping: f32,

    /// Apply wheel/touch input through the damped integrator.
    ///
    /// When `false`, deltas move the position immediately.
    pub smooth_wheel: bool,

    /// Multiplier applied to touch drag distance.
    pub touch_multiplier: f32,

    /// Multiplier applied to wheel deltas after normalization.
    pub wheel_multiplier: f32,

    /// Convert line/pixel wheel deltas to pixels uniformly and cap a single event
    /// at one viewport height, so mice, trackpads and touchpads feel alike.
    pub normalize_wheel: bool,

    /// Report handled input as consumed so the host suppresses native scrolling.
    pub prevent_default: bool,

    /// Pixels per wheel line and per arrow-key press.
    pub line_height_px: f32,

    /// Duration of a programmatic `scroll_to`, in seconds.
    pub scroll_to_duration: f32,

    pub tease: TeaseConfig,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            damping: 0.1,
            smooth_wheel: true,
            touch_multiplier: 2.0,
            wheel_multiplier: 1.0,
            normalize_wheel: true,
            prevent_default: true,
            line_height_px: 40.0,
            scroll_to_duration: 1.2,
            tease: TeaseConfig::default(),
        }
    }
}

impl ScrollConfig {
    /// Exponential decay rate (1/s) equivalent to `damping` applied every 60 Hz frame.
    ///
    /// `None` when damping is `>= 1`, i.e. motion is immediate.
    pub fn decay_rate(&self) -> Option<f32> {
        let damping = self.damping.clamp(1e-4, 1.0);
        if damping >= 1.0 {
            None
        } else {
            Some(-(1.0 - damping).ln() * 60.0)
        }
    }
}

/// Parameters of the one-shot "tease" nudge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeaseConfig {
    /// Forward distance as a fraction of the viewport width.
    pub fraction_of_width: f32,

    /// Duration of each leg (out, back), in seconds.
    pub leg_duration: f32,
}

impl Default for TeaseConfig {
    fn default() -> Self {
        Self {
            fraction_of_width: 0.1,
            leg_duration: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_rate_matches_per_frame_lerp() {
        let cfg = ScrollConfig { damping: 0.1, ..ScrollConfig::default() };
        let lambda = cfg.decay_rate().unwrap();
        // One 60 Hz frame keeps 90% of the velocity.
        assert!(((-lambda / 60.0).exp() - 0.9).abs() < 1e-5);
    }

    #[test]
    fn full_damping_is_immediate() {
        let cfg = ScrollConfig { damping: 1.0, ..ScrollConfig::default() };
        assert_eq!(cfg.decay_rate(), None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ScrollConfig = serde_json::from_str(r#"{ "damping": 0.2 }"#).unwrap();
        assert_eq!(cfg.damping, 0.2);
        assert_eq!(cfg.tease, TeaseConfig::default());
        assert!(cfg.prevent_default);
    }
}
