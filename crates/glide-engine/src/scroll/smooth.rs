use crate::coords::Viewport;
use crate::host::InputDisposition;
use crate::input::{MouseWheelDelta, ScrollInput, ScrollKey, TouchTracker};
use crate::time::easing::ease_out_expo;

use super::config::ScrollConfig;
use super::tease::{TeaseAnimation, TeaseId};

/// Velocities below this (px/s) are treated as rest.
const REST_VELOCITY: f32 = 0.5;

/// Inclusive scroll range in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollBounds {
    pub min: f32,
    pub max: f32,
}

impl ScrollBounds {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max: max.max(min) }
    }

    #[inline]
    pub fn clamp(self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    pub fn span(self) -> f32 {
        self.max - self.min
    }
}

impl Default for ScrollBounds {
    fn default() -> Self {
        Self { min: 0.0, max: 0.0 }
    }
}

/// Published scroll state.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScrollState {
    pub virtual_position: f32,
    /// px/s, positive scrolls down.
    pub velocity: f32,
    pub bounds: ScrollBounds,
}

#[derive(Debug, Clone)]
struct ScrollTo {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

/// Damped scroll integrator.
///
/// Input deltas become velocity impulses sized so that an impulse alone travels
/// exactly its delta; velocity decays exponentially every tick. Contact with a
/// bound clamps the position and kills the velocity, so motion never bounces.
#[derive(Debug)]
pub struct SmoothScroll {
    config: ScrollConfig,
    decay: Option<f32>,
    state: ScrollState,
    viewport: Viewport,
    touch: TouchTracker,
    tease: Option<TeaseAnimation>,
    scroll_to: Option<ScrollTo>,
    next_tease: u64,
}

impl SmoothScroll {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            decay: config.decay_rate(),
            config,
            state: ScrollState::default(),
            viewport: Viewport::default(),
            touch: TouchTracker::default(),
            tease: None,
            scroll_to: None,
            next_tease: 1,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn position(&self) -> f32 {
        self.state.virtual_position
    }

    pub fn velocity(&self) -> f32 {
        self.state.velocity
    }

    /// Position within bounds as `0..=1`; `0` when there is nothing to scroll.
    pub fn progress(&self) -> f32 {
        let span = self.state.bounds.span();
        if span <= 0.0 {
            0.0
        } else {
            (self.state.virtual_position - self.state.bounds.min) / span
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.state.velocity != 0.0 || self.tease.is_some() || self.scroll_to.is_some()
    }

    /// Recomputes bounds for a new viewport or content height and re-clamps.
    pub fn set_extent(&mut self, viewport: Viewport, content_height: f32) {
        self.viewport = viewport;
        let max = (content_height - viewport.height).max(0.0);
        self.state.bounds = ScrollBounds::new(0.0, max);
        if let Some(tease) = &mut self.tease {
            tease.set_origin(self.state.bounds.clamp(tease.origin()));
        }
        self.set_position(self.state.virtual_position);
    }

    /// Applies one raw input event.
    pub fn apply_input(&mut self, input: &ScrollInput) -> InputDisposition {
        let delta = match *input {
            ScrollInput::Wheel(delta) => Some(self.wheel_pixels(delta) * self.config.wheel_multiplier),
            ScrollInput::Touch { id, phase, y } => self
                .touch
                .apply(id, phase, y)
                .map(|d| d * self.config.touch_multiplier),
            ScrollInput::Scrollbar { position } => {
                self.interrupt();
                self.state.velocity = 0.0;
                self.set_position(position);
                None
            }
            ScrollInput::Key(key) => self.key_delta(key),
        };

        if let Some(delta) = delta.filter(|d| *d != 0.0 && d.is_finite()) {
            self.interrupt();
            self.push(delta);
        }

        if self.config.prevent_default {
            InputDisposition::Consumed
        } else {
            InputDisposition::PassThrough
        }
    }

    /// Feeds a pixel delta through the integrator (or applies it directly when
    /// smoothing is off).
    pub fn push(&mut self, delta: f32) {
        match self.decay.filter(|_| self.config.smooth_wheel) {
            Some(lambda) => self.state.velocity += delta * lambda,
            None => {
                self.state.velocity = 0.0;
                self.set_position(self.state.virtual_position + delta);
            }
        }
    }

    /// Advances motion by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some(tease) = &mut self.tease {
            let offset = tease.advance(dt);
            let origin = tease.origin();
            if tease.is_finished() {
                self.tease = None;
                self.set_position(origin);
            } else {
                self.set_position(origin + offset);
            }
            return;
        }

        if let Some(anim) = &mut self.scroll_to {
            anim.elapsed += dt;
            let t = anim.elapsed / anim.duration;
            let (from, to) = (anim.from, anim.to);
            if t >= 1.0 {
                self.scroll_to = None;
                self.set_position(to);
            } else {
                self.set_position(from + (to - from) * ease_out_expo(t));
            }
            return;
        }

        let Some(lambda) = self.decay else {
            self.state.velocity = 0.0;
            return;
        };
        if self.state.velocity == 0.0 {
            return;
        }

        let keep = (-lambda * dt).exp();
        let travel = self.state.velocity * (1.0 - keep) / lambda;
        self.state.velocity *= keep;
        self.set_position(self.state.virtual_position + travel);

        if self.state.velocity.abs() < REST_VELOCITY {
            self.state.velocity = 0.0;
        }
    }

    /// Starts the tease nudge; returns the running tease if one is in flight.
    pub fn tease(&mut self) -> TeaseId {
        if let Some(running) = &self.tease {
            return running.id();
        }
        self.scroll_to = None;
        self.state.velocity = 0.0;

        let id = TeaseId(self.next_tease);
        self.next_tease += 1;

        let distance = self.viewport.width.max(0.0) * self.config.tease.fraction_of_width;
        self.tease = Some(TeaseAnimation::new(
            id,
            self.state.virtual_position,
            distance,
            self.config.tease.leg_duration,
        ));
        id
    }

    pub fn active_tease(&self) -> Option<&TeaseAnimation> {
        self.tease.as_ref()
    }

    /// Cancels the tease `id`, restoring the exact pre-tease position.
    ///
    /// Returns `false` if that tease is not running.
    pub fn cancel_tease(&mut self, id: TeaseId) -> bool {
        match self.tease.take() {
            Some(tease) if tease.id() == id => {
                self.state.velocity = 0.0;
                self.set_position(tease.origin());
                true
            }
            other => {
                self.tease = other;
                false
            }
        }
    }

    /// Moves to `target`, animated unless `immediate`.
    pub fn scroll_to(&mut self, target: f32, immediate: bool) {
        self.interrupt();
        self.state.velocity = 0.0;
        let target = self.state.bounds.clamp(target);
        if immediate || self.config.scroll_to_duration <= 0.0 {
            self.set_position(target);
        } else {
            self.scroll_to = Some(ScrollTo {
                from: self.state.virtual_position,
                to: target,
                elapsed: 0.0,
                duration: self.config.scroll_to_duration,
            });
        }
    }

    fn set_position(&mut self, position: f32) {
        if position.is_nan() {
            self.state.velocity = 0.0;
            return;
        }
        let clamped = self.state.bounds.clamp(position);
        if clamped != position {
            self.state.velocity = 0.0;
        }
        self.state.virtual_position = clamped;
    }

    /// User input takes over from any scripted motion.
    fn interrupt(&mut self) {
        if let Some(tease) = self.tease.take() {
            self.set_position(tease.origin());
        }
        self.scroll_to = None;
    }

    fn wheel_pixels(&self, delta: MouseWheelDelta) -> f32 {
        let raw = match delta {
            MouseWheelDelta::Line { y, .. } => y * self.config.line_height_px,
            MouseWheelDelta::Pixel { y, .. } => y,
        };
        if self.config.normalize_wheel && self.viewport.height > 0.0 {
            raw.clamp(-self.viewport.height, self.viewport.height)
        } else {
            raw
        }
    }

    fn key_delta(&mut self, key: ScrollKey) -> Option<f32> {
        let page = self.viewport.height * 0.9;
        match key {
            ScrollKey::ArrowDown => Some(self.config.line_height_px),
            ScrollKey::ArrowUp => Some(-self.config.line_height_px),
            ScrollKey::PageDown | ScrollKey::Space => Some(page),
            ScrollKey::PageUp => Some(-page),
            ScrollKey::Home => {
                self.scroll_to(self.state.bounds.min, false);
                None
            }
            ScrollKey::End => {
                self.scroll_to(self.state.bounds.max, false);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::input::TouchPhase;

    fn scroller() -> SmoothScroll {
        let mut s = SmoothScroll::new(ScrollConfig::default());
        s.set_extent(Viewport::new(1000.0, 800.0), 5000.0);
        s
    }

    fn run(s: &mut SmoothScroll, seconds: f32) {
        let steps = (seconds * 60.0) as usize;
        for _ in 0..steps {
            s.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn impulse_travels_its_delta() {
        let mut s = scroller();
        s.apply_input(&ScrollInput::pixels(300.0));
        run(&mut s, 5.0);
        assert_abs_diff_eq!(s.position(), 300.0, epsilon = 1.0);
        assert_eq!(s.velocity(), 0.0);
    }

    #[test]
    fn motion_is_monotonic_without_new_input() {
        let mut s = scroller();
        s.apply_input(&ScrollInput::pixels(500.0));
        let mut last = s.position();
        for _ in 0..300 {
            s.tick(1.0 / 60.0);
            assert!(s.position() >= last);
            last = s.position();
        }
    }

    #[test]
    fn hitting_bound_stops_motion() {
        let mut s = scroller();
        s.apply_input(&ScrollInput::pixels(-400.0));
        s.tick(1.0 / 60.0);
        assert_eq!(s.position(), 0.0);
        assert_eq!(s.velocity(), 0.0);
    }

    #[test]
    fn unsmoothed_input_is_immediate() {
        let mut s = SmoothScroll::new(ScrollConfig { smooth_wheel: false, ..ScrollConfig::default() });
        s.set_extent(Viewport::new(1000.0, 800.0), 5000.0);
        s.apply_input(&ScrollInput::pixels(120.0));
        assert_eq!(s.position(), 120.0);
    }

    #[test]
    fn normalization_caps_one_event_at_a_viewport() {
        let mut s = SmoothScroll::new(ScrollConfig { smooth_wheel: false, ..ScrollConfig::default() });
        s.set_extent(Viewport::new(1000.0, 800.0), 5000.0);
        s.apply_input(&ScrollInput::lines(100.0));
        assert_eq!(s.position(), 800.0);
    }

    #[test]
    fn touch_drag_is_amplified() {
        let mut s = SmoothScroll::new(ScrollConfig { smooth_wheel: false, ..ScrollConfig::default() });
        s.set_extent(Viewport::new(1000.0, 800.0), 5000.0);
        s.apply_input(&ScrollInput::Touch { id: 0, phase: TouchPhase::Started, y: 400.0 });
        s.apply_input(&ScrollInput::Touch { id: 0, phase: TouchPhase::Moved, y: 350.0 });
        assert_eq!(s.position(), 100.0);
    }

    #[test]
    fn scrollbar_jumps_and_clamps() {
        let mut s = scroller();
        s.apply_input(&ScrollInput::Scrollbar { position: 99_999.0 });
        assert_eq!(s.position(), 4200.0);
    }

    #[test]
    fn shrinking_content_reclamps() {
        let mut s = scroller();
        s.scroll_to(3000.0, true);
        s.set_extent(Viewport::new(1000.0, 800.0), 1800.0);
        assert_eq!(s.position(), 1000.0);
    }

    #[test]
    fn prevent_default_controls_disposition() {
        let mut s = SmoothScroll::new(ScrollConfig { prevent_default: false, ..ScrollConfig::default() });
        assert_eq!(s.apply_input(&ScrollInput::pixels(1.0)), InputDisposition::PassThrough);
        let mut s = scroller();
        assert_eq!(s.apply_input(&ScrollInput::pixels(1.0)), InputDisposition::Consumed);
    }

    #[test]
    fn animated_scroll_to_lands_exactly() {
        let mut s = scroller();
        s.scroll_to(1234.0, false);
        run(&mut s, 2.0);
        assert_eq!(s.position(), 1234.0);
        assert!(!s.is_scrolling());
    }

    #[test]
    fn end_key_scrolls_to_bottom() {
        let mut s = scroller();
        s.apply_input(&ScrollInput::Key(ScrollKey::End));
        run(&mut s, 2.0);
        assert_eq!(s.position(), 4200.0);
    }

    // ── tease ─────────────────────────────────────────────────────────────

    #[test]
    fn tease_cancelled_past_half_restores_origin() {
        let mut s = scroller();
        s.scroll_to(700.0, true);

        let id = s.tease();
        // Second leg, 60% through overall.
        for _ in 0..43 {
            s.tick(1.0 / 60.0);
        }
        assert!(s.active_tease().unwrap().progress() > 0.5);
        assert_ne!(s.position(), 700.0);

        assert!(s.cancel_tease(id));
        assert_eq!(s.position(), 700.0);
        assert_eq!(s.velocity(), 0.0);
    }

    #[test]
    fn tease_completes_at_origin() {
        let mut s = scroller();
        s.scroll_to(250.0, true);
        s.tease();
        run(&mut s, 1.5);
        assert!(s.active_tease().is_none());
        assert_eq!(s.position(), 250.0);
    }

    #[test]
    fn tease_reaches_fraction_of_width() {
        let mut s = scroller();
        s.tease();
        for _ in 0..36 {
            s.tick(1.0 / 60.0);
        }
        // 10% of a 1000 px wide viewport.
        assert_abs_diff_eq!(s.position(), 100.0, epsilon = 0.5);
    }

    #[test]
    fn tease_is_one_shot() {
        let mut s = scroller();
        let first = s.tease();
        assert_eq!(s.tease(), first);
        assert!(!s.cancel_tease(TeaseId(first.0 + 1)));
        assert!(s.active_tease().is_some());
    }

    #[test]
    fn user_input_interrupts_tease_from_origin() {
        let mut s = scroller();
        s.scroll_to(500.0, true);
        s.tease();
        run(&mut s, 0.3);
        assert!(s.position() > 500.0);

        s.apply_input(&ScrollInput::pixels(200.0));
        assert!(s.active_tease().is_none());
        assert_eq!(s.position(), 500.0);
        assert!(s.velocity() > 0.0);
    }
}
