use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::visibility::{ElementId, Observation, VisibilityGate, VisibilityRecord};

use super::element::MediaElement;

/// Visible fraction at which media starts playing.
pub const PLAYBACK_THRESHOLD: f32 = 0.25;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// Play/pause state machine for one media element.
///
/// Transitions happen only on visibility updates:
/// - intersecting while `Paused` tries `play()`; a rejection keeps it `Paused`
/// - not intersecting while `Playing` calls `pause()`
/// - anything else is a no-op
pub struct MediaPlaybackController<M> {
    element: ElementId,
    media: M,
    state: PlaybackState,
}

impl<M: MediaElement> MediaPlaybackController<M> {
    pub fn new(element: ElementId, media: M) -> Self {
        Self {
            element,
            media,
            state: PlaybackState::Paused,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Applies one visibility update and returns the resulting state.
    pub fn on_visibility(&mut self, record: VisibilityRecord) -> PlaybackState {
        match (self.state, record.is_intersecting) {
            (PlaybackState::Paused, true) => match self.media.play() {
                Ok(()) => {
                    log::debug!("media {:?} playing (ratio {:.2})", self.element, record.ratio);
                    self.state = PlaybackState::Playing;
                }
                Err(err) => {
                    // Swallowed; the next crossing tries again.
                    log::debug!("media {:?} did not start: {err}", self.element);
                }
            },
            (PlaybackState::Playing, false) => {
                self.media.pause();
                log::debug!("media {:?} paused (ratio {:.2})", self.element, record.ratio);
                self.state = PlaybackState::Paused;
            }
            _ => {}
        }
        self.state
    }

    /// Pauses if playing.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            self.media.pause();
            self.state = PlaybackState::Paused;
        }
    }

    /// Binds a controller for `media` to `gate` at [`PLAYBACK_THRESHOLD`].
    pub fn bind(gate: &VisibilityGate, element: ElementId, media: M) -> MediaBinding<M>
    where
        M: 'static,
    {
        let controller = Rc::new(RefCell::new(Self::new(element, media)));
        let target = Rc::clone(&controller);
        let observation = gate.observe(
            element,
            &[PLAYBACK_THRESHOLD],
            Box::new(move |record| match target.try_borrow_mut() {
                Ok(mut c) => {
                    c.on_visibility(record);
                }
                Err(_) => log::warn!("media {element:?} busy; visibility update dropped"),
            }),
        );
        MediaBinding { controller, observation }
    }
}

/// A controller subscribed to a gate. Dropping it unbinds.
pub struct MediaBinding<M: MediaElement> {
    controller: Rc<RefCell<MediaPlaybackController<M>>>,
    observation: Observation,
}

impl<M: MediaElement> MediaBinding<M> {
    pub fn element(&self) -> ElementId {
        self.observation.element()
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.borrow().state()
    }

    pub fn controller(&self) -> Ref<'_, MediaPlaybackController<M>> {
        self.controller.borrow()
    }

    pub fn is_bound(&self) -> bool {
        self.observation.is_active()
    }

    /// Stops observing and pauses. Idempotent.
    pub fn unbind(&self) {
        if !self.observation.is_active() {
            return;
        }
        self.observation.unobserve();
        if let Ok(mut c) = self.controller.try_borrow_mut() {
            c.stop();
        }
    }
}

impl<M: MediaElement> Drop for MediaBinding<M> {
    fn drop(&mut self) {
        self.unbind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostCapabilities;
    use crate::media::PlaybackError;
    use crate::visibility::IntersectionEntry;

    #[derive(Default)]
    struct FakeMedia {
        plays: u32,
        pauses: u32,
        reject: Option<PlaybackError>,
    }

    impl MediaElement for FakeMedia {
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.plays += 1;
            match self.reject.take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn pause(&mut self) {
            self.pauses += 1;
        }
    }

    fn rec(ratio: f32) -> VisibilityRecord {
        VisibilityRecord {
            element: ElementId(1),
            is_intersecting: ratio > 0.0 && ratio >= PLAYBACK_THRESHOLD,
            ratio,
        }
    }

    #[test]
    fn plays_on_entry_and_pauses_on_exit() {
        let mut c = MediaPlaybackController::new(ElementId(1), FakeMedia::default());
        assert_eq!(c.on_visibility(rec(0.5)), PlaybackState::Playing);
        assert_eq!(c.on_visibility(rec(0.9)), PlaybackState::Playing);
        assert_eq!(c.on_visibility(rec(0.0)), PlaybackState::Paused);
        assert_eq!(c.on_visibility(rec(0.0)), PlaybackState::Paused);
        assert_eq!((c.media().plays, c.media().pauses), (1, 1));
    }

    #[test]
    fn rejection_stays_paused_until_next_crossing() {
        let media = FakeMedia {
            reject: Some(PlaybackError::Policy("autoplay".into())),
            ..FakeMedia::default()
        };
        let mut c = MediaPlaybackController::new(ElementId(1), media);

        assert_eq!(c.on_visibility(rec(0.5)), PlaybackState::Paused);
        assert_eq!(c.media().plays, 1);

        c.on_visibility(rec(0.0));
        assert_eq!(c.media().pauses, 0);
        assert_eq!(c.on_visibility(rec(0.5)), PlaybackState::Playing);
        assert_eq!(c.media().plays, 2);
    }

    #[test]
    fn binding_follows_gate_crossings() {
        let gate = VisibilityGate::new(HostCapabilities::default());
        let binding = MediaPlaybackController::bind(&gate, ElementId(1), FakeMedia::default());
        let at = |ratio| IntersectionEntry { element: ElementId(1), ratio };

        gate.deliver([at(0.1)]);
        assert_eq!(binding.state(), PlaybackState::Paused);
        gate.deliver([at(0.25)]);
        assert_eq!(binding.state(), PlaybackState::Playing);
        gate.deliver([at(0.0)]);
        assert_eq!(binding.state(), PlaybackState::Paused);
        assert_eq!(binding.controller().media().plays, 1);
    }

    #[test]
    fn unbind_pauses_and_detaches() {
        let gate = VisibilityGate::new(HostCapabilities::default());
        let binding = MediaPlaybackController::bind(&gate, ElementId(1), FakeMedia::default());
        gate.deliver([IntersectionEntry { element: ElementId(1), ratio: 1.0 }]);
        assert_eq!(binding.state(), PlaybackState::Playing);

        binding.unbind();
        binding.unbind();
        assert!(!binding.is_bound());
        assert_eq!(binding.state(), PlaybackState::Paused);
        assert_eq!(gate.observed_count(), 0);
        assert_eq!(binding.controller().media().pauses, 1);
    }

    #[test]
    fn fail_open_gate_starts_playback_at_bind() {
        let gate = VisibilityGate::new(HostCapabilities {
            intersection_observer: false,
            ..HostCapabilities::default()
        });
        let binding = MediaPlaybackController::bind(&gate, ElementId(4), FakeMedia::default());
        assert_eq!(binding.state(), PlaybackState::Playing);
    }

    #[test]
    fn dropped_binding_stops_observing() {
        let gate = VisibilityGate::new(HostCapabilities::default());
        let binding = MediaPlaybackController::bind(&gate, ElementId(1), FakeMedia::default());
        assert_eq!(gate.observed_count(), 1);
        drop(binding);
        assert_eq!(gate.observed_count(), 0);
        gate.deliver([IntersectionEntry { element: ElementId(1), ratio: 1.0 }]);
    }
}
