use std::cell::RefCell;
use std::rc::Rc;

use glide_engine::coords::Rect;
use glide_engine::host::HostCapabilities;
use glide_engine::media::{MediaElement, MediaPlaybackController, PlaybackError, PlaybackState};
use glide_engine::visibility::{ElementId, IntersectionEntry, VisibilityGate};

#[derive(Default)]
struct Log {
    events: Vec<&'static str>,
}

struct Video {
    log: Rc<RefCell<Log>>,
    reject_first: bool,
}

impl MediaElement for Video {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if std::mem::take(&mut self.reject_first) {
            self.log.borrow_mut().events.push("rejected");
            return Err(PlaybackError::Policy("autoplay blocked".into()));
        }
        self.log.borrow_mut().events.push("play");
        Ok(())
    }

    fn pause(&mut self) {
        self.log.borrow_mut().events.push("pause");
    }
}

fn entry(ratio: f32) -> IntersectionEntry {
    IntersectionEntry { element: ElementId(9), ratio }
}

#[test]
fn plays_only_on_threshold_crossings() {
    let log = Rc::new(RefCell::new(Log::default()));
    let gate = VisibilityGate::new(HostCapabilities::default());
    let binding = MediaPlaybackController::bind(
        &gate,
        ElementId(9),
        Video { log: Rc::clone(&log), reject_first: false },
    );

    gate.deliver([entry(0.0)]);
    gate.deliver([entry(0.1)]);
    gate.deliver([entry(0.24)]);
    assert_eq!(binding.state(), PlaybackState::Paused);

    gate.deliver([entry(0.25)]);
    gate.deliver([entry(0.6)]);
    gate.deliver([entry(1.0)]);
    assert_eq!(binding.state(), PlaybackState::Playing);

    gate.deliver([entry(0.2)]);
    assert_eq!(binding.state(), PlaybackState::Paused);

    assert_eq!(log.borrow().events, ["play", "pause"]);
}

#[test]
fn rejected_play_is_retried_on_next_entry() {
    let log = Rc::new(RefCell::new(Log::default()));
    let gate = VisibilityGate::new(HostCapabilities::default());
    let binding = MediaPlaybackController::bind(
        &gate,
        ElementId(9),
        Video { log: Rc::clone(&log), reject_first: true },
    );

    gate.deliver([entry(0.5)]);
    assert_eq!(binding.state(), PlaybackState::Paused);
    gate.deliver([entry(0.0)]);
    gate.deliver([entry(0.5)]);
    assert_eq!(binding.state(), PlaybackState::Playing);

    assert_eq!(log.borrow().events, ["rejected", "play"]);
}

#[test]
fn layout_measurement_drives_playback() {
    let log = Rc::new(RefCell::new(Log::default()));
    let gate = VisibilityGate::new(HostCapabilities::default());
    let binding = MediaPlaybackController::bind(
        &gate,
        ElementId(9),
        Video { log: Rc::clone(&log), reject_first: false },
    );
    let video = Rect::new(0.0, 1000.0, 400.0, 200.0);

    gate.measure_layout(Rect::new(0.0, 0.0, 800.0, 600.0), [(ElementId(9), video)]);
    assert_eq!(binding.state(), PlaybackState::Paused);

    // 60 of 200 rows visible: 0.3 of the element.
    gate.measure_layout(Rect::new(0.0, 460.0, 800.0, 600.0), [(ElementId(9), video)]);
    assert_eq!(binding.state(), PlaybackState::Playing);

    gate.measure_layout(Rect::new(0.0, 1300.0, 800.0, 600.0), [(ElementId(9), video)]);
    assert_eq!(binding.state(), PlaybackState::Paused);
}

#[test]
fn without_intersection_support_media_plays_at_once() {
    let log = Rc::new(RefCell::new(Log::default()));
    let gate = VisibilityGate::new(HostCapabilities {
        intersection_observer: false,
        animation_frames: true,
    });
    let binding = MediaPlaybackController::bind(
        &gate,
        ElementId(9),
        Video { log: Rc::clone(&log), reject_first: false },
    );
    assert_eq!(binding.state(), PlaybackState::Playing);

    // Measurements are meaningless to a fail-open gate.
    gate.deliver([entry(0.0)]);
    assert_eq!(binding.state(), PlaybackState::Playing);

    drop(binding);
    assert_eq!(log.borrow().events, ["play", "pause"]);
}
