use thiserror::Error;

/// Why a media element refused to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The host's autoplay policy rejected the request.
    #[error("playback blocked by host policy: {0}")]
    Policy(String),
    /// The element cannot decode its source.
    #[error("media source could not be decoded: {0}")]
    Decode(String),
}

/// Host-provided media element.
pub trait MediaElement {
    /// Requests playback. A rejection leaves the element paused.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);
}

impl<M: MediaElement + ?Sized> MediaElement for Box<M> {
    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }
}
