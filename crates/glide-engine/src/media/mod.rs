//! Visibility-gated media playback.
//!
//! A [`MediaPlaybackController`] owns one media element and follows that
//! element's visibility: it plays once a quarter of the element is on screen
//! and pauses when it leaves.

mod controller;
mod element;

pub use controller::{MediaBinding, MediaPlaybackController, PlaybackState, PLAYBACK_THRESHOLD};
pub use element::{MediaElement, PlaybackError};
