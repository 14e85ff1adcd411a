//! glide: a scroll-synchronized presentation engine.
//!
//! Page scrolling is replaced by a damped virtual position
//! ([`scroll::SmoothScrollController`]). A perspective scene of textured planes
//! ([`scene::ScenePresenter`]) follows that position every frame, media elements
//! play only while sufficiently visible ([`media::MediaPlaybackController`] over a
//! [`visibility::VisibilityGate`]), and [`stage::Stage`] ties one mount of all of
//! it together.
//!
//! The native host is [`window::Runtime`] (winit + wgpu); tests drive the same
//! code through [`scene::HeadlessBackend`] and [`host::ListenerRegistry`].

pub mod coords;
pub mod core;
pub mod device;
pub mod host;
pub mod input;
pub mod logging;
pub mod media;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod stage;
pub mod time;
pub mod visibility;
pub mod window;
