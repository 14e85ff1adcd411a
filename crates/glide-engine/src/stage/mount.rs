use crate::coords::Viewport;
use crate::host::{HostCapabilities, InputHost};
use crate::media::{MediaBinding, MediaElement, MediaPlaybackController, PlaybackState};
use crate::scene::{SceneBackend, SceneError, ScenePresenter};
use crate::scroll::{ScrollHandle, SmoothScrollController};
use crate::time::FrameLoop;
use crate::visibility::{ElementId, VisibilityGate};

use super::config::StageConfig;
use super::lifecycle::{FrameOutcome, LifecycleEvent};

/// The engine, mounted into one viewport.
///
/// Lifetime rules:
/// - [`mount`](Self::mount) attaches scroll first and initializes the scene
///   second; if the scene fails, scroll is detached again before returning
/// - [`frame`](Self::frame) ticks scroll before anything reads the position
/// - [`unmount`](Self::unmount) stops the frame loop before releasing
///   anything, so no frame runs against a disposed presenter
pub struct Stage<B: SceneBackend> {
    scroll: ScrollHandle,
    /// `false` when another owner had attached scroll before this mount.
    owns_scroll: bool,
    presenter: Option<ScenePresenter<B>>,
    gate: VisibilityGate,
    media: Vec<MediaBinding<Box<dyn MediaElement>>>,
    frame_loop: FrameLoop,
    viewport: Viewport,
    pages: Option<f32>,
    trace: Vec<LifecycleEvent>,
}

impl<B: SceneBackend> Stage<B> {
    pub fn mount(
        config: StageConfig,
        backend: B,
        viewport: Viewport,
        caps: HostCapabilities,
        input: &mut dyn InputHost,
    ) -> Result<Self, SceneError> {
        let StageConfig { scroll, scene, pages, tease_on_mount } = config;
        let mut trace = Vec::new();

        let owns_scroll = !SmoothScrollController::is_attached();
        let handle = SmoothScrollController::attach(scroll, input);
        trace.push(LifecycleEvent::ScrollAttached);

        let presenter = match ScenePresenter::initialize(backend, viewport, scene) {
            Ok(presenter) => presenter,
            Err(err) => {
                if owns_scroll {
                    SmoothScrollController::detach(handle, input);
                }
                log::error!("stage mount failed: {err}");
                return Err(err);
            }
        };
        trace.push(LifecycleEvent::PresenterInitialized);

        if !caps.animation_frames {
            log::warn!("host has no frame scheduling; the stage renders only when driven");
        }

        let stage = Self {
            scroll: handle,
            owns_scroll,
            presenter: Some(presenter),
            gate: VisibilityGate::new(caps),
            media: Vec::new(),
            frame_loop: FrameLoop::new(),
            viewport,
            pages,
            trace,
        };
        stage.scroll.set_extent(viewport, stage.content_height());

        if tease_on_mount {
            stage.scroll.tease();
        }

        log::debug!("stage mounted at {}x{}", viewport.width, viewport.height);
        Ok(stage)
    }

    /// Gates `media` on the visibility of the plane with id `element`.
    pub fn bind_media(&mut self, element: ElementId, media: impl MediaElement + 'static) {
        if !self.frame_loop.is_alive() {
            log::warn!("media {element:?} bound after unmount; ignored");
            return;
        }
        let media: Box<dyn MediaElement> = Box::new(media);
        self.media
            .push(MediaPlaybackController::bind(&self.gate, element, media));
        self.trace.push(LifecycleEvent::MediaBound(element));
    }

    /// Runs one frame `dt` seconds after the previous one.
    ///
    /// Only fatal backend errors are returned; a skipped frame is logged and
    /// reported as [`FrameOutcome::Skipped`].
    pub fn frame(&mut self, dt: f32) -> Result<FrameOutcome, SceneError> {
        let Some(token) = self.frame_loop.begin() else {
            return Ok(FrameOutcome::Idle);
        };
        let index = token.frame_index();

        let position = match self.live_scroll() {
            Some(scroll) => scroll.tick(dt).unwrap_or_else(SmoothScrollController::position),
            None => SmoothScrollController::position(),
        };
        let velocity = SmoothScrollController::state().map_or(0.0, |s| s.velocity);

        debug_assert!(self.presenter.is_some(), "live stage without a presenter");
        let result = match self.presenter.as_mut() {
            Some(presenter) => {
                let frame = presenter.frame();
                let planes = presenter
                    .config()
                    .planes
                    .iter()
                    .map(|plane| (ElementId(plane.id), plane.page_rect(frame)));
                self.gate.measure_layout(self.viewport.page_rect(position), planes);

                presenter.advance(dt, velocity);
                presenter.render_frame(position)
            }
            None => Ok(()),
        };
        self.frame_loop.end(token);

        match result {
            Ok(()) => {
                self.trace.push(LifecycleEvent::FrameRendered(index));
                Ok(FrameOutcome::Rendered)
            }
            Err(err) if err.is_fatal() => {
                log::error!("frame {index}: {err}");
                Err(err)
            }
            Err(err) => {
                log::warn!("frame {index}: {err}");
                self.trace.push(LifecycleEvent::FrameSkipped(index));
                Ok(FrameOutcome::Skipped)
            }
        }
    }

    /// Adopts a new viewport. Degenerate sizes (minimized windows) are ignored.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SceneError> {
        if !viewport.is_valid() || !self.frame_loop.is_alive() {
            return Ok(());
        }
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.resize(viewport)?;
        }
        self.viewport = viewport;
        if let Some(scroll) = self.live_scroll() {
            scroll.set_extent(viewport, self.content_height());
        }
        self.trace.push(LifecycleEvent::Resized {
            width: viewport.width,
            height: viewport.height,
        });
        Ok(())
    }

    /// Tears the mount down. Idempotent.
    pub fn unmount(&mut self, input: &mut dyn InputHost) {
        if !self.frame_loop.is_alive() {
            return;
        }
        self.frame_loop.stop();

        for binding in self.media.drain(..) {
            binding.unbind();
            self.trace.push(LifecycleEvent::MediaUnbound(binding.element()));
        }

        if let Some(presenter) = self.presenter.take() {
            presenter.dispose();
            self.trace.push(LifecycleEvent::PresenterDisposed);
        }

        if self.owns_scroll && SmoothScrollController::detach(self.scroll, input) {
            self.trace.push(LifecycleEvent::ScrollDetached);
        }
        log::debug!("stage unmounted after {} frames", self.frame_loop.frames_run());
    }

    pub fn is_mounted(&self) -> bool {
        self.frame_loop.is_alive()
    }

    pub fn trace(&self) -> &[LifecycleEvent] {
        &self.trace
    }

    pub fn gate(&self) -> &VisibilityGate {
        &self.gate
    }

    pub fn scroll_handle(&self) -> ScrollHandle {
        self.scroll
    }

    pub fn presenter(&self) -> Option<&ScenePresenter<B>> {
        self.presenter.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn media_state(&self, element: ElementId) -> Option<PlaybackState> {
        self.media
            .iter()
            .find(|b| b.element() == element)
            .map(MediaBinding::state)
    }

    /// The live scroll instance, re-acquired if another owner replaced ours.
    ///
    /// An adopted instance belongs to whoever attached it, so the stage stops
    /// owning scroll and only sizes it to this page.
    fn live_scroll(&mut self) -> Option<ScrollHandle> {
        if self.scroll.is_live() {
            return Some(self.scroll);
        }
        let current = SmoothScrollController::handle()?;
        log::debug!("scroll handle went stale; adopting the live instance");
        self.scroll = current;
        self.owns_scroll = false;
        current.set_extent(self.viewport, self.content_height());
        Some(current)
    }

    /// Page height in logical pixels; never shorter than the viewport.
    fn content_height(&self) -> f32 {
        let height = self.viewport.height;
        let pages = match (self.pages, self.presenter.as_ref()) {
            (Some(pages), _) => pages * height,
            (None, Some(presenter)) => {
                let frame = presenter.frame();
                presenter
                    .config()
                    .planes
                    .iter()
                    .map(|plane| plane.page_bottom(frame))
                    .fold(0.0, f32::max)
            }
            (None, None) => 0.0,
        };
        pages.max(height)
    }
}

impl<B: SceneBackend> Drop for Stage<B> {
    fn drop(&mut self) {
        if !self.frame_loop.is_alive() {
            return;
        }
        log::warn!("stage dropped while mounted; its scroll listener stays with the host");
        self.frame_loop.stop();
        self.media.clear();
        self.presenter = None;
        if self.owns_scroll {
            SmoothScrollController::release(self.scroll);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::host::ListenerRegistry;
    use crate::input::ScrollInput;
    use crate::media::PlaybackError;
    use crate::scene::{ContentPlane, HeadlessBackend, SceneConfig};
    use crate::scroll::ScrollConfig;

    #[derive(Default)]
    struct Counts {
        plays: u32,
        pauses: u32,
    }

    struct SharedMedia(Rc<RefCell<Counts>>);

    impl MediaElement for SharedMedia {
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.0.borrow_mut().plays += 1;
            Ok(())
        }

        fn pause(&mut self) {
            self.0.borrow_mut().pauses += 1;
        }
    }

    fn config() -> StageConfig {
        StageConfig {
            scroll: ScrollConfig { smooth_wheel: false, ..ScrollConfig::default() },
            scene: SceneConfig {
                planes: vec![ContentPlane { id: 1, page_offset: 1.0, ..ContentPlane::default() }],
                ..SceneConfig::default()
            },
            pages: Some(2.0),
            tease_on_mount: false,
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn mount_frame_unmount_in_order() {
        let mut host = ListenerRegistry::new();
        let backend = HeadlessBackend::new();
        let ledger = backend.ledger();
        let mut stage =
            Stage::mount(config(), backend, viewport(), HostCapabilities::default(), &mut host)
                .unwrap();

        assert_eq!(stage.frame(0.016).unwrap(), FrameOutcome::Rendered);
        stage.unmount(&mut host);
        stage.unmount(&mut host);
        assert_eq!(stage.frame(0.016).unwrap(), FrameOutcome::Idle);

        assert_eq!(
            stage.trace(),
            &[
                LifecycleEvent::ScrollAttached,
                LifecycleEvent::PresenterInitialized,
                LifecycleEvent::FrameRendered(0),
                LifecycleEvent::PresenterDisposed,
                LifecycleEvent::ScrollDetached,
            ]
        );
        assert_eq!(ledger.borrow().live_count(), 0);
        assert_eq!(ledger.borrow().submissions.len(), 1);
        assert_eq!(host.scroll_listener_count(), 0);
    }

    #[test]
    fn failed_scene_init_leaves_nothing_attached() {
        let mut host = ListenerRegistry::new();
        let result = Stage::mount(
            config(),
            HeadlessBackend::with_capacity(1),
            viewport(),
            HostCapabilities::default(),
            &mut host,
        );
        assert!(result.is_err());
        assert_eq!(host.scroll_listener_count(), 0);
        assert!(!SmoothScrollController::is_attached());
    }

    #[test]
    fn page_length_follows_pages_or_planes() {
        let mut host = ListenerRegistry::new();
        let stage =
            Stage::mount(config(), HeadlessBackend::new(), viewport(), HostCapabilities::default(), &mut host)
                .unwrap();
        let max = stage.scroll_handle().with(|s| s.state().bounds.max).unwrap();
        assert_eq!(max, 600.0);
        drop(stage);

        let mut host = ListenerRegistry::new();
        let cfg = StageConfig { pages: None, ..config() };
        let mut stage =
            Stage::mount(cfg, HeadlessBackend::new(), viewport(), HostCapabilities::default(), &mut host)
                .unwrap();
        // Plane: 400 wide, 225 tall, centered 900 below the page top.
        let max = stage.scroll_handle().with(|s| s.state().bounds.max).unwrap();
        assert_eq!(max, 1012.5 - 600.0);
        stage.unmount(&mut host);
    }

    #[test]
    fn scrolling_plane_into_view_plays_media() {
        let mut host = ListenerRegistry::new();
        let mut stage =
            Stage::mount(config(), HeadlessBackend::new(), viewport(), HostCapabilities::default(), &mut host)
                .unwrap();
        let counts = Rc::new(RefCell::new(Counts::default()));
        stage.bind_media(ElementId(1), SharedMedia(Rc::clone(&counts)));

        stage.frame(0.016).unwrap();
        assert_eq!(stage.media_state(ElementId(1)), Some(PlaybackState::Paused));

        host.dispatch(&ScrollInput::pixels(600.0));
        stage.frame(0.016).unwrap();
        assert_eq!(stage.media_state(ElementId(1)), Some(PlaybackState::Playing));
        assert_eq!(counts.borrow().plays, 1);

        stage.unmount(&mut host);
        assert_eq!(counts.borrow().pauses, 1);
        assert!(stage.trace().contains(&LifecycleEvent::MediaUnbound(ElementId(1))));
    }

    #[test]
    fn camera_follows_scroll() {
        let mut host = ListenerRegistry::new();
        let backend = HeadlessBackend::new();
        let ledger = backend.ledger();
        let mut stage =
            Stage::mount(config(), backend, viewport(), HostCapabilities::default(), &mut host)
                .unwrap();

        stage.scroll_handle().scroll_to(300.0, true);
        stage.frame(0.016).unwrap();

        let camera_y = ledger.borrow().submissions[0].camera_y;
        let presenter = stage.presenter().unwrap();
        let extent = presenter.camera().visible_extent(presenter.frame(), -5.0);
        let upp = extent.units_per_pixel(presenter.frame());
        assert!((camera_y + 300.0 * upp).abs() < 1e-4);
        stage.unmount(&mut host);
    }

    #[test]
    fn resize_updates_camera_and_ignores_zero_size() {
        let mut host = ListenerRegistry::new();
        let mut stage =
            Stage::mount(config(), HeadlessBackend::new(), viewport(), HostCapabilities::default(), &mut host)
                .unwrap();

        stage.resize(Viewport::new(0.0, 0.0)).unwrap();
        assert_eq!(stage.viewport(), viewport());

        stage.resize(Viewport::new(1000.0, 500.0)).unwrap();
        stage.frame(0.016).unwrap();
        let aspect = stage.presenter().unwrap().camera().aspect;
        assert!((aspect - 2.0).abs() < 1e-6);
        assert!(stage.trace().contains(&LifecycleEvent::Resized { width: 1000.0, height: 500.0 }));
        stage.unmount(&mut host);
    }

    #[test]
    fn dropping_mounted_stage_frees_scroll() {
        let mut host = ListenerRegistry::new();
        let backend = HeadlessBackend::new();
        let ledger = backend.ledger();
        let stage =
            Stage::mount(config(), backend, viewport(), HostCapabilities::default(), &mut host)
                .unwrap();
        drop(stage);

        assert!(!SmoothScrollController::is_attached());
        assert_eq!(ledger.borrow().live_count(), 0);
    }
}
