use glide_engine::coords::Viewport;
use glide_engine::host::{HostCapabilities, InputHost, ListenerRegistry};
use glide_engine::input::ScrollInput;
use glide_engine::scene::{ContentPlane, HeadlessBackend, SceneConfig};
use glide_engine::scroll::{ScrollConfig, SmoothScrollController};
use glide_engine::stage::{FrameOutcome, LifecycleEvent, Stage, StageConfig};

fn stage_config() -> StageConfig {
    StageConfig {
        scene: SceneConfig {
            planes: vec![
                ContentPlane { id: 1, page_offset: 0.5, ..ContentPlane::default() },
                ContentPlane { id: 2, page_offset: 1.5, x: 0.5, ..ContentPlane::default() },
            ],
            ..SceneConfig::default()
        },
        pages: Some(3.0),
        ..StageConfig::default()
    }
}

#[test]
fn nothing_renders_after_unmount() {
    let mut host = ListenerRegistry::new();
    let backend = HeadlessBackend::new();
    let ledger = backend.ledger();
    let mut stage = Stage::mount(
        stage_config(),
        backend,
        Viewport::new(1280.0, 720.0),
        HostCapabilities::default(),
        &mut host,
    )
    .unwrap();

    for _ in 0..3 {
        assert_eq!(stage.frame(1.0 / 60.0).unwrap(), FrameOutcome::Rendered);
    }
    stage.unmount(&mut host);

    // A frame the host had already queued arrives after teardown.
    assert_eq!(stage.frame(1.0 / 60.0).unwrap(), FrameOutcome::Idle);
    assert!(stage.presenter().is_none());

    let trace = stage.trace();
    let disposed = trace
        .iter()
        .position(|e| *e == LifecycleEvent::PresenterDisposed)
        .unwrap();
    assert!(
        trace[disposed..]
            .iter()
            .all(|e| !matches!(e, LifecycleEvent::FrameRendered(_) | LifecycleEvent::FrameSkipped(_)))
    );
    assert_eq!(trace.last(), Some(&LifecycleEvent::ScrollDetached));

    let ledger = ledger.borrow();
    assert_eq!(ledger.submissions.len(), 3);
    assert_eq!(ledger.live_count(), 0);
    assert_eq!(ledger.double_releases, 0);
    assert_eq!(ledger.released, ledger.created);
}

#[test]
fn double_attach_registers_one_listener() {
    let mut host = ListenerRegistry::new();
    let first = SmoothScrollController::attach(ScrollConfig::default(), &mut host);
    let second = SmoothScrollController::attach(ScrollConfig { damping: 0.5, ..ScrollConfig::default() }, &mut host);

    assert_eq!(first, second);
    assert_eq!(host.scroll_listener_count(), 1);

    assert!(SmoothScrollController::detach(first, &mut host));
    assert!(!SmoothScrollController::detach(second, &mut host));
    assert_eq!(host.scroll_listener_count(), 0);
}

#[test]
fn stage_leaves_a_foreign_scroll_attached() {
    let mut host = ListenerRegistry::new();
    let owner = SmoothScrollController::attach(ScrollConfig::default(), &mut host);

    let mut stage = Stage::mount(
        stage_config(),
        HeadlessBackend::new(),
        Viewport::new(800.0, 600.0),
        HostCapabilities::default(),
        &mut host,
    )
    .unwrap();
    assert_eq!(stage.scroll_handle(), owner);
    assert_eq!(host.scroll_listener_count(), 1);

    stage.unmount(&mut host);
    assert!(owner.is_live());
    assert!(!stage.trace().contains(&LifecycleEvent::ScrollDetached));
    assert!(SmoothScrollController::detach(owner, &mut host));
}

#[test]
fn input_moves_the_camera_through_the_host() {
    let mut host = ListenerRegistry::new();
    let backend = HeadlessBackend::new();
    let ledger = backend.ledger();
    let config = StageConfig {
        scroll: ScrollConfig { smooth_wheel: false, ..ScrollConfig::default() },
        ..stage_config()
    };
    let mut stage = Stage::mount(
        config,
        backend,
        Viewport::new(800.0, 600.0),
        HostCapabilities::default(),
        &mut host,
    )
    .unwrap();

    stage.frame(0.016).unwrap();
    host.dispatch(&ScrollInput::pixels(120.0));
    stage.frame(0.016).unwrap();

    let ledger = ledger.borrow();
    assert_eq!(ledger.submissions[0].camera_y, 0.0);
    assert!(ledger.submissions[1].camera_y < 0.0);
    drop(ledger);

    stage.unmount(&mut host);
    assert_eq!(host.scroll_listener_count(), 0);
}

#[test]
fn stage_follows_a_scroll_reattached_by_another_owner() {
    let mut host = ListenerRegistry::new();
    let owner = SmoothScrollController::attach(ScrollConfig::default(), &mut host);

    let backend = HeadlessBackend::new();
    let ledger = backend.ledger();
    let viewport = Viewport::new(800.0, 600.0);
    let mut stage =
        Stage::mount(stage_config(), backend, viewport, HostCapabilities::default(), &mut host)
            .unwrap();

    assert!(SmoothScrollController::detach(owner, &mut host));
    let fresh = SmoothScrollController::attach(ScrollConfig::default(), &mut host);
    fresh.set_extent(viewport, 1800.0);
    fresh.scroll_to(300.0, true);

    assert_eq!(stage.frame(0.016).unwrap(), FrameOutcome::Rendered);
    assert_eq!(stage.scroll_handle(), fresh);
    assert!(ledger.borrow().submissions[0].camera_y < 0.0);

    stage.resize(Viewport::new(800.0, 400.0)).unwrap();
    let max = fresh.with(|s| s.state().bounds.max).unwrap();
    assert_eq!(max, 3.0 * 400.0 - 400.0);

    stage.unmount(&mut host);
    assert!(fresh.is_live());
    assert!(SmoothScrollController::detach(fresh, &mut host));
}
