use std::path::Path;

use anyhow::{Context, Result};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use glide_engine::coords::Viewport;
use glide_engine::core::{App, AppControl, FrameCtx, MountCtx};
use glide_engine::device::GpuInit;
use glide_engine::host::InputHost;
use glide_engine::logging::{init_logging, LoggingConfig};
use glide_engine::media::{MediaElement, PlaybackError};
use glide_engine::render::WgpuSceneBackend;
use glide_engine::scene::{ContentPlane, SceneConfig};
use glide_engine::stage::{Stage, StageConfig};
use glide_engine::visibility::ElementId;
use glide_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = match std::env::args_os().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => demo_config(),
    };

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), Studio::new(config))
}

fn load_config(path: &Path) -> Result<StageConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("invalid stage config in {}", path.display()))?;
    log::info!("loaded stage config from {}", path.display());
    Ok(config)
}

/// Four planes zig-zagging down five screens.
fn demo_config() -> StageConfig {
    const TINTS: [[f32; 4]; 4] = [
        [0.95, 0.55, 0.45, 1.0],
        [0.45, 0.70, 0.95, 1.0],
        [0.60, 0.90, 0.55, 1.0],
        [0.90, 0.80, 0.45, 1.0],
    ];
    let planes = TINTS
        .iter()
        .enumerate()
        .map(|(i, &tint)| ContentPlane {
            id: i as u64 + 1,
            x: if i % 2 == 0 { -0.4 } else { 0.4 },
            page_offset: 0.5 + i as f32,
            tint,
            ..ContentPlane::default()
        })
        .collect();

    StageConfig {
        scene: SceneConfig { planes, ..SceneConfig::default() },
        pages: Some(5.0),
        tease_on_mount: true,
        ..StageConfig::default()
    }
}

/// Stands in for a video: reports transitions in the log.
struct LoggedMedia {
    element: ElementId,
}

impl MediaElement for LoggedMedia {
    fn play(&mut self) -> Result<(), PlaybackError> {
        log::info!("media {} playing", self.element.0);
        Ok(())
    }

    fn pause(&mut self) {
        log::info!("media {} paused", self.element.0);
    }
}

struct Studio {
    config: StageConfig,
    stage: Option<Stage<WgpuSceneBackend>>,
}

impl Studio {
    fn new(config: StageConfig) -> Self {
        Self { config, stage: None }
    }
}

impl App for Studio {
    fn mount(&mut self, ctx: MountCtx<'_>) -> Result<()> {
        let backend = WgpuSceneBackend::new(ctx.gpu);
        let mut stage = Stage::mount(
            self.config.clone(),
            backend,
            ctx.viewport,
            ctx.capabilities,
            ctx.input,
        )
        .context("stage mount failed")?;

        for plane in &self.config.scene.planes {
            let element = ElementId(plane.id);
            stage.bind_media(element, LoggedMedia { element });
        }
        self.stage = Some(stage);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let Some(stage) = self.stage.as_mut() else {
            return AppControl::Continue;
        };
        match stage.frame(ctx.time.dt) {
            Ok(_) => AppControl::Continue,
            Err(err) => {
                log::error!("rendering stopped: {err}");
                AppControl::Exit
            }
        }
    }

    fn on_resize(&mut self, viewport: Viewport) -> AppControl {
        if let Some(stage) = self.stage.as_mut() {
            if let Err(err) = stage.resize(viewport) {
                log::error!("resize failed: {err}");
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn unmount(&mut self, input: &mut dyn InputHost) {
        if let Some(mut stage) = self.stage.take() {
            stage.unmount(input);
        }
    }
}
