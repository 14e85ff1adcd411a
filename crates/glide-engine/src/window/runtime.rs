use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::{Viewport, ViewportFrame};
use crate::core::{App, AppControl, FrameCtx, MountCtx};
use crate::device::{Gpu, GpuInit};
use crate::host::{HostCapabilities, InputDisposition, InputHost, ListenerRegistry, ViewportSource};
use crate::input::platform::winit::translate_window_event;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glide".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, mounts `app` into it and runs until the window closes
    /// or the app asks to exit.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct MountedWindow {
    window: Arc<Window>,
    clock: FrameClock,
}

impl MountedWindow {
    fn viewport(&self) -> Viewport {
        ViewportFrame::query(self.window.as_ref()).viewport()
    }
}

/// The window reports its inner size in logical pixels.
impl ViewportSource for Window {
    fn viewport(&self) -> Viewport {
        let logical = self.inner_size().to_logical::<f64>(self.scale_factor());
        Viewport::new(logical.width as f32, logical.height as f32)
    }
}

struct RuntimeState<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    /// Host side of the scroll listeners the app registers.
    input: ListenerRegistry,
    mounted: Option<MountedWindow>,
    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A: App> RuntimeState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            input: ListenerRegistry::new(),
            mounted: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_transparent(self.gpu_init.transparent);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(Arc::clone(&window), self.gpu_init.clone()))
            .context("GPU initialization failed")?;

        let viewport = ViewportFrame::query(window.as_ref()).viewport();
        self.app
            .mount(MountCtx {
                gpu,
                viewport,
                capabilities: native_capabilities(),
                input: &mut self.input,
            })
            .context("application mount failed")?;

        log::info!("mounted at {}x{}", viewport.width, viewport.height);
        window.request_redraw();
        self.mounted = Some(MountedWindow {
            window,
            clock: FrameClock::new(),
        });
        Ok(())
    }

    /// Unmounts once; later calls do nothing.
    fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            self.app.unmount(&mut self.input);
            if self.input.scroll_listener_count() > 0 {
                log::warn!(
                    "{} scroll listeners still registered after unmount",
                    self.input.scroll_listener_count()
                );
            }
            log::info!("unmounted");
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.unmount();
        self.exit_requested = true;
        event_loop.exit();
    }
}

/// The native host has no layout engine but the engine measures planes itself,
/// and winit always delivers redraws.
fn native_capabilities() -> HostCapabilities {
    HostCapabilities {
        intersection_observer: true,
        animation_frames: true,
    }
}

impl<A: App> ApplicationHandler for RuntimeState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.mounted.is_some() || self.exit_requested {
            return;
        }
        if let Err(err) = self.mount(event_loop) {
            log::error!("{err:#}");
            self.failure = Some(err);
            self.exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: scroll motion and post effects animate every frame.
        if let Some(mounted) = &self.mounted {
            mounted.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(mounted) = &self.mounted else { return };
        if mounted.window.id() != window_id {
            return;
        }

        if let Some(input) = translate_window_event(&mounted.window, &event) {
            if self.input.dispatch(&input) == InputDisposition::PassThrough {
                log::trace!("scroll input not consumed: {input:?}");
            }
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit(event_loop);
            return;
        }

        let control = match &event {
            WindowEvent::CloseRequested => AppControl::Exit,

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let Some(mounted) = &self.mounted else { return };
                let viewport = mounted.viewport();
                mounted.window.request_redraw();
                if viewport.is_valid() {
                    self.app.on_resize(viewport)
                } else {
                    AppControl::Continue
                }
            }

            WindowEvent::Occluded(false) => {
                if let Some(mounted) = &mut self.mounted {
                    mounted.clock.reset();
                }
                AppControl::Continue
            }

            WindowEvent::RedrawRequested => {
                let Some(mounted) = &mut self.mounted else { return };
                let time = mounted.clock.tick();
                let viewport = mounted.viewport();
                let mut ctx = FrameCtx {
                    time,
                    viewport,
                    input: &mut self.input,
                };
                self.app.on_frame(&mut ctx)
            }

            _ => AppControl::Continue,
        };

        if control == AppControl::Exit {
            self.exit(event_loop);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}
