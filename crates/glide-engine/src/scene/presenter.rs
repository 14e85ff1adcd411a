use crate::coords::metrics::ViewportFrame;
use crate::coords::Viewport;

use super::backend::{
    DrawItem, FrameSubmission, GeometryDesc, MaterialDesc, PostUniforms, ResourceHandle,
    SceneBackend, SurfaceSize,
};
use super::camera::CameraParams;
use super::chain::{PostChain, PostPass};
use super::config::SceneConfig;
use super::error::SceneError;

/// Everything a presenter holds on the backend.
#[derive(Debug, Clone)]
pub struct SceneResources {
    pub camera: CameraParams,
    pub geometry: Vec<ResourceHandle>,
    pub materials: Vec<ResourceHandle>,
    pub textures: Vec<ResourceHandle>,
    pub post_chain: PostChain,
    /// Backend passes for the chain's effects, in chain order.
    pub passes: Vec<ResourceHandle>,
}

impl SceneResources {
    pub fn handle_count(&self) -> usize {
        self.geometry.len() + self.materials.len() + self.textures.len() + self.passes.len()
    }
}

/// Owns one rendering context and draws the scene for a scroll position.
///
/// Every handle acquired in [`initialize`](Self::initialize) is released
/// exactly once: by [`dispose`](Self::dispose), or on drop if the presenter
/// is abandoned. `dispose` consumes the presenter, so nothing can render
/// through it afterwards.
pub struct ScenePresenter<B: SceneBackend> {
    backend: B,
    config: SceneConfig,
    frame: ViewportFrame,
    resources: SceneResources,
    draws: Vec<DrawItem>,
    elapsed: f32,
    scroll_velocity: f32,
    frames: u64,
}

impl<B: SceneBackend> ScenePresenter<B> {
    pub fn initialize(backend: B, viewport: Viewport, config: SceneConfig) -> Result<Self, SceneError> {
        let frame = checked_frame(viewport)?;

        let mut camera = CameraParams::new(config.fov_degrees, config.near, config.far, frame);
        camera.position.z = config.camera_z;

        let mut presenter = Self {
            backend,
            resources: SceneResources {
                camera,
                geometry: Vec::new(),
                materials: Vec::new(),
                textures: Vec::new(),
                post_chain: config.post_chain(),
                passes: Vec::new(),
            },
            config,
            frame,
            draws: Vec::new(),
            elapsed: 0.0,
            scroll_velocity: 0.0,
            frames: 0,
        };

        // On error the partially built presenter drops and releases what it got.
        presenter.backend.resize(surface_size(frame))?;
        presenter.acquire()?;

        log::debug!(
            "scene presenter initialized: {}x{}, {} planes, {} post passes",
            frame.width,
            frame.height,
            presenter.config.planes.len(),
            presenter.resources.passes.len()
        );
        Ok(presenter)
    }

    fn acquire(&mut self) -> Result<(), SceneError> {
        let geometry = self.backend.create_geometry(&GeometryDesc::plane(1))?;
        self.resources.geometry.push(geometry);

        for plane in &self.config.planes {
            let texture = self.backend.create_texture(&plane.texture(self.config.texture_size))?;
            self.resources.textures.push(texture);

            let material = self
                .backend
                .create_material(&MaterialDesc { tint: plane.tint, texture })?;
            self.resources.materials.push(material);
        }

        for pass in self.resources.post_chain.passes() {
            if matches!(pass, PostPass::Render) {
                continue;
            }
            let handle = self.backend.create_pass(pass)?;
            self.resources.passes.push(handle);
        }
        Ok(())
    }

    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SceneError> {
        let frame = checked_frame(viewport)?;
        self.frame = frame;
        self.resources.camera.set_aspect(frame);
        self.backend.resize(surface_size(frame))?;
        log::debug!("scene resized to {}x{}", frame.width, frame.height);
        Ok(())
    }

    /// Advances effect time and records the scroll velocity fed to post passes.
    pub fn advance(&mut self, dt: f32, scroll_velocity: f32) {
        self.elapsed += dt.max(0.0);
        self.scroll_velocity = scroll_velocity;
    }

    /// Draws one frame for `scroll_position` (logical pixels).
    ///
    /// The camera tracks the scroll position at the content depth, so one
    /// pixel of scroll moves the content one pixel on screen.
    pub fn render_frame(&mut self, scroll_position: f32) -> Result<(), SceneError> {
        let depth = self.config.content_depth;
        let extent = self.resources.camera.visible_extent(self.frame, depth);
        self.resources.camera.position.y = -scroll_position * extent.units_per_pixel(self.frame);

        self.draws.clear();
        if let Some(&geometry) = self.resources.geometry.first() {
            for (plane, &material) in self.config.planes.iter().zip(&self.resources.materials) {
                self.draws.push(DrawItem {
                    geometry,
                    material,
                    model: plane.model(self.frame, extent, depth),
                });
            }
        }

        let submission = FrameSubmission {
            clear_color: self.config.clear_color,
            camera: self.resources.camera,
            draws: &self.draws,
            passes: &self.resources.passes,
            uniforms: PostUniforms {
                time: self.elapsed,
                scroll_velocity: self.scroll_velocity,
                resolution: [self.frame.width, self.frame.height],
            },
        };
        self.backend.submit(&submission)?;
        self.frames += 1;
        Ok(())
    }

    /// Releases every backend resource and ends the presenter.
    pub fn dispose(mut self) {
        let released = self.release_all();
        log::debug!("scene presenter disposed ({released} handles released)");
    }

    pub fn camera(&self) -> &CameraParams {
        &self.resources.camera
    }

    pub fn frame(&self) -> ViewportFrame {
        self.frame
    }

    pub fn resources(&self) -> &SceneResources {
        &self.resources
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    fn release_all(&mut self) -> usize {
        let r = &mut self.resources;
        // Dependents first: materials reference textures.
        let handles: Vec<ResourceHandle> = r
            .passes
            .drain(..)
            .chain(r.materials.drain(..))
            .chain(r.textures.drain(..))
            .chain(r.geometry.drain(..))
            .collect();
        for &handle in &handles {
            self.backend.release(handle);
        }
        self.draws.clear();
        handles.len()
    }
}

impl<B: SceneBackend> Drop for ScenePresenter<B> {
    fn drop(&mut self) {
        let released = self.release_all();
        if released > 0 {
            log::debug!("scene presenter dropped; released {released} handles");
        }
    }
}

fn checked_frame(viewport: Viewport) -> Result<ViewportFrame, SceneError> {
    if !viewport.is_valid() {
        return Err(SceneError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(ViewportFrame::from_viewport(viewport))
}

fn surface_size(frame: ViewportFrame) -> SurfaceSize {
    SurfaceSize { width: frame.width, height: frame.height }
}
