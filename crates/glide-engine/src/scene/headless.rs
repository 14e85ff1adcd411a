use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::backend::{
    FrameSubmission, GeometryDesc, MaterialDesc, ResourceHandle, ResourceKind, SceneBackend,
    SurfaceSize, TextureDesc,
};
use super::chain::PostPass;
use super::error::SceneError;

/// What a [`HeadlessBackend`] saw of one submitted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub aspect: f32,
    pub camera_y: f32,
    pub draws: usize,
    pub passes: usize,
    pub time: f32,
    pub scroll_velocity: f32,
    pub resolution: [f32; 2],
}

/// Shared bookkeeping of a [`HeadlessBackend`].
#[derive(Debug, Default)]
pub struct HeadlessLedger {
    pub live: HashSet<ResourceHandle>,
    pub created: usize,
    pub released: usize,
    pub double_releases: usize,
    pub resizes: usize,
    pub size: Option<SurfaceSize>,
    pub submissions: Vec<SubmissionRecord>,
}

impl HeadlessLedger {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// Backend with no GPU behind it.
///
/// Tracks handle lifetimes and records submissions; used by tests and by hosts
/// that drive the engine without a window.
#[derive(Debug)]
pub struct HeadlessBackend {
    ledger: Rc<RefCell<HeadlessLedger>>,
    next_id: u64,
    capacity: Option<usize>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            ledger: Rc::new(RefCell::new(HeadlessLedger::default())),
            next_id: 1,
            capacity: None,
        }
    }

    /// A backend that fails once `capacity` resources have been created.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity: Some(capacity), ..Self::new() }
    }

    pub fn ledger(&self) -> Rc<RefCell<HeadlessLedger>> {
        Rc::clone(&self.ledger)
    }

    fn allocate(&mut self, kind: ResourceKind) -> Result<ResourceHandle, SceneError> {
        let mut ledger = self.ledger.borrow_mut();
        if self.capacity.is_some_and(|cap| ledger.created >= cap) {
            return Err(SceneError::Fatal(format!("out of {kind:?} memory")));
        }
        let handle = ResourceHandle::new(kind, self.next_id);
        self.next_id += 1;
        ledger.created += 1;
        ledger.live.insert(handle);
        Ok(handle)
    }

    fn check(&self, handle: ResourceHandle) -> Result<(), SceneError> {
        if self.ledger.borrow().live.contains(&handle) {
            Ok(())
        } else {
            Err(SceneError::UnknownResource(handle))
        }
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBackend for HeadlessBackend {
    fn resize(&mut self, size: SurfaceSize) -> Result<(), SceneError> {
        let mut ledger = self.ledger.borrow_mut();
        ledger.resizes += 1;
        ledger.size = Some(size);
        Ok(())
    }

    fn create_geometry(&mut self, _desc: &GeometryDesc) -> Result<ResourceHandle, SceneError> {
        self.allocate(ResourceKind::Geometry)
    }

    fn create_texture(&mut self, _desc: &TextureDesc) -> Result<ResourceHandle, SceneError> {
        self.allocate(ResourceKind::Texture)
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<ResourceHandle, SceneError> {
        self.check(desc.texture)?;
        self.allocate(ResourceKind::Material)
    }

    fn create_pass(&mut self, _pass: &PostPass) -> Result<ResourceHandle, SceneError> {
        self.allocate(ResourceKind::Pass)
    }

    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), SceneError> {
        for draw in frame.draws {
            self.check(draw.geometry)?;
            self.check(draw.material)?;
        }
        for &pass in frame.passes {
            self.check(pass)?;
        }

        let size = self.ledger.borrow().size;
        if size.is_none() {
            return Err(SceneError::FrameSkipped("surface not sized".into()));
        }

        self.ledger.borrow_mut().submissions.push(SubmissionRecord {
            aspect: frame.camera.aspect,
            camera_y: frame.camera.position.y,
            draws: frame.draws.len(),
            passes: frame.passes.len(),
            time: frame.uniforms.time,
            scroll_velocity: frame.uniforms.scroll_velocity,
            resolution: frame.uniforms.resolution,
        });
        Ok(())
    }

    fn release(&mut self, handle: ResourceHandle) {
        let mut ledger = self.ledger.borrow_mut();
        if ledger.live.remove(&handle) {
            ledger.released += 1;
        } else {
            ledger.double_releases += 1;
        }
    }
}
