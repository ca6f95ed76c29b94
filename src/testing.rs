//! In-memory hosts and schedulers for unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use crate::backend::{
    Camera, FrameHandle, FrameScheduler, LightRig, RenderHost, Renderer, StartupScheduler,
    Transform, Viewport,
};
use crate::color::Rgb;
use crate::error::SurfaceError;
use crate::geometry::Geometry;

/// What a [`FakeRenderer`] has been asked to do.
#[derive(Debug, Default)]
pub struct RendererLog {
    pub size: Viewport,
    pub viewport: Option<Viewport>,
    pub live: BTreeMap<u32, (Geometry, Transform, Rgb)>,
    pub next_mesh: u32,
    pub disposed_meshes: usize,
    pub presents: usize,
    pub last_camera: Option<Camera>,
    pub released: usize,
    pub fail_meshes: bool,
}

pub struct FakeRenderer {
    target: String,
    log: Rc<RefCell<RendererLog>>,
}

impl FakeRenderer {
    pub fn new(target: &str, size: Viewport) -> (Self, Rc<RefCell<RendererLog>>) {
        let log = Rc::new(RefCell::new(RendererLog {
            size,
            ..RendererLog::default()
        }));
        let renderer = Self {
            target: target.to_owned(),
            log: Rc::clone(&log),
        };
        (renderer, log)
    }
}

impl Renderer for FakeRenderer {
    type Mesh = u32;

    fn visible_size(&self) -> Viewport {
        self.log.borrow().size
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.log.borrow_mut().viewport = Some(viewport);
    }

    fn create_mesh(&mut self, geometry: &Geometry, color: Rgb) -> Result<u32, SurfaceError> {
        let mut log = self.log.borrow_mut();
        if log.fail_meshes {
            return Err(SurfaceError::ResourceAllocationFailed {
                target: self.target.clone(),
                reason: "out of memory".into(),
            });
        }
        let id = log.next_mesh;
        log.next_mesh += 1;
        log.live.insert(id, (*geometry, Transform::default(), color));
        Ok(id)
    }

    fn update_mesh(&mut self, mesh: &u32, transform: &Transform, color: Rgb) {
        if let Some(entry) = self.log.borrow_mut().live.get_mut(mesh) {
            entry.1 = *transform;
            entry.2 = color;
        }
    }

    fn dispose_mesh(&mut self, mesh: u32) {
        let mut log = self.log.borrow_mut();
        if log.live.remove(&mesh).is_some() {
            log.disposed_meshes += 1;
        }
    }

    fn present(&mut self, camera: &Camera) {
        let mut log = self.log.borrow_mut();
        log.presents += 1;
        log.last_camera = Some(*camera);
    }

    fn release(&mut self) {
        self.log.borrow_mut().released += 1;
    }
}

/// A page with a fixed set of drawable targets.
pub struct FakeHost {
    pub drawable: HashSet<String>,
    pub broken: HashSet<String>,
    pub graphics: bool,
    pub logs: HashMap<String, Rc<RefCell<RendererLog>>>,
    pub attempts: Vec<String>,
}

impl FakeHost {
    pub fn with_targets(targets: &[&str]) -> Self {
        Self {
            drawable: targets.iter().map(|t| (*t).to_owned()).collect(),
            broken: HashSet::new(),
            graphics: true,
            logs: HashMap::new(),
            attempts: Vec::new(),
        }
    }

    pub fn log(&self, target: &str) -> Rc<RefCell<RendererLog>> {
        Rc::clone(&self.logs[target])
    }
}

impl RenderHost for FakeHost {
    type Renderer = FakeRenderer;

    fn create_renderer(
        &mut self,
        target: &str,
        _lights: &LightRig,
    ) -> Result<FakeRenderer, SurfaceError> {
        self.attempts.push(target.to_owned());
        if !self.graphics {
            return Err(SurfaceError::GraphicsUnavailable);
        }
        if !self.drawable.contains(target) {
            return Err(SurfaceError::TargetNotFound {
                target: target.to_owned(),
            });
        }
        if self.broken.contains(target) {
            return Err(SurfaceError::ContextCreationFailed {
                target: target.to_owned(),
                reason: "context lost".into(),
            });
        }
        let (renderer, log) = FakeRenderer::new(target, Viewport::new(800, 600));
        self.logs.insert(target.to_owned(), log);
        Ok(renderer)
    }
}

/// Frame scheduler that only fires when the test says so.
#[derive(Default)]
pub struct FakeFrames {
    next: RefCell<i32>,
    pub pending: RefCell<BTreeMap<i32, String>>,
    pub cancelled: RefCell<Vec<i32>>,
    pub released: RefCell<Vec<String>>,
    pub fail: RefCell<bool>,
}

impl FakeFrames {
    pub fn pending_for(&self, target: &str) -> usize {
        self.pending.borrow().values().filter(|t| *t == target).count()
    }

    /// Remove and return every pending request, oldest first.
    pub fn take_all(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.borrow_mut()).into_values().collect()
    }
}

impl FrameScheduler for FakeFrames {
    fn request_frame(&self, target: &str) -> Result<FrameHandle, SurfaceError> {
        if *self.fail.borrow() {
            return Err(SurfaceError::FrameRequestFailed {
                target: target.to_owned(),
                reason: "refused".into(),
            });
        }
        let mut next = self.next.borrow_mut();
        *next += 1;
        self.pending.borrow_mut().insert(*next, target.to_owned());
        Ok(FrameHandle(*next))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().remove(&handle.0);
        self.cancelled.borrow_mut().push(handle.0);
    }

    fn release(&self, target: &str) {
        self.released.borrow_mut().push(target.to_owned());
    }
}

/// Startup scheduler that records delays instead of waiting.
#[derive(Default)]
pub struct FakeStartup {
    pub scheduled: RefCell<Vec<(String, u32)>>,
    pub cancelled: RefCell<usize>,
}

impl StartupScheduler for FakeStartup {
    fn schedule(&self, target: &str, delay_ms: u32) {
        self.scheduled.borrow_mut().push((target.to_owned(), delay_ms));
    }

    fn cancel_all(&self) {
        *self.cancelled.borrow_mut() += 1;
    }
}
