//! One rendering context bound to one drawable target, and its frame loop.
//!
//! ## Loop states
//!
//! A binding is either [`LoopState::Running`] or [`LoopState::Paused`]. While
//! running it holds at most one outstanding frame request; while paused it
//! holds none. Each delivered frame advances every object, drifts the camera,
//! presents, and then requests the next frame if still running. Pausing
//! cancels the outstanding request and resuming issues a new one; transforms
//! are never reset.

use std::rc::Rc;

use rand::Rng;

use crate::animation::{advance_object, camera_drift, FrameClock, LoopState};
use crate::backend::{Camera, FrameHandle, FrameScheduler, LightRig, RenderHost, Renderer};
use crate::color::Palette;
use crate::error::SurfaceError;
use crate::factory::{build_object, DecorativeObject, ObjectId};
use crate::shape::{ObjectOptions, ShapeKind};
use crate::visibility::{Directive, VisibilityGate};

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

pub struct RenderSurfaceBinding<R: Renderer> {
    target: String,
    palette: Palette,
    renderer: R,
    camera: Camera,
    objects: Vec<DecorativeObject<R::Mesh>>,
    next_id: u32,
    state: LoopState,
    frame: Option<FrameHandle>,
    clock: FrameClock,
    gate: VisibilityGate,
    scheduler: Rc<dyn FrameScheduler>,
    frozen: bool,
    disposed: bool,
}

impl<R: Renderer> RenderSurfaceBinding<R> {
    /// Bind a new rendering context to `target` and start its loop.
    ///
    /// The camera sits at its default distance, the default light rig is
    /// installed and the output is sized to the target's visible area.
    ///
    /// # Errors
    ///
    /// Whatever the host reports when it cannot bind `target`; callers skip
    /// the surface rather than aborting.
    pub fn create<H>(
        host: &mut H,
        scheduler: Rc<dyn FrameScheduler>,
        target: &str,
        palette: Palette,
    ) -> Result<Self, SurfaceError>
    where
        H: RenderHost<Renderer = R>,
    {
        let renderer = host.create_renderer(target, &LightRig::default())?;
        let mut binding = Self {
            target: target.to_owned(),
            palette,
            renderer,
            camera: Camera::default(),
            objects: Vec::new(),
            next_id: 0,
            state: LoopState::Paused,
            frame: None,
            clock: FrameClock::default(),
            gate: VisibilityGate::default(),
            scheduler,
            frozen: false,
            disposed: false,
        };
        binding.resize();
        binding.play();
        log::debug!("surface `{target}` bound");
        Ok(binding)
    }

    /// Match the camera aspect and output size to the target's visible size.
    pub fn resize(&mut self) {
        if self.disposed {
            return;
        }
        let viewport = self.renderer.visible_size();
        self.camera.aspect = viewport.aspect();
        self.renderer.set_viewport(viewport);
        // Resizing the output clears it; a frozen surface has no next frame.
        if self.frozen {
            self.step(self.clock.elapsed());
        }
    }

    /// Add one object. Without `kind` the shape is chosen uniformly at random;
    /// without `size` the default size applies.
    ///
    /// # Errors
    ///
    /// The renderer's failure to allocate the mesh.
    pub fn add_object<G: Rng + ?Sized>(
        &mut self,
        rng: &mut G,
        kind: Option<ShapeKind>,
        size: Option<f32>,
    ) -> Result<ObjectId, SurfaceError> {
        let kind = kind.unwrap_or_else(|| ShapeKind::random(rng));
        let options = size.map_or_else(ObjectOptions::default, ObjectOptions::with_size);
        self.add_object_with(rng, kind, options)
    }

    /// Add one object with explicit options.
    ///
    /// # Errors
    ///
    /// The renderer's failure to allocate the mesh.
    pub fn add_object_with<G: Rng + ?Sized>(
        &mut self,
        rng: &mut G,
        kind: ShapeKind,
        options: ObjectOptions,
    ) -> Result<ObjectId, SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::TargetNotFound {
                target: self.target.clone(),
            });
        }
        let id = ObjectId(self.next_id);
        let object = build_object(&mut self.renderer, rng, &self.palette, id, kind, options)?;
        self.next_id += 1;
        self.objects.push(object);
        Ok(id)
    }

    /// Remove one object and release its mesh. Returns whether it existed.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.objects.iter().position(|o| o.id() == id) else {
            return false;
        };
        let object = self.objects.remove(index);
        self.renderer.dispose_mesh(object.into_mesh());
        true
    }

    /// Resume the loop. No-op while already running, frozen or disposed.
    pub fn play(&mut self) {
        if self.disposed || self.frozen {
            return;
        }
        self.state = LoopState::Running;
        if self.frame.is_none() {
            self.request_frame();
        }
    }

    /// Stop the loop and cancel the outstanding frame, if any.
    pub fn pause(&mut self) {
        self.state = LoopState::Paused;
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.clock.suspend();
    }

    /// Present one frame at the current animation time and stay paused for good.
    ///
    /// Used when the visitor asks for reduced motion.
    pub fn freeze(&mut self) {
        if self.disposed {
            return;
        }
        self.pause();
        self.frozen = true;
        self.step(self.clock.elapsed());
    }

    /// Deliver a frame requested earlier. `now_ms` is the host's frame timestamp.
    pub fn on_frame(&mut self, now_ms: f64) {
        if self.disposed || self.state == LoopState::Paused {
            return;
        }
        self.frame = None;
        let elapsed = self.clock.tick(now_ms);
        self.step(elapsed);
        if self.state == LoopState::Running {
            self.request_frame();
        }
    }

    pub fn set_document_visible(&mut self, visible: bool) {
        let directive = self.gate.set_document_visible(visible);
        self.apply(directive);
    }

    pub fn set_intersecting(&mut self, intersecting: bool) {
        let directive = self.gate.set_intersecting(intersecting);
        self.apply(directive);
    }

    /// Pause, release every object and then the context. Safe to repeat.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.pause();
        for object in self.objects.drain(..) {
            self.renderer.dispose_mesh(object.into_mesh());
        }
        self.renderer.release();
        self.scheduler.release(&self.target);
        self.disposed = true;
        log::debug!("surface `{}` disposed", self.target);
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Play => self.play(),
            Directive::Pause => self.pause(),
        }
    }

    fn step(&mut self, elapsed: f32) {
        for (index, object) in self.objects.iter_mut().enumerate() {
            let size = object.size();
            let profile = *object.profile();
            let color = advance_object(&mut object.transform, &profile, size, index, elapsed);
            object.set_display_color(color);
            self.renderer.update_mesh(&object.mesh, &object.transform, color);
        }
        camera_drift(&mut self.camera, elapsed);
        self.renderer.present(&self.camera);
    }

    fn request_frame(&mut self) {
        match self.scheduler.request_frame(&self.target) {
            Ok(handle) => self.frame = Some(handle),
            Err(err) => {
                log::warn!("{err}; pausing surface");
                self.state = LoopState::Paused;
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub fn objects(&self) -> &[DecorativeObject<R::Mesh>] {
        &self.objects
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.frame.is_some()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn gate(&self) -> &VisibilityGate {
        &self.gate
    }

    /// Animation time in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

impl<R: Renderer> Drop for RenderSurfaceBinding<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}
