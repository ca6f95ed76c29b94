//! Registry of every animated surface on the page.
//!
//! The pool creates the hero surface immediately and the secondary surfaces
//! one at a time through a [`StartupScheduler`], so start-up never builds
//! every context in the same task. A surface that cannot be created is
//! logged, recorded in [`SurfacePool::failures`] and skipped; the rest of the
//! page carries on.

use std::collections::HashMap;
use std::rc::Rc;

use rand::rngs::SmallRng;

use crate::backend::{FrameScheduler, RenderHost, StartupScheduler};
use crate::config::{PoolConfig, SurfaceSpec};
use crate::error::SurfaceError;
use crate::surface::RenderSurfaceBinding;

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;

/// A surface that could not be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceFailure {
    pub target: String,
    pub error: SurfaceError,
}

pub struct SurfacePool<H: RenderHost> {
    host: H,
    frames: Rc<dyn FrameScheduler>,
    startup: Rc<dyn StartupScheduler>,
    rng: SmallRng,
    config: PoolConfig,
    bindings: HashMap<String, RenderSurfaceBinding<H::Renderer>>,
    pending: HashMap<String, SurfaceSpec>,
    /// Last intersection report per target, kept for surfaces not created yet.
    intersecting: HashMap<String, bool>,
    failures: Vec<SurfaceFailure>,
    document_visible: bool,
    reduced_motion: bool,
    graphics_reported: bool,
    started: bool,
    disposed: bool,
}

impl<H: RenderHost> SurfacePool<H> {
    pub fn new(
        host: H,
        frames: Rc<dyn FrameScheduler>,
        startup: Rc<dyn StartupScheduler>,
        config: PoolConfig,
        rng: SmallRng,
    ) -> Self {
        Self {
            host,
            frames,
            startup,
            rng,
            config,
            bindings: HashMap::new(),
            pending: HashMap::new(),
            intersecting: HashMap::new(),
            failures: Vec::new(),
            document_visible: true,
            reduced_motion: false,
            graphics_reported: false,
            started: false,
            disposed: false,
        }
    }

    /// Create the hero surface now and schedule the secondary surfaces.
    ///
    /// Runs once; later calls are ignored.
    pub fn init(&mut self) {
        if self.started || self.disposed {
            return;
        }
        self.started = true;

        if let Some(hero) = self.config.hero.clone() {
            self.create_surface(&hero);
        }

        let secondary = self.config.secondary.clone();
        for (index, spec) in secondary.into_iter().enumerate() {
            if self.bindings.contains_key(&spec.target) || self.pending.contains_key(&spec.target) {
                log::warn!("surface `{}` listed twice; keeping the first", spec.target);
                continue;
            }
            let delay = self.config.delay_for(index);
            self.startup.schedule(&spec.target, delay);
            self.pending.insert(spec.target.clone(), spec);
        }
        log::info!(
            "surface pool started: {} live, {} pending, {} failed",
            self.bindings.len(),
            self.pending.len(),
            self.failures.len()
        );
    }

    /// Create a surface whose staggered start time has come.
    ///
    /// Returns whether a surface was created. Targets that are not pending,
    /// and every target once the pool is disposed, are ignored.
    pub fn create_pending(&mut self, target: &str) -> bool {
        if self.disposed {
            return false;
        }
        let Some(spec) = self.pending.remove(target) else {
            return false;
        };
        self.create_surface(&spec)
    }

    fn create_surface(&mut self, spec: &SurfaceSpec) -> bool {
        if self.bindings.contains_key(&spec.target) {
            log::warn!("surface `{}` already exists", spec.target);
            return false;
        }
        let mut binding = match RenderSurfaceBinding::create(
            &mut self.host,
            Rc::clone(&self.frames),
            &spec.target,
            spec.palette(),
        ) {
            Ok(binding) => binding,
            Err(error) => {
                self.record_failure(&spec.target, error);
                return false;
            }
        };

        for (kind, options) in spec.mix.plan(&mut self.rng) {
            if let Err(err) = binding.add_object_with(&mut self.rng, kind, options) {
                log::warn!("{err}");
                break;
            }
        }

        binding.set_document_visible(self.document_visible);
        if let Some(&intersecting) = self.intersecting.get(&spec.target) {
            binding.set_intersecting(intersecting);
        }
        if self.reduced_motion {
            binding.freeze();
        }

        log::debug!(
            "surface `{}` created with {} objects",
            spec.target,
            binding.object_count()
        );
        self.bindings.insert(spec.target.clone(), binding);
        true
    }

    fn record_failure(&mut self, target: &str, error: SurfaceError) {
        if error.is_global() {
            if !self.graphics_reported {
                log::warn!("{error}; decorative surfaces will not animate");
                self.graphics_reported = true;
            }
        } else {
            log::warn!("skipping surface `{target}`: {error}");
        }
        self.failures.push(SurfaceFailure {
            target: target.to_owned(),
            error,
        });
    }

    // --- Bulk control ---

    pub fn pause_all(&mut self) {
        for binding in self.bindings.values_mut() {
            binding.pause();
        }
    }

    pub fn play_all(&mut self) {
        for binding in self.bindings.values_mut() {
            binding.play();
        }
    }

    pub fn resize_all(&mut self) {
        for binding in self.bindings.values_mut() {
            binding.resize();
        }
    }

    /// Dispose every surface and stop pending creation. Safe to repeat.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.startup.cancel_all();
        self.pending.clear();
        let count = self.bindings.len();
        for (_, mut binding) in self.bindings.drain() {
            binding.dispose();
        }
        log::info!("surface pool disposed ({count} surfaces)");
    }

    // --- Host events ---

    /// Route a delivered frame to its surface.
    pub fn on_frame(&mut self, target: &str, now_ms: f64) {
        if let Some(binding) = self.bindings.get_mut(target) {
            binding.on_frame(now_ms);
        }
    }

    /// The page moved to the foreground (`true`) or background (`false`).
    pub fn set_document_visible(&mut self, visible: bool) {
        self.document_visible = visible;
        for binding in self.bindings.values_mut() {
            binding.set_document_visible(visible);
        }
    }

    /// `target` moved on-screen (`true`) or off-screen (`false`).
    pub fn set_intersecting(&mut self, target: &str, intersecting: bool) {
        if self.disposed {
            return;
        }
        self.intersecting.insert(target.to_owned(), intersecting);
        if let Some(binding) = self.bindings.get_mut(target) {
            binding.set_intersecting(intersecting);
        }
    }

    /// Switch every current and future surface to still frames.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        if !reduced || self.reduced_motion {
            return;
        }
        self.reduced_motion = true;
        for binding in self.bindings.values_mut() {
            binding.freeze();
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.bindings.contains_key(target)
    }

    #[must_use]
    pub fn get(&self, target: &str) -> Option<&RenderSurfaceBinding<H::Renderer>> {
        self.bindings.get(target)
    }

    pub fn get_mut(&mut self, target: &str) -> Option<&mut RenderSurfaceBinding<H::Renderer>> {
        self.bindings.get_mut(target)
    }

    /// Targets registered so far, in no particular order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn failures(&self) -> &[SurfaceFailure] {
        &self.failures
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }
}
