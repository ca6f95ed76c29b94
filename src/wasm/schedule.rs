//! Browser schedulers: `requestAnimationFrame` for frames, `setTimeout`
//! (through gloo-timers) for staggered start-up.
//!
//! Both schedulers are created before the pool they feed, so the callback
//! into the pool is installed afterwards with `set_dispatch`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::backend::{FrameHandle, FrameScheduler, StartupScheduler};
use crate::error::SurfaceError;

use super::render::describe;

type FrameDispatch = Rc<dyn Fn(&str, f64)>;
type StartupDispatch = Rc<dyn Fn(&str)>;

/// One persistent animation-frame closure per target.
pub struct RafScheduler {
    window: Window,
    dispatch: Rc<RefCell<Option<FrameDispatch>>>,
    callbacks: RefCell<HashMap<String, Closure<dyn FnMut(f64)>>>,
}

impl RafScheduler {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self {
            window,
            dispatch: Rc::new(RefCell::new(None)),
            callbacks: RefCell::new(HashMap::new()),
        }
    }

    /// Install the receiver for delivered frames.
    pub fn set_dispatch(&self, dispatch: impl Fn(&str, f64) + 'static) {
        *self.dispatch.borrow_mut() = Some(Rc::new(dispatch));
    }

    fn callback_for(&self, target: &str) -> Closure<dyn FnMut(f64)> {
        let dispatch = Rc::clone(&self.dispatch);
        let target = target.to_owned();
        Closure::wrap(Box::new(move |now_ms: f64| {
            // Clone out of the cell so the receiver may request the next frame.
            let receiver = dispatch.borrow().clone();
            if let Some(receiver) = receiver {
                receiver(&target, now_ms);
            }
        }) as Box<dyn FnMut(f64)>)
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, target: &str) -> Result<FrameHandle, SurfaceError> {
        let mut callbacks = self.callbacks.borrow_mut();
        if !callbacks.contains_key(target) {
            let callback = self.callback_for(target);
            callbacks.insert(target.to_owned(), callback);
        }
        let Some(callback) = callbacks.get(target) else {
            return Err(SurfaceError::FrameRequestFailed {
                target: target.to_owned(),
                reason: "no frame callback".to_owned(),
            });
        };
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| SurfaceError::FrameRequestFailed {
                target: target.to_owned(),
                reason: describe(&e),
            })
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::debug!("cancelAnimationFrame failed: {}", describe(&e));
        }
    }

    fn release(&self, target: &str) {
        self.callbacks.borrow_mut().remove(target);
    }
}

/// Pending start-up timers; dropping a [`Timeout`] cancels it.
pub struct TimeoutScheduler {
    dispatch: Rc<RefCell<Option<StartupDispatch>>>,
    timers: RefCell<Vec<Timeout>>,
}

impl Default for TimeoutScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeoutScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dispatch: Rc::new(RefCell::new(None)),
            timers: RefCell::new(Vec::new()),
        }
    }

    pub fn set_dispatch(&self, dispatch: impl Fn(&str) + 'static) {
        *self.dispatch.borrow_mut() = Some(Rc::new(dispatch));
    }
}

impl StartupScheduler for TimeoutScheduler {
    fn schedule(&self, target: &str, delay_ms: u32) {
        let dispatch = Rc::clone(&self.dispatch);
        let target = target.to_owned();
        let timer = Timeout::new(delay_ms, move || {
            let receiver = dispatch.borrow().clone();
            if let Some(receiver) = receiver {
                receiver(&target);
            }
        });
        self.timers.borrow_mut().push(timer);
    }

    fn cancel_all(&self) {
        let cancelled = self.timers.borrow_mut().drain(..).count();
        log::debug!("cancelled {cancelled} start-up timers");
    }
}
