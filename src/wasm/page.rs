//! Wires the surface pool into the page: config, schedulers, visibility
//! signals, resize and teardown.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, IntersectionObserver, Window};

use crate::config::PoolConfig;
use crate::pool::SurfacePool;

use super::render::{describe, WebGlHost};
use super::schedule::{RafScheduler, TimeoutScheduler};
use super::visibility;

/// Id of the `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "decor-config";

pub type PagePool = SurfacePool<WebGlHost>;

/// Read the page's config overrides.
///
/// Returns the defaults when the page has no config element, and the
/// defaults plus the parse error when the element holds invalid JSON.
#[must_use]
pub fn read_config(document: &Document) -> (PoolConfig, Option<serde_json::Error>) {
    let text = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    match text {
        None => (PoolConfig::default(), None),
        Some(text) => match PoolConfig::from_json(&text) {
            Ok(config) => (config, None),
            Err(err) => (PoolConfig::default(), Some(err)),
        },
    }
}

/// Run `f` against the pool if it is still alive and not already borrowed.
///
/// Events arriving while the pool is busy are dropped.
pub(crate) fn with_pool(pool: &Weak<RefCell<PagePool>>, f: impl FnOnce(&mut PagePool)) {
    let Some(pool) = pool.upgrade() else {
        return;
    };
    match pool.try_borrow_mut() {
        Ok(mut pool) => f(&mut pool),
        Err(_) => log::debug!("surface pool busy; event dropped"),
    };
}

/// Build the pool, start it and attach every page listener.
///
/// A listener that cannot be attached is logged and skipped; the pool keeps
/// running without it.
///
/// # Errors
///
/// Fails only when the teardown listener cannot be attached, before any
/// surface is created.
pub fn mount(window: &Window, document: &Document, config: PoolConfig) -> Result<(), JsValue> {
    let threshold = config.visibility_threshold;
    let respect_reduced_motion = config.respect_reduced_motion;
    let targets: Vec<String> = config
        .hero
        .iter()
        .chain(config.secondary.iter())
        .map(|spec| spec.target.clone())
        .collect();

    let frames = Rc::new(RafScheduler::new(window.clone()));
    let startup = Rc::new(TimeoutScheduler::new());
    let host = WebGlHost::new(document.clone(), window.device_pixel_ratio());
    let rng = SmallRng::seed_from_u64(random_seed());
    let pool = Rc::new(RefCell::new(SurfacePool::new(
        host,
        frames.clone(),
        startup.clone(),
        config,
        rng,
    )));

    let weak = Rc::downgrade(&pool);
    frames.set_dispatch(move |target, now_ms| {
        with_pool(&weak, |pool| pool.on_frame(target, now_ms));
    });
    let weak = Rc::downgrade(&pool);
    startup.set_dispatch(move |target| {
        with_pool(&weak, |pool| {
            pool.create_pending(target);
        });
    });

    // The teardown listener owns the pool for the rest of the page's life.
    let observer: Rc<RefCell<Option<IntersectionObserver>>> = Rc::new(RefCell::new(None));
    let on_pagehide = {
        let pool = Rc::clone(&pool);
        let observer = Rc::clone(&observer);
        Closure::wrap(Box::new(move || {
            if let Some(observer) = observer.borrow_mut().take() {
                observer.disconnect();
            }
            match pool.try_borrow_mut() {
                Ok(mut pool) => pool.dispose(),
                Err(_) => log::warn!("surface pool busy during pagehide; not disposed"),
            }
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())?;
    on_pagehide.forget();

    {
        let mut pool = pool.borrow_mut();
        pool.set_document_visible(!document.hidden());
        if respect_reduced_motion && visibility::prefers_reduced_motion(window) {
            pool.set_reduced_motion(true);
        }
        pool.init();
    }

    if let Err(err) = visibility::watch_document(document, Rc::downgrade(&pool)) {
        log::warn!("not tracking page visibility: {}", describe(&err));
    }
    if respect_reduced_motion {
        if let Err(err) = visibility::watch_reduced_motion(window, Rc::downgrade(&pool)) {
            log::warn!("not tracking reduced motion: {}", describe(&err));
        }
    }
    match visibility::observe_targets(document, &targets, threshold, Rc::downgrade(&pool)) {
        Ok(created) => *observer.borrow_mut() = Some(created),
        // Without an observer every surface counts as on-screen.
        Err(err) => {
            log::warn!("not tracking surface visibility: {}", describe(&err));
            let mut pool = pool.borrow_mut();
            for target in &targets {
                pool.set_intersecting(target, true);
            }
        }
    }

    let weak = Rc::downgrade(&pool);
    let on_resize = Closure::wrap(Box::new(move || {
        with_pool(&weak, PagePool::resize_all);
    }) as Box<dyn FnMut()>);
    match window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref()) {
        Ok(()) => on_resize.forget(),
        Err(err) => log::warn!("not tracking resizes: {}", describe(&err)),
    }

    Ok(())
}

fn random_seed() -> u64 {
    // 53 bits is all the precision Math.random carries.
    (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64
}
