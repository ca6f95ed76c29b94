//! Page and viewport visibility signals feeding the pool.

use std::cell::RefCell;
use std::rc::Weak;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use crate::visibility::meets_threshold;

use super::page::{with_pool, PagePool};

/// Forward `visibilitychange` to [`PagePool::set_document_visible`].
pub fn watch_document(document: &Document, pool: Weak<RefCell<PagePool>>) -> Result<(), JsValue> {
    let doc = document.clone();
    let on_change = Closure::wrap(Box::new(move || {
        let visible = !doc.hidden();
        log::debug!("document visible: {visible}");
        with_pool(&pool, |pool| pool.set_document_visible(visible));
    }) as Box<dyn FnMut()>);
    document
        .add_event_listener_with_callback("visibilitychange", on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}

/// Observe every target element and report when each crosses `threshold`.
///
/// Targets missing from the document are skipped; the pool reports those
/// itself when it tries to create them.
pub fn observe_targets(
    document: &Document,
    targets: &[String],
    threshold: f64,
    pool: Weak<RefCell<PagePool>>,
) -> Result<IntersectionObserver, JsValue> {
    let report = move |entries: js_sys::Array, _: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let target = entry.target().id();
            let intersecting = meets_threshold(entry.intersection_ratio(), threshold);
            with_pool(&pool, |pool| pool.set_intersecting(&target, intersecting));
        }
    };
    let on_intersect =
        Closure::wrap(Box::new(report) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)?;
    on_intersect.forget();

    for target in targets {
        match document.get_element_by_id(target) {
            Some(element) => observer.observe(&element),
            None => log::debug!("not observing `{target}`: no such element"),
        }
    }
    Ok(observer)
}

/// Whether the user asked for reduced motion; `false` when the query is unsupported.
#[must_use]
pub fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}

/// Freeze the pool if the reduced-motion preference is switched on later.
pub fn watch_reduced_motion(window: &Window, pool: Weak<RefCell<PagePool>>) -> Result<(), JsValue> {
    let Some(query) = window.match_media("(prefers-reduced-motion: reduce)")? else {
        return Ok(());
    };
    let watched = query.clone();
    let on_change = Closure::wrap(Box::new(move || {
        let reduced = watched.matches();
        with_pool(&pool, |pool| pool.set_reduced_motion(reduced));
    }) as Box<dyn FnMut()>);
    query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}
