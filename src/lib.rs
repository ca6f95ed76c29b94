//! Decorative 3D shapes for a scroll-driven marketing page.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns a
//! pool of canvases, each animating a handful of randomly generated
//! primitive shapes, and pauses every canvas that is off-screen or sits in a
//! background tab. The animation core is platform independent and tested on
//! the host; the browser glue in `wasm` is only built for `wasm32`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`pool`] | Registry of all surfaces, staggered start-up, bulk control |
//! | [`surface`] | One canvas binding and its play/pause frame loop |
//! | [`visibility`] | Foreground + on-screen gate |
//! | [`animation`] | Per-frame motion and the frame clock |
//! | [`factory`] | Randomized object parameters |
//! | [`geometry`] | Triangle meshes for the primitives |
//! | [`shape`] | Shape kinds and construction options |
//! | [`backend`] | Traits the host implements (renderer, schedulers) |
//! | [`config`] | Page layout and tuning, loadable from JSON |
//! | [`color`] | RGB/HSL colors and palettes |
//! | [`error`] | [`error::SurfaceError`] |
//! | [`consts`] | Shared numeric constants |

pub mod animation;
pub mod backend;
pub mod color;
pub mod config;
pub mod consts;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod pool;
pub mod shape;
pub mod surface;
pub mod visibility;

#[cfg(test)]
pub(crate) mod testing;

// Only compile browser-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod page;
    pub mod render;
    pub mod schedule;
    pub mod visibility;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let (config, config_error) = page::read_config(&document);
        console_log::init_with_level(config.log_level()).ok();
        if let Some(err) = config_error {
            log::warn!("ignoring page config: {err}");
        }

        page::mount(&window, &document, config)?;
        Ok(())
    }
}
