//! PageGrid browser bindings.
//!
//! Backs the core's platform seams with the DOM: container geometry comes
//! from `getBoundingClientRect`, gesture visuals are written straight to
//! element styles, and resize updates are scheduled with
//! `requestAnimationFrame`. [`PageBuilderHandle`] is the surface exported to
//! JavaScript.

pub mod style;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frames;
#[cfg(target_arch = "wasm32")]
mod handle;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomContainers, ElementVisual};
#[cfg(target_arch = "wasm32")]
pub use frames::AnimationFrameScheduler;
#[cfg(target_arch = "wasm32")]
pub use handle::PageBuilderHandle;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Module entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already initialized: {}", err).into());
    }

    log::info!("Starting PageGrid (WASM)");
}
