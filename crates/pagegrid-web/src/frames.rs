//! `requestAnimationFrame` scheduling.

use pagegrid_core::{FrameHandle, FrameScheduler};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Schedules frames with the browser and invokes `on_frame` with the
/// handle of each frame that fires.
pub struct AnimationFrameScheduler {
    on_frame: Rc<dyn Fn(FrameHandle)>,
}

impl AnimationFrameScheduler {
    pub fn new(on_frame: impl Fn(FrameHandle) + 'static) -> Self {
        Self {
            on_frame: Rc::new(on_frame),
        }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let Some(window) = web_sys::window() else {
            return FrameHandle(0);
        };
        // The id is only known once the request returns.
        let id = Rc::new(Cell::new(0));
        let callback = {
            let id = id.clone();
            let on_frame = self.on_frame.clone();
            Closure::once_into_js(move || on_frame(FrameHandle(id.get())))
        };
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(raw) => {
                id.set(raw as u64);
                FrameHandle(raw as u64)
            }
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {:?}", err);
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = window.cancel_animation_frame(handle.0 as i32) {
            log::debug!("cancelAnimationFrame failed: {:?}", err);
        }
    }
}
