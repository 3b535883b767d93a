//! The JavaScript-facing page builder handle.

use crate::dom::{DomContainers, ElementVisual};
use crate::frames::AnimationFrameScheduler;
use crate::style::{event_name, parse_direction, parse_handle, viewport_name};
use kurbo::{Point, Vec2};
use pagegrid_core::{
    CanvasId, DeleteRequest, DragController, GridConfig, ItemId, PageBuilder, PageDocument, PaletteDrop,
    PointerTarget, ResizeController, SelectRequest, StaticContainers,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;

struct Session {
    builder: PageBuilder,
    drag: Option<DragController<ElementVisual>>,
    resize: Option<ResizeController<ElementVisual>>,
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Page builder exported to JavaScript.
///
/// Pointer coordinates are page coordinates (`pageX`/`pageY`). Change
/// listeners run synchronously inside the call that caused the change and
/// must not call back into the handle.
#[wasm_bindgen]
pub struct PageBuilderHandle {
    session: Rc<RefCell<Session>>,
    frames: AnimationFrameScheduler,
}

impl PageBuilderHandle {
    /// Run `f` against the session, or return `fallback` when called from
    /// inside a change listener.
    fn with_session<R>(
        &mut self,
        fallback: R,
        f: impl FnOnce(&mut Session, &mut AnimationFrameScheduler) -> R,
    ) -> R {
        match self.session.try_borrow_mut() {
            Ok(mut session) => f(&mut *session, &mut self.frames),
            Err(_) => {
                log::warn!("Re-entrant call into PageBuilderHandle ignored");
                fallback
            }
        }
    }
}

#[wasm_bindgen]
impl PageBuilderHandle {
    /// Create a builder from saved JSON, or from the starter page.
    #[wasm_bindgen(constructor)]
    pub fn new(document_json: Option<String>, config_json: Option<String>) -> Result<PageBuilderHandle, JsValue> {
        let document = match document_json {
            Some(json) => PageDocument::from_json(&json).map_err(js_error)?,
            None => PageDocument::demo(),
        };
        let config = match config_json {
            Some(json) => GridConfig::from_json(&json).map_err(js_error)?,
            None => GridConfig::default(),
        };
        let builder = match DomContainers::new() {
            Some(containers) => PageBuilder::new(config, Box::new(containers), document),
            None => {
                log::warn!("No document available, container sizes will use fallbacks");
                PageBuilder::new(config, Box::new(StaticContainers::new()), document)
            }
        };

        let session = Rc::new(RefCell::new(Session {
            builder,
            drag: None,
            resize: None,
        }));
        let weak: Weak<RefCell<Session>> = Rc::downgrade(&session);
        let frames = AnimationFrameScheduler::new(move |frame| {
            let Some(session) = weak.upgrade() else {
                return;
            };
            let Ok(mut session) = session.try_borrow_mut() else {
                return;
            };
            if let Some(resize) = session.resize.as_mut() {
                resize.run_frame(frame);
            }
        });
        Ok(Self { session, frames })
    }

    /// Register a listener called with an event name after every change.
    pub fn on_change(&mut self, callback: js_sys::Function) {
        self.with_session((), |session, _| {
            session.builder.subscribe(move |event| {
                if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(event_name(event))) {
                    log::debug!("Change listener threw: {:?}", err);
                }
            });
        });
    }

    // --- Items ---

    pub fn drop_component(&mut self, canvas_id: String, component_type: String, x: f64, y: f64) -> Result<u64, JsValue> {
        self.with_session(Err(js_error("builder busy")), |session, _| {
            session
                .builder
                .drop_component(PaletteDrop {
                    canvas_id: CanvasId::new(canvas_id),
                    component_type,
                    x,
                    y,
                })
                .map(|id| id.0)
                .map_err(js_error)
        })
    }

    pub fn delete_item(&mut self, item_id: u64, canvas_id: String) -> bool {
        self.with_session(false, |session, _| {
            session.builder.delete_item(DeleteRequest {
                item_id: ItemId(item_id),
                canvas_id: CanvasId::new(canvas_id),
            })
        })
    }

    pub fn select_item(&mut self, item_id: u64, canvas_id: String) -> bool {
        self.with_session(false, |session, _| {
            session.builder.select_item(SelectRequest {
                item_id: ItemId(item_id),
                canvas_id: CanvasId::new(canvas_id),
            })
        })
    }

    pub fn clear_selection(&mut self) {
        self.with_session((), |session, _| session.builder.clear_selection());
    }

    /// Nudge the selection. `direction` is an arrow key name.
    pub fn nudge(&mut self, direction: &str, large: bool) -> bool {
        let Some(direction) = parse_direction(direction) else {
            return false;
        };
        self.with_session(false, |session, _| session.builder.nudge(direction, large))
    }

    /// Messages of live notifications, oldest first. Expired ones are
    /// dropped before reading.
    pub fn notifications(&mut self) -> js_sys::Array {
        self.with_session(js_sys::Array::new(), |session, _| {
            session.builder.prune_notifications();
            session
                .builder
                .store()
                .notifications()
                .iter()
                .map(|note| JsValue::from_str(&note.message))
                .collect()
        })
    }

    pub fn rename_item(&mut self, item_id: u64, canvas_id: String, name: String) -> bool {
        self.with_session(false, |session, _| {
            session.builder.rename_item(&CanvasId::new(canvas_id), ItemId(item_id), name)
        })
    }

    pub fn bring_to_front(&mut self, item_id: u64, canvas_id: String) -> bool {
        self.with_session(false, |session, _| {
            session.builder.bring_to_front(&CanvasId::new(canvas_id), ItemId(item_id))
        })
    }

    pub fn send_to_back(&mut self, item_id: u64, canvas_id: String) -> bool {
        self.with_session(false, |session, _| {
            session.builder.send_to_back(&CanvasId::new(canvas_id), ItemId(item_id))
        })
    }

    // --- Drag ---

    /// Pointer down on an item's drag handle.
    pub fn drag_start(&mut self, item_id: u64, element: web_sys::HtmlElement, x: f64, y: f64) -> bool {
        self.with_session(false, |session, _| {
            let mut drag = DragController::new(ItemId(item_id), ElementVisual::new(element));
            let started = drag.begin(
                PointerTarget::DragHandle,
                Point::new(x, y),
                session.builder.store(),
                session.builder.grid(),
            );
            if started {
                session.drag = Some(drag);
            }
            started
        })
    }

    pub fn drag_move(&mut self, x: f64, y: f64) {
        self.with_session((), |session, _| {
            if let Some(drag) = session.drag.as_mut() {
                drag.pointer_move(Point::new(x, y));
            }
        });
    }

    /// Pointer up. Returns true if the page changed.
    pub fn drag_end(&mut self, x: f64, y: f64) -> bool {
        self.with_session(false, |session, _| {
            let Some(mut drag) = session.drag.take() else {
                return false;
            };
            let outcome = drag.end(Point::new(x, y), session.builder.store(), session.builder.grid());
            session.builder.apply_drag_outcome(outcome)
        })
    }

    pub fn drag_cancel(&mut self) {
        self.with_session((), |session, _| {
            if let Some(mut drag) = session.drag.take() {
                drag.cancel();
            }
        });
    }

    // --- Resize ---

    /// Pointer down on a resize handle (`"nw"`, `"n"`, ... `"w"`).
    pub fn resize_start(&mut self, item_id: u64, element: web_sys::HtmlElement, handle: &str) -> bool {
        let Some(handle) = parse_handle(handle) else {
            return false;
        };
        self.with_session(false, |session, _| {
            let mut resize = ResizeController::new(ItemId(item_id), ElementVisual::new(element));
            let started = resize.begin(
                PointerTarget::ResizeHandle(handle),
                session.builder.store(),
                session.builder.grid(),
            );
            if started {
                session.resize = Some(resize);
            }
            started
        })
    }

    /// Pointer moved by `(dx, dy)` since the previous resize event.
    pub fn resize_move(&mut self, dx: f64, dy: f64) {
        self.with_session((), |session, frames| {
            let Session { builder, resize, .. } = session;
            if let Some(resize) = resize.as_mut() {
                resize.pointer_move_by(Vec2::new(dx, dy), builder.grid(), frames);
            }
        });
    }

    /// Pointer up. Returns true if the page changed.
    pub fn resize_end(&mut self) -> bool {
        self.with_session(false, |session, frames| {
            let Some(mut resize) = session.resize.take() else {
                return false;
            };
            let outcome = resize.end(session.builder.store(), session.builder.grid(), frames);
            session.builder.apply_resize_outcome(outcome)
        })
    }

    pub fn resize_cancel(&mut self) {
        self.with_session((), |session, frames| {
            if let Some(mut resize) = session.resize.take() {
                resize.cancel(frames);
            }
        });
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.with_session(false, |session, _| session.builder.undo())
    }

    pub fn redo(&mut self) -> bool {
        self.with_session(false, |session, _| session.builder.redo())
    }

    pub fn can_undo(&self) -> bool {
        self.session.try_borrow().is_ok_and(|s| s.builder.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.session.try_borrow().is_ok_and(|s| s.builder.can_redo())
    }

    // --- Sections and view ---

    /// Add an empty section and return its id.
    pub fn add_section(&mut self) -> Option<String> {
        self.with_session(None, |session, _| Some(session.builder.add_section().0))
    }

    pub fn remove_section(&mut self, canvas_id: String) -> bool {
        self.with_session(false, |session, _| session.builder.remove_section(&CanvasId::new(canvas_id)))
    }

    pub fn set_section_background(&mut self, canvas_id: String, color: String) -> bool {
        self.with_session(false, |session, _| {
            session
                .builder
                .set_section_background(&CanvasId::new(canvas_id), color)
        })
    }

    /// A canvas container was resized. Without an id every cached width is
    /// dropped.
    pub fn container_resized(&mut self, canvas_id: Option<String>) {
        self.with_session((), |session, _| {
            let canvas_id = canvas_id.map(CanvasId::new);
            session.builder.container_resized(canvas_id.as_ref());
        });
    }

    /// Switch viewport and return the new one (`"desktop"` or `"mobile"`).
    pub fn toggle_viewport(&mut self) -> Option<String> {
        self.with_session(None, |session, _| {
            Some(viewport_name(session.builder.toggle_viewport()).to_string())
        })
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.with_session(false, |session, _| session.builder.toggle_grid())
    }

    /// Canvas height in pixels for the active viewport.
    pub fn canvas_height(&self, canvas_id: String) -> Option<f64> {
        let session = self.session.try_borrow().ok()?;
        session.builder.canvas_height_px(&CanvasId::new(canvas_id))
    }

    // --- Save / restore ---

    pub fn export_state(&self) -> Result<String, JsValue> {
        let session = self.session.try_borrow().map_err(js_error)?;
        session.builder.export_state().map_err(js_error)
    }

    pub fn import_state(&mut self, json: String) -> Result<(), JsValue> {
        self.with_session(Err(js_error("builder busy")), |session, _| {
            session.builder.import_state(&json).map_err(js_error)
        })
    }
}
