//! DOM-backed container geometry and gesture visuals.

use crate::style::{canvas_selector, frame_properties, translate};
use kurbo::{Rect, Vec2};
use pagegrid_core::{CanvasId, ContainerMetrics, VisualTarget};
use web_sys::{CssStyleDeclaration, Document, HtmlElement};

/// Reads canvas containers (`[data-canvas-id]` elements) from the page.
///
/// Rectangles are in page coordinates, matching `PointerEvent.pageX/Y`.
pub struct DomContainers {
    document: Document,
}

impl DomContainers {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}

impl ContainerMetrics for DomContainers {
    fn container_rect(&self, canvas_id: &CanvasId) -> Option<Rect> {
        let element = self
            .document
            .query_selector(&canvas_selector(canvas_id.as_str()))
            .ok()??;
        let bounds = element.get_bounding_client_rect();
        let window = web_sys::window()?;
        let scroll_x = window.scroll_x().unwrap_or(0.0);
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        Some(Rect::new(
            bounds.left() + scroll_x,
            bounds.top() + scroll_y,
            bounds.right() + scroll_x,
            bounds.bottom() + scroll_y,
        ))
    }
}

const GESTURE_PROPERTIES: [&str; 5] = ["transform", "left", "top", "width", "height"];

/// The rendered element of an item. Gesture updates go straight to its
/// inline style and bypass the view layer.
pub struct ElementVisual {
    element: HtmlElement,
}

impl ElementVisual {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

fn set_style(style: &CssStyleDeclaration, name: &str, value: &str) {
    if let Err(err) = style.set_property(name, value) {
        log::debug!("Failed to set style {}: {:?}", name, err);
    }
}

impl VisualTarget for ElementVisual {
    fn set_offset(&mut self, offset: Vec2) {
        set_style(&self.element.style(), "transform", &translate(offset));
    }

    fn set_frame(&mut self, frame: Rect) {
        let style = self.element.style();
        for (name, value) in frame_properties(frame) {
            set_style(&style, name, &value);
        }
    }

    fn reset(&mut self) {
        let style = self.element.style();
        for name in GESTURE_PROPERTIES {
            if let Err(err) = style.remove_property(name) {
                log::debug!("Failed to clear style {}: {:?}", name, err);
            }
        }
    }
}
