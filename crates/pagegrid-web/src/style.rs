//! String helpers shared by the DOM bindings.

use kurbo::{Rect, Vec2};
use pagegrid_core::{Corner, Direction, Edge, ResizeHandle, StoreEvent, Viewport};

/// CSS `transform` value for a drag offset.
pub fn translate(offset: Vec2) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}

/// CSS pixel length.
pub fn px(value: f64) -> String {
    format!("{}px", value)
}

/// `left`, `top`, `width` and `height` declarations for a frame.
pub fn frame_properties(frame: Rect) -> [(&'static str, String); 4] {
    [
        ("left", px(frame.x0)),
        ("top", px(frame.y0)),
        ("width", px(frame.width())),
        ("height", px(frame.height())),
    ]
}

/// Selector matching a canvas container element.
pub fn canvas_selector(canvas_id: &str) -> String {
    let escaped = canvas_id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[data-canvas-id=\"{}\"]", escaped)
}

/// Parse an arrow-key direction (`"up"`, `"ArrowUp"`, ...).
pub fn parse_direction(name: &str) -> Option<Direction> {
    match name.trim_start_matches("Arrow").to_ascii_lowercase().as_str() {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

/// Parse a compass-style handle name (`"nw"`, `"e"`, ...).
pub fn parse_handle(name: &str) -> Option<ResizeHandle> {
    let handle = match name {
        "nw" => ResizeHandle::Corner(Corner::TopLeft),
        "n" => ResizeHandle::Edge(Edge::Top),
        "ne" => ResizeHandle::Corner(Corner::TopRight),
        "e" => ResizeHandle::Edge(Edge::Right),
        "se" => ResizeHandle::Corner(Corner::BottomRight),
        "s" => ResizeHandle::Edge(Edge::Bottom),
        "sw" => ResizeHandle::Corner(Corner::BottomLeft),
        "w" => ResizeHandle::Edge(Edge::Left),
        _ => return None,
    };
    Some(handle)
}

pub fn viewport_name(viewport: Viewport) -> &'static str {
    match viewport {
        Viewport::Desktop => "desktop",
        Viewport::Mobile => "mobile",
    }
}

/// Event name reported to JavaScript listeners.
pub fn event_name(event: &StoreEvent) -> &'static str {
    match event {
        StoreEvent::CanvasAdded(_) => "canvas-added",
        StoreEvent::CanvasRemoved(_) => "canvas-removed",
        StoreEvent::CanvasUpdated(_) => "canvas-updated",
        StoreEvent::ItemAdded { .. } => "item-added",
        StoreEvent::ItemRemoved { .. } => "item-removed",
        StoreEvent::ItemUpdated { .. } => "item-updated",
        StoreEvent::ItemMoved { .. } => "item-moved",
        StoreEvent::SelectionChanged(_) => "selection-changed",
        StoreEvent::ViewportChanged(_) => "viewport-changed",
        StoreEvent::GridVisibilityChanged(_) => "grid-visibility-changed",
        StoreEvent::NotificationsChanged => "notifications-changed",
        StoreEvent::DocumentReplaced => "document-replaced",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_translate() {
        assert_eq!(translate(Vec2::new(12.5, -4.0)), "translate(12.5px, -4px)");
    }

    #[test]
    fn test_frame_properties() {
        let props = frame_properties(Rect::new(10.0, 20.0, 110.0, 100.0));
        assert_eq!(props[2], ("width", "100px".to_string()));
        assert_eq!(props[3], ("height", "80px".to_string()));
    }

    #[test]
    fn test_canvas_selector_escapes() {
        assert_eq!(canvas_selector("hero"), "[data-canvas-id=\"hero\"]");
        assert_eq!(canvas_selector("a\"b"), "[data-canvas-id=\"a\\\"b\"]");
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("ArrowUp"), Some(Direction::Up));
        assert_eq!(parse_direction("left"), Some(Direction::Left));
        assert_eq!(parse_direction("Tab"), None);
    }

    #[test]
    fn test_parse_handle_covers_all() {
        let names = ["nw", "n", "ne", "e", "se", "s", "sw", "w"];
        let handles: Vec<ResizeHandle> = names.iter().filter_map(|n| parse_handle(n)).collect();
        assert_eq!(handles, ResizeHandle::ALL.to_vec());
        assert_eq!(parse_handle("x"), None);
    }
}
