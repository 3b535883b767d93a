//! Drag engine.
//!
//! A [`DragController`] follows one item through a drag gesture. While the
//! pointer moves only the item's visual is offset; the store is read at the
//! start and end of the gesture and never written. The result of a gesture
//! is a [`DragOutcome`] that the orchestrator applies in a single update.

use crate::grid::GridCalculator;
use crate::layout::resolve_layout;
use crate::model::{CanvasId, GridItem, GridPoint, GridRect, ItemId, Viewport};
use crate::snap::{clamp_to_container, snap_to_edges, snap_to_grid};
use crate::store::StateStore;
use crate::visual::{PointerTarget, VisualTarget};
use kurbo::{Point, Size, Vec2};

/// A finished same-canvas gesture: the item as it was when the gesture
/// ended, and as it should be after the commit.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureCommit {
    pub before: GridItem,
    pub after: GridItem,
    pub viewport: Viewport,
    /// Effective rectangle in `viewport` when the gesture began.
    pub from: GridRect,
    /// Effective rectangle the gesture ended on.
    pub to: GridRect,
}

impl GestureCommit {
    /// Whether the gesture moved or resized the item, or changed its canvas.
    ///
    /// Customizing a mobile layout in place is not a change.
    pub fn is_change(&self) -> bool {
        self.before.canvas_id != self.after.canvas_id || self.from != self.to
    }

    /// Whether the stored layouts differ, geometry change or not.
    pub fn rewrites_layouts(&self) -> bool {
        self.before.layouts != self.after.layouts
    }
}

/// An item dropped over a different canvas than it started in.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossCanvasMove {
    pub item_id: ItemId,
    pub source_canvas_id: CanvasId,
    pub target_canvas_id: CanvasId,
    /// Drop position of the item's top-left corner, in pixels relative to
    /// the target container.
    pub x: f64,
    pub y: f64,
}

/// Result of ending a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Commit(GestureCommit),
    CrossCanvas(CrossCanvasMove),
    Cancelled,
}

#[derive(Debug, Clone)]
struct DragGesture {
    /// Canvas the item belonged to when the gesture began.
    start_canvas: CanvasId,
    viewport: Viewport,
    /// Effective layout at gesture start, in units.
    start_layout: GridRect,
    start_pointer: Point,
    /// Item top-left relative to the container at gesture start.
    base: Point,
    /// Container top-left in page coordinates at gesture start.
    container_origin: Point,
    size: Size,
    delta: Vec2,
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragGesture),
}

/// Drag state machine for a single item.
#[derive(Debug)]
pub struct DragController<V: VisualTarget> {
    item_id: ItemId,
    visual: V,
    state: DragState,
}

impl<V: VisualTarget> DragController<V> {
    pub fn new(item_id: ItemId, visual: V) -> Self {
        Self {
            item_id,
            visual,
            state: DragState::Idle,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn visual(&self) -> &V {
        &self.visual
    }

    pub fn visual_mut(&mut self) -> &mut V {
        &mut self.visual
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start a drag. Only the drag handle starts one, and only when idle.
    pub fn begin(
        &mut self,
        target: PointerTarget,
        pointer: Point,
        store: &StateStore,
        grid: &GridCalculator,
    ) -> bool {
        if target != PointerTarget::DragHandle || self.is_dragging() {
            return false;
        }
        let Some((canvas_id, index)) = store.locate(self.item_id) else {
            log::debug!("Drag start on missing {}", self.item_id);
            return false;
        };
        let Some(canvas) = store.canvas(&canvas_id) else {
            return false;
        };
        let viewport = store.viewport();
        let Some(layout) = resolve_layout(canvas, index, viewport, grid.config()) else {
            return false;
        };

        let frame = grid.rect_to_pixels(&layout, &canvas_id);
        let container_origin = grid
            .container_rect(&canvas_id)
            .map_or(Point::ZERO, |rect| rect.origin());

        self.state = DragState::Dragging(DragGesture {
            start_canvas: canvas_id,
            viewport,
            start_layout: layout,
            start_pointer: pointer,
            base: frame.origin(),
            container_origin,
            size: frame.size(),
            delta: Vec2::ZERO,
        });
        true
    }

    /// Follow the pointer. Touches only the visual.
    pub fn pointer_move(&mut self, pointer: Point) {
        let DragState::Dragging(gesture) = &mut self.state else {
            return;
        };
        gesture.delta = pointer - gesture.start_pointer;
        self.visual.set_offset(gesture.delta);
    }

    /// Abort the gesture and restore the visual.
    pub fn cancel(&mut self) {
        if matches!(std::mem::take(&mut self.state), DragState::Dragging(_)) {
            self.visual.reset();
        }
    }

    /// Finish the gesture.
    ///
    /// Hit-tests the item's center against every canvas container first. A
    /// drop over another canvas is handed back as
    /// [`DragOutcome::CrossCanvas`]; otherwise the position is grid snapped,
    /// clamped and edge snapped within the starting canvas.
    pub fn end(&mut self, pointer: Point, store: &StateStore, grid: &GridCalculator) -> DragOutcome {
        let DragState::Dragging(mut gesture) = std::mem::take(&mut self.state) else {
            return DragOutcome::Cancelled;
        };
        gesture.delta = pointer - gesture.start_pointer;
        self.visual.reset();

        let Some(current) = store.item(self.item_id) else {
            log::debug!("Drag end on missing {}", self.item_id);
            return DragOutcome::Cancelled;
        };

        let page_origin = gesture.container_origin + gesture.base.to_vec2() + gesture.delta;
        let center = page_origin + gesture.size.to_vec2() / 2.0;

        if let Some((target, container)) = hit_test(store, grid, center) {
            if target != gesture.start_canvas {
                let x = page_origin.x - container.x0;
                let y = page_origin.y - container.y0;
                return DragOutcome::CrossCanvas(CrossCanvasMove {
                    item_id: self.item_id,
                    source_canvas_id: gesture.start_canvas,
                    target_canvas_id: target,
                    x,
                    y,
                });
            }
        }

        let canvas_id = &gesture.start_canvas;
        let mut position = gesture.base + gesture.delta;
        position = snap_to_grid(position, grid.grid_size_horizontal(canvas_id), grid.grid_size_vertical()).point;
        if let Some(container) = grid.container_rect(canvas_id).map(|r| r.size()) {
            position = clamp_to_container(position, gesture.size, container);
            position = snap_to_edges(position, gesture.size, container, grid.config().edge_snap_threshold_px).point;
        }

        let units = GridPoint::new(
            grid.pixels_to_grid_x(position.x, canvas_id),
            grid.pixels_to_grid_y(position.y),
        );
        let before = current.clone();
        let mut after = current.clone();
        after.layouts.set_position(gesture.viewport, units);

        let from = gesture.start_layout;
        DragOutcome::Commit(GestureCommit {
            before,
            after,
            viewport: gesture.viewport,
            from,
            to: GridRect::new(units.x, units.y, from.width, from.height),
        })
    }
}

/// First canvas whose container contains `point`, with its page rectangle.
fn hit_test(store: &StateStore, grid: &GridCalculator, point: Point) -> Option<(CanvasId, kurbo::Rect)> {
    store.canvases().iter().find_map(|canvas| {
        let rect = grid.container_rect(&canvas.id)?;
        rect.contains(point).then(|| (canvas.id.clone(), rect))
    })
}
