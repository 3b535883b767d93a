//! Resize engine.
//!
//! Pointer moves accumulate into a running pixel rectangle. Visual updates
//! are coalesced: each move cancels the pending frame and requests a new
//! one, and only the frame callback touches the visual. Grid snapping and
//! clamping happen once, when the gesture ends.

use crate::drag::GestureCommit;
use crate::grid::GridCalculator;
use crate::layout::resolve_layout;
use crate::model::{CanvasId, GridRect, ItemId, Viewport};
use crate::snap::{clamp_size_to_container, clamp_to_container, snap_value};
use crate::store::StateStore;
use crate::visual::{FrameHandle, FrameScheduler, PointerTarget, VisualTarget};
use kurbo::{Point, Rect, Size, Vec2};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// One of the eight resize handles around an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    Corner(Corner),
    Edge(Edge),
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Corner(Corner::TopLeft),
        ResizeHandle::Edge(Edge::Top),
        ResizeHandle::Corner(Corner::TopRight),
        ResizeHandle::Edge(Edge::Right),
        ResizeHandle::Corner(Corner::BottomRight),
        ResizeHandle::Edge(Edge::Bottom),
        ResizeHandle::Corner(Corner::BottomLeft),
        ResizeHandle::Edge(Edge::Left),
    ];

    /// Whether dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::Corner(Corner::TopLeft | Corner::BottomLeft) | ResizeHandle::Edge(Edge::Left)
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::Corner(Corner::TopRight | Corner::BottomRight) | ResizeHandle::Edge(Edge::Right)
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::Corner(Corner::TopLeft | Corner::TopRight) | ResizeHandle::Edge(Edge::Top)
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::Corner(Corner::BottomLeft | Corner::BottomRight) | ResizeHandle::Edge(Edge::Bottom)
        )
    }
}

/// Incremental change to a rectangle from one resize event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeltaRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DeltaRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Delta produced by moving `handle` by `delta` pixels.
    pub fn from_handle(handle: ResizeHandle, delta: Vec2) -> Self {
        let mut rect = Self::default();
        if handle.moves_left() {
            rect.left = delta.x;
            rect.width = -delta.x;
        } else if handle.moves_right() {
            rect.width = delta.x;
        }
        if handle.moves_top() {
            rect.top = delta.y;
            rect.height = -delta.y;
        } else if handle.moves_bottom() {
            rect.height = delta.y;
        }
        rect
    }
}

/// Result of ending a resize.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    Commit(GestureCommit),
    Cancelled,
}

#[derive(Debug, Clone)]
struct ResizeGesture {
    handle: ResizeHandle,
    canvas_id: CanvasId,
    viewport: Viewport,
    /// Effective layout at gesture start, in units.
    start_layout: GridRect,
    /// Container top-left in page coordinates at gesture start.
    container_origin: Point,
    /// Running rectangle in page coordinates.
    rect: Rect,
    pending: Option<FrameHandle>,
}

#[derive(Debug, Clone, Default)]
enum ResizeState {
    #[default]
    Idle,
    Resizing(ResizeGesture),
}

/// Resize state machine for a single item.
#[derive(Debug)]
pub struct ResizeController<V: VisualTarget> {
    item_id: ItemId,
    visual: V,
    state: ResizeState,
}

impl<V: VisualTarget> ResizeController<V> {
    pub fn new(item_id: ItemId, visual: V) -> Self {
        Self {
            item_id,
            visual,
            state: ResizeState::Idle,
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

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    /// The running rectangle in page coordinates.
    pub fn current_rect(&self) -> Option<Rect> {
        match &self.state {
            ResizeState::Resizing(gesture) => Some(gesture.rect),
            ResizeState::Idle => None,
        }
    }

    /// Start a resize from one of the resize handles.
    pub fn begin(&mut self, target: PointerTarget, store: &StateStore, grid: &GridCalculator) -> bool {
        let PointerTarget::ResizeHandle(handle) = target else {
            return false;
        };
        if self.is_resizing() {
            return false;
        }
        let Some((canvas_id, index)) = store.locate(self.item_id) else {
            log::debug!("Resize start on missing {}", self.item_id);
            return false;
        };
        let Some(canvas) = store.canvas(&canvas_id) else {
            return false;
        };
        let viewport = store.viewport();
        let Some(layout) = resolve_layout(canvas, index, viewport, grid.config()) else {
            return false;
        };

        let container_origin = grid
            .container_rect(&canvas_id)
            .map_or(Point::ZERO, |rect| rect.origin());
        let rect = grid.rect_to_pixels(&layout, &canvas_id) + container_origin.to_vec2();

        self.state = ResizeState::Resizing(ResizeGesture {
            handle,
            canvas_id,
            viewport,
            start_layout: layout,
            container_origin,
            rect,
            pending: None,
        });
        true
    }

    /// Apply an incremental delta and schedule a visual update.
    ///
    /// The minimum size is enforced on every step, holding the edge opposite
    /// the handle in place.
    pub fn pointer_move(&mut self, delta: DeltaRect, grid: &GridCalculator, frames: &mut dyn FrameScheduler) {
        let ResizeState::Resizing(gesture) = &mut self.state else {
            return;
        };
        let config = grid.config();
        let r = gesture.rect;
        let mut x = r.x0 + delta.left;
        let mut y = r.y0 + delta.top;
        let mut width = r.width() + delta.width;
        let mut height = r.height() + delta.height;

        if width < config.min_item_width_px {
            if gesture.handle.moves_left() {
                x = r.x1 - config.min_item_width_px;
            }
            width = config.min_item_width_px;
        }
        if height < config.min_item_height_px {
            if gesture.handle.moves_top() {
                y = r.y1 - config.min_item_height_px;
            }
            height = config.min_item_height_px;
        }
        gesture.rect = Rect::from_origin_size((x, y), (width, height));

        if let Some(pending) = gesture.pending.take() {
            frames.cancel_frame(pending);
        }
        gesture.pending = Some(frames.request_frame());
    }

    /// Apply a pointer movement of the active handle.
    pub fn pointer_move_by(&mut self, delta: Vec2, grid: &GridCalculator, frames: &mut dyn FrameScheduler) {
        let ResizeState::Resizing(gesture) = &self.state else {
            return;
        };
        let delta = DeltaRect::from_handle(gesture.handle, delta);
        self.pointer_move(delta, grid, frames);
    }

    /// Frame callback. Applies the running rectangle if `handle` is the
    /// pending frame; stale frames are ignored.
    pub fn run_frame(&mut self, handle: FrameHandle) -> bool {
        let ResizeState::Resizing(gesture) = &mut self.state else {
            return false;
        };
        if gesture.pending != Some(handle) {
            return false;
        }
        gesture.pending = None;
        let frame = gesture.rect - gesture.container_origin.to_vec2();
        self.visual.set_frame(frame);
        true
    }

    /// Abort the gesture and restore the visual.
    pub fn cancel(&mut self, frames: &mut dyn FrameScheduler) {
        if let ResizeState::Resizing(gesture) = std::mem::take(&mut self.state) {
            if let Some(pending) = gesture.pending {
                frames.cancel_frame(pending);
            }
            self.visual.reset();
        }
    }

    /// Finish the gesture: snap, clamp and produce the commit.
    pub fn end(
        &mut self,
        store: &StateStore,
        grid: &GridCalculator,
        frames: &mut dyn FrameScheduler,
    ) -> ResizeOutcome {
        let ResizeState::Resizing(gesture) = std::mem::take(&mut self.state) else {
            return ResizeOutcome::Cancelled;
        };
        if let Some(pending) = gesture.pending {
            frames.cancel_frame(pending);
        }
        self.visual.reset();

        let Some(current) = store.item(self.item_id) else {
            log::debug!("Resize end on missing {}", self.item_id);
            return ResizeOutcome::Cancelled;
        };

        let canvas_id = &gesture.canvas_id;
        let container = grid.container_rect(canvas_id);
        let origin = container.map_or(gesture.container_origin, |r| r.origin());
        let relative = gesture.rect - origin.to_vec2();

        let unit_x = grid.grid_size_horizontal(canvas_id);
        let unit_y = grid.grid_size_vertical();
        let mut position = Point::new(snap_value(relative.x0, unit_x), snap_value(relative.y0, unit_y));
        let mut size = Size::new(
            snap_value(relative.width(), unit_x),
            snap_value(relative.height(), unit_y),
        );

        if let Some(container) = container.map(|r| r.size()) {
            size = clamp_size_to_container(size, container);
            position = clamp_to_container(position, size, container);
        }

        let units = GridRect::new(
            grid.pixels_to_grid_x(position.x, canvas_id),
            grid.pixels_to_grid_y(position.y),
            grid.pixels_to_grid_x(size.width, canvas_id),
            grid.pixels_to_grid_y(size.height),
        );
        let before = current.clone();
        let mut after = current.clone();
        after.layouts.set_rect(gesture.viewport, units);

        ResizeOutcome::Commit(GestureCommit {
            before,
            after,
            viewport: gesture.viewport,
            from: gesture.start_layout,
            to: units,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::grid::StaticContainers;
    use crate::model::GridItem;
    use crate::store::PageDocument;
    use crate::visual::{ManualFrames, RecordingVisual, VisualOp};

    // 1000x400 container at page offset (0, 100). 20px per unit.
    fn setup(desktop: GridRect) -> (StateStore, GridCalculator) {
        let mut store = StateStore::new(PageDocument::with_canvases(["a"]));
        let a = CanvasId::from("a");
        store.insert_item(&a, GridItem::new(ItemId(1), a.clone(), "image", "Image", 1, desktop), None);
        let containers = StaticContainers::new().with("a", Rect::new(0.0, 100.0, 1000.0, 500.0));
        (store, GridCalculator::new(GridConfig::default(), Box::new(containers)))
    }

    fn start(handle: ResizeHandle, store: &StateStore, grid: &GridCalculator) -> ResizeController<RecordingVisual> {
        let mut resize = ResizeController::new(ItemId(1), RecordingVisual::new());
        assert!(resize.begin(PointerTarget::ResizeHandle(handle), store, grid));
        resize
    }

    #[test]
    fn test_delta_from_handle() {
        let d = Vec2::new(10.0, -5.0);
        assert_eq!(
            DeltaRect::from_handle(ResizeHandle::Corner(Corner::TopLeft), d),
            DeltaRect::new(10.0, -5.0, -10.0, 5.0)
        );
        assert_eq!(
            DeltaRect::from_handle(ResizeHandle::Corner(Corner::BottomRight), d),
            DeltaRect::new(0.0, 0.0, 10.0, -5.0)
        );
        assert_eq!(
            DeltaRect::from_handle(ResizeHandle::Edge(Edge::Right), d),
            DeltaRect::new(0.0, 0.0, 10.0, 0.0)
        );
        assert_eq!(ResizeHandle::ALL.len(), 8);
    }

    #[test]
    fn test_body_does_not_start_resize() {
        let (store, grid) = setup(GridRect::new(5.0, 2.0, 10.0, 6.0));
        let mut resize = ResizeController::new(ItemId(1), RecordingVisual::new());
        assert!(!resize.begin(PointerTarget::Body, &store, &grid));
        assert!(!resize.begin(PointerTarget::DragHandle, &store, &grid));
    }

    #[test]
    fn test_moves_coalesce_to_one_frame() {
        let (store, grid) = setup(GridRect::new(5.0, 2.0, 10.0, 6.0));
        let mut frames = ManualFrames::new();
        let mut resize = start(ResizeHandle::Corner(Corner::BottomRight), &store, &grid);

        for _ in 0..5 {
            resize.pointer_move_by(Vec2::new(3.0, 2.0), &grid, &mut frames);
        }
        assert_eq!(frames.requested, 5);
        assert_eq!(frames.cancelled, 4);
        assert!(resize.visual().ops.is_empty());

        let handle = frames.fire().unwrap();
        assert!(resize.run_frame(handle));
        assert!(!resize.run_frame(handle));
        assert_eq!(resize.visual().ops, vec![VisualOp::Frame(Rect::new(100.0, 40.0, 315.0, 170.0))]);
    }

    #[test]
    fn test_min_size_keeps_opposite_edge() {
        let (store, grid) = setup(GridRect::new(5.0, 2.0, 10.0, 6.0));
        let mut frames = ManualFrames::new();
        let mut resize = start(ResizeHandle::Corner(Corner::TopLeft), &store, &grid);

        resize.pointer_move_by(Vec2::new(500.0, 500.0), &grid, &mut frames);
        let rect = resize.current_rect().unwrap();
        // Right and bottom edges (300, 260 in page space) stay put.
        assert_eq!(rect, Rect::new(200.0, 180.0, 300.0, 260.0));
    }

    #[test]
    fn test_end_snaps_and_writes_rect() {
        let (store, grid) = setup(GridRect::new(5.0, 2.0, 10.0, 6.0));
        let mut frames = ManualFrames::new();
        let mut resize = start(ResizeHandle::Corner(Corner::BottomRight), &store, &grid);
        resize.pointer_move_by(Vec2::new(33.0, 47.0), &grid, &mut frames);

        let ResizeOutcome::Commit(commit) = resize.end(&store, &grid, &mut frames) else {
            panic!("expected commit");
        };
        // 233 x 167 px -> 240 x 160 px
        assert_eq!(commit.after.layouts.desktop, GridRect::new(5.0, 2.0, 12.0, 8.0));
        assert_eq!(frames.pending(), None);
        assert_eq!(resize.visual().ops.last(), Some(&VisualOp::Reset));
    }

    #[test]
    fn test_end_clamps_size_then_position() {
        let (store, grid) = setup(GridRect::new(40.0, 2.0, 10.0, 6.0));
        let mut frames = ManualFrames::new();
        let mut resize = start(ResizeHandle::Edge(Edge::Right), &store, &grid);
        resize.pointer_move_by(Vec2::new(1500.0, 0.0), &grid, &mut frames);

        let ResizeOutcome::Commit(commit) = resize.end(&store, &grid, &mut frames) else {
            panic!("expected commit");
        };
        assert_eq!(commit.after.layouts.desktop, GridRect::new(0.0, 2.0, 50.0, 6.0));
    }

    #[test]
    fn test_mobile_resize_customizes() {
        let (mut store, grid) = setup(GridRect::new(5.0, 2.0, 10.0, 6.0));
        store.set_viewport(Viewport::Mobile);
        let mut frames = ManualFrames::new();
        let mut resize = start(ResizeHandle::Edge(Edge::Bottom), &store, &grid);
        resize.pointer_move_by(Vec2::new(0.0, 40.0), &grid, &mut frames);

        let ResizeOutcome::Commit(commit) = resize.end(&store, &grid, &mut frames) else {
            panic!("expected commit");
        };
        let mobile = commit.after.layouts.mobile;
        assert!(mobile.customized);
        assert_eq!(mobile.rect(), Some(GridRect::new(0.0, 0.0, 50.0, 8.0)));
        assert_eq!(commit.after.layouts.desktop, GridRect::new(5.0, 2.0, 10.0, 6.0));
    }

    #[test]
    fn test_end_after_delete_cancels() {
        let (mut store, grid) = setup(GridRect::new(5.0, 2.0, 10.0, 6.0));
        let mut frames = ManualFrames::new();
        let mut resize = start(ResizeHandle::Edge(Edge::Bottom), &store, &grid);
        resize.pointer_move_by(Vec2::new(0.0, 40.0), &grid, &mut frames);
        store.remove_item(&CanvasId::from("a"), ItemId(1));
        assert_eq!(resize.end(&store, &grid, &mut frames), ResizeOutcome::Cancelled);
        assert_eq!(frames.pending(), None);
    }
}
