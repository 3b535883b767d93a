//! Page builder orchestrator.
//!
//! [`PageBuilder`] owns the store, the history and the grid calculator, and
//! turns inbound UI events (palette drops, cross-canvas moves, deletes,
//! gesture results) into store updates paired with history entries.

use crate::config::GridConfig;
use crate::drag::{CrossCanvasMove, DragOutcome, GestureCommit};
use crate::error::{BuilderError, BuilderResult};
use crate::grid::{ContainerMetrics, GridCalculator};
use crate::history::{Command, History, MoveCommand};
use crate::layout::{canvas_height_units, resolve_canvas_layouts, resolve_layout};
use crate::model::{Canvas, CanvasId, GridItem, GridPoint, GridRect, ItemId, Viewport};
use crate::registry::ComponentRegistry;
use crate::resize::ResizeOutcome;
use crate::storage::Storage;
use crate::store::{PageDocument, StateStore, StoreEvent, SubscriptionId};

/// A component dropped from the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteDrop {
    pub canvas_id: CanvasId,
    pub component_type: String,
    /// Drop position in pixels relative to the canvas container.
    pub x: f64,
    pub y: f64,
}

/// Request to delete an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub item_id: ItemId,
    pub canvas_id: CanvasId,
}

/// Request to select an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectRequest {
    pub item_id: ItemId,
    pub canvas_id: CanvasId,
}

/// Keyboard nudge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn offset(self, step: f64) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -step),
            Direction::Down => (0.0, step),
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
        }
    }
}

/// Grid units moved per nudge, and with the modifier held.
pub const NUDGE_STEP: f64 = 1.0;
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// The page builder: state, history and coordinate engine in one place.
#[derive(Debug)]
pub struct PageBuilder {
    store: StateStore,
    history: History,
    grid: GridCalculator,
    registry: ComponentRegistry,
}

impl PageBuilder {
    /// Create a builder over a document with the stock component palette.
    pub fn new(config: GridConfig, metrics: Box<dyn ContainerMetrics>, document: PageDocument) -> Self {
        Self {
            store: StateStore::new(document),
            history: History::new(config.max_history),
            grid: GridCalculator::new(config, metrics),
            registry: ComponentRegistry::with_defaults(),
        }
    }

    pub fn with_registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = registry;
        self
    }

    // --- Accessors ---

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn document(&self) -> &PageDocument {
        self.store.document()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn grid(&self) -> &GridCalculator {
        &self.grid
    }

    pub fn config(&self) -> &GridConfig {
        self.grid.config()
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    /// Replace the container source, e.g. once the host has mounted.
    pub fn set_metrics(&mut self, metrics: Box<dyn ContainerMetrics>) {
        self.grid.set_metrics(metrics);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- Items ---

    /// Create an item from a palette drop.
    ///
    /// Unknown component types are rejected and reported to the user
    /// through a transient notification.
    pub fn drop_component(&mut self, drop: PaletteDrop) -> BuilderResult<ItemId> {
        let Some(template) = self.registry.get(&drop.component_type).cloned() else {
            log::warn!("Dropped unknown component type '{}'", drop.component_type);
            self.store
                .notify_error(format!("Unknown component type: {}", drop.component_type));
            return Err(BuilderError::UnknownComponentType(drop.component_type));
        };
        if !self.store.has_canvas(&drop.canvas_id) {
            return Err(BuilderError::CanvasNotFound(drop.canvas_id));
        }

        let config = *self.grid.config();
        let x = self.grid.pixels_to_grid_x(drop.x, &drop.canvas_id).round().max(0.0);
        let y = self.grid.pixels_to_grid_y(drop.y).round().max(0.0);
        let (width, height) = template
            .default_size
            .unwrap_or((config.default_item_width_units, config.default_item_height_units));

        let z_index = self
            .store
            .allocate_z_index(&drop.canvas_id)
            .ok_or_else(|| BuilderError::CanvasNotFound(drop.canvas_id.clone()))?;
        let id = self.store.next_item_id();
        let item = GridItem::new(
            id,
            drop.canvas_id.clone(),
            drop.component_type,
            template.default_name,
            z_index,
            GridRect::new(x, y, width, height),
        );

        self.store.insert_item(&drop.canvas_id, item.clone(), None);
        self.history.push(Command::Add {
            canvas_id: drop.canvas_id,
            item,
        });
        log::debug!("Dropped {} at ({}, {})", id, x, y);
        Ok(id)
    }

    /// Move an item onto another canvas at a pixel position relative to the
    /// target container. Returns false if the item or a canvas is missing.
    pub fn move_item_to_canvas(&mut self, mv: CrossCanvasMove) -> bool {
        let Some(source_index) = self
            .store
            .canvas(&mv.source_canvas_id)
            .and_then(|c| c.index_of(mv.item_id))
        else {
            log::debug!("Cross-canvas move of missing {} from {}", mv.item_id, mv.source_canvas_id);
            return false;
        };
        if !self.store.has_canvas(&mv.target_canvas_id) {
            log::debug!("Cross-canvas move into missing canvas {}", mv.target_canvas_id);
            return false;
        }
        let Some(item) = self.store.item(mv.item_id) else {
            return false;
        };

        let viewport = self.store.viewport();
        let position = GridPoint::new(
            self.grid
                .pixels_to_grid_x(mv.x, &mv.target_canvas_id)
                .round()
                .max(0.0),
            self.grid.pixels_to_grid_y(mv.y).round().max(0.0),
        );
        let source_layouts = item.layouts;
        let mut target_layouts = source_layouts;
        target_layouts.set_position(viewport, position);

        self.history.push(Command::Move(MoveCommand {
            item_id: mv.item_id,
            source_canvas_id: mv.source_canvas_id.clone(),
            target_canvas_id: mv.target_canvas_id.clone(),
            source_index,
            source_layouts,
            target_layouts,
            viewport,
        }));
        self.store.relocate_item(
            mv.item_id,
            &mv.source_canvas_id,
            &mv.target_canvas_id,
            target_layouts,
            None,
        )
    }

    /// Delete an item. Returns false if it does not exist.
    pub fn delete_item(&mut self, request: DeleteRequest) -> bool {
        let Some((index, item)) = self.store.remove_item(&request.canvas_id, request.item_id) else {
            log::debug!("Delete of missing {} in {}", request.item_id, request.canvas_id);
            return false;
        };
        self.history.push(Command::Delete {
            canvas_id: request.canvas_id,
            item,
            index,
        });
        true
    }

    pub fn select_item(&mut self, request: SelectRequest) -> bool {
        self.store.select(&request.canvas_id, request.item_id)
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    /// Move the selected item by one unit, or ten with `large`.
    ///
    /// Positions never go below zero. Nudges are not recorded in history.
    pub fn nudge(&mut self, direction: Direction, large: bool) -> bool {
        let Some(selection) = self.store.selection().cloned() else {
            return false;
        };
        let viewport = self.store.viewport();
        let Some(current) = self.resolved_layout(selection.item_id) else {
            return false;
        };
        let Some(item) = self.store.item_in(&selection.canvas_id, selection.item_id) else {
            return false;
        };

        let step = if large { NUDGE_STEP_LARGE } else { NUDGE_STEP };
        let (dx, dy) = direction.offset(step);
        let mut layouts = item.layouts;
        layouts.set_position(
            viewport,
            GridPoint::new((current.x + dx).max(0.0), (current.y + dy).max(0.0)),
        );
        self.store
            .set_item_layouts(&selection.canvas_id, selection.item_id, layouts)
    }

    /// Drop notifications that have expired. Hosts call this from their
    /// render or timer loop.
    pub fn prune_notifications(&mut self) {
        self.store.prune_expired_notifications();
    }

    pub fn rename_item(&mut self, canvas_id: &CanvasId, item_id: ItemId, name: impl Into<String>) -> bool {
        self.store.rename_item(canvas_id, item_id, name)
    }

    pub fn bring_to_front(&mut self, canvas_id: &CanvasId, item_id: ItemId) -> bool {
        self.store.bring_to_front(canvas_id, item_id)
    }

    pub fn send_to_back(&mut self, canvas_id: &CanvasId, item_id: ItemId) -> bool {
        self.store.send_to_back(canvas_id, item_id)
    }

    // --- Gestures ---

    /// Apply the result of a drag or resize.
    ///
    /// Records one Move when position, size or canvas changed and performs
    /// the single store update. A gesture that only customized a mobile
    /// layout in place is written without a history entry. Returns false
    /// when nothing changed or the item is gone.
    pub fn commit_gesture(&mut self, commit: GestureCommit) -> bool {
        if !commit.is_change() {
            if !commit.rewrites_layouts() {
                return false;
            }
            return self
                .store
                .set_item_layouts(&commit.before.canvas_id, commit.after.id, commit.after.layouts);
        }
        let item_id = commit.after.id;
        let source = commit.before.canvas_id.clone();
        let Some(source_index) = self.store.canvas(&source).and_then(|c| c.index_of(item_id)) else {
            log::debug!("Gesture commit for missing {}", item_id);
            return false;
        };

        self.history.push(Command::Move(MoveCommand {
            item_id,
            source_canvas_id: source.clone(),
            target_canvas_id: commit.after.canvas_id.clone(),
            source_index,
            source_layouts: commit.before.layouts,
            target_layouts: commit.after.layouts,
            viewport: commit.viewport,
        }));
        self.store.relocate_item(
            item_id,
            &source,
            &commit.after.canvas_id,
            commit.after.layouts,
            None,
        )
    }

    pub fn apply_drag_outcome(&mut self, outcome: DragOutcome) -> bool {
        match outcome {
            DragOutcome::Commit(commit) => self.commit_gesture(commit),
            DragOutcome::CrossCanvas(mv) => self.move_item_to_canvas(mv),
            DragOutcome::Cancelled => false,
        }
    }

    pub fn apply_resize_outcome(&mut self, outcome: ResizeOutcome) -> bool {
        match outcome {
            ResizeOutcome::Commit(commit) => self.commit_gesture(commit),
            ResizeOutcome::Cancelled => false,
        }
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.store)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Sections and view ---

    /// Append a new empty section with a generated id.
    pub fn add_section(&mut self) -> CanvasId {
        let id = CanvasId::generate();
        self.store.add_canvas(Canvas::new(id.clone()));
        log::debug!("Added section {}", id);
        id
    }

    /// Append a new empty section with a chosen id.
    pub fn add_section_with_id(&mut self, id: CanvasId) -> bool {
        self.store.add_canvas(Canvas::new(id))
    }

    /// Remove a section and everything in it. History entries that refer
    /// to the section are dropped.
    pub fn remove_section(&mut self, canvas_id: &CanvasId) -> bool {
        if self.store.remove_canvas(canvas_id).is_none() {
            return false;
        }
        self.grid.invalidate_canvas(canvas_id);
        self.history.forget_canvas(canvas_id);
        true
    }

    pub fn set_section_background(&mut self, canvas_id: &CanvasId, color: impl Into<String>) -> bool {
        self.store.set_background_color(canvas_id, color)
    }

    /// A container changed size. `None` means every container may have.
    pub fn container_resized(&mut self, canvas_id: Option<&CanvasId>) {
        match canvas_id {
            Some(id) => self.grid.invalidate_canvas(id),
            None => self.grid.clear_grid_size_cache(),
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.store.set_viewport(viewport);
    }

    pub fn toggle_viewport(&mut self) -> Viewport {
        let viewport = self.store.viewport().toggle();
        self.store.set_viewport(viewport);
        viewport
    }

    pub fn toggle_grid(&mut self) -> bool {
        let show = !self.store.show_grid();
        self.store.set_show_grid(show);
        show
    }

    // --- Layout ---

    /// Effective layouts of a canvas's items for the active viewport.
    pub fn resolved_layouts(&self, canvas_id: &CanvasId) -> Option<Vec<GridRect>> {
        let canvas = self.store.canvas(canvas_id)?;
        Some(resolve_canvas_layouts(canvas, self.store.viewport(), self.grid.config()))
    }

    /// Effective layout of one item for the active viewport.
    pub fn resolved_layout(&self, item_id: ItemId) -> Option<GridRect> {
        let (canvas_id, index) = self.store.locate(item_id)?;
        let canvas = self.store.canvas(&canvas_id)?;
        resolve_layout(canvas, index, self.store.viewport(), self.grid.config())
    }

    /// Canvas height in pixels for the active viewport.
    pub fn canvas_height_px(&self, canvas_id: &CanvasId) -> Option<f64> {
        let canvas = self.store.canvas(canvas_id)?;
        let units = canvas_height_units(canvas, self.store.viewport(), self.grid.config());
        Some(self.grid.grid_to_pixels_y(units))
    }

    // --- Save / restore ---

    /// Save the page to `storage` under `id`.
    pub async fn save_to(&self, storage: &dyn Storage, id: &str) -> BuilderResult<()> {
        storage.save(id, self.store.document()).await?;
        log::info!("Saved page '{}'", id);
        Ok(())
    }

    /// Replace the page with the one saved under `id`. History is cleared.
    pub async fn load_from(&mut self, storage: &dyn Storage, id: &str) -> BuilderResult<()> {
        let document = storage.load(id).await?;
        self.restore(document);
        Ok(())
    }

    pub fn export_state(&self) -> BuilderResult<String> {
        Ok(self.store.document().to_json()?)
    }

    /// Replace the whole page. History is cleared.
    pub fn import_state(&mut self, json: &str) -> BuilderResult<()> {
        let document = PageDocument::from_json(json)?;
        self.restore(document);
        Ok(())
    }

    /// Replace the whole page with an already-parsed document.
    pub fn restore(&mut self, document: PageDocument) {
        self.store.replace_document(document);
        self.history.clear();
        self.grid.clear_grid_size_cache();
        log::info!("Restored page with {} items", self.store.document().item_count());
    }
}
