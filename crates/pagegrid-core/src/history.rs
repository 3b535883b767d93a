//! Undo/redo command history.
//!
//! Commands are self-contained snapshots. They never hold references into
//! the store; every undo and redo resolves its target by id at the time it
//! runs, and a target that no longer exists makes the step a no-op.

use crate::config::MAX_UNDO_HISTORY;
use crate::model::{CanvasId, GridItem, GridPoint, ItemId, Layouts, Viewport};
use crate::store::StateStore;

/// A relocation or resize of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCommand {
    pub item_id: ItemId,
    pub source_canvas_id: CanvasId,
    pub target_canvas_id: CanvasId,
    /// Index of the item in the source canvas before the move.
    pub source_index: usize,
    pub source_layouts: Layouts,
    pub target_layouts: Layouts,
    /// Viewport the move was made in.
    pub viewport: Viewport,
}

impl MoveCommand {
    /// Position before the move, in the viewport it was made in.
    pub fn source_position(&self) -> Option<GridPoint> {
        self.source_layouts.position(self.viewport)
    }

    /// Position after the move, in the viewport it was made in.
    pub fn target_position(&self) -> Option<GridPoint> {
        self.target_layouts.position(self.viewport)
    }

    pub fn is_cross_canvas(&self) -> bool {
        self.source_canvas_id != self.target_canvas_id
    }
}

/// An undoable change.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// An item was created. Redo appends it again.
    Add { canvas_id: CanvasId, item: GridItem },
    /// An item was deleted from `index`. Undo restores it there.
    Delete {
        canvas_id: CanvasId,
        item: GridItem,
        index: usize,
    },
    /// An item changed position, size or canvas.
    Move(MoveCommand),
}

impl Command {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Delete { .. } => "delete",
            Command::Move(_) => "move",
        }
    }

    /// Id of the item the command targets.
    pub fn item_id(&self) -> ItemId {
        match self {
            Command::Add { item, .. } | Command::Delete { item, .. } => item.id,
            Command::Move(mv) => mv.item_id,
        }
    }

    /// Whether the command touches the given canvas.
    pub fn references_canvas(&self, id: &CanvasId) -> bool {
        match self {
            Command::Add { canvas_id, .. } | Command::Delete { canvas_id, .. } => canvas_id == id,
            Command::Move(mv) => &mv.source_canvas_id == id || &mv.target_canvas_id == id,
        }
    }

    /// Revert the change. Returns false if the target could not be found.
    pub fn undo(&self, store: &mut StateStore) -> bool {
        match self {
            Command::Add { canvas_id, item } => store.remove_item(canvas_id, item.id).is_some(),
            Command::Delete { canvas_id, item, index } => {
                store.insert_item(canvas_id, item.clone(), Some(*index))
            }
            Command::Move(mv) => store.relocate_item(
                mv.item_id,
                &mv.target_canvas_id,
                &mv.source_canvas_id,
                mv.source_layouts,
                Some(mv.source_index),
            ),
        }
    }

    /// Re-apply the change. Returns false if the target could not be found.
    pub fn redo(&self, store: &mut StateStore) -> bool {
        match self {
            Command::Add { canvas_id, item } => store.insert_item(canvas_id, item.clone(), None),
            Command::Delete { canvas_id, item, .. } => store.remove_item(canvas_id, item.id).is_some(),
            Command::Move(mv) => store.relocate_item(
                mv.item_id,
                &mv.source_canvas_id,
                &mv.target_canvas_id,
                mv.target_layouts,
                None,
            ),
        }
    }
}

/// Bounded undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    max_len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Create a history keeping at most `max_len` undoable commands.
    pub fn new(max_len: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_len: max_len.max(1),
        }
    }

    /// Record a command that has been (or is about to be) applied.
    ///
    /// Discards the redo stack. The oldest command is dropped once the
    /// history is full.
    pub fn push(&mut self, command: Command) {
        log::debug!("Recording {} of {}", command.kind(), command.item_id());
        self.undo_stack.push(command);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_len {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the most recent command.
    ///
    /// Returns false when there was nothing to undo. A command whose target
    /// has vanished still moves to the redo stack.
    pub fn undo(&mut self, store: &mut StateStore) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        if !command.undo(store) {
            log::warn!("Undo {} of {}: target not found", command.kind(), command.item_id());
        }
        self.redo_stack.push(command);
        true
    }

    /// Redo the most recently undone command.
    pub fn redo(&mut self, store: &mut StateStore) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        if !command.redo(store) {
            log::warn!("Redo {} of {}: target not found", command.kind(), command.item_id());
        }
        self.undo_stack.push(command);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable commands.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Most recent undoable command.
    pub fn last(&self) -> Option<&Command> {
        self.undo_stack.last()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Drop every command that references a canvas.
    pub fn forget_canvas(&mut self, canvas_id: &CanvasId) {
        let before = self.undo_stack.len() + self.redo_stack.len();
        self.undo_stack.retain(|c| !c.references_canvas(canvas_id));
        self.redo_stack.retain(|c| !c.references_canvas(canvas_id));
        let dropped = before - self.undo_stack.len() - self.redo_stack.len();
        if dropped > 0 {
            log::debug!("Dropped {} history entries for canvas {}", dropped, canvas_id);
        }
    }
}
