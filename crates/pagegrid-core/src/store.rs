//! The state store: single source of truth for canvases, items, selection
//! and viewport mode.
//!
//! Every mutation goes through [`StateStore`], which notifies subscribers
//! with a [`StoreEvent`] after the change has been applied. The store does
//! not record history; see [`crate::history`] for that.

use crate::model::{Canvas, CanvasId, GridItem, GridRect, ItemId, Layouts, Viewport};
use crate::notify::{DEFAULT_NOTIFICATION_TTL, NotificationLevel, Notifications};
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// The persisted page state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageDocument {
    /// Canvases in display order.
    pub canvases: Vec<Canvas>,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_show_grid")]
    pub show_grid: bool,
}

fn default_show_grid() -> bool {
    true
}

impl PageDocument {
    /// An empty document with no canvases.
    pub fn new() -> Self {
        Self {
            canvases: Vec::new(),
            viewport: Viewport::Desktop,
            show_grid: true,
        }
    }

    /// A document with the given (empty) canvases.
    pub fn with_canvases<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut doc = Self::new();
        doc.canvases = ids.into_iter().map(|id| Canvas::new(CanvasId::new(id))).collect();
        doc
    }

    /// The starter page shown to new users.
    pub fn demo() -> Self {
        let mut doc = Self::with_canvases(["hero", "content"]);
        let hero = CanvasId::from("hero");
        let content = CanvasId::from("content");

        doc.canvases[0].background_color = "#f5f7fb".to_string();
        doc.canvases[0].items = vec![
            GridItem::new(ItemId(1), hero.clone(), "header", "Header", 1, GridRect::new(0.0, 0.0, 50.0, 4.0)),
            GridItem::new(ItemId(2), hero, "image", "Image", 2, GridRect::new(15.0, 5.0, 20.0, 12.0)),
        ];
        doc.canvases[0].z_index_counter = 3;
        doc.canvases[1].items = vec![GridItem::new(
            ItemId(3),
            content,
            "text",
            "Text Block",
            1,
            GridRect::new(2.0, 1.0, 30.0, 6.0),
        )];
        doc.canvases[1].z_index_counter = 2;
        doc
    }

    pub fn canvas(&self, id: &CanvasId) -> Option<&Canvas> {
        self.canvases.iter().find(|c| &c.id == id)
    }

    fn canvas_mut(&mut self, id: &CanvasId) -> Option<&mut Canvas> {
        self.canvases.iter_mut().find(|c| &c.id == id)
    }

    /// Largest item id present in any canvas.
    pub fn max_item_id(&self) -> Option<ItemId> {
        self.canvases.iter().flat_map(|c| c.items.iter().map(|i| i.id)).max()
    }

    /// Total number of items across canvases.
    pub fn item_count(&self) -> usize {
        self.canvases.iter().map(Canvas::len).sum()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The currently selected item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub item_id: ItemId,
    pub canvas_id: CanvasId,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    CanvasAdded(CanvasId),
    CanvasRemoved(CanvasId),
    CanvasUpdated(CanvasId),
    ItemAdded { canvas_id: CanvasId, item_id: ItemId },
    ItemRemoved { canvas_id: CanvasId, item_id: ItemId },
    ItemUpdated { canvas_id: CanvasId, item_id: ItemId },
    ItemMoved { item_id: ItemId, from: CanvasId, to: CanvasId },
    SelectionChanged(Option<Selection>),
    ViewportChanged(Viewport),
    GridVisibilityChanged(bool),
    NotificationsChanged,
    DocumentReplaced,
}

/// Handle returned by [`StateStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Owns the page state and notifies observers of every change.
pub struct StateStore {
    document: PageDocument,
    selection: Option<Selection>,
    next_item_id: u64,
    notifications: Notifications,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("document", &self.document)
            .field("selection", &self.selection)
            .field("next_item_id", &self.next_item_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(PageDocument::new())
    }
}

impl StateStore {
    /// Create a store around a document. The item id counter starts above
    /// every id already present.
    pub fn new(document: PageDocument) -> Self {
        let next_item_id = seed_after(&document);
        Self {
            document,
            selection: None,
            next_item_id,
            notifications: Notifications::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // --- Observation ---

    /// Register a listener called after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    // --- Reads ---

    /// The whole persisted page.
    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    /// Canvases in display order.
    pub fn canvases(&self) -> &[Canvas] {
        &self.document.canvases
    }

    /// Look up a canvas by id.
    pub fn canvas(&self, id: &CanvasId) -> Option<&Canvas> {
        self.document.canvas(id)
    }

    pub fn has_canvas(&self, id: &CanvasId) -> bool {
        self.document.canvas(id).is_some()
    }

    /// Find an item in a specific canvas.
    pub fn item_in(&self, canvas_id: &CanvasId, item_id: ItemId) -> Option<&GridItem> {
        self.canvas(canvas_id)?.item(item_id)
    }

    /// Find an item in any canvas.
    pub fn item(&self, item_id: ItemId) -> Option<&GridItem> {
        self.document.canvases.iter().find_map(|c| c.item(item_id))
    }

    /// Canvas and array index of an item.
    pub fn locate(&self, item_id: ItemId) -> Option<(CanvasId, usize)> {
        self.document
            .canvases
            .iter()
            .find_map(|c| c.index_of(item_id).map(|idx| (c.id.clone(), idx)))
    }

    /// The current selection, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The selected item, if it still exists.
    pub fn selected_item(&self) -> Option<&GridItem> {
        let selection = self.selection.as_ref()?;
        self.item_in(&selection.canvas_id, selection.item_id)
    }

    /// The active viewport mode.
    pub fn viewport(&self) -> Viewport {
        self.document.viewport
    }

    /// Whether grid lines are shown.
    pub fn show_grid(&self) -> bool {
        self.document.show_grid
    }

    /// Held notifications, including any not yet pruned.
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    // --- Ids ---

    /// Allocate a fresh item id.
    pub fn next_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        id
    }

    /// The id the next allocation will return.
    pub fn peek_next_item_id(&self) -> ItemId {
        ItemId(self.next_item_id)
    }

    // --- Canvases ---

    /// Append a canvas. Returns false if the id is already taken.
    pub fn add_canvas(&mut self, canvas: Canvas) -> bool {
        if self.has_canvas(&canvas.id) {
            log::debug!("Canvas {} already exists", canvas.id);
            return false;
        }
        let id = canvas.id.clone();
        self.next_item_id = self
            .next_item_id
            .max(canvas.items.iter().map(|i| i.id.0 + 1).max().unwrap_or(0));
        self.document.canvases.push(canvas);
        self.emit(StoreEvent::CanvasAdded(id));
        true
    }

    /// Remove a canvas together with all of its items.
    pub fn remove_canvas(&mut self, id: &CanvasId) -> Option<Canvas> {
        let idx = self.document.canvases.iter().position(|c| &c.id == id)?;
        let canvas = self.document.canvases.remove(idx);
        if self.selection.as_ref().is_some_and(|s| &s.canvas_id == id) {
            self.set_selection(None);
        }
        self.emit(StoreEvent::CanvasRemoved(id.clone()));
        Some(canvas)
    }

    pub fn set_background_color(&mut self, id: &CanvasId, color: impl Into<String>) -> bool {
        let Some(canvas) = self.document.canvas_mut(id) else {
            return false;
        };
        canvas.background_color = color.into();
        self.emit(StoreEvent::CanvasUpdated(id.clone()));
        true
    }

    pub fn bring_to_front(&mut self, canvas_id: &CanvasId, item_id: ItemId) -> bool {
        let changed = self
            .document
            .canvas_mut(canvas_id)
            .is_some_and(|c| c.bring_to_front(item_id));
        if changed {
            self.emit(StoreEvent::CanvasUpdated(canvas_id.clone()));
        }
        changed
    }

    pub fn send_to_back(&mut self, canvas_id: &CanvasId, item_id: ItemId) -> bool {
        let changed = self
            .document
            .canvas_mut(canvas_id)
            .is_some_and(|c| c.send_to_back(item_id));
        if changed {
            self.emit(StoreEvent::CanvasUpdated(canvas_id.clone()));
        }
        changed
    }

    /// Allocate a z-index slot on a canvas.
    pub fn allocate_z_index(&mut self, canvas_id: &CanvasId) -> Option<i64> {
        Some(self.document.canvas_mut(canvas_id)?.allocate_z_index())
    }

    // --- Items ---

    /// Insert an item into a canvas.
    ///
    /// `index` past the end (or `None`) appends. The item's `canvas_id` is
    /// rewritten to the owning canvas.
    pub fn insert_item(&mut self, canvas_id: &CanvasId, mut item: GridItem, index: Option<usize>) -> bool {
        if self.item(item.id).is_some() {
            log::warn!("Refusing to insert duplicate {}", item.id);
            return false;
        }
        let Some(canvas) = self.document.canvas_mut(canvas_id) else {
            log::debug!("Insert into missing canvas {}", canvas_id);
            return false;
        };
        item.canvas_id = canvas_id.clone();
        canvas.z_index_counter = canvas.z_index_counter.max(item.z_index + 1);
        let item_id = item.id;
        match index {
            Some(idx) if idx <= canvas.items.len() => canvas.items.insert(idx, item),
            _ => canvas.items.push(item),
        }
        self.next_item_id = self.next_item_id.max(item_id.0 + 1);
        self.emit(StoreEvent::ItemAdded {
            canvas_id: canvas_id.clone(),
            item_id,
        });
        true
    }

    /// Remove an item, returning its former index and value.
    pub fn remove_item(&mut self, canvas_id: &CanvasId, item_id: ItemId) -> Option<(usize, GridItem)> {
        let canvas = self.document.canvas_mut(canvas_id)?;
        let idx = canvas.index_of(item_id)?;
        let item = canvas.items.remove(idx);
        if self.selection.as_ref().is_some_and(|s| s.item_id == item_id) {
            self.set_selection(None);
        }
        self.emit(StoreEvent::ItemRemoved {
            canvas_id: canvas_id.clone(),
            item_id,
        });
        Some((idx, item))
    }

    /// Replace an item in place. The item must already live in the canvas
    /// named by its `canvas_id`.
    pub fn update_item(&mut self, item: GridItem) -> bool {
        let canvas_id = item.canvas_id.clone();
        let item_id = item.id;
        let Some(slot) = self
            .document
            .canvas_mut(&canvas_id)
            .and_then(|c| c.item_mut(item_id))
        else {
            log::debug!("Update of missing {} in {}", item_id, canvas_id);
            return false;
        };
        *slot = item;
        self.emit(StoreEvent::ItemUpdated { canvas_id, item_id });
        true
    }

    /// Replace the layouts of an item in place.
    pub fn set_item_layouts(&mut self, canvas_id: &CanvasId, item_id: ItemId, layouts: Layouts) -> bool {
        let Some(item) = self
            .document
            .canvas_mut(canvas_id)
            .and_then(|c| c.item_mut(item_id))
        else {
            return false;
        };
        item.layouts = layouts;
        self.emit(StoreEvent::ItemUpdated {
            canvas_id: canvas_id.clone(),
            item_id,
        });
        true
    }

    pub fn rename_item(&mut self, canvas_id: &CanvasId, item_id: ItemId, name: impl Into<String>) -> bool {
        let Some(item) = self
            .document
            .canvas_mut(canvas_id)
            .and_then(|c| c.item_mut(item_id))
        else {
            return false;
        };
        item.name = name.into();
        self.emit(StoreEvent::ItemUpdated {
            canvas_id: canvas_id.clone(),
            item_id,
        });
        true
    }

    /// Move an item between canvases (or within one), replacing its layouts.
    ///
    /// Cross-canvas moves remove the item from `from` and insert it into
    /// `to` at `index` (appending when `None` or out of range). When
    /// `from == to` the item keeps its slot unless an index is given.
    pub fn relocate_item(
        &mut self,
        item_id: ItemId,
        from: &CanvasId,
        to: &CanvasId,
        layouts: Layouts,
        index: Option<usize>,
    ) -> bool {
        if !self.has_canvas(to) {
            log::debug!("Relocate into missing canvas {}", to);
            return false;
        }
        let Some(source) = self.document.canvas_mut(from) else {
            log::debug!("Relocate from missing canvas {}", from);
            return false;
        };
        let Some(current) = source.index_of(item_id) else {
            log::debug!("Relocate of missing {} from {}", item_id, from);
            return false;
        };

        if from == to && index.is_none_or(|idx| idx == current) {
            source.items[current].layouts = layouts;
            self.emit(StoreEvent::ItemUpdated {
                canvas_id: to.clone(),
                item_id,
            });
            return true;
        }

        let mut item = source.items.remove(current);
        item.canvas_id = to.clone();
        item.layouts = layouts;

        let Some(target) = self.document.canvas_mut(to) else {
            return false;
        };
        target.z_index_counter = target.z_index_counter.max(item.z_index + 1);
        match index {
            Some(idx) if idx <= target.items.len() => target.items.insert(idx, item),
            _ => target.items.push(item),
        }

        if let Some(selection) = self.selection.as_mut() {
            if selection.item_id == item_id {
                selection.canvas_id = to.clone();
            }
        }
        self.emit(StoreEvent::ItemMoved {
            item_id,
            from: from.clone(),
            to: to.clone(),
        });
        true
    }

    // --- Selection and view ---

    /// Select an item. Returns false if it does not exist in that canvas.
    pub fn select(&mut self, canvas_id: &CanvasId, item_id: ItemId) -> bool {
        if self.item_in(canvas_id, item_id).is_none() {
            return false;
        }
        self.set_selection(Some(Selection {
            item_id,
            canvas_id: canvas_id.clone(),
        }));
        true
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_some() {
            self.set_selection(None);
        }
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection.clone();
        self.emit(StoreEvent::SelectionChanged(selection));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.document.viewport != viewport {
            self.document.viewport = viewport;
            self.emit(StoreEvent::ViewportChanged(viewport));
        }
    }

    pub fn set_show_grid(&mut self, show: bool) {
        if self.document.show_grid != show {
            self.document.show_grid = show;
            self.emit(StoreEvent::GridVisibilityChanged(show));
        }
    }

    // --- Notifications ---

    /// Show a transient error to the user. Expired notifications are
    /// dropped first.
    pub fn notify_error(&mut self, message: impl Into<String>) -> u64 {
        self.notify_error_at(message, Instant::now())
    }

    /// [`notify_error`](Self::notify_error) at an explicit time.
    pub fn notify_error_at(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.notifications.prune(now);
        let id = self
            .notifications
            .push_at(NotificationLevel::Error, message, now, DEFAULT_NOTIFICATION_TTL);
        self.emit(StoreEvent::NotificationsChanged);
        id
    }

    /// Drop notifications expired at `now`.
    pub fn prune_notifications(&mut self, now: Instant) {
        if self.notifications.prune(now) {
            self.emit(StoreEvent::NotificationsChanged);
        }
    }

    /// Drop notifications that have expired by now.
    pub fn prune_expired_notifications(&mut self) {
        self.prune_notifications(Instant::now());
    }

    pub fn dismiss_notification(&mut self, id: u64) {
        self.notifications.dismiss(id);
        self.emit(StoreEvent::NotificationsChanged);
    }

    // --- Whole document ---

    /// Replace the entire document (restore / import).
    pub fn replace_document(&mut self, document: PageDocument) {
        self.next_item_id = self.next_item_id.max(seed_after(&document));
        self.document = document;
        self.selection = None;
        self.emit(StoreEvent::DocumentReplaced);
    }
}

/// First free item id for a document.
fn seed_after(document: &PageDocument) -> u64 {
    document.max_item_id().map_or(1, |id| id.0 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn item(id: u64, canvas: &str) -> GridItem {
        GridItem::new(
            ItemId(id),
            CanvasId::from(canvas),
            "text",
            "Text",
            1,
            GridRect::new(0.0, 0.0, 10.0, 6.0),
        )
    }

    #[test]
    fn test_ids_seeded_above_demo_data() {
        let mut store = StateStore::new(PageDocument::demo());
        assert_eq!(store.next_item_id(), ItemId(4));
        assert_eq!(store.next_item_id(), ItemId(5));
    }

    #[test]
    fn test_insert_at_index_and_append_fallback() {
        let mut store = StateStore::new(PageDocument::with_canvases(["a"]));
        let a = CanvasId::from("a");
        assert!(store.insert_item(&a, item(1, "a"), None));
        assert!(store.insert_item(&a, item(2, "a"), Some(0)));
        assert!(store.insert_item(&a, item(3, "a"), Some(99)));

        let ids: Vec<u64> = store.canvas(&a).unwrap().items.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert!(!store.insert_item(&a, item(3, "a"), None));
    }

    #[test]
    fn test_insert_rewrites_canvas_id() {
        let mut store = StateStore::new(PageDocument::with_canvases(["a"]));
        let a = CanvasId::from("a");
        store.insert_item(&a, item(1, "elsewhere"), None);
        assert_eq!(store.item(ItemId(1)).unwrap().canvas_id, a);
    }

    #[test]
    fn test_remove_item_clears_selection() {
        let mut store = StateStore::new(PageDocument::with_canvases(["a"]));
        let a = CanvasId::from("a");
        store.insert_item(&a, item(1, "a"), None);
        assert!(store.select(&a, ItemId(1)));

        let (idx, removed) = store.remove_item(&a, ItemId(1)).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(removed.id, ItemId(1));
        assert!(store.selection().is_none());
        assert!(store.remove_item(&a, ItemId(1)).is_none());
    }

    #[test]
    fn test_relocate_between_canvases() {
        let mut store = StateStore::new(PageDocument::with_canvases(["a", "b"]));
        let a = CanvasId::from("a");
        let b = CanvasId::from("b");
        store.insert_item(&a, item(1, "a"), None);
        store.select(&a, ItemId(1));

        let layouts = Layouts::from_desktop(GridRect::new(4.0, 2.0, 10.0, 6.0));
        assert!(store.relocate_item(ItemId(1), &a, &b, layouts, None));

        assert!(store.canvas(&a).unwrap().is_empty());
        let moved = store.item_in(&b, ItemId(1)).unwrap();
        assert_eq!(moved.canvas_id, b);
        assert_eq!(moved.layouts, layouts);
        assert_eq!(store.selection().unwrap().canvas_id, b);
    }

    #[test]
    fn test_relocate_missing_is_noop() {
        let mut store = StateStore::new(PageDocument::with_canvases(["a", "b"]));
        let a = CanvasId::from("a");
        let c = CanvasId::from("c");
        store.insert_item(&a, item(1, "a"), None);
        assert!(!store.relocate_item(ItemId(1), &a, &c, Layouts::default(), None));
        assert!(!store.relocate_item(ItemId(9), &a, &a, Layouts::default(), None));
        assert_eq!(store.canvas(&a).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_canvas_clears_selection() {
        let mut store = StateStore::new(PageDocument::demo());
        let hero = CanvasId::from("hero");
        store.select(&hero, ItemId(1));
        let removed = store.remove_canvas(&hero).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.selection().is_none());
        assert!(store.item(ItemId(1)).is_none());
    }

    #[test]
    fn test_subscribers_receive_events() {
        let mut store = StateStore::new(PageDocument::with_canvases(["a"]));
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let sub = store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let a = CanvasId::from("a");
        store.insert_item(&a, item(1, "a"), None);
        store.set_viewport(Viewport::Mobile);
        store.set_viewport(Viewport::Mobile);

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::ItemAdded { canvas_id: a.clone(), item_id: ItemId(1) },
                StoreEvent::ViewportChanged(Viewport::Mobile),
            ]
        );

        assert!(store.unsubscribe(sub));
        store.set_show_grid(false);
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_document_json_round_trip() {
        let mut doc = PageDocument::demo();
        doc.canvases[1].items[0].layouts.mobile.customized = true;
        doc.canvases[1].items[0].layouts.mobile.x = Some(0.0);
        doc.canvases[1].items[0].layouts.mobile.y = Some(3.5);
        doc.canvases[1].items[0].layouts.mobile.width = Some(50.0);
        doc.canvases[1].items[0].layouts.mobile.height = Some(6.0);
        doc.viewport = Viewport::Mobile;

        let json = doc.to_json().unwrap();
        let restored = PageDocument::from_json(&json).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_notifications_expire_through_store() {
        let mut store = StateStore::default();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        store.subscribe(move |event| {
            if *event == StoreEvent::NotificationsChanged {
                *counter.borrow_mut() += 1;
            }
        });

        let start = Instant::now();
        store.notify_error_at("first", start);
        store.notify_error_at("second", start + Duration::from_secs(2));
        assert_eq!(store.notifications().len(), 2);

        // The first has expired by the time the third arrives.
        store.notify_error_at("third", start + Duration::from_secs(4));
        let messages: Vec<&str> = store.notifications().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "third"]);

        store.prune_notifications(start + Duration::from_secs(4));
        assert_eq!(store.notifications().len(), 2);
        store.prune_notifications(start + Duration::from_secs(10));
        assert!(store.notifications().is_empty());
        assert_eq!(*count.borrow(), 4);
    }

    #[test]
    fn test_replace_document_reseeds_ids() {
        let mut store = StateStore::default();
        store.replace_document(PageDocument::demo());
        assert_eq!(store.peek_next_item_id(), ItemId(4));
    }
}
