//! Canvas and item data model.
//!
//! All layout values are expressed in grid units. Horizontal units are a
//! percentage of the container width, vertical units a fixed pixel height;
//! see [`crate::grid`] for the conversions.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How far below zero send-to-back may push a z-index before the canvas
/// renumbers its items.
///
/// Upward growth is bounded by the allocation counter, which advances by
/// one per slot and never decreases, so it needs no compaction.
pub const Z_INDEX_COMPACT_LIMIT: i64 = 1_000_000;

/// Unique identifier of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// Identifier of a canvas (page section).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasId(pub String);

impl CanvasId {
    /// Wrap an existing id, e.g. one read from the DOM.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random canvas id.
    pub fn generate() -> Self {
        Self(format!("canvas-{}", Uuid::new_v4()))
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanvasId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which layout record of an item is authoritative for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

impl Viewport {
    /// Switch between desktop and mobile.
    pub fn toggle(self) -> Self {
        match self {
            Viewport::Desktop => Viewport::Mobile,
            Viewport::Mobile => Viewport::Desktop,
        }
    }
}

/// A position in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in grid units. Used as the desktop layout and as the
/// effective (resolved) layout of any item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GridRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }

    /// Bottom edge in vertical units.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Mobile layout. The numeric fields stay `None` until the user customizes
/// the item in the mobile viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MobileLayout {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// `false` means the item is auto-stacked from its desktop layout.
    pub customized: bool,
}

impl MobileLayout {
    /// The explicit rectangle, if every field is populated.
    pub fn rect(&self) -> Option<GridRect> {
        Some(GridRect::new(self.x?, self.y?, self.width?, self.height?))
    }
}

/// Both viewport layouts of an item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Layouts {
    pub desktop: GridRect,
    pub mobile: MobileLayout,
}

impl Layouts {
    /// A fresh layout record with an uncustomized mobile entry.
    pub fn from_desktop(desktop: GridRect) -> Self {
        Self {
            desktop,
            mobile: MobileLayout::default(),
        }
    }

    /// Stored position for a viewport, if any.
    pub fn position(&self, viewport: Viewport) -> Option<GridPoint> {
        match viewport {
            Viewport::Desktop => Some(self.desktop.origin()),
            Viewport::Mobile => Some(GridPoint::new(self.mobile.x?, self.mobile.y?)),
        }
    }

    /// Write a position into the viewport's layout.
    ///
    /// In the mobile viewport this marks the layout customized and, the first
    /// time, copies width and height from the desktop layout.
    pub fn set_position(&mut self, viewport: Viewport, position: GridPoint) {
        match viewport {
            Viewport::Desktop => {
                self.desktop.x = position.x;
                self.desktop.y = position.y;
            }
            Viewport::Mobile => {
                self.customize_mobile();
                self.mobile.x = Some(position.x);
                self.mobile.y = Some(position.y);
            }
        }
    }

    /// Write a full rectangle into the viewport's layout.
    pub fn set_rect(&mut self, viewport: Viewport, rect: GridRect) {
        match viewport {
            Viewport::Desktop => self.desktop = rect,
            Viewport::Mobile => {
                self.mobile = MobileLayout {
                    x: Some(rect.x),
                    y: Some(rect.y),
                    width: Some(rect.width),
                    height: Some(rect.height),
                    customized: true,
                };
            }
        }
    }

    /// Flag the mobile layout as customized, seeding missing size fields
    /// from the desktop layout.
    pub fn customize_mobile(&mut self) {
        self.mobile.customized = true;
        if self.mobile.width.is_none() {
            self.mobile.width = Some(self.desktop.width);
        }
        if self.mobile.height.is_none() {
            self.mobile.height = Some(self.desktop.height);
        }
    }
}

/// One placed component instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridItem {
    pub id: ItemId,
    /// The canvas whose item list currently contains this item.
    pub canvas_id: CanvasId,
    /// Opaque discriminator selecting the content component.
    pub component_type: String,
    /// User-editable display label.
    pub name: String,
    pub z_index: i64,
    pub layouts: Layouts,
}

impl GridItem {
    pub fn new(
        id: ItemId,
        canvas_id: CanvasId,
        component_type: impl Into<String>,
        name: impl Into<String>,
        z_index: i64,
        desktop: GridRect,
    ) -> Self {
        Self {
            id,
            canvas_id,
            component_type: component_type.into(),
            name: name.into(),
            z_index,
            layouts: Layouts::from_desktop(desktop),
        }
    }
}

/// A canvas: an ordered list of items plus presentation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub id: CanvasId,
    /// Items in insertion (array) order. Auto-stacking follows this order.
    pub items: Vec<GridItem>,
    /// Next z-index slot. Never decreases.
    pub z_index_counter: i64,
    pub background_color: String,
}

impl Canvas {
    /// Default background for new sections.
    pub const DEFAULT_BACKGROUND: &'static str = "#ffffff";

    pub fn new(id: CanvasId) -> Self {
        Self {
            id,
            items: Vec::new(),
            z_index_counter: 1,
            background_color: Self::DEFAULT_BACKGROUND.to_string(),
        }
    }

    /// Whether the canvas has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on the canvas.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Array index of an item.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Look up an item by id.
    pub fn item(&self, id: ItemId) -> Option<&GridItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut GridItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn max_z_index(&self) -> Option<i64> {
        self.items.iter().map(|item| item.z_index).max()
    }

    fn min_z_index(&self) -> Option<i64> {
        self.items.iter().map(|item| item.z_index).min()
    }

    /// Hand out the next z-index slot.
    ///
    /// The returned value is above every current item, and the counter is
    /// left strictly above the returned value.
    pub fn allocate_z_index(&mut self) -> i64 {
        if let Some(max) = self.max_z_index() {
            if self.z_index_counter <= max {
                self.z_index_counter = max + 1;
            }
        }
        let z = self.z_index_counter;
        self.z_index_counter += 1;
        z
    }

    /// Raise an item above every other item. Returns false if not found.
    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        let z = self.allocate_z_index();
        if let Some(item) = self.item_mut(id) {
            item.z_index = z;
        }
        self.compact_if_needed();
        true
    }

    /// Lower an item below every other item without touching the counter.
    pub fn send_to_back(&mut self, id: ItemId) -> bool {
        let Some(min) = self.min_z_index() else {
            return false;
        };
        let Some(item) = self.item_mut(id) else {
            return false;
        };
        item.z_index = min - 1;
        self.compact_if_needed();
        true
    }

    /// Renumber z-indices to `0..n` in current stacking order.
    ///
    /// Ties keep their array order. The counter is raised if needed but
    /// never lowered.
    pub fn compact_z_indices(&mut self) {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by_key(|&idx| self.items[idx].z_index);
        for (z, idx) in order.into_iter().enumerate() {
            self.items[idx].z_index = z as i64;
        }
        self.z_index_counter = self.z_index_counter.max(self.items.len() as i64);
    }

    fn compact_if_needed(&mut self) {
        if self.min_z_index().is_some_and(|min| min < -Z_INDEX_COMPACT_LIMIT) {
            log::debug!("Compacting z-indices on canvas {}", self.id);
            self.compact_z_indices();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, z: i64) -> GridItem {
        GridItem::new(
            ItemId(id),
            CanvasId::from("main"),
            "text",
            "Text",
            z,
            GridRect::new(0.0, 0.0, 10.0, 6.0),
        )
    }

    #[test]
    fn test_allocate_z_index_exceeds_items() {
        let mut canvas = Canvas::new(CanvasId::from("main"));
        canvas.items.push(item(1, 7));
        let z = canvas.allocate_z_index();
        assert_eq!(z, 8);
        assert!(canvas.z_index_counter > z);
    }

    #[test]
    fn test_send_to_back_keeps_counter() {
        let mut canvas = Canvas::new(CanvasId::from("main"));
        canvas.items.push(item(1, 1));
        canvas.items.push(item(2, 2));
        canvas.z_index_counter = 3;

        assert!(canvas.send_to_back(ItemId(2)));
        assert_eq!(canvas.item(ItemId(2)).unwrap().z_index, 0);
        assert_eq!(canvas.z_index_counter, 3);

        assert!(canvas.bring_to_front(ItemId(2)));
        assert_eq!(canvas.item(ItemId(2)).unwrap().z_index, 3);
        assert_eq!(canvas.z_index_counter, 4);
    }

    #[test]
    fn test_compaction_preserves_order() {
        let mut canvas = Canvas::new(CanvasId::from("main"));
        canvas.items.push(item(1, 5));
        canvas.items.push(item(2, -Z_INDEX_COMPACT_LIMIT));
        canvas.items.push(item(3, 9));
        canvas.z_index_counter = 10;

        assert!(canvas.send_to_back(ItemId(1)));

        let z: Vec<i64> = canvas.items.iter().map(|i| i.z_index).collect();
        assert_eq!(z, vec![0, 1, 2]);
        assert_eq!(canvas.z_index_counter, 10);
    }

    #[test]
    fn test_high_counter_does_not_trigger_compaction() {
        let mut canvas = Canvas::new(CanvasId::from("main"));
        canvas.items.push(item(1, 1));
        canvas.items.push(item(2, 2));
        canvas.z_index_counter = Z_INDEX_COMPACT_LIMIT + 5;

        assert!(canvas.bring_to_front(ItemId(1)));
        assert!(canvas.bring_to_front(ItemId(2)));
        assert_eq!(canvas.item(ItemId(1)).unwrap().z_index, Z_INDEX_COMPACT_LIMIT + 5);
        assert_eq!(canvas.item(ItemId(2)).unwrap().z_index, Z_INDEX_COMPACT_LIMIT + 6);
        assert_eq!(canvas.z_index_counter, Z_INDEX_COMPACT_LIMIT + 7);
    }

    #[test]
    fn test_mobile_position_copies_desktop_size_once() {
        let mut layouts = Layouts::from_desktop(GridRect::new(1.0, 2.0, 12.0, 4.0));
        layouts.set_position(Viewport::Mobile, GridPoint::new(3.0, 5.0));

        assert!(layouts.mobile.customized);
        assert_eq!(layouts.mobile.rect(), Some(GridRect::new(3.0, 5.0, 12.0, 4.0)));

        layouts.mobile.width = Some(20.0);
        layouts.set_position(Viewport::Mobile, GridPoint::new(0.0, 0.0));
        assert_eq!(layouts.mobile.width, Some(20.0));
    }

    #[test]
    fn test_desktop_position_leaves_mobile_untouched() {
        let mut layouts = Layouts::from_desktop(GridRect::new(1.0, 2.0, 12.0, 4.0));
        layouts.set_position(Viewport::Desktop, GridPoint::new(8.0, 9.0));
        assert_eq!(layouts.desktop, GridRect::new(8.0, 9.0, 12.0, 4.0));
        assert_eq!(layouts.mobile, MobileLayout::default());
    }
}
