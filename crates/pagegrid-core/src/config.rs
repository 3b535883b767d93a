//! Grid and gesture configuration.

use serde::{Deserialize, Serialize};

/// Default horizontal unit as a percentage of the container width.
pub const DEFAULT_HORIZONTAL_UNIT_PERCENT: f64 = 2.0;
/// Default vertical unit in pixels.
pub const DEFAULT_VERTICAL_UNIT_PX: f64 = 20.0;
/// Default edge snap threshold in pixels.
pub const DEFAULT_EDGE_SNAP_THRESHOLD_PX: f64 = 20.0;
/// Maximum number of commands kept in the undo history.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Tunables for the coordinate system and the gesture engines.
///
/// Every field has a sensible default; hosts override individual values
/// with the `with_*` setters or load a JSON object where missing fields
/// fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width of one horizontal grid unit, in percent of the container width.
    pub horizontal_unit_percent: f64,
    /// Height of one vertical grid unit, in pixels.
    pub vertical_unit_px: f64,
    /// Minimum rendered canvas height, in vertical units.
    pub min_canvas_height_units: f64,
    /// Minimum item width during resize, in pixels.
    pub min_item_width_px: f64,
    /// Minimum item height during resize, in pixels.
    pub min_item_height_px: f64,
    /// Distance from a container edge at which a drag snaps onto the edge.
    pub edge_snap_threshold_px: f64,
    /// Width given to items dropped from the palette without a template size.
    pub default_item_width_units: f64,
    /// Height given to items dropped from the palette without a template size.
    pub default_item_height_units: f64,
    /// Height used for auto-stacking when an item has no usable height.
    pub fallback_item_height_units: f64,
    /// Pixels per horizontal unit when no container can be measured.
    pub fallback_unit_px: f64,
    /// Maximum number of undoable commands.
    pub max_history: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            horizontal_unit_percent: DEFAULT_HORIZONTAL_UNIT_PERCENT,
            vertical_unit_px: DEFAULT_VERTICAL_UNIT_PX,
            min_canvas_height_units: 20.0,
            min_item_width_px: 100.0,
            min_item_height_px: 80.0,
            edge_snap_threshold_px: DEFAULT_EDGE_SNAP_THRESHOLD_PX,
            default_item_width_units: 10.0,
            default_item_height_units: 6.0,
            fallback_item_height_units: 6.0,
            fallback_unit_px: 20.0,
            max_history: MAX_UNDO_HISTORY,
        }
    }
}

impl GridConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) configuration object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_horizontal_unit_percent(mut self, percent: f64) -> Self {
        self.horizontal_unit_percent = percent;
        self
    }

    pub fn with_vertical_unit_px(mut self, px: f64) -> Self {
        self.vertical_unit_px = px;
        self
    }

    pub fn with_min_item_size(mut self, width_px: f64, height_px: f64) -> Self {
        self.min_item_width_px = width_px;
        self.min_item_height_px = height_px;
        self
    }

    pub fn with_edge_snap_threshold(mut self, px: f64) -> Self {
        self.edge_snap_threshold_px = px;
        self
    }

    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    /// Number of horizontal units spanning a full container.
    pub fn columns(&self) -> f64 {
        if self.horizontal_unit_percent > 0.0 {
            100.0 / self.horizontal_unit_percent
        } else {
            0.0
        }
    }
}
