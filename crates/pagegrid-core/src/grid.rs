//! Grid coordinate engine.
//!
//! Horizontal units are responsive: one unit is a percentage of the canvas
//! container width, so the grid follows the container as it reflows.
//! Vertical units are a fixed pixel size so item heights stay stable when
//! only the width changes.
//!
//! Reading a container's size forces a layout pass on most platforms, so
//! widths are cached per canvas until [`GridCalculator::clear_grid_size_cache`]
//! or [`GridCalculator::invalidate_canvas`] is called.

use crate::config::GridConfig;
use crate::model::{CanvasId, GridRect};
use kurbo::{Point, Rect};
use std::cell::RefCell;
use std::collections::HashMap;

/// Source of canvas container geometry.
///
/// Rectangles are in page coordinates (the same space pointer events are
/// reported in). Returning `None` means the container is not mounted.
pub trait ContainerMetrics {
    fn container_rect(&self, canvas_id: &CanvasId) -> Option<Rect>;
}

/// Fixed container geometry, for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticContainers {
    rects: HashMap<CanvasId, Rect>,
}

impl StaticContainers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a container rectangle.
    pub fn set(&mut self, canvas_id: CanvasId, rect: Rect) {
        self.rects.insert(canvas_id, rect);
    }

    pub fn with(mut self, canvas_id: impl Into<String>, rect: Rect) -> Self {
        self.set(CanvasId::new(canvas_id), rect);
        self
    }

    pub fn remove(&mut self, canvas_id: &CanvasId) {
        self.rects.remove(canvas_id);
    }
}

impl ContainerMetrics for StaticContainers {
    fn container_rect(&self, canvas_id: &CanvasId) -> Option<Rect> {
        self.rects.get(canvas_id).copied()
    }
}

/// Converts between grid units and pixels.
pub struct GridCalculator {
    config: GridConfig,
    metrics: Box<dyn ContainerMetrics>,
    /// Container widths in pixels, keyed by canvas.
    width_cache: RefCell<HashMap<CanvasId, f64>>,
}

impl std::fmt::Debug for GridCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridCalculator")
            .field("config", &self.config)
            .field("cached_canvases", &self.width_cache.borrow().len())
            .finish()
    }
}

impl GridCalculator {
    pub fn new(config: GridConfig, metrics: Box<dyn ContainerMetrics>) -> Self {
        Self {
            config,
            metrics,
            width_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
    }

    /// Replace the container source. Drops every cached width.
    pub fn set_metrics(&mut self, metrics: Box<dyn ContainerMetrics>) {
        self.metrics = metrics;
        self.clear_grid_size_cache();
    }

    /// Live (uncached) container rectangle in page coordinates.
    pub fn container_rect(&self, canvas_id: &CanvasId) -> Option<Rect> {
        self.metrics.container_rect(canvas_id)
    }

    /// Container width, served from the cache when possible.
    ///
    /// A zero width (mounted but not laid out, or hidden) is returned but
    /// not cached.
    fn container_width(&self, canvas_id: &CanvasId) -> Option<f64> {
        if let Some(width) = self.width_cache.borrow().get(canvas_id) {
            return Some(*width);
        }
        let width = self.metrics.container_rect(canvas_id)?.width();
        if width > 0.0 {
            self.width_cache.borrow_mut().insert(canvas_id.clone(), width);
        }
        Some(width)
    }

    /// Pixels per horizontal unit for a canvas.
    pub fn grid_size_horizontal(&self, canvas_id: &CanvasId) -> f64 {
        self.grid_size_horizontal_with(canvas_id, &self.config)
    }

    pub fn grid_size_horizontal_with(&self, canvas_id: &CanvasId, config: &GridConfig) -> f64 {
        match self.container_width(canvas_id) {
            Some(width) if width > 0.0 => width * config.horizontal_unit_percent / 100.0,
            _ => {
                log::debug!("No container for canvas {}, using fallback unit size", canvas_id);
                config.fallback_unit_px
            }
        }
    }

    /// Pixels per vertical unit.
    pub fn grid_size_vertical(&self) -> f64 {
        self.config.vertical_unit_px
    }

    pub fn grid_size_vertical_with(&self, config: &GridConfig) -> f64 {
        config.vertical_unit_px
    }

    /// Horizontal units to pixels for a canvas.
    pub fn grid_to_pixels_x(&self, units: f64, canvas_id: &CanvasId) -> f64 {
        units * self.grid_size_horizontal(canvas_id)
    }

    pub fn grid_to_pixels_x_with(&self, units: f64, canvas_id: &CanvasId, config: &GridConfig) -> f64 {
        units * self.grid_size_horizontal_with(canvas_id, config)
    }

    /// Vertical units to pixels. Viewport and canvas independent.
    pub fn grid_to_pixels_y(&self, units: f64) -> f64 {
        units * self.grid_size_vertical()
    }

    pub fn grid_to_pixels_y_with(&self, units: f64, config: &GridConfig) -> f64 {
        units * config.vertical_unit_px
    }

    /// Pixels to horizontal units for a canvas. Not rounded.
    pub fn pixels_to_grid_x(&self, pixels: f64, canvas_id: &CanvasId) -> f64 {
        self.pixels_to_grid_x_with(pixels, canvas_id, &self.config)
    }

    /// Returns 0 when the unit size is not positive.
    pub fn pixels_to_grid_x_with(&self, pixels: f64, canvas_id: &CanvasId, config: &GridConfig) -> f64 {
        let unit = self.grid_size_horizontal_with(canvas_id, config);
        if unit > 0.0 { pixels / unit } else { 0.0 }
    }

    /// Pixels to vertical units. Not rounded.
    pub fn pixels_to_grid_y(&self, pixels: f64) -> f64 {
        self.pixels_to_grid_y_with(pixels, &self.config)
    }

    pub fn pixels_to_grid_y_with(&self, pixels: f64, config: &GridConfig) -> f64 {
        if config.vertical_unit_px > 0.0 {
            pixels / config.vertical_unit_px
        } else {
            0.0
        }
    }

    /// Convert a grid rectangle to a container-relative pixel rectangle.
    pub fn rect_to_pixels(&self, rect: &GridRect, canvas_id: &CanvasId) -> Rect {
        let unit_x = self.grid_size_horizontal(canvas_id);
        let unit_y = self.grid_size_vertical();
        Rect::from_origin_size(
            Point::new(rect.x * unit_x, rect.y * unit_y),
            (rect.width * unit_x, rect.height * unit_y),
        )
    }

    /// Number of horizontal units spanning a full container.
    pub fn columns(&self) -> f64 {
        self.config.columns()
    }

    /// Forget every cached container width.
    ///
    /// Must be called whenever a container is resized or removed.
    pub fn clear_grid_size_cache(&self) {
        let mut cache = self.width_cache.borrow_mut();
        if !cache.is_empty() {
            log::debug!("Clearing grid size cache ({} canvases)", cache.len());
        }
        cache.clear();
    }

    /// Forget the cached width of one canvas.
    pub fn invalidate_canvas(&self, canvas_id: &CanvasId) {
        self.width_cache.borrow_mut().remove(canvas_id);
    }

    /// Number of canvases with a cached width.
    pub fn cached_canvas_count(&self) -> usize {
        self.width_cache.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Container source that counts how often it is measured.
    struct CountingContainers {
        width: f64,
        reads: Rc<Cell<usize>>,
    }

    impl ContainerMetrics for CountingContainers {
        fn container_rect(&self, canvas_id: &CanvasId) -> Option<Rect> {
            if canvas_id.as_str() == "missing" {
                return None;
            }
            self.reads.set(self.reads.get() + 1);
            Some(Rect::new(0.0, 0.0, self.width, 400.0))
        }
    }

    fn calculator(width: f64) -> (GridCalculator, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let metrics = CountingContainers { width, reads: reads.clone() };
        (GridCalculator::new(GridConfig::default(), Box::new(metrics)), reads)
    }

    #[test]
    fn test_horizontal_is_percentage_of_width() {
        let (grid, _) = calculator(1000.0);
        let canvas = CanvasId::from("main");
        assert_eq!(grid.grid_size_horizontal(&canvas), 20.0);
        assert_eq!(grid.grid_to_pixels_x(50.0, &canvas), 1000.0);
    }

    #[test]
    fn test_vertical_is_fixed() {
        let (grid, reads) = calculator(1000.0);
        assert_eq!(grid.grid_to_pixels_y(3.0), 60.0);
        assert_eq!(grid.pixels_to_grid_y(60.0), 3.0);
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn test_width_is_cached_per_canvas() {
        let (grid, reads) = calculator(800.0);
        let a = CanvasId::from("a");
        let b = CanvasId::from("b");

        for _ in 0..10 {
            grid.grid_to_pixels_x(1.0, &a);
            grid.grid_to_pixels_x(1.0, &b);
        }
        assert_eq!(reads.get(), 2);
        assert_eq!(grid.cached_canvas_count(), 2);

        grid.clear_grid_size_cache();
        grid.grid_to_pixels_x(1.0, &a);
        assert_eq!(reads.get(), 3);
    }

    #[test]
    fn test_invalidate_single_canvas() {
        let (grid, reads) = calculator(800.0);
        let a = CanvasId::from("a");
        let b = CanvasId::from("b");
        grid.grid_size_horizontal(&a);
        grid.grid_size_horizontal(&b);
        grid.invalidate_canvas(&a);
        grid.grid_size_horizontal(&a);
        grid.grid_size_horizontal(&b);
        assert_eq!(reads.get(), 3);
    }

    #[test]
    fn test_missing_container_falls_back() {
        let (grid, _) = calculator(800.0);
        let missing = CanvasId::from("missing");
        assert_eq!(grid.grid_size_horizontal(&missing), 20.0);
        assert_eq!(grid.pixels_to_grid_x(40.0, &missing), 2.0);
        assert_eq!(grid.cached_canvas_count(), 0);
    }

    /// Container whose width the test can change while the calculator holds it.
    struct LiveContainers {
        width: Rc<Cell<f64>>,
    }

    impl ContainerMetrics for LiveContainers {
        fn container_rect(&self, _canvas_id: &CanvasId) -> Option<Rect> {
            Some(Rect::new(0.0, 0.0, self.width.get(), 400.0))
        }
    }

    #[test]
    fn test_zero_width_is_not_cached() {
        let width = Rc::new(Cell::new(0.0));
        let grid = GridCalculator::new(
            GridConfig::default(),
            Box::new(LiveContainers { width: width.clone() }),
        );
        let canvas = CanvasId::from("main");

        assert_eq!(grid.grid_size_horizontal(&canvas), 20.0);
        assert_eq!(grid.cached_canvas_count(), 0);

        width.set(500.0);
        assert_eq!(grid.grid_size_horizontal(&canvas), 10.0);
        assert_eq!(grid.cached_canvas_count(), 1);

        // Cached from here on until invalidated.
        width.set(1000.0);
        assert_eq!(grid.grid_size_horizontal(&canvas), 10.0);
        grid.invalidate_canvas(&canvas);
        assert_eq!(grid.grid_size_horizontal(&canvas), 20.0);
    }

    #[test]
    fn test_round_trip() {
        let (grid, _) = calculator(937.0);
        let canvas = CanvasId::from("main");
        for units in [0.5, 1.0, 3.25, 17.0, 49.9] {
            let px = grid.grid_to_pixels_x(units, &canvas);
            assert!((grid.pixels_to_grid_x(px, &canvas) - units).abs() < 1e-9);
            let py = grid.grid_to_pixels_y(units);
            assert!((grid.pixels_to_grid_y(py) - units).abs() < 1e-9);
        }
    }

    #[test]
    fn test_override_config() {
        let (grid, _) = calculator(1000.0);
        let canvas = CanvasId::from("main");
        let config = GridConfig::default().with_horizontal_unit_percent(1.0).with_vertical_unit_px(10.0);
        assert_eq!(grid.grid_to_pixels_x_with(1.0, &canvas, &config), 10.0);
        assert_eq!(grid.grid_to_pixels_y_with(1.0, &config), 10.0);
        assert_eq!(grid.grid_to_pixels_x(1.0, &canvas), 20.0);
    }

    #[test]
    fn test_rect_to_pixels() {
        let grid = GridCalculator::new(
            GridConfig::default(),
            Box::new(StaticContainers::new().with("main", Rect::new(0.0, 0.0, 500.0, 300.0))),
        );
        let px = grid.rect_to_pixels(&GridRect::new(2.0, 1.0, 10.0, 6.0), &CanvasId::from("main"));
        assert_eq!(px, Rect::new(20.0, 20.0, 120.0, 140.0));
    }
}
