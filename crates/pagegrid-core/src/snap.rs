//! Snapping and clamping in container-relative pixel space.

use kurbo::{Point, Size};

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Round a pixel value to the nearest multiple of `unit`.
pub fn snap_value(value: f64, unit: f64) -> f64 {
    if unit <= 0.0 {
        return value;
    }
    (value / unit).round() * unit
}

/// Snap a point to the grid, each axis with its own unit size.
pub fn snap_to_grid(point: Point, unit_x: f64, unit_y: f64) -> SnapResult {
    SnapResult {
        point: Point::new(snap_value(point.x, unit_x), snap_value(point.y, unit_y)),
        snapped_x: unit_x > 0.0,
        snapped_y: unit_y > 0.0,
    }
}

/// Clamp a box origin so the whole box lies inside the container.
///
/// A box larger than the container is pinned to the leading edge.
pub fn clamp_to_container(origin: Point, size: Size, container: Size) -> Point {
    let max_x = (container.width - size.width).max(0.0);
    let max_y = (container.height - size.height).max(0.0);
    Point::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
}

/// Shrink a size so it never exceeds the container.
pub fn clamp_size_to_container(size: Size, container: Size) -> Size {
    Size::new(size.width.min(container.width), size.height.min(container.height))
}

/// Pull a box onto a container edge when it ends within `threshold` of it.
///
/// The leading edge (left/top) wins when the box is close to both.
pub fn snap_to_edges(origin: Point, size: Size, container: Size, threshold: f64) -> SnapResult {
    let mut result = SnapResult::none(origin);

    if origin.x < threshold {
        result.point.x = 0.0;
        result.snapped_x = true;
    } else if container.width - (origin.x + size.width) < threshold {
        result.point.x = (container.width - size.width).max(0.0);
        result.snapped_x = true;
    }

    if origin.y < threshold {
        result.point.y = 0.0;
        result.snapped_y = true;
    } else if container.height - (origin.y + size.height) < threshold {
        result.point.y = (container.height - size.height).max(0.0);
        result.snapped_y = true;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_value() {
        assert_eq!(snap_value(14.0, 10.0), 10.0);
        assert_eq!(snap_value(15.0, 10.0), 20.0);
        assert_eq!(snap_value(-4.0, 10.0), 0.0);
        assert_eq!(snap_value(7.0, 0.0), 7.0);
    }

    #[test]
    fn test_grid_snap_is_idempotent() {
        for (x, y) in [(13.7, 42.2), (99.9, 0.1), (250.0, 61.0)] {
            let once = snap_to_grid(Point::new(x, y), 12.5, 20.0).point;
            let twice = snap_to_grid(once, 12.5, 20.0).point;
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_clamp_keeps_box_inside() {
        let container = Size::new(500.0, 300.0);
        let size = Size::new(100.0, 80.0);
        assert_eq!(clamp_to_container(Point::new(-20.0, -5.0), size, container), Point::new(0.0, 0.0));
        assert_eq!(clamp_to_container(Point::new(450.0, 260.0), size, container), Point::new(400.0, 220.0));
        assert_eq!(
            clamp_to_container(Point::new(40.0, 10.0), Size::new(800.0, 80.0), container),
            Point::new(0.0, 10.0)
        );
    }

    #[test]
    fn test_edge_snap() {
        let container = Size::new(500.0, 300.0);
        let size = Size::new(100.0, 80.0);

        let near_left_top = snap_to_edges(Point::new(15.0, 19.0), size, container, 20.0);
        assert_eq!(near_left_top.point, Point::new(0.0, 0.0));
        assert!(near_left_top.snapped_x && near_left_top.snapped_y);

        let near_right_bottom = snap_to_edges(Point::new(385.0, 205.0), size, container, 20.0);
        assert_eq!(near_right_bottom.point, Point::new(400.0, 220.0));

        let middle = snap_to_edges(Point::new(200.0, 100.0), size, container, 20.0);
        assert!(!middle.is_snapped());
    }
}
