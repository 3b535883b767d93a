//! Viewport-aware layout resolution.
//!
//! Desktop layouts are always explicit. A mobile layout that has not been
//! customized is derived by stacking the canvas's items full-width in array
//! order, each one starting where the previous desktop height ends.

use crate::config::GridConfig;
use crate::model::{Canvas, GridItem, GridRect, Viewport};

fn stacked_height(item: &GridItem, config: &GridConfig) -> f64 {
    let height = item.layouts.desktop.height;
    if height > 0.0 { height } else { config.fallback_item_height_units }
}

/// Effective layout of one item given the offset accumulated by the items
/// before it.
fn resolve_item(item: &GridItem, stack_y: f64, viewport: Viewport, config: &GridConfig) -> GridRect {
    match viewport {
        Viewport::Desktop => item.layouts.desktop,
        Viewport::Mobile => match item.layouts.mobile.rect() {
            Some(rect) if item.layouts.mobile.customized => rect,
            _ => GridRect::new(0.0, stack_y, config.columns(), item.layouts.desktop.height),
        },
    }
}

/// Effective layouts of every item in a canvas, in array order.
pub fn resolve_canvas_layouts(canvas: &Canvas, viewport: Viewport, config: &GridConfig) -> Vec<GridRect> {
    let mut stack_y = 0.0;
    canvas
        .items
        .iter()
        .map(|item| {
            let rect = resolve_item(item, stack_y, viewport, config);
            stack_y += stacked_height(item, config);
            rect
        })
        .collect()
}

/// Effective layout of the item at `index`.
pub fn resolve_layout(canvas: &Canvas, index: usize, viewport: Viewport, config: &GridConfig) -> Option<GridRect> {
    let item = canvas.items.get(index)?;
    let stack_y: f64 = canvas.items[..index].iter().map(|i| stacked_height(i, config)).sum();
    Some(resolve_item(item, stack_y, viewport, config))
}

/// Height of a canvas in vertical units: tall enough for its lowest item
/// and never below the configured minimum.
pub fn canvas_height_units(canvas: &Canvas, viewport: Viewport, config: &GridConfig) -> f64 {
    resolve_canvas_layouts(canvas, viewport, config)
        .iter()
        .map(GridRect::bottom)
        .fold(config.min_canvas_height_units, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanvasId, GridPoint, ItemId};
    use pretty_assertions::assert_eq;

    fn canvas_with_heights(heights: &[f64]) -> Canvas {
        let mut canvas = Canvas::new(CanvasId::from("main"));
        for (idx, h) in heights.iter().enumerate() {
            canvas.items.push(GridItem::new(
                ItemId(idx as u64 + 1),
                canvas.id.clone(),
                "text",
                "Text",
                1,
                GridRect::new(5.0, 3.0, 12.0, *h),
            ));
        }
        canvas
    }

    #[test]
    fn test_mobile_auto_stack() {
        let canvas = canvas_with_heights(&[6.0, 4.0, 8.0]);
        let config = GridConfig::default();
        let rects = resolve_canvas_layouts(&canvas, Viewport::Mobile, &config);
        assert_eq!(
            rects,
            vec![
                GridRect::new(0.0, 0.0, 50.0, 6.0),
                GridRect::new(0.0, 6.0, 50.0, 4.0),
                GridRect::new(0.0, 10.0, 50.0, 8.0),
            ]
        );
        assert_eq!(resolve_layout(&canvas, 2, Viewport::Mobile, &config), Some(rects[2]));
    }

    #[test]
    fn test_non_positive_height_uses_fallback() {
        let canvas = canvas_with_heights(&[0.0, 4.0]);
        let rects = resolve_canvas_layouts(&canvas, Viewport::Mobile, &GridConfig::default());
        assert_eq!(rects[1].y, 6.0);
    }

    #[test]
    fn test_customized_mobile_is_explicit() {
        let mut canvas = canvas_with_heights(&[6.0, 4.0]);
        canvas.items[0].layouts.set_position(Viewport::Mobile, GridPoint::new(2.0, 30.0));
        let rects = resolve_canvas_layouts(&canvas, Viewport::Mobile, &GridConfig::default());
        assert_eq!(rects[0], GridRect::new(2.0, 30.0, 12.0, 6.0));
        // Customized items still occupy their desktop height in the stack.
        assert_eq!(rects[1].y, 6.0);
    }

    #[test]
    fn test_desktop_is_stored_layout() {
        let canvas = canvas_with_heights(&[6.0]);
        let rects = resolve_canvas_layouts(&canvas, Viewport::Desktop, &GridConfig::default());
        assert_eq!(rects, vec![GridRect::new(5.0, 3.0, 12.0, 6.0)]);
        assert_eq!(resolve_layout(&canvas, 1, Viewport::Desktop, &GridConfig::default()), None);
    }

    #[test]
    fn test_canvas_height() {
        let config = GridConfig::default();
        assert_eq!(canvas_height_units(&canvas_with_heights(&[]), Viewport::Desktop, &config), 20.0);
        let tall = canvas_with_heights(&[6.0, 4.0, 8.0, 10.0]);
        assert_eq!(canvas_height_units(&tall, Viewport::Mobile, &config), 28.0);
    }
}
