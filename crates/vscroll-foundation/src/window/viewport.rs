//! Materialization window.
//!
//! The window is the visible rectangle grown by preload pages and snapped
//! outward to multiples of the viewport size, so small scroll steps map to
//! the same window and do not trigger a pass.

use vscroll_geometry::{Bounds, Point, Size};

use super::config::WindowConfig;
use crate::scroll::ScrollDirection;

/// Snaps `value` down to a multiple of `page` after stepping back `pages`
/// pages. `None` (axis not scrollable) or an empty page leaves it unchanged.
pub fn lower_nearest(value: f32, page: f32, pages: Option<u32>) -> f32 {
    match pages {
        Some(pages) if page > 0.0 => {
            let value = value - page * pages as f32;
            (value / page).floor() * page
        }
        _ => value,
    }
}

/// Snaps `value` up to a multiple of `page` after stepping forward `pages`
/// pages.
pub fn upper_nearest(value: f32, page: f32, pages: Option<u32>) -> f32 {
    match pages {
        Some(pages) if page > 0.0 => {
            let value = value + page * pages as f32;
            (value / page).ceil() * page
        }
        _ => value,
    }
}

/// Visible rectangle and the window materialized around it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportWindow {
    pub view: Bounds,
    pub window: Bounds,
}

impl ViewportWindow {
    pub fn compute(
        position: Point,
        inner: Size,
        direction: ScrollDirection,
        config: &WindowConfig,
    ) -> Self {
        let view = Bounds::from_origin_size(position, inner);
        let (left, right) = config.preload.edges(direction.horizontal);
        let (top, bottom) = config.preload.edges(direction.vertical);
        let horizontal = config.horizontal_scroll;
        let vertical = config.vertical_scroll;

        let window = Bounds::new(
            lower_nearest(view.left, inner.width, horizontal.then_some(left)),
            lower_nearest(view.top, inner.height, vertical.then_some(top)),
            upper_nearest(view.right, inner.width, horizontal.then_some(right)),
            upper_nearest(view.bottom, inner.height, vertical.then_some(bottom)),
        );
        Self { view, window }
    }
}
