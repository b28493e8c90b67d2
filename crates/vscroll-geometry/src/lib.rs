//! Pure math/data for the vscroll layout engine

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{Bounds, Point, Rect, Size};
}
