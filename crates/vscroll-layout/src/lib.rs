//! Layout tree, packing policies and spatial index for vscroll

mod axis;
pub mod collections;
mod collect;
mod error;
mod knuth_plass;
mod lazy;
mod node;
mod paginated_index;
mod policy;
mod sticky;
mod tree;

pub use axis::*;
pub use collect::*;
pub use error::*;
pub use knuth_plass::*;
pub use node::*;
pub use paginated_index::*;
pub use policy::*;
pub use tree::*;

pub use vscroll_geometry::{Bounds, Point, Rect, Size};

pub mod prelude {
    pub use crate::collect::{ItemCollector, VecCollector};
    pub use crate::node::{Extent, LayoutNode, NodeId, Sizing, ViewType};
    pub use crate::policy::{GridLayout, KnuthPlassLayout, ListLayout, OverlapLayout};
    pub use crate::tree::LayoutTree;
    pub use crate::Axis;
}

#[cfg(test)]
mod tests;
