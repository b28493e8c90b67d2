//! Packing policies.
//!
//! Each container carries one [`Policy`]. Repacking dispatches on the tag to
//! the matching `pack_*` routine on [`LayoutTree`](crate::LayoutTree); the
//! routines rebuild the container's spatial index as they place children.

mod grid;
mod justified;
mod list;
mod overlap;

use vscroll_geometry::Size;

use crate::{Axis, KnuthPlassOptions};

/// Children stacked one after another along `axis`, separated by `margin`.
///
/// Sticky children are indexed separately; `margin` also keeps pinned
/// headers from overlapping each other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListLayout {
    pub axis: Axis,
    pub margin: f32,
}

impl ListLayout {
    pub fn vertical(margin: f32) -> Self {
        Self {
            axis: Axis::Vertical,
            margin,
        }
    }

    pub fn horizontal(margin: f32) -> Self {
        Self {
            axis: Axis::Horizontal,
            margin,
        }
    }
}

impl Default for ListLayout {
    fn default() -> Self {
        Self::vertical(0.0)
    }
}

/// Fixed-size cells wrapped into rows. Scrolls vertically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub h_margin: f32,
    pub v_margin: f32,
    /// Cell size used for children that fill a dimension.
    pub cell: Size,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            h_margin: 0.0,
            v_margin: 0.0,
            cell: Size::new(100.0, 100.0),
        }
    }
}

/// Justified rows (or columns) of aspect-ratio driven cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnuthPlassLayout {
    pub axis: Axis,
    pub margin: f32,
    /// Target row thickness.
    pub size: f32,
    /// Rows may deviate from `size` by at most this much.
    pub size_tolerance: f32,
    pub options: KnuthPlassOptions,
}

impl KnuthPlassLayout {
    pub fn vertical(size: f32, margin: f32) -> Self {
        Self {
            axis: Axis::Vertical,
            margin,
            size,
            ..Self::default()
        }
    }

    pub fn horizontal(size: f32, margin: f32) -> Self {
        Self {
            axis: Axis::Horizontal,
            margin,
            size,
            ..Self::default()
        }
    }
}

impl Default for KnuthPlassLayout {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            margin: 0.0,
            size: 120.0,
            size_tolerance: 50.0,
            options: KnuthPlassOptions::default(),
        }
    }
}

/// Every child stacked at the container origin.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct OverlapLayout;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Policy {
    List(ListLayout),
    Grid(GridLayout),
    KnuthPlass(KnuthPlassLayout),
    Overlap(OverlapLayout),
}

impl Policy {
    /// Axis the spatial index is keyed on, `None` for unindexed policies.
    pub fn index_axis(&self) -> Option<Axis> {
        match self {
            Policy::List(list) => Some(list.axis),
            Policy::Grid(_) => Some(Axis::Vertical),
            Policy::KnuthPlass(layout) => Some(layout.axis),
            Policy::Overlap(_) => None,
        }
    }

    /// Constraint axis whose change forces a repack, `None` for both.
    pub fn cross_axis(&self) -> Option<Axis> {
        self.index_axis().map(Axis::cross_axis)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Policy::List(_))
    }
}

impl From<ListLayout> for Policy {
    fn from(layout: ListLayout) -> Self {
        Policy::List(layout)
    }
}

impl From<GridLayout> for Policy {
    fn from(layout: GridLayout) -> Self {
        Policy::Grid(layout)
    }
}

impl From<KnuthPlassLayout> for Policy {
    fn from(layout: KnuthPlassLayout) -> Self {
        Policy::KnuthPlass(layout)
    }
}

impl From<OverlapLayout> for Policy {
    fn from(layout: OverlapLayout) -> Self {
        Policy::Overlap(layout)
    }
}
