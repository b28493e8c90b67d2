//! Scroll anchoring.

use vscroll_geometry::{Bounds, Point, Rect};
use vscroll_layout::{LayoutTree, NodeId};

/// An item whose on-screen position should survive the next layout pass.
///
/// Captured bookmarks remember the node and its offset from the viewport
/// origin. Bookmarks built from data are resolved by searching the tree.
#[derive(Clone, Debug)]
pub struct Bookmark<D> {
    item: Option<NodeId>,
    data: Option<D>,
    offset: Point,
    distance: f32,
    centered: bool,
}

impl<D> Bookmark<D> {
    /// Keeps the item carrying `data` at the viewport origin.
    pub fn for_data(data: D) -> Self {
        Self {
            item: None,
            data: Some(data),
            offset: Point::ZERO,
            distance: 0.0,
            centered: false,
        }
    }

    /// Centers the item carrying `data` in the viewport.
    pub fn centered(data: D) -> Self {
        Self {
            centered: true,
            ..Self::for_data(data)
        }
    }

    /// Keeps `item` at `offset` from the viewport origin.
    pub fn at(item: NodeId, offset: Point) -> Self {
        Self {
            item: Some(item),
            data: None,
            offset,
            distance: offset.x * offset.x + offset.y * offset.y,
            centered: false,
        }
    }

    pub fn item(&self) -> Option<NodeId> {
        self.item
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Squared distance from the viewport origin at capture time.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Finds the live node for this bookmark, by identity first and by data
    /// second. A miss leaves the bookmark unresolved.
    pub fn resolve(&mut self, tree: &LayoutTree<D>, root: NodeId) -> Option<NodeId>
    where
        D: PartialEq,
    {
        if let Some(item) = self.item.filter(|item| tree.contains(*item)) {
            return Some(item);
        }
        self.item = None;
        let found = self
            .data
            .as_ref()
            .and_then(|data| tree.resolve_bookmark(root, data));
        self.item = found;
        found
    }

    /// Scroll position that puts an item laid out at `rect` back where the
    /// bookmark wants it inside `view`.
    pub fn scroll_target(&self, rect: Rect, view: &Bounds) -> Point {
        if self.centered {
            Point::new(
                rect.left - (view.width() - rect.width) / 2.0,
                rect.top - (view.height() - rect.height) / 2.0,
            )
        } else {
            Point::new(rect.left - self.offset.x, rect.top - self.offset.y)
        }
    }
}

/// Picks the leaf nearest to the viewport origin among `items`, ignoring
/// containers, pinned headers and anything above or left of the origin.
pub fn compute_bookmark<D: Clone>(
    tree: &LayoutTree<D>,
    items: &[NodeId],
    origin: Point,
) -> Option<Bookmark<D>> {
    let mut best: Option<Bookmark<D>> = None;
    for id in items {
        let Some(node) = tree.get(*id) else {
            continue;
        };
        if node.is_container() || tree.has_children(*id) || node.fixed() {
            continue;
        }
        let offset = Point::new(node.left() - origin.x, node.top() - origin.y);
        if offset.x < 0.0 || offset.y < 0.0 {
            continue;
        }
        let candidate = Bookmark::at(*id, offset);
        if best
            .as_ref()
            .map_or(true, |best| best.distance > candidate.distance)
        {
            best = Some(Bookmark {
                data: Some(node.data().clone()),
                ..candidate
            });
        }
    }
    best
}
