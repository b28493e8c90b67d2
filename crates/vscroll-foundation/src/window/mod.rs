//! Window controller.
//!
//! [`WindowController`] drives one layout tree against one scroll surface.
//! Each pass lays out the root inside the surface, keeps the bookmarked item
//! in place, collects everything inside the materialization window into
//! per-type render lists, and feeds those lists to the recyclers.

mod bookmark;
mod config;
mod pending;
mod viewport;

pub use bookmark::*;
pub use config::*;
pub use pending::PendingItems;
pub use viewport::*;

use indexmap::IndexMap;
use smallvec::SmallVec;
use vscroll_geometry::{Bounds, Point, Rect, Size};
use vscroll_layout::{ItemCollector, LayoutError, LayoutTree, NodeId, ViewType};

use crate::recycler::{Recycler, RecyclerStats};
use crate::scroll::ScrollSurface;

/// Render list and slot pool of one view type.
#[derive(Debug)]
pub struct ViewInfo {
    items: Vec<NodeId>,
    recycler: Recycler<NodeId>,
}

impl ViewInfo {
    fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            recycler: Recycler::new(capacity),
        }
    }

    /// Visible items of this type, in collection order.
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn slots(&self) -> &[Option<NodeId>] {
        self.recycler.slots()
    }

    pub fn recycler(&self) -> &Recycler<NodeId> {
        &self.recycler
    }
}

/// What a renderer needs to draw one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPlacement {
    pub id: NodeId,
    pub rect: Rect,
    pub fixed: bool,
    pub fixed_left: f32,
    pub fixed_top: f32,
}

impl ItemPlacement {
    pub fn display_origin(&self) -> Point {
        if self.fixed {
            Point::new(self.fixed_left, self.fixed_top)
        } else {
            self.rect.origin()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// No live root or no registered view type. Nothing is materialized.
    Unconfigured,
    /// No surface attached, or the surface has no area.
    NoViewport,
    /// Nothing was dirty and the window did not move.
    Skipped,
    Completed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PassReport {
    pub outcome: PassOutcome,
    /// Materialization window of the pass, if one was computed.
    pub window: Option<Bounds>,
    /// Items reported by the collection, containers included.
    pub collected: usize,
    /// Placeholders whose load should be started.
    pub load_requests: Vec<NodeId>,
    /// Placeholders whose load should be aborted.
    pub cancelled: Vec<NodeId>,
    /// Whether the pass was repeated after scrolling to a bookmark.
    pub retried: bool,
}

impl PassReport {
    fn idle(outcome: PassOutcome, window: Option<Bounds>) -> Self {
        Self {
            outcome,
            window,
            collected: 0,
            load_requests: Vec::new(),
            cancelled: Vec::new(),
            retried: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Start,
    End,
}

/// Which edge of the viewport an element is scrolled to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollAlign {
    pub horizontal: Align,
    pub vertical: Align,
}

/// Fraction of an element inside the viewport on each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Visibility {
    pub horizontal: f32,
    pub vertical: f32,
}

fn axis_visibility(start: f32, end: f32, view_start: f32, view_end: f32) -> f32 {
    let inside = start >= view_start && end <= view_end;
    let covering = start <= view_start && end >= view_end;
    if inside || covering {
        1.0
    } else if end < view_start || start > view_end {
        0.0
    } else {
        (end.min(view_end) - start.max(view_start)) / (end - start)
    }
}

struct PassCollector {
    bounds: Bounds,
    items: Vec<NodeId>,
    sticky_containers: SmallVec<[NodeId; 4]>,
}

impl ItemCollector for PassCollector {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn add_item(&mut self, id: NodeId) {
        self.items.push(id);
    }

    fn add_sticky_container(&mut self, id: NodeId) {
        self.sticky_containers.push(id);
    }
}

#[derive(Debug, Default)]
struct Warnings {
    root: bool,
    mapping: bool,
}

pub struct WindowController<D, S> {
    tree: LayoutTree<D>,
    root: Option<NodeId>,
    surface: Option<S>,
    config: WindowConfig,
    views: IndexMap<ViewType, ViewInfo>,
    items: Vec<NodeId>,
    sticky_containers: SmallVec<[NodeId; 4]>,
    pending: PendingItems,
    window: Option<Bounds>,
    content_size: Size,
    layout_tracker: bool,
    tracker_bookmark: Option<Bookmark<D>>,
    warnings: Warnings,
}

impl<D, S> WindowController<D, S> {
    pub fn new(config: WindowConfig) -> Self {
        Self::with_tree(LayoutTree::new(), config)
    }

    pub fn with_tree(tree: LayoutTree<D>, config: WindowConfig) -> Self {
        Self {
            tree,
            root: None,
            surface: None,
            config,
            views: IndexMap::new(),
            items: Vec::new(),
            sticky_containers: SmallVec::new(),
            pending: PendingItems::default(),
            window: None,
            content_size: Size::ZERO,
            layout_tracker: false,
            tracker_bookmark: None,
            warnings: Warnings::default(),
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn tree(&self) -> &LayoutTree<D> {
        &self.tree
    }

    /// Edits made here are picked up by the next pass through the dirty
    /// flags they leave on the root.
    pub fn tree_mut(&mut self) -> &mut LayoutTree<D> {
        &mut self.tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        if self.root != root {
            self.root = root;
            self.window = None;
        }
    }

    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
        self.window = None;
    }

    pub fn detach_surface(&mut self) -> Option<S> {
        self.window = None;
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Adds a render list for `view_type`. Items of unregistered types are
    /// collected but not rendered.
    pub fn register_view_type(&mut self, view_type: ViewType) {
        let capacity = self.config.recycler_capacity;
        self.views
            .entry(view_type)
            .or_insert_with(|| ViewInfo::new(capacity));
        self.window = None;
    }

    pub fn view(&self, view_type: ViewType) -> Option<&ViewInfo> {
        self.views.get(&view_type)
    }

    /// Registered view types in registration order.
    pub fn views(&self) -> impl Iterator<Item = (ViewType, &ViewInfo)> + '_ {
        self.views.iter().map(|(view_type, info)| (*view_type, info))
    }

    /// Everything the last completed pass collected, containers included.
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn sticky_containers(&self) -> &[NodeId] {
        &self.sticky_containers
    }

    pub fn pending(&self) -> &PendingItems {
        &self.pending
    }

    /// Materialization window of the last pass that got past the skip check.
    pub fn window(&self) -> Option<Bounds> {
        self.window
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Slot counters summed over every view type.
    pub fn recycler_stats(&self) -> RecyclerStats {
        self.views
            .values()
            .map(|info| info.recycler.stats())
            .fold(RecyclerStats::default(), |total, stats| RecyclerStats {
                slots_in_use: total.slots_in_use + stats.slots_in_use,
                slots_free: total.slots_free + stats.slots_free,
                slots_created: total.slots_created + stats.slots_created,
                rebinds: total.rebinds + stats.rebinds,
            })
    }

    pub fn layout_tracker(&self) -> bool {
        self.layout_tracker
    }

    pub fn placement(&self, id: NodeId) -> Option<ItemPlacement> {
        let node = self.tree.get(id)?;
        let sticky = node.sticky_state().unwrap_or_default();
        Some(ItemPlacement {
            id,
            rect: node.rect(),
            fixed: sticky.fixed,
            fixed_left: sticky.fixed_left,
            fixed_top: sticky.fixed_top,
        })
    }

    /// Placements of the visible items of `view_type`.
    pub fn placements(&self, view_type: ViewType) -> Vec<ItemPlacement> {
        self.views.get(&view_type).map_or_else(Vec::new, |info| {
            info.items
                .iter()
                .filter_map(|id| self.placement(*id))
                .collect()
        })
    }
}

impl<D, S> WindowController<D, S>
where
    D: Clone + PartialEq,
    S: ScrollSurface,
{
    /// Keeps the item nearest the viewport origin stationary across passes
    /// until turned off. Meant for continuous resizing.
    pub fn set_layout_tracker(&mut self, enabled: bool) {
        self.layout_tracker = enabled;
        if !enabled {
            if let Some(item) = self.tracker_bookmark.take().and_then(|b| b.item()) {
                self.tree.mark_bookmark(item, false);
            }
        }
    }

    /// Runs a pass unless nothing is dirty and the window did not move.
    pub fn refresh(&mut self) -> Result<PassReport, LayoutError> {
        self.pass(false, None)
    }

    /// Runs a pass unconditionally, without bookmark anchoring.
    pub fn force_refresh(&mut self) -> Result<PassReport, LayoutError> {
        self.pass(true, None)
    }

    /// Runs a pass that scrolls to keep `bookmark` in place.
    pub fn refresh_with_bookmark(
        &mut self,
        bookmark: Bookmark<D>,
    ) -> Result<PassReport, LayoutError> {
        self.pass(false, Some(bookmark))
    }

    fn live_root(&mut self) -> Option<NodeId> {
        match self.root.filter(|root| self.tree.contains(*root)) {
            Some(root) => Some(root),
            None => {
                if !self.warnings.root {
                    log::warn!("WindowController: no layout root, rendering nothing");
                    self.warnings.root = true;
                }
                None
            }
        }
    }

    fn pass(
        &mut self,
        force: bool,
        requested: Option<Bookmark<D>>,
    ) -> Result<PassReport, LayoutError> {
        let Some(root) = self.live_root() else {
            return Ok(PassReport::idle(PassOutcome::Unconfigured, None));
        };
        if self.views.is_empty() {
            if !self.warnings.mapping {
                log::warn!("WindowController: no view types registered, rendering nothing");
                self.warnings.mapping = true;
            }
            return Ok(PassReport::idle(PassOutcome::Unconfigured, None));
        }
        let Some(surface) = self.surface.as_ref() else {
            return Ok(PassReport::idle(PassOutcome::NoViewport, None));
        };
        let inner = surface.inner_size();
        if inner.is_empty() || !inner.width.is_finite() || !inner.height.is_finite() {
            return Ok(PassReport::idle(PassOutcome::NoViewport, None));
        }
        let position = surface.scroll_position();
        let viewport =
            ViewportWindow::compute(position, inner, surface.direction(), &self.config);
        let dirty = self.tree.is_dirty(root);
        let explicit = requested.is_some();

        let mut bookmark = requested;
        if self.layout_tracker {
            if self.tracker_bookmark.is_none() {
                self.tracker_bookmark = compute_bookmark(&self.tree, &self.items, position);
                if let Some(item) = self.tracker_bookmark.as_ref().and_then(Bookmark::item) {
                    self.tree.mark_bookmark(item, true);
                }
            }
            bookmark = self.tracker_bookmark.clone();
        } else if bookmark.is_none() && dirty {
            bookmark = compute_bookmark(&self.tree, &self.items, position);
        }

        if !force && !dirty && !explicit && self.window == Some(viewport.window) {
            self.update_sticky(&viewport.view);
            return Ok(PassReport::idle(PassOutcome::Skipped, self.window));
        }
        self.window = Some(viewport.window);

        let margin = self.config.margin;
        if let Err(err) =
            self.tree
                .layout(root, margin, margin, inner.width - margin, inner.height - margin)
        {
            log::debug!("WindowController: layout failed, keeping previous items: {}", err);
            self.window = None;
            return Err(err);
        }
        let size = self.tree.node(root)?.rect().size();
        self.content_size = Size::new(size.width + margin, size.height + margin);
        if let Some(surface) = self.surface.as_mut() {
            surface.set_content_size(self.content_size);
        }

        if !force {
            if let Some(mut bookmark) = bookmark {
                if let Some(item) = bookmark.resolve(&self.tree, root) {
                    let rect = self.tree.node(item)?.rect();
                    let target = bookmark.scroll_target(rect, &viewport.view);
                    if self.layout_tracker {
                        self.tracker_bookmark = Some(bookmark.clone());
                    }
                    let moved = self
                        .surface
                        .as_mut()
                        .is_some_and(|surface| surface.scroll_to(target));
                    if moved {
                        log::debug!("WindowController: scrolled to bookmark, repeating pass");
                        let mut report = self.pass(true, Some(bookmark))?;
                        report.retried = true;
                        return Ok(report);
                    }
                }
            }
        }

        let mut collector = PassCollector {
            bounds: viewport.window,
            items: Vec::new(),
            sticky_containers: SmallVec::new(),
        };
        self.tree.collect(root, &mut collector);

        let mut pending = self.pending.begin();
        let mut lists = vec![Vec::new(); self.views.len()];
        for id in &collector.items {
            pending.visit(&mut self.tree, *id);
            let view_type = self.tree.get(*id).and_then(|node| node.view_type());
            if let Some(index) = view_type.and_then(|view_type| self.views.get_index_of(&view_type)) {
                lists[index].push(*id);
            }
        }
        let (load_requests, cancelled) = pending.finish(&mut self.tree, &mut self.pending);

        for (info, list) in self.views.values_mut().zip(lists) {
            info.recycler.update(&list);
            info.items = list;
        }
        let collected = collector.items.len();
        self.items = collector.items;
        self.sticky_containers = collector.sticky_containers;
        self.update_sticky(&viewport.view);

        log::debug!(
            "WindowController: pass over {:?} collected {} items, {} loads, {} cancelled",
            viewport.window,
            collected,
            load_requests.len(),
            cancelled.len()
        );
        Ok(PassReport {
            outcome: PassOutcome::Completed,
            window: self.window,
            collected,
            load_requests,
            cancelled,
            retried: false,
        })
    }

    fn update_sticky(&mut self, view: &Bounds) {
        for container in self.sticky_containers.clone() {
            self.tree.update_sticky(container, view);
        }
    }

    /// Node carrying `data` under the root.
    pub fn virtual_item(&self, data: &D) -> Option<NodeId> {
        let root = self.root?;
        self.tree.resolve_bookmark(root, data)
    }

    pub fn element_visibility(&self, data: &D) -> Visibility {
        let rect = self
            .virtual_item(data)
            .and_then(|id| self.tree.get(id))
            .map(|node| node.rect());
        let (Some(rect), Some(surface)) = (rect, self.surface.as_ref()) else {
            return Visibility::default();
        };
        let view = surface.viewport();
        Visibility {
            horizontal: axis_visibility(rect.left, rect.right(), view.left, view.right),
            vertical: axis_visibility(rect.top, rect.bottom(), view.top, view.bottom),
        }
    }

    /// Whether at least `ratio` of the element is visible on both axes.
    pub fn element_in_viewport(&self, data: &D, ratio: f32) -> bool {
        let visibility = self.element_visibility(data);
        visibility.horizontal >= ratio && visibility.vertical >= ratio
    }

    /// Scrolls so the element carrying `data` sits at the aligned edges,
    /// inset by `offset`. The next refresh materializes the new window.
    /// Returns false if no element carries `data`.
    pub fn scroll_to_element(&mut self, data: &D, align: ScrollAlign, offset: Point) -> bool {
        let rect = self
            .virtual_item(data)
            .and_then(|id| self.tree.get(id))
            .map(|node| node.rect());
        let Some(rect) = rect else {
            log::warn!("WindowController: no element to scroll to");
            return false;
        };
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let inner = surface.inner_size();
        let mut target = Point::new(rect.left - offset.x, rect.top - offset.y);
        if align.vertical == Align::End {
            target.y += rect.height - inner.height + 2.0 * offset.y;
        }
        if align.horizontal == Align::End {
            target.x += rect.width - inner.width + 2.0 * offset.x;
        }
        surface.scroll_to(target);
        true
    }

    /// Moves the surface. Returns true if the position changed.
    pub fn scroll_to(&mut self, position: Point) -> bool {
        self.surface
            .as_mut()
            .is_some_and(|surface| surface.scroll_to(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_of_partial_overlap() {
        assert_eq!(axis_visibility(0.0, 100.0, 50.0, 150.0), 0.5);
        assert_eq!(axis_visibility(60.0, 80.0, 50.0, 150.0), 1.0);
        assert_eq!(axis_visibility(0.0, 300.0, 50.0, 150.0), 1.0);
        assert_eq!(axis_visibility(200.0, 300.0, 50.0, 150.0), 0.0);
    }

    #[test]
    fn fixed_placement_draws_at_pinned_origin() {
        let placement = ItemPlacement {
            id: LayoutTree::<u8>::new().new_item(0),
            rect: Rect::new(0.0, 10.0, 5.0, 5.0),
            fixed: true,
            fixed_left: 0.0,
            fixed_top: 40.0,
        };
        assert_eq!(placement.display_origin(), Point::new(0.0, 40.0));
    }
}
