//! Arena-backed layout tree.
//!
//! Nodes live in an [`indextree::Arena`] and are addressed by [`NodeId`].
//! Parents own their children through the arena links, children reach their
//! parent through the same links, so no node holds a strong reference to
//! another. Disposed handles are detected and treated as absent.

use indextree::Arena;
use smallvec::SmallVec;
use vscroll_geometry::Size;

use crate::node::{Container, LayoutNode, NodeId, NodeKind, Sizing, StickyState, ViewType};
use crate::policy::Policy;
use crate::{LayoutError, DEFAULT_PAGE_SIZE};

pub(crate) type ChildIds = SmallVec<[NodeId; 32]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeConfig {
    /// Bucket width of every container's spatial index.
    pub page_size: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Counters for the two layout paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Container repacks (packing policy runs).
    pub packs: u64,
    /// Pure translations of a laid out subtree.
    pub repositions: u64,
}

pub struct LayoutTree<D> {
    pub(crate) arena: Arena<LayoutNode<D>>,
    config: TreeConfig,
    pub(crate) stats: LayoutStats,
}

impl<D> Default for LayoutTree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> LayoutTree<D> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            arena: Arena::new(),
            config,
            stats: LayoutStats::default(),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = LayoutStats::default();
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        !id.is_removed(&self.arena)
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode<D>> {
        if !self.contains(id) {
            return None;
        }
        self.arena.get(id).map(|node| node.get())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode<D>> {
        if !self.contains(id) {
            return None;
        }
        self.arena.get_mut(id).map(|node| node.get_mut())
    }

    pub fn node(&self, id: NodeId) -> Result<&LayoutNode<D>, LayoutError> {
        self.get(id).ok_or(LayoutError::MissingNode { id })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut LayoutNode<D>, LayoutError> {
        self.get_mut(id).ok_or(LayoutError::MissingNode { id })
    }

    /// Mutable access to a node's payload. The node is marked for layout,
    /// since its content may no longer match its measured size.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut D> {
        self.set_needs_layout(id);
        self.get_mut(id).map(|node| &mut node.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        self.arena.get(id).and_then(|node| node.parent())
    }

    pub fn child_ids(&self, id: NodeId) -> ChildIds {
        if !self.contains(id) {
            return ChildIds::new();
        }
        id.children(&self.arena).collect()
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        id.children(&self.arena).count()
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.contains(id) && id.children(&self.arena).next().is_some()
    }

    fn insert(&mut self, data: D, kind: NodeKind) -> NodeId {
        self.arena.new_node(LayoutNode::new(data, kind))
    }

    /// Creates a detached leaf that fills its constraints.
    pub fn new_item(&mut self, data: D) -> NodeId {
        self.insert(data, NodeKind::Item)
    }

    /// Creates a detached sticky header that fills its constraints.
    pub fn new_sticky(&mut self, data: D) -> NodeId {
        self.insert(data, NodeKind::Sticky(StickyState::default()))
    }

    /// Creates a detached lazy placeholder of the given size.
    pub fn new_placeholder(&mut self, data: D, sizing: Sizing) -> NodeId {
        let id = self.insert(data, NodeKind::Placeholder(Default::default()));
        if let Some(node) = self.get_mut(id) {
            node.sizing = sizing;
        }
        id
    }

    /// Creates a detached container packing its children with `policy`.
    pub fn new_container(&mut self, data: D, policy: impl Into<Policy>) -> NodeId {
        let container = Container::new(policy.into(), self.config.page_size);
        self.insert(data, NodeKind::Container(Box::new(container)))
    }

    pub fn set_view_type(&mut self, id: NodeId, view_type: ViewType) -> Result<(), LayoutError> {
        self.node_mut(id)?.view_type = Some(view_type);
        Ok(())
    }

    pub fn set_sizing(&mut self, id: NodeId, sizing: Sizing) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        if node.sizing != sizing {
            node.sizing = sizing;
            self.set_needs_layout(id);
        }
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, id: NodeId, aspect_ratio: f32) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        if node.aspect_ratio != aspect_ratio {
            node.aspect_ratio = aspect_ratio;
            self.set_needs_layout(id);
        }
        Ok(())
    }

    pub fn set_policy(&mut self, id: NodeId, policy: impl Into<Policy>) -> Result<(), LayoutError> {
        let policy = policy.into();
        let container = self
            .node_mut(id)?
            .container_mut()
            .ok_or(LayoutError::NotAContainer { id })?;
        if container.policy != policy {
            container.policy = policy;
            self.set_needs_layout(id);
        }
        Ok(())
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.node(parent)?;
        self.node(child)?;
        let previous = self.parent(child);
        parent.checked_append(child, &mut self.arena)?;
        if let Some(previous) = previous {
            self.set_child_needs_layout(previous);
        }
        self.set_needs_layout(child);
        Ok(())
    }

    /// Inserts `child` before `sibling` under the sibling's parent.
    pub fn insert_before(&mut self, sibling: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.node(sibling)?;
        self.node(child)?;
        let previous = self.parent(child);
        sibling.checked_insert_before(child, &mut self.arena)?;
        if let Some(previous) = previous {
            self.set_child_needs_layout(previous);
        }
        self.set_needs_layout(child);
        Ok(())
    }

    /// Disposes `id` and its whole subtree. Returns false if it was already
    /// gone.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let parent = self.parent(id);
        id.remove_subtree(&mut self.arena);
        if let Some(parent) = parent {
            self.set_child_needs_layout(parent);
        }
        true
    }

    /// Marks `id` for layout and notifies its ancestors.
    pub fn set_needs_layout(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.needs_layout = true;
        let parent = self.parent(id);
        self.mark_child_dirty(parent);
    }

    /// Marks `id` as having a dirty descendant and notifies its ancestors.
    pub fn set_child_needs_layout(&mut self, id: NodeId) {
        self.mark_child_dirty(Some(id));
    }

    // Stops at the first ancestor that is already marked.
    fn mark_child_dirty(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            match self.get_mut(id) {
                Some(node) if !node.child_needs_layout => node.child_needs_layout = true,
                _ => break,
            }
            cursor = self.parent(id);
        }
    }

    /// Whether `id` or anything below it requested layout.
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|node| node.needs_layout || node.child_needs_layout)
    }

    pub(crate) fn set_bookmark_flag(&mut self, id: NodeId, value: bool) {
        if let Some(node) = self.get_mut(id) {
            node.is_bookmark = value;
        }
    }

    /// Flags `id` as the current scroll anchor, for renderers that highlight
    /// it. Returns false for disposed nodes.
    pub fn mark_bookmark(&mut self, id: NodeId, value: bool) -> bool {
        let live = self.contains(id);
        self.set_bookmark_flag(id, value);
        live
    }

    /// Places `id` at `(left, top)` with the given constraints.
    ///
    /// Repacks only when the node or a descendant is dirty or the relevant
    /// constraints changed. Otherwise the subtree is translated in place.
    pub fn layout(
        &mut self,
        id: NodeId,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> Result<(), LayoutError> {
        let node = self.node(id)?;
        if node.requires_layout(width, height) {
            let node = self.node_mut(id)?;
            node.rect.left = left;
            node.rect.top = top;
            self.update_layout(id, width, height)
        } else {
            let dx = left - node.rect.left;
            let dy = top - node.rect.top;
            if dx != 0.0 || dy != 0.0 {
                self.update_position(id, dx, dy);
            }
            Ok(())
        }
    }

    /// Recomputes the size of `id` and, for containers, repacks children.
    pub fn update_layout(&mut self, id: NodeId, width: f32, height: f32) -> Result<(), LayoutError> {
        let policy = self.node(id)?.container().map(|container| container.policy);
        match policy {
            Some(policy) => {
                self.stats.packs += 1;
                match policy {
                    Policy::List(list) => self.pack_list(id, list, width, height)?,
                    Policy::Grid(grid) => self.pack_grid(id, grid, width)?,
                    Policy::KnuthPlass(layout) => self.pack_justified(id, layout, width, height)?,
                    Policy::Overlap(_) => self.pack_overlap(id, width, height)?,
                }
            }
            None => {
                let node = self.node_mut(id)?;
                let size = node.sizing.resolve(Size::new(width, height));
                node.rect.width = size.width;
                node.rect.height = size.height;
            }
        }
        let node = self.node_mut(id)?;
        node.constraints = Some(Size::new(width, height));
        node.needs_layout = false;
        node.child_needs_layout = false;
        Ok(())
    }

    /// Translates `id` and its subtree by `(dx, dy)` without repacking.
    /// Container indexes are rebased through their offset.
    pub fn update_position(&mut self, id: NodeId, dx: f32, dy: f32) {
        if !self.contains(id) {
            return;
        }
        self.stats.repositions += 1;
        let subtree: SmallVec<[NodeId; 32]> = id.descendants(&self.arena).collect();
        for node_id in subtree {
            let Some(node) = self.get_mut(node_id) else {
                continue;
            };
            node.rect = node.rect.translate(dx, dy);
            if let Some(container) = node.container_mut() {
                container.translate(dx, dy);
            }
        }
    }

    /// Depth-first search below `root` for the node carrying `data`.
    pub fn resolve_bookmark(&self, root: NodeId, data: &D) -> Option<NodeId>
    where
        D: PartialEq,
    {
        if !self.contains(root) {
            return None;
        }
        root.descendants(&self.arena).find(|id| {
            self.arena
                .get(*id)
                .is_some_and(|node| node.get().data == *data)
        })
    }

    /// Live descendants of `root` in depth-first order, `root` included.
    pub fn descendants(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let live = self.contains(root);
        live.then(|| root.descendants(&self.arena))
            .into_iter()
            .flatten()
    }
}
