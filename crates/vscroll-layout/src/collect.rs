use smallvec::SmallVec;
use vscroll_geometry::Bounds;

use crate::node::NodeId;
use crate::LayoutTree;

/// Receives the nodes found by [`LayoutTree::collect`].
pub trait ItemCollector {
    /// Rectangle being materialized.
    fn bounds(&self) -> Bounds;

    fn add_item(&mut self, id: NodeId);

    /// Called for list containers with at least one sticky child in range.
    fn add_sticky_container(&mut self, _id: NodeId) {}
}

/// Collector that records everything it is given.
#[derive(Clone, Debug, Default)]
pub struct VecCollector {
    pub bounds: Bounds,
    pub items: Vec<NodeId>,
    pub sticky_containers: Vec<NodeId>,
}

impl VecCollector {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            sticky_containers: Vec::new(),
        }
    }
}

impl ItemCollector for VecCollector {
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

impl<D> LayoutTree<D> {
    /// Reports `id` and every descendant intersecting the collector's bounds.
    ///
    /// Returns false (and visits nothing below) when `id` is disposed, not laid
    /// out yet, or outside the bounds. Indexed containers only descend into
    /// the children their index reports. List containers also report the
    /// sticky children whose section is in range and remember them for
    /// [`update_sticky`](LayoutTree::update_sticky).
    pub fn collect<C: ItemCollector + ?Sized>(&mut self, id: NodeId, collector: &mut C) -> bool {
        let bounds = collector.bounds();
        let Some(node) = self.get(id) else {
            return false;
        };
        if !node.is_laid_out() || !node.rect.touches(&bounds) {
            return false;
        }
        collector.add_item(id);

        let Some(container) = node.container() else {
            return true;
        };
        let mut children: SmallVec<[NodeId; 32]> = SmallVec::new();
        let mut stickies: SmallVec<[NodeId; 4]> = SmallVec::new();
        match container.policy.index_axis() {
            Some(axis) => {
                let (start, end) = axis.span(&bounds);
                container.index.query(start, end, |child| children.push(child));
                if container.policy.is_list() {
                    container
                        .sticky_index
                        .query(start, end, |sticky| stickies.push(sticky));
                }
            }
            None => children.extend(id.children(&self.arena)),
        }

        for child in children {
            self.collect(child, collector);
        }

        stickies.retain(|sticky| self.contains(*sticky));
        for sticky in &stickies {
            collector.add_item(*sticky);
        }
        let has_sticky = !stickies.is_empty();
        if let Some(container) = self.get_mut(id).and_then(|node| node.container_mut()) {
            container.visible_sticky = stickies;
        }
        if has_sticky {
            collector.add_sticky_container(id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ListLayout, OverlapLayout, Sizing};

    fn long_list(count: usize) -> (LayoutTree<usize>, NodeId, Vec<NodeId>) {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(usize::MAX, ListLayout::vertical(0.0));
        let items = (0..count)
            .map(|i| {
                let item = tree.new_item(i);
                tree.set_sizing(item, Sizing::fixed_height(20.0)).unwrap();
                tree.append(root, item).unwrap();
                item
            })
            .collect();
        tree.layout(root, 0.0, 0.0, 100.0, 100.0).unwrap();
        (tree, root, items)
    }

    #[test]
    fn collects_only_items_in_range() {
        let (mut tree, root, items) = long_list(1000);
        let mut collector = VecCollector::new(Bounds::new(0.0, 5000.0, 100.0, 5100.0));
        assert!(tree.collect(root, &mut collector));
        // Root plus items 249..=255, edges inclusive.
        assert_eq!(collector.items.len(), 8);
        assert_eq!(collector.items[0], root);
        assert_eq!(&collector.items[1..], &items[249..=255]);
    }

    #[test]
    fn out_of_range_prunes_subtree() {
        let (mut tree, root, _) = long_list(10);
        let mut collector = VecCollector::new(Bounds::new(0.0, 500.0, 100.0, 600.0));
        assert!(!tree.collect(root, &mut collector));
        assert!(collector.items.is_empty());
    }

    #[test]
    fn disposed_children_are_skipped_until_repack() {
        let (mut tree, root, items) = long_list(10);
        tree.remove(items[1]);
        let mut collector = VecCollector::new(Bounds::new(0.0, 0.0, 100.0, 50.0));
        tree.collect(root, &mut collector);
        assert_eq!(collector.items, vec![root, items[0], items[2]]);
    }

    #[test]
    fn overlap_visits_every_child_in_bounds() {
        let mut tree = LayoutTree::new();
        let stack = tree.new_container(0, OverlapLayout);
        let a = tree.new_item(1);
        let b = tree.new_item(2);
        tree.set_sizing(a, Sizing::fixed(10.0, 10.0)).unwrap();
        tree.append(stack, a).unwrap();
        tree.append(stack, b).unwrap();
        tree.layout(stack, 0.0, 0.0, 100.0, 100.0).unwrap();

        let mut collector = VecCollector::new(Bounds::new(50.0, 50.0, 60.0, 60.0));
        tree.collect(stack, &mut collector);
        assert_eq!(collector.items, vec![stack, b]);
    }
}
