use smallvec::SmallVec;
use vscroll_geometry::Bounds;

use crate::node::{NodeId, NodeKind};
use crate::policy::Policy;
use crate::{Axis, LayoutTree};

impl<D> LayoutTree<D> {
    /// Pins the sticky headers `container` reported during the last collection
    /// against the scroll viewport `view`.
    ///
    /// Walking from the last visible header backwards, a header is fixed once
    /// its laid out position has scrolled past the sticky edge. A fixed header
    /// never extends past the next header (minus the list margin), so later
    /// sections push earlier headers out of the pinned slot.
    pub fn update_sticky(&mut self, container: NodeId, view: &Bounds) {
        let Some(node) = self.get(container) else {
            return;
        };
        let Some(state) = node.container() else {
            return;
        };
        let Policy::List(list) = state.policy else {
            return;
        };
        let this = node.rect;
        let visible: SmallVec<[NodeId; 4]> = state.visible_sticky.clone();

        let vertical = list.axis == Axis::Vertical;
        // Leading sticky edge and the trailing limit along the list axis.
        let (mut edge, mut limit) = if vertical {
            (view.top.max(this.top), view.bottom.min(this.bottom()))
        } else {
            (view.left.max(this.left), view.right.min(this.right()))
        };

        for sticky in visible.iter().rev() {
            let Some(item) = self.get_mut(*sticky) else {
                continue;
            };
            let rect = item.rect;
            let NodeKind::Sticky(state) = &mut item.kind else {
                continue;
            };
            let (start, extent) = if vertical {
                (rect.top, rect.height)
            } else {
                (rect.left, rect.width)
            };
            state.fixed = start < edge;
            if state.fixed {
                let pinned = (limit - extent).min(edge);
                if vertical {
                    state.fixed_left = this.left;
                    state.fixed_top = pinned;
                } else {
                    state.fixed_left = pinned;
                    state.fixed_top = this.top;
                }
                edge -= extent;
            }
            limit = limit.min(start - list.margin);
        }
    }
}

#[cfg(test)]
mod tests {
    use vscroll_geometry::Bounds;

    use crate::{LayoutTree, ListLayout, NodeId, Sizing, VecCollector};

    const HEADER: f32 = 50.0;

    fn sections(names: &[&'static str]) -> (LayoutTree<&'static str>, NodeId, Vec<NodeId>) {
        let mut tree = LayoutTree::new();
        let root = tree.new_container("root", ListLayout::vertical(0.0));
        let mut headers = Vec::new();
        for name in names {
            let header = tree.new_sticky(*name);
            tree.set_sizing(header, Sizing::fixed(200.0, HEADER)).unwrap();
            tree.append(root, header).unwrap();
            headers.push(header);
            for _ in 0..5 {
                let item = tree.new_item("item");
                tree.set_sizing(item, Sizing::fixed_height(HEADER)).unwrap();
                tree.append(root, item).unwrap();
            }
        }
        tree.layout(root, 0.0, 0.0, 200.0, 600.0).unwrap();
        (tree, root, headers)
    }

    fn offset_at(tree: &mut LayoutTree<&'static str>, root: NodeId, header: NodeId, scroll: f32) -> f32 {
        let view = Bounds::new(0.0, scroll, 200.0, scroll + 600.0);
        let mut collector = VecCollector::new(view);
        tree.collect(root, &mut collector);
        for container in &collector.sticky_containers {
            tree.update_sticky(*container, &view);
        }
        tree.node(header).unwrap().display_origin().y
    }

    #[test]
    fn headers_push_each_other_out() {
        let (mut tree, root, headers) = sections(&["A", "B", "C", "D", "E"]);
        let (a, b) = (headers[0], headers[1]);
        let section = 5.0 * HEADER;

        assert_eq!(offset_at(&mut tree, root, a, 0.0), 0.0);
        assert_eq!(offset_at(&mut tree, root, a, HEADER / 2.0), HEADER / 2.0);
        assert_eq!(offset_at(&mut tree, root, a, HEADER), HEADER);
        assert_eq!(offset_at(&mut tree, root, a, section), section);
        assert_eq!(offset_at(&mut tree, root, b, section), section + HEADER);
        assert_eq!(offset_at(&mut tree, root, a, section + 1.0), section);
        assert_eq!(offset_at(&mut tree, root, b, section + 1.0), section + HEADER);
        assert_eq!(offset_at(&mut tree, root, b, section + HEADER), section + HEADER);
        assert_eq!(offset_at(&mut tree, root, b, section + HEADER + 1.0), section + HEADER + 1.0);
        assert_eq!(offset_at(&mut tree, root, b, 2.0 * section + HEADER), 2.0 * section + HEADER);
        assert_eq!(offset_at(&mut tree, root, b, 2.0 * section + HEADER + 1.0), 2.0 * section + HEADER);
    }

    #[test]
    fn fixed_flag_follows_scroll() {
        let (mut tree, root, headers) = sections(&["A", "B"]);
        offset_at(&mut tree, root, headers[0], 10.0);
        assert!(tree.node(headers[0]).unwrap().fixed());
        assert!(!tree.node(headers[1]).unwrap().fixed());

        offset_at(&mut tree, root, headers[0], 0.0);
        assert!(!tree.node(headers[0]).unwrap().fixed());
        let state = tree.node(headers[0]).unwrap().sticky_state().unwrap();
        assert!(!state.fixed);
    }

    #[test]
    fn horizontal_headers_pin_to_left_edge() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container("root", ListLayout::horizontal(0.0));
        let header = tree.new_sticky("A");
        tree.set_sizing(header, Sizing::fixed(40.0, 100.0)).unwrap();
        tree.append(root, header).unwrap();
        for _ in 0..10 {
            let item = tree.new_item("item");
            tree.set_sizing(item, Sizing::fixed_width(40.0)).unwrap();
            tree.append(root, item).unwrap();
        }
        tree.layout(root, 0.0, 0.0, 1000.0, 100.0).unwrap();

        let view = Bounds::new(120.0, 0.0, 320.0, 100.0);
        let mut collector = VecCollector::new(view);
        tree.collect(root, &mut collector);
        assert_eq!(collector.sticky_containers, vec![root]);
        tree.update_sticky(root, &view);
        let origin = tree.node(header).unwrap().display_origin();
        assert_eq!((origin.x, origin.y), (120.0, 0.0));
    }
}
