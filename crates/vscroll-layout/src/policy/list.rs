use vscroll_geometry::Rect;

use crate::node::NodeId;
use crate::policy::ListLayout;
use crate::{LayoutError, LayoutTree, PaginatedIndex};

impl<D> LayoutTree<D> {
    /// Stacks children along the list axis and fills the cross axis.
    ///
    /// Each sticky child is indexed over the span from its own start to the
    /// start of the next sticky child (or the end of the list), so it stays
    /// collectable while its section scrolls through.
    pub(crate) fn pack_list(
        &mut self,
        id: NodeId,
        list: ListLayout,
        width: f32,
        height: f32,
    ) -> Result<(), LayoutError> {
        let axis = list.axis;
        let origin = self.node(id)?.rect;
        let page_size = self.config().page_size;
        let mut index = PaginatedIndex::new(page_size);
        let mut sticky_index = PaginatedIndex::new(page_size);
        let mut pending_sticky: Option<(NodeId, f32)> = None;
        let mut cursor = axis.start(&origin);

        for child in self.child_ids(id) {
            if axis.is_vertical() {
                self.layout(child, origin.left, cursor, width, height)?;
            } else {
                self.layout(child, cursor, origin.top, width, height)?;
            }
            let node = self.node(child)?;
            let rect = node.rect;
            cursor += axis.extent(&rect) + list.margin;
            if node.is_sticky() {
                if let Some((sticky, start)) = pending_sticky {
                    sticky_index.add(sticky, start, axis.start(&rect))?;
                }
                pending_sticky = Some((child, axis.start(&rect)));
            } else {
                index.add(child, axis.start(&rect), axis.end(&rect))?;
            }
        }

        let extent = (cursor - axis.start(&origin) - list.margin).max(0.0);
        let rect = if axis.is_vertical() {
            Rect::new(origin.left, origin.top, width, extent)
        } else {
            Rect::new(origin.left, origin.top, extent, height)
        };
        if let Some((sticky, start)) = pending_sticky {
            sticky_index.add(sticky, start, axis.end(&rect))?;
        }

        let node = self.node_mut(id)?;
        node.rect = rect;
        if let Some(container) = node.container_mut() {
            container.index = index;
            container.sticky_index = sticky_index;
        }
        Ok(())
    }
}
