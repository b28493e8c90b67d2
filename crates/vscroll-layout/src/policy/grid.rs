use vscroll_geometry::Rect;

use crate::node::NodeId;
use crate::policy::GridLayout;
use crate::{LayoutError, LayoutTree, PaginatedIndex};

impl<D> LayoutTree<D> {
    /// Wraps cells left to right into rows no wider than `width`. A row is as
    /// tall as its tallest cell.
    pub(crate) fn pack_grid(
        &mut self,
        id: NodeId,
        grid: GridLayout,
        width: f32,
    ) -> Result<(), LayoutError> {
        let origin = self.node(id)?.rect;
        let mut index = PaginatedIndex::new(self.config().page_size);
        let mut column = 0.0;
        let mut row_top = origin.top;
        let mut row_height: f32 = 0.0;
        let mut placed = false;

        for child in self.child_ids(id) {
            let cell = self.node(child)?.sizing.resolve(grid.cell);
            if column > 0.0 && column + cell.width > width {
                row_top += row_height + grid.v_margin;
                column = 0.0;
                row_height = 0.0;
            }
            self.layout(child, origin.left + column, row_top, cell.width, cell.height)?;
            let rect = self.node(child)?.rect;
            index.add(child, rect.top, rect.bottom())?;
            column += rect.width + grid.h_margin;
            row_height = row_height.max(rect.height);
            placed = true;
        }

        let height = if placed {
            row_top + row_height - origin.top
        } else {
            0.0
        };
        let node = self.node_mut(id)?;
        node.rect = Rect::new(origin.left, origin.top, width, height);
        if let Some(container) = node.container_mut() {
            container.index = index;
        }
        Ok(())
    }
}
