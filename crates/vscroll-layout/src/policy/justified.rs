use smallvec::SmallVec;
use vscroll_geometry::Rect;

use crate::node::NodeId;
use crate::policy::KnuthPlassLayout;
use crate::{KnuthPlass, LayoutError, LayoutTree, PaginatedIndex};

impl<D> LayoutTree<D> {
    /// Packs children into justified rows (vertical) or columns (horizontal).
    ///
    /// Rows are chosen by [`KnuthPlass::calculate_breaks`]; each row's
    /// thickness is derived from its content and clamped to
    /// `size ± size_tolerance`, then its cells are sized to close the row.
    pub(crate) fn pack_justified(
        &mut self,
        id: NodeId,
        layout: KnuthPlassLayout,
        width: f32,
        height: f32,
    ) -> Result<(), LayoutError> {
        let axis = layout.axis;
        let origin = self.node(id)?.rect;
        let children = self.child_ids(id);
        let ratios: SmallVec<[f32; 32]> = children
            .iter()
            .map(|child| {
                let ratio = self.get(*child).map_or(1.0, |node| node.aspect_ratio);
                if axis.is_vertical() {
                    ratio
                } else {
                    1.0 / ratio
                }
            })
            .collect();

        let row_size = if axis.is_vertical() { width } else { height };
        let packer = KnuthPlass::new(|ratio: &f32| *ratio).with_options(layout.options);
        let breaks = packer.calculate_breaks(&ratios, row_size, layout.margin, layout.size)?;

        let mut index = PaginatedIndex::new(self.config().page_size);
        let min_thickness = layout.size - layout.size_tolerance;
        let max_thickness = layout.size + layout.size_tolerance;
        let mut cursor = axis.start(&origin);

        for (range, content) in breaks.rows() {
            let row_ratios = &ratios[range.clone()];
            let ratio_sum: f32 = row_ratios.iter().sum();
            let thickness = (content / ratio_sum)
                .round()
                .min(max_thickness)
                .max(min_thickness);
            let cells = packer.calculate_row_layout(
                row_ratios,
                content,
                row_size,
                0.0,
                row_size,
                layout.margin,
                thickness,
                layout.options.snap_threshold,
            )?;

            let mut offset = 0.0;
            for (child, cell) in children[range].iter().zip(cells) {
                if axis.is_vertical() {
                    self.layout(*child, origin.left + offset, cursor, cell, thickness)?;
                } else {
                    self.layout(*child, cursor, origin.top + offset, thickness, cell)?;
                }
                let rect = self.node(*child)?.rect;
                index.add(*child, axis.start(&rect), axis.end(&rect))?;
                offset += cell + layout.margin;
            }
            cursor += thickness + layout.margin;
        }

        let extent = (cursor - axis.start(&origin) - layout.margin).max(0.0);
        let node = self.node_mut(id)?;
        node.rect = if axis.is_vertical() {
            Rect::new(origin.left, origin.top, width, extent)
        } else {
            Rect::new(origin.left, origin.top, extent, height)
        };
        if let Some(container) = node.container_mut() {
            container.index = index;
        }
        Ok(())
    }
}
