use crate::node::NodeId;
use crate::{LayoutError, LayoutTree};

impl<D> LayoutTree<D> {
    /// Lays every child out at the container origin; the container takes the
    /// largest child size.
    pub(crate) fn pack_overlap(
        &mut self,
        id: NodeId,
        width: f32,
        height: f32,
    ) -> Result<(), LayoutError> {
        let origin = self.node(id)?.rect;
        let mut max_width: f32 = 0.0;
        let mut max_height: f32 = 0.0;
        for child in self.child_ids(id) {
            self.layout(child, origin.left, origin.top, width, height)?;
            let rect = self.node(child)?.rect;
            max_width = max_width.max(rect.width);
            max_height = max_height.max(rect.height);
        }
        let node = self.node_mut(id)?;
        node.rect.width = max_width;
        node.rect.height = max_height;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{LayoutTree, OverlapLayout, Sizing};

    #[test]
    fn takes_largest_child_and_skips_repack_when_constraints_hold() {
        let mut tree = LayoutTree::new();
        let stack = tree.new_container(0, OverlapLayout);
        let a = tree.new_item(1);
        let b = tree.new_item(2);
        tree.set_sizing(a, Sizing::fixed(40.0, 90.0)).unwrap();
        tree.set_sizing(b, Sizing::fixed(70.0, 30.0)).unwrap();
        tree.append(stack, a).unwrap();
        tree.append(stack, b).unwrap();
        tree.layout(stack, 3.0, 4.0, 200.0, 200.0).unwrap();

        let node = tree.node(stack).unwrap();
        assert_eq!((node.width(), node.height()), (70.0, 90.0));
        assert_eq!(tree.node(b).unwrap().left(), 3.0);
        assert_eq!(tree.node(b).unwrap().top(), 4.0);

        // The stack is smaller than its constraints; that alone is no reason
        // to repack.
        let packs = tree.stats().packs;
        tree.layout(stack, 3.0, 4.0, 200.0, 200.0).unwrap();
        assert_eq!(tree.stats().packs, packs);
    }
}
