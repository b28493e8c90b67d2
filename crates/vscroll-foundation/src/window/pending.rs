use indexmap::IndexSet;
use vscroll_layout::{Expansion, LayoutTree, NodeId};

/// Lazy items whose load was still running after the last pass.
#[derive(Clone, Debug, Default)]
pub struct PendingItems {
    items: IndexSet<NodeId>,
}

impl PendingItems {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.items.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().copied()
    }

    pub(crate) fn begin(&self) -> PendingPass {
        PendingPass {
            stale: self.items.clone(),
            pending: IndexSet::new(),
            started: Vec::new(),
        }
    }
}

/// Pending bookkeeping for one collection.
pub(crate) struct PendingPass {
    stale: IndexSet<NodeId>,
    pending: IndexSet<NodeId>,
    started: Vec<NodeId>,
}

impl PendingPass {
    /// Expands a collected item and tracks it if its load is running.
    pub(crate) fn visit<D>(&mut self, tree: &mut LayoutTree<D>, id: NodeId) {
        self.stale.shift_remove(&id);
        let expansion = tree.expand(id);
        if expansion == Expansion::Started {
            self.started.push(id);
        }
        if expansion.is_pending() {
            self.pending.insert(id);
        }
    }

    /// Cancels loads that fell out of the window and stores the new pending
    /// set. Returns the started and the cancelled loads.
    pub(crate) fn finish<D>(
        self,
        tree: &mut LayoutTree<D>,
        pending: &mut PendingItems,
    ) -> (Vec<NodeId>, Vec<NodeId>) {
        let cancelled = self
            .stale
            .into_iter()
            .filter(|id| tree.stop_pending_item(*id))
            .collect();
        pending.items = self.pending;
        (self.started, cancelled)
    }
}
