//! Lazy placeholder lifecycle.
//!
//! A placeholder stands in for content that is fetched asynchronously by an
//! outside loader. The tree only tracks the load state; the loader learns
//! about requests and cancellations from the window controller and reports
//! completion back through [`LayoutTree::finish_loading`] or
//! [`LayoutTree::replace_placeholder`].

use crate::node::{Expansion, LoadState, NodeId, NodeKind, Sizing};
use crate::LayoutTree;

impl<D> LayoutTree<D> {
    /// Asks a visible node to materialize its content.
    ///
    /// Idle placeholders start loading; loading ones stay in flight. Every
    /// other node is already settled.
    pub fn expand(&mut self, id: NodeId) -> Expansion {
        let Some(node) = self.get_mut(id) else {
            return Expansion::Settled;
        };
        match &mut node.kind {
            NodeKind::Placeholder(state @ LoadState::Idle) => {
                *state = LoadState::Loading;
                Expansion::Started
            }
            NodeKind::Placeholder(LoadState::Loading) => Expansion::InFlight,
            _ => Expansion::Settled,
        }
    }

    /// Cancels the in-flight load of a placeholder that left the window.
    /// Returns true if a load was cancelled.
    pub fn stop_pending_item(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        match &mut node.kind {
            NodeKind::Placeholder(state @ LoadState::Loading) => {
                *state = LoadState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Marks a placeholder's load as complete, optionally resizing it.
    ///
    /// Results for disposed or cancelled placeholders are ignored and return
    /// false.
    pub fn finish_loading(&mut self, id: NodeId, sizing: Option<Sizing>) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        let NodeKind::Placeholder(state @ LoadState::Loading) = &mut node.kind else {
            return false;
        };
        *state = LoadState::Loaded;
        if let Some(sizing) = sizing {
            node.sizing = sizing;
        }
        self.set_needs_layout(id);
        true
    }

    /// Swaps a placeholder for loaded nodes at the same position among its
    /// siblings.
    ///
    /// If the placeholder was disposed (or never attached) the replacement
    /// nodes are disposed too and false is returned.
    pub fn replace_placeholder(&mut self, id: NodeId, replacement: &[NodeId]) -> bool {
        let attached = self.parent(id).is_some()
            && matches!(
                self.get(id).map(|node| &node.kind),
                Some(NodeKind::Placeholder(_))
            );
        if !attached {
            for node in replacement {
                self.remove(*node);
            }
            return false;
        }
        for node in replacement {
            if let Err(err) = self.insert_before(id, *node) {
                log::warn!("replace_placeholder: dropping replacement node: {}", err);
                self.remove(*node);
            }
        }
        self.remove(id)
    }
}
