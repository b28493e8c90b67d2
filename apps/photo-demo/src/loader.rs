use std::collections::VecDeque;

use vscroll_layout::{LayoutError, LayoutTree, NodeId};

use crate::model::{Entry, Model};

struct Request {
    placeholder: NodeId,
    group: usize,
    ready_at: u64,
}

/// Fake network loader answering group requests after a fixed number of ticks.
pub struct Loader {
    latency: u64,
    queue: VecDeque<Request>,
    completed: usize,
    cancelled: usize,
}

impl Loader {
    pub fn new(latency: u64) -> Self {
        Self {
            latency,
            queue: VecDeque::new(),
            completed: 0,
            cancelled: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.queue.len()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    pub fn request(&mut self, tree: &LayoutTree<Entry>, placeholder: NodeId, now: u64) {
        let Some(Entry::Group(group)) = tree.get(placeholder).map(|node| node.data().clone())
        else {
            log::warn!("Load requested for {placeholder:?}, which is not a group placeholder");
            return;
        };
        log::debug!("Loading group {group}");
        self.queue.push_back(Request {
            placeholder,
            group,
            ready_at: now + self.latency,
        });
    }

    pub fn cancel(&mut self, placeholder: NodeId) {
        let before = self.queue.len();
        self.queue.retain(|request| request.placeholder != placeholder);
        if self.queue.len() < before {
            self.cancelled += 1;
            log::debug!("Cancelled load of {placeholder:?}");
        }
    }

    /// Swaps every due placeholder for its loaded content. Returns how many
    /// groups landed in the tree.
    pub fn poll(
        &mut self,
        model: &Model,
        tree: &mut LayoutTree<Entry>,
        now: u64,
    ) -> Result<usize, LayoutError> {
        let mut landed = 0;
        while self.queue.front().is_some_and(|request| request.ready_at <= now) {
            let Some(request) = self.queue.pop_front() else {
                break;
            };
            let content = model.build_group(tree, request.group)?;
            if tree.replace_placeholder(request.placeholder, &content) {
                landed += 1;
                self.completed += 1;
            } else {
                log::debug!("Group {} arrived after its placeholder left", request.group);
            }
        }
        Ok(landed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_requests_never_land() {
        let model = Model::generate(3);
        let mut tree = LayoutTree::new();
        let gallery = model.build_tree(&mut tree).unwrap();
        let placeholders = tree.child_ids(gallery);

        let mut loader = Loader::new(2);
        for placeholder in &placeholders[..3] {
            tree.expand(*placeholder);
            loader.request(&tree, *placeholder, 0);
        }
        loader.cancel(placeholders[1]);
        assert_eq!(loader.in_flight(), 2);

        assert_eq!(loader.poll(&model, &mut tree, 1).unwrap(), 0);
        assert_eq!(loader.poll(&model, &mut tree, 2).unwrap(), 2);
        assert_eq!(loader.completed(), 2);
        assert_eq!(loader.cancelled(), 1);
        // Two groups became header + photo block, one placeholder remains.
        assert_eq!(tree.child_count(gallery), placeholders.len() + 2);
        assert!(tree.contains(placeholders[1]));
        assert!(!tree.contains(placeholders[0]));
    }
}
