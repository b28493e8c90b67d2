//! Render slot recycling.
//!
//! A [`Recycler`] maps the visible items of one view type onto a pool of
//! slots. Items that stay visible keep their slot across updates, new items
//! take the lowest free slot, and the pool only ever grows.

use std::hash::Hash;

use vscroll_layout::collections::map::HashMap;

/// Initial number of slots in a pool.
pub const DEFAULT_RECYCLER_CAPACITY: usize = 10;

/// Counters describing the pool after the last update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecyclerStats {
    /// Slots bound to an item.
    pub slots_in_use: usize,
    /// Slots with nothing bound.
    pub slots_free: usize,
    /// Slots appended since the pool was created.
    pub slots_created: usize,
    /// Times an existing slot was bound to a different item.
    pub rebinds: usize,
}

/// Result of one [`Recycler::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecyclerUpdate {
    /// Items that moved into a slot this round.
    pub bound: usize,
    /// Slots appended this round.
    pub grown: usize,
    /// Slots unbound this round.
    pub cleared: usize,
}

#[derive(Debug)]
pub struct Recycler<K> {
    slots: Vec<Option<K>>,
    slot_by_item: HashMap<K, usize>,
    slots_created: usize,
    rebinds: usize,
}

impl<K: Copy + Eq + Hash> Recycler<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            slot_by_item: HashMap::default(),
            slots_created: 0,
            rebinds: 0,
        }
    }

    /// Current pool size.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<K>] {
        &self.slots
    }

    pub fn slot_of(&self, item: &K) -> Option<usize> {
        self.slot_by_item.get(item).copied()
    }

    pub fn stats(&self) -> RecyclerStats {
        let slots_in_use = self.slots.iter().filter(|slot| slot.is_some()).count();
        RecyclerStats {
            slots_in_use,
            slots_free: self.slots.len() - slots_in_use,
            slots_created: self.slots_created,
            rebinds: self.rebinds,
        }
    }

    /// Binds `items` to slots, keeping every slot whose item is still listed.
    ///
    /// Slots left over are unbound, except in rounds that had to grow the
    /// pool: growth means every existing slot was already taken.
    pub fn update(&mut self, items: &[K]) -> RecyclerUpdate {
        let existing = self.slots.len();
        let mut busy = vec![false; existing];
        let mut slot_by_item = HashMap::default();
        let mut incoming = Vec::new();

        for item in items {
            match self.slot_by_item.get(item) {
                Some(&slot) => {
                    slot_by_item.insert(*item, slot);
                    busy[slot] = true;
                }
                None => incoming.push(*item),
            }
        }

        let mut report = RecyclerUpdate::default();
        let mut free = 0;
        for item in incoming {
            while free < existing && busy[free] {
                free += 1;
            }
            let slot = if free < existing {
                busy[free] = true;
                if self.slots[free].is_some() {
                    self.rebinds += 1;
                }
                self.slots[free] = Some(item);
                free
            } else {
                self.slots.push(Some(item));
                report.grown += 1;
                self.slots.len() - 1
            };
            slot_by_item.insert(item, slot);
            report.bound += 1;
        }
        self.slots_created += report.grown;

        if report.grown == 0 {
            for (slot, taken) in self.slots.iter_mut().zip(&busy) {
                if !taken && slot.take().is_some() {
                    report.cleared += 1;
                }
            }
        }

        self.slot_by_item = slot_by_item;
        log::trace!(
            "recycler: {} items, {} bound, {} grown, {} cleared",
            items.len(),
            report.bound,
            report.grown,
            report.cleared
        );
        report
    }
}

impl<K: Copy + Eq + Hash> Default for Recycler<K> {
    fn default() -> Self {
        Self::new(DEFAULT_RECYCLER_CAPACITY)
    }
}
