use crate::types::Slot;
use std::collections::VecDeque;

/// Ordered collection of ready processes, referenced by arena slot.
///
/// The queue itself has no opinion about ordering; the active policy decides
/// where each process goes.
#[derive(Debug, Default, Clone)]
pub struct ReadyQueue {
    slots: VecDeque<Slot>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            slots: VecDeque::new(),
        }
    }

    pub fn push_back(&mut self, slot: Slot) {
        self.slots.push_back(slot);
    }

    pub fn push_front(&mut self, slot: Slot) {
        self.slots.push_front(slot);
    }

    /// Inserts `slot` after every entry whose key is not greater than its own.
    pub fn insert_sorted<K, F>(&mut self, slot: Slot, key: F)
    where
        K: Ord,
        F: Fn(Slot) -> K,
    {
        let new_key = key(slot);
        let pos = self.slots.partition_point(|&s| key(s) <= new_key);
        self.slots.insert(pos, slot);
    }

    pub fn pop_front(&mut self) -> Option<Slot> {
        self.slots.pop_front()
    }

    pub fn front(&self) -> Option<Slot> {
        self.slots.front().copied()
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.iter().copied()
    }
}
