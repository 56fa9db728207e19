//! Indexed binary min-heap
//!
//! Values are dense indices (tile indices in practice) so the heap can track
//! where each value sits and change its key in place. Equal keys pop in
//! insertion order.

const ABSENT: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: i32,
    sequence: u64,
    value: usize,
}

impl Entry {
    fn precedes(&self, other: &Entry) -> bool {
        (self.key, self.sequence) < (other.key, other.sequence)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MinHeap {
    entries: Vec<Entry>,
    /// Heap slot of each value, `ABSENT` if not queued
    slots: Vec<usize>,
    sequence: u64,
}

impl MinHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(values: usize) -> Self {
        Self {
            entries: Vec::with_capacity(values),
            slots: vec![ABSENT; values],
            sequence: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, value: usize) -> bool {
        self.slot_of(value).is_some()
    }

    pub fn key_of(&self, value: usize) -> Option<i32> {
        self.slot_of(value).map(|slot| self.entries[slot].key)
    }

    /// Queue `value`; returns false (and changes nothing) if it is already queued
    pub fn insert(&mut self, value: usize, key: i32) -> bool {
        if self.contains(value) {
            return false;
        }
        if value >= self.slots.len() {
            self.slots.resize(value + 1, ABSENT);
        }

        let slot = self.entries.len();
        self.entries.push(Entry {
            key,
            sequence: self.sequence,
            value,
        });
        self.sequence += 1;
        self.slots[value] = slot;
        self.sift_up(slot);
        true
    }

    /// Change the key of a queued value; returns false if it is not queued
    pub fn update(&mut self, value: usize, key: i32) -> bool {
        let Some(slot) = self.slot_of(value) else {
            return false;
        };
        let old = self.entries[slot].key;
        self.entries[slot].key = key;
        if key < old {
            self.sift_up(slot);
        } else if key > old {
            self.sift_down(slot);
        }
        true
    }

    pub fn peek_min(&self) -> Option<(usize, i32)> {
        self.entries.first().map(|e| (e.value, e.key))
    }

    pub fn pop_min(&mut self) -> Option<(usize, i32)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let entry = self.entries.pop()?;
        self.slots[entry.value] = ABSENT;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((entry.value, entry.key))
    }

    pub fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            self.slots[entry.value] = ABSENT;
        }
        self.sequence = 0;
    }

    fn slot_of(&self, value: usize) -> Option<usize> {
        match self.slots.get(value) {
            Some(&slot) if slot != ABSENT => Some(slot),
            _ => None,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots[self.entries[a].value] = a;
        self.slots[self.entries[b].value] = b;
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.entries[slot].precedes(&self.entries[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.entries[left].precedes(&self.entries[smallest]) {
                smallest = left;
            }
            if right < len && self.entries[right].precedes(&self.entries[smallest]) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}
