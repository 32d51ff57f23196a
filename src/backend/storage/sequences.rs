// src/backend/storage/sequences.rs
use crate::storage::memory::Partition;
use ic_stable_structures::{Memory, StableBTreeMap};
use std::collections::BTreeMap;

/// Per-category counters used to mint document numbers.
/// Kept apart from the documents so deleting records never reuses a number.
pub struct SequenceCounters<M: Memory> {
    counters: StableBTreeMap<String, u64, Partition<M>>,
}

impl<M: Memory> SequenceCounters<M> {
    pub fn init(memory: Partition<M>) -> Self {
        Self { counters: StableBTreeMap::init(memory) }
    }

    /// Last value handed out for `category`, 0 if none.
    pub fn current(&self, category: &str) -> u64 {
        self.counters.get(&category.to_string()).unwrap_or(0)
    }

    /// Increment the counter and return the new value.
    pub fn increment(&mut self, category: &str) -> u64 {
        let next = self.current(category).saturating_add(1);
        self.counters.insert(category.to_string(), next);
        next
    }

    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counters.iter().collect()
    }

    /// Replaces every counter with `values`.
    pub fn restore(&mut self, values: &BTreeMap<String, u64>) {
        self.clear();
        for (category, value) in values {
            self.counters.insert(category.clone(), *value);
        }
    }

    pub fn clear(&mut self) {
        let keys: Vec<String> = self.counters.iter().map(|(key, _value)| key).collect();
        for key in keys {
            self.counters.remove(&key);
        }
    }
}
