//! The bounded min-heap and its slot index.

use serde::{Deserialize, Serialize};
use shuffle_types::{Address, U256};
use std::collections::HashMap;

use crate::error::HeapError;

/// One resident holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapEntry {
    pub address: Address,
    pub balance: U256,
}

/// What a call to [`TopHeap::insert_or_update`] did to residency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapChange {
    /// Nothing moved: absent and too small, zero, or same balance.
    Unchanged,
    /// A resident entry changed value.
    Updated,
    /// The address joined a heap with free capacity.
    Inserted,
    /// The address joined a full heap by replacing the root.
    Evicted { evicted: HeapEntry },
    /// A resident address reached zero and left.
    Removed,
}

/// Fixed-capacity min-heap keyed by address.
///
/// `slots` maps each resident address to its 1-based position in `entries`;
/// absence means "not resident". Every swap updates both sides.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopHeap {
    capacity: usize,
    entries: Vec<HeapEntry>,
    slots: HashMap<Address, usize>,
}

impl TopHeap {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    /// Maximum number of residents (`TOP_SIZE`).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of residents.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// 1-based slot of `address`, or 0 when it is not resident.
    pub fn index_of(&self, address: &Address) -> usize {
        self.slots.get(address).copied().unwrap_or(0)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.slots.contains_key(address)
    }

    /// Entry at 0-based array position `index`.
    pub fn entry_at(&self, index: usize) -> Result<HeapEntry, HeapError> {
        self.entries
            .get(index)
            .copied()
            .ok_or(HeapError::IndexOutOfRange {
                index,
                size: self.entries.len(),
            })
    }

    /// The smallest resident balance (the root).
    pub fn top(&self) -> Result<HeapEntry, HeapError> {
        self.entry_at(0)
    }

    /// Entries in array order.
    pub fn iter(&self) -> impl Iterator<Item = &HeapEntry> {
        self.entries.iter()
    }

    /// Reconcile `address` with its new balance.
    ///
    /// Residents are updated in place (or removed at zero). Newcomers join
    /// while there is room; once full they must be strictly larger than the
    /// root to replace it, so equal balances keep the incumbent.
    pub fn insert_or_update(&mut self, address: Address, balance: U256) -> HeapChange {
        if self.capacity == 0 {
            return HeapChange::Unchanged;
        }

        if let Some(slot) = self.slots.get(&address).copied() {
            if balance.is_zero() {
                self.remove(&address);
                return HeapChange::Removed;
            }
            let pos = slot - 1;
            if self.entries[pos].balance == balance {
                return HeapChange::Unchanged;
            }
            self.entries[pos].balance = balance;
            self.restore(pos);
            return HeapChange::Updated;
        }

        if balance.is_zero() {
            return HeapChange::Unchanged;
        }

        let entry = HeapEntry { address, balance };
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
            let pos = self.entries.len() - 1;
            self.slots.insert(address, pos + 1);
            self.sift_up(pos);
            return HeapChange::Inserted;
        }

        if balance > self.entries[0].balance {
            let evicted = std::mem::replace(&mut self.entries[0], entry);
            self.slots.remove(&evicted.address);
            self.slots.insert(address, 1);
            self.sift_down(0);
            return HeapChange::Evicted { evicted };
        }

        HeapChange::Unchanged
    }

    /// Drop `address` from the heap, returning its entry if it was resident.
    pub fn remove(&mut self, address: &Address) -> Option<HeapEntry> {
        let pos = self.slots.remove(address)? - 1;
        let removed = self.entries.swap_remove(pos);
        if pos < self.entries.len() {
            // The former last entry now sits at `pos`; its order relative to
            // the new neighbours is unknown.
            let moved = self.entries[pos].address;
            self.slots.insert(moved, pos + 1);
            self.restore(pos);
        }
        Some(removed)
    }

    /// Clear and repopulate from a full balance listing.
    ///
    /// Balances are ranked largest first with ties broken by address, so the
    /// result does not depend on the iteration order of the source.
    pub fn rebuild(&mut self, balances: impl IntoIterator<Item = (Address, U256)>) {
        let mut ranked: Vec<(Address, U256)> = balances
            .into_iter()
            .filter(|(_, balance)| !balance.is_zero())
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        self.entries.clear();
        self.slots.clear();
        for (address, balance) in ranked.into_iter().take(self.capacity) {
            self.insert_or_update(address, balance);
        }
    }

    /// Verify heap order and index consistency, returning a description of
    /// the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.entries.len() > self.capacity {
            return Err(format!(
                "size {} exceeds capacity {}",
                self.entries.len(),
                self.capacity
            ));
        }
        if self.slots.len() != self.entries.len() {
            return Err(format!(
                "{} index entries for {} slots",
                self.slots.len(),
                self.entries.len()
            ));
        }
        for (pos, entry) in self.entries.iter().enumerate() {
            if entry.balance.is_zero() {
                return Err(format!("zero balance resident at slot {pos}"));
            }
            if self.slots.get(&entry.address) != Some(&(pos + 1)) {
                return Err(format!("index for {} does not point at slot {pos}", entry.address));
            }
            if pos > 0 {
                let parent = (pos - 1) / 2;
                if entry.balance < self.entries[parent].balance {
                    return Err(format!("slot {pos} is smaller than its parent {parent}"));
                }
            }
        }
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots.insert(self.entries[a].address, a + 1);
        self.slots.insert(self.entries[b].address, b + 1);
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.entries[pos].balance >= self.entries[parent].balance {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.entries[left].balance < self.entries[smallest].balance {
                smallest = left;
            }
            if right < len && self.entries[right].balance < self.entries[smallest].balance {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    fn restore(&mut self, pos: usize) {
        let pos = self.sift_up(pos);
        self.sift_down(pos);
    }
}
