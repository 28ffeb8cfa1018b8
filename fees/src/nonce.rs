//! Per-(address, magnitude) draw counters.

use serde::{Deserialize, Serialize};
use shuffle_types::Address;
use std::collections::HashMap;

/// Sparse nonce table. Untouched pairs read as zero; only pairs that have
/// drawn at least once occupy memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceBook {
    counters: HashMap<(Address, u32), u64>,
}

impl NonceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nonce for `(address, magnitude)`.
    pub fn get(&self, address: &Address, magnitude: u32) -> u64 {
        self.counters.get(&(*address, magnitude)).copied().unwrap_or(0)
    }

    /// Return the current nonce and advance it.
    pub fn next(&mut self, address: Address, magnitude: u32) -> u64 {
        let counter = self.counters.entry((address, magnitude)).or_insert(0);
        let current = *counter;
        *counter += 1;
        current
    }

    /// Number of pairs that have drawn at least once.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// All non-zero counters, sorted for deterministic export.
    pub fn entries(&self) -> Vec<(Address, u32, u64)> {
        let mut out: Vec<_> = self
            .counters
            .iter()
            .map(|(&(address, magnitude), &nonce)| (address, magnitude, nonce))
            .collect();
        out.sort();
        out
    }

    /// Rebuild from exported entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (Address, u32, u64)>) -> Self {
        Self {
            counters: entries
                .into_iter()
                .filter(|&(_, _, nonce)| nonce > 0)
                .map(|(address, magnitude, nonce)| ((address, magnitude), nonce))
                .collect(),
        }
    }
}
