//! Named event counters.
//!
//! Counters are plain integers: every ledger and registry operation runs under
//! an exclusive borrow, so no atomics are needed.

use serde::Serialize;
use std::collections::BTreeMap;

/// A fixed set of named counters. Unknown names are ignored.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StatsCounter {
    counters: BTreeMap<&'static str, u64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            counters: names.iter().map(|&name| (name, 0)).collect(),
        }
    }

    pub fn increment(&mut self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get_mut(name) {
            *counter = counter.saturating_add(value);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        self.counters.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_known_names_only() {
        let mut stats = StatsCounter::new(&["transfers", "claims"]);
        stats.increment("transfers");
        stats.add("transfers", 2);
        stats.increment("unknown");
        assert_eq!(stats.get("transfers"), 3);
        assert_eq!(stats.get("claims"), 0);
        assert_eq!(stats.get("unknown"), 0);
        assert_eq!(stats.snapshot().len(), 2);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let mut stats = StatsCounter::new(&["x"]);
        stats.add("x", u64::MAX);
        stats.increment("x");
        assert_eq!(stats.get("x"), u64::MAX);
    }
}
