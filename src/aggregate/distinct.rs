//! Cardinality of the distinct queries seen.

use std::collections::HashSet;

/// Set of distinct query strings.
#[derive(Debug, Default, Clone)]
pub struct DistinctCounter {
    seen: HashSet<Vec<u8>>,
}

impl DistinctCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, query: &[u8]) {
        if !self.seen.contains(query) {
            self.seen.insert(query.to_vec());
        }
    }

    pub fn merge(&mut self, other: DistinctCounter) {
        if self.seen.len() < other.seen.len() {
            let mut other = other;
            std::mem::swap(self, &mut other);
            self.seen.extend(other.seen);
        } else {
            self.seen.extend(other.seen);
        }
    }

    pub fn count(&self) -> usize {
        self.seen.len()
    }
}
