//! Frequency table with deterministic top-N extraction.

use std::cmp::Ordering;
use std::collections::HashMap;

/// A query and the number of times it was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub query: Vec<u8>,
    pub count: u64,
}

/// Occurrence counts per distinct query.
#[derive(Debug, Default, Clone)]
pub struct TopSelector {
    counts: HashMap<Vec<u8>, u64>,
}

impl TopSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, query: &[u8]) {
        match self.counts.get_mut(query) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(query.to_vec(), 1);
            }
        }
    }

    pub fn merge(&mut self, other: TopSelector) {
        for (query, count) in other.counts {
            *self.counts.entry(query).or_insert(0) += count;
        }
    }

    /// The `n` most frequent queries, by count descending then query bytes
    /// ascending. Fewer than `n` if the table is smaller.
    pub fn ranked(&self, n: usize) -> Vec<RankedEntry> {
        if n == 0 {
            return Vec::new();
        }

        let mut entries: Vec<(&[u8], u64)> = self
            .counts
            .iter()
            .map(|(query, &count)| (query.as_slice(), count))
            .collect();

        // Partition so the first n are the winners, then order only those.
        if n < entries.len() {
            entries.select_nth_unstable_by(n - 1, rank_order);
            entries.truncate(n);
        }
        entries.sort_unstable_by(rank_order);

        entries
            .into_iter()
            .map(|(query, count)| RankedEntry {
                query: query.to_vec(),
                count,
            })
            .collect()
    }
}

fn rank_order(a: &(&[u8], u64), b: &(&[u8], u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(queries: &[&str]) -> TopSelector {
        let mut s = TopSelector::new();
        for q in queries {
            s.accept(q.as_bytes());
        }
        s
    }

    fn pairs(ranked: Vec<RankedEntry>) -> Vec<(String, u64)> {
        ranked
            .into_iter()
            .map(|e| (String::from_utf8(e.query).unwrap(), e.count))
            .collect()
    }

    #[test]
    fn test_top_two() {
        let s = selector(&["a", "b", "a", "c", "b", "a"]);
        assert_eq!(
            pairs(s.ranked(2)),
            vec![("a".to_string(), 3), ("b".to_string(), 2)]
        );
    }

    #[test]
    fn test_ties_break_ascending() {
        let s = selector(&["y", "x"]);
        assert_eq!(
            pairs(s.ranked(2)),
            vec![("x".to_string(), 1), ("y".to_string(), 1)]
        );
    }

    #[test]
    fn test_tie_at_cutoff_keeps_smallest_query() {
        let s = selector(&["d", "c", "b", "a", "z", "z"]);
        assert_eq!(
            pairs(s.ranked(3)),
            vec![
                ("z".to_string(), 2),
                ("a".to_string(), 1),
                ("b".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_fewer_than_n_returns_all() {
        let s = selector(&["a", "b", "a"]);
        assert_eq!(
            pairs(s.ranked(10)),
            vec![("a".to_string(), 2), ("b".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty_table() {
        assert!(TopSelector::new().ranked(5).is_empty());
    }

    #[test]
    fn test_zero_yields_nothing() {
        assert!(selector(&["a"]).ranked(0).is_empty());
    }

    #[test]
    fn test_byte_order_tie_break() {
        // Uppercase sorts before lowercase in byte order.
        let s = selector(&["b", "B", "a"]);
        let ranked = pairs(s.ranked(3));
        assert_eq!(ranked[0].0, "B");
        assert_eq!(ranked[1].0, "a");
        assert_eq!(ranked[2].0, "b");
    }

    #[test]
    fn test_merge_adds_counts() {
        let mut a = selector(&["a", "b"]);
        a.merge(selector(&["a", "a", "c"]));
        assert_eq!(
            pairs(a.ranked(10)),
            vec![
                ("a".to_string(), 3),
                ("b".to_string(), 1),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_ranked_matches_full_sort() {
        let queries: Vec<String> = (0..200).map(|i| format!("q{}", (i * 7) % 23)).collect();
        let mut s = TopSelector::new();
        for q in &queries {
            s.accept(q.as_bytes());
        }
        let full = s.ranked(usize::MAX);
        for n in 1..=25 {
            assert_eq!(s.ranked(n), full[..n.min(full.len())].to_vec(), "n={n}");
        }
    }
}
