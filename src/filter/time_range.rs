use super::EntryFilter;
use crate::line::LogEntry;
use crate::timestamp::Timestamp;

/// Inclusive `[from, to]` range filter on entry timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    from: Timestamp,
    to: Timestamp,
}

impl TimeRange {
    pub fn new(from: Timestamp, to: Timestamp) -> Self {
        Self { from, to }
    }

    /// Range that accepts every timestamp.
    pub fn unbounded() -> Self {
        Self::new(Timestamp::MIN, Timestamp::MAX)
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.from <= ts && ts <= self.to
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl EntryFilter for TimeRange {
    fn matches(&self, entry: &LogEntry<'_>) -> bool {
        self.contains(entry.timestamp)
    }

    fn description(&self) -> String {
        let bound = |ts: Timestamp, open: Timestamp| {
            if ts == open {
                "*".to_string()
            } else {
                ts.to_string()
            }
        };
        format!(
            "Range: [{}, {}]",
            bound(self.from, Timestamp::MIN),
            bound(self.to, Timestamp::MAX)
        )
    }
}
