pub mod time_range;

pub use time_range::TimeRange;

use crate::line::LogEntry;

/// Trait for deciding which parsed entries reach the aggregator
pub trait EntryFilter {
    fn matches(&self, entry: &LogEntry<'_>) -> bool;

    fn description(&self) -> String;
}
