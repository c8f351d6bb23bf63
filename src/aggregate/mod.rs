//! Consumers of the filtered query stream.
//!
//! Both aggregators take one query at a time through [`QuerySink::accept`];
//! which one runs is decided once from the [`Command`].

pub mod distinct;
pub mod top;

pub use distinct::DistinctCounter;
pub use top::{RankedEntry, TopSelector};

use crate::query::Command;
use std::num::NonZeroUsize;

/// Anything that consumes in-range queries one at a time.
pub trait QuerySink {
    fn accept(&mut self, query: &[u8]);
}

impl QuerySink for DistinctCounter {
    fn accept(&mut self, query: &[u8]) {
        DistinctCounter::accept(self, query)
    }
}

impl QuerySink for TopSelector {
    fn accept(&mut self, query: &[u8]) {
        TopSelector::accept(self, query)
    }
}

/// The accumulator for one run.
#[derive(Debug, Clone)]
pub enum Aggregator {
    Distinct(DistinctCounter),
    Top { selector: TopSelector, n: NonZeroUsize },
}

/// Final value of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutput {
    Distinct(usize),
    Top(Vec<RankedEntry>),
}

impl Aggregator {
    pub fn for_command(command: Command) -> Self {
        match command {
            Command::Distinct => Aggregator::Distinct(DistinctCounter::new()),
            Command::Top(n) => Aggregator::Top {
                selector: TopSelector::new(),
                n,
            },
        }
    }

    /// Run `scan` against an empty accumulator of the same kind, and fold
    /// what it collected into `self` only if `keep` approves the result.
    pub fn stage<T>(
        &mut self,
        scan: impl FnOnce(&mut dyn QuerySink) -> T,
        keep: impl FnOnce(&T) -> bool,
    ) -> T {
        match self {
            Aggregator::Distinct(total) => {
                let mut part = DistinctCounter::new();
                let result = scan(&mut part);
                if keep(&result) {
                    total.merge(part);
                }
                result
            }
            Aggregator::Top { selector, .. } => {
                let mut part = TopSelector::new();
                let result = scan(&mut part);
                if keep(&result) {
                    selector.merge(part);
                }
                result
            }
        }
    }

    pub fn finish(self) -> AggregateOutput {
        match self {
            Aggregator::Distinct(counter) => AggregateOutput::Distinct(counter.count()),
            Aggregator::Top { selector, n } => AggregateOutput::Top(selector.ranked(n.get())),
        }
    }
}

impl QuerySink for Aggregator {
    fn accept(&mut self, query: &[u8]) {
        match self {
            Aggregator::Distinct(counter) => counter.accept(query),
            Aggregator::Top { selector, .. } => selector.accept(query),
        }
    }
}
