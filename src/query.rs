//! Resolved run configuration and the scan-then-aggregate pipeline.

use crate::aggregate::{AggregateOutput, Aggregator};
use crate::error::{Bound, QueryError};
use crate::filter::TimeRange;
use crate::scan::{ScanSummary, Scanner};
use crate::source::InputSource;
use crate::timestamp::Timestamp;
use std::io::{self, BufRead};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// What to compute over the in-range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Number of distinct queries.
    Distinct,
    /// The N most frequent queries.
    Top(NonZeroUsize),
}

impl Command {
    /// `top N`, rejecting a zero count.
    pub fn top(n: u64) -> Result<Self, QueryError> {
        usize::try_from(n)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Command::Top)
            .ok_or(QueryError::InvalidTopCount(n))
    }
}

/// Parse a `--from` boundary. Missing trailing fields take their minimum.
pub fn parse_from(input: &str) -> Result<Timestamp, QueryError> {
    parse_bound(Bound::From, Timestamp::MIN, input)
}

/// Parse a `--to` boundary. Missing trailing fields take their maximum, so
/// `2020-05` covers all of May 2020.
pub fn parse_to(input: &str) -> Result<Timestamp, QueryError> {
    parse_bound(Bound::To, Timestamp::MAX, input)
}

fn parse_bound(bound: Bound, base: Timestamp, input: &str) -> Result<Timestamp, QueryError> {
    Timestamp::parse_partial(base, input).map_err(|source| QueryError::MalformedBoundaryDate {
        bound,
        input: input.to_string(),
        source,
    })
}

/// Everything a run needs, validated before any source is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub command: Command,
    pub range: TimeRange,
    pub sources: Vec<InputSource>,
}

impl QueryOptions {
    pub fn new(command: Command, range: TimeRange, sources: Vec<InputSource>) -> Self {
        Self {
            command,
            range,
            sources,
        }
    }

    /// Build options from raw argument values.
    ///
    /// Returns the options and any `-` arguments that were dropped because
    /// standard input was already listed.
    pub fn from_args(
        top: Option<u64>,
        from: Option<&str>,
        to: Option<&str>,
        files: &[PathBuf],
    ) -> Result<(Self, Vec<PathBuf>), QueryError> {
        let command = match top {
            Some(n) => Command::top(n)?,
            None => Command::Distinct,
        };
        let from = from.map(parse_from).transpose()?.unwrap_or(Timestamp::MIN);
        let to = to.map(parse_to).transpose()?.unwrap_or(Timestamp::MAX);
        let (sources, duplicates) = InputSource::from_args(files);

        Ok((Self::new(command, TimeRange::new(from, to), sources), duplicates))
    }
}

/// Result of scanning every source.
#[derive(Debug)]
pub struct QueryRun {
    pub summary: ScanSummary,
    aggregator: Aggregator,
}

impl QueryRun {
    /// The aggregation result, or `NoValidSource` if every source failed.
    pub fn into_output(self) -> Result<AggregateOutput, QueryError> {
        if !self.summary.any_valid() {
            return Err(QueryError::NoValidSource);
        }
        Ok(self.aggregator.finish())
    }
}

/// Scan the configured sources and aggregate their in-range queries.
pub fn run(options: &QueryOptions) -> QueryRun {
    run_with(options, InputSource::open)
}

/// [`run`] with a custom source opener.
pub fn run_with<O>(options: &QueryOptions, open: O) -> QueryRun
where
    O: FnMut(&InputSource) -> io::Result<Box<dyn BufRead>>,
{
    let mut aggregator = Aggregator::for_command(options.command);
    let scanner = Scanner::new(&options.range);
    let summary = scanner.scan_all_with(&options.sources, open, &mut aggregator);
    QueryRun {
        summary,
        aggregator,
    }
}
