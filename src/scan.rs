//! Line-by-line scanning of input sources.
//!
//! Each source is read to the end (or to its first I/O error) into a staged
//! accumulator (see [`Aggregator::stage`]) that is merged into the run's
//! aggregator only when the source turns out valid. A valid source was opened, read
//! without error and had at least one well-formed line.

use crate::aggregate::{Aggregator, QuerySink};
use crate::error::SourceError;
use crate::filter::EntryFilter;
use crate::line::{parse_line, LineError};
use crate::source::InputSource;
use std::io::{self, BufRead};

/// Line counters for one source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    /// Lines read, malformed or not.
    pub lines: usize,
    /// Malformed lines.
    pub skipped: usize,
    /// Well-formed lines inside the time range.
    pub in_range: usize,
    /// Well-formed lines outside the time range.
    pub out_of_range: usize,
}

impl LineStats {
    /// Structurally valid lines, regardless of range.
    pub fn valid(&self) -> usize {
        self.in_range + self.out_of_range
    }
}

/// Outcome of scanning one source.
#[derive(Debug)]
pub struct SourceReport {
    pub name: String,
    pub stats: LineStats,
    /// First malformed line (1-based) and why it was skipped.
    pub first_skipped: Option<(usize, LineError)>,
    /// `Err` when the source was excluded from the result.
    pub status: Result<(), SourceError>,
}

impl SourceReport {
    pub fn is_valid(&self) -> bool {
        self.status.is_ok()
    }
}

/// Reports for every source, in scan order.
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub reports: Vec<SourceReport>,
}

impl ScanSummary {
    pub fn any_valid(&self) -> bool {
        self.reports.iter().any(SourceReport::is_valid)
    }

    pub fn valid_sources(&self) -> usize {
        self.reports.iter().filter(|r| r.is_valid()).count()
    }

    /// Sources that were dropped, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = &SourceError> {
        self.reports.iter().filter_map(|r| r.status.as_ref().err())
    }

    /// Line counters summed over the valid sources.
    pub fn valid_totals(&self) -> LineStats {
        self.reports
            .iter()
            .filter(|r| r.is_valid())
            .fold(LineStats::default(), |acc, r| LineStats {
                lines: acc.lines + r.stats.lines,
                skipped: acc.skipped + r.stats.skipped,
                in_range: acc.in_range + r.stats.in_range,
                out_of_range: acc.out_of_range + r.stats.out_of_range,
            })
    }
}

/// Drives parsing and filtering over a sequence of sources.
pub struct Scanner<'f, F> {
    filter: &'f F,
}

impl<'f, F: EntryFilter> Scanner<'f, F> {
    pub fn new(filter: &'f F) -> Self {
        Self { filter }
    }

    /// Scan all sources in order, opening each with [`InputSource::open`].
    pub fn scan_all(&self, sources: &[InputSource], aggregator: &mut Aggregator) -> ScanSummary {
        self.scan_all_with(sources, InputSource::open, aggregator)
    }

    /// Scan all sources in order with a custom opener.
    pub fn scan_all_with<O>(
        &self,
        sources: &[InputSource],
        mut open: O,
        aggregator: &mut Aggregator,
    ) -> ScanSummary
    where
        O: FnMut(&InputSource) -> io::Result<Box<dyn BufRead>>,
    {
        sources
            .iter()
            .fold(ScanSummary::default(), |mut summary, source| {
                let report = match open(source) {
                    Ok(reader) => aggregator.stage(
                        |part| self.scan_reader(source.name(), reader, part),
                        SourceReport::is_valid,
                    ),
                    Err(err) => SourceReport {
                        name: source.name(),
                        stats: LineStats::default(),
                        first_skipped: None,
                        status: Err(SourceError::Unopenable {
                            name: source.name(),
                            source: err,
                        }),
                    },
                };
                summary.reports.push(report);
                summary
            })
    }

    /// Scan one already-open reader, feeding in-range queries to `sink`.
    ///
    /// The line buffer lives for this call only.
    pub fn scan_reader<R, S>(&self, name: String, mut reader: R, sink: &mut S) -> SourceReport
    where
        R: BufRead,
        S: QuerySink + ?Sized,
    {
        let mut stats = LineStats::default();
        let mut first_skipped = None;
        let mut buf = Vec::new();

        let read_error = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break None,
                Ok(_) => {}
                Err(err) => break Some(err),
            }
            stats.lines += 1;

            match parse_line(&buf) {
                Ok(entry) => {
                    if self.filter.matches(&entry) {
                        stats.in_range += 1;
                        sink.accept(entry.query);
                    } else {
                        stats.out_of_range += 1;
                    }
                }
                Err(reason) => {
                    stats.skipped += 1;
                    if first_skipped.is_none() {
                        first_skipped = Some((stats.lines, reason));
                    }
                }
            }
        };

        let status = match read_error {
            Some(source) => Err(SourceError::Read {
                name: name.clone(),
                line: stats.lines,
                source,
            }),
            None if stats.valid() == 0 => Err(SourceError::NoValidLine {
                name: name.clone(),
                skipped: stats.skipped,
            }),
            None => Ok(()),
        };

        SourceReport {
            name,
            stats,
            first_skipped,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateOutput;
    use crate::filter::TimeRange;
    use crate::query::Command;
    use crate::timestamp::Timestamp;
    use std::io::{Cursor, Read, Write};
    use std::num::NonZeroUsize;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    const VALID: &str = "2020-05-01 10:00:00\ta\n\
                         2020-05-01 11:00:00\tb\n\
                         2020-05-02 10:00:00\ta\n";
    const GARBAGE: &str = "garbage\n2020-05-01 10:00:00\n2020-05-01 10:00:00\t\n";

    /// Yields `data`, then fails every subsequent read.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            Ok(n)
        }
    }

    fn distinct() -> Aggregator {
        Aggregator::for_command(Command::Distinct)
    }

    fn memory_opener(
        inputs: Vec<(&'static str, Option<&'static str>)>,
    ) -> impl FnMut(&InputSource) -> io::Result<Box<dyn BufRead>> {
        move |source: &InputSource| -> io::Result<Box<dyn BufRead>> {
            let name = source.name();
            let data = inputs
                .iter()
                .find(|(n, _)| *n == name)
                .and_then(|(_, data)| *data);
            match data {
                Some(data) => Ok(Box::new(Cursor::new(data.as_bytes().to_vec()))),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
            }
        }
    }

    fn files(names: &[&str]) -> Vec<InputSource> {
        names
            .iter()
            .map(|n| InputSource::File(PathBuf::from(n)))
            .collect()
    }

    #[test]
    fn test_scan_counts_lines() {
        let range = TimeRange::unbounded();
        let scanner = Scanner::new(&range);
        let mut agg = distinct();
        let input = format!("{VALID}{GARBAGE}");

        let report = scanner.scan_reader("mem".into(), Cursor::new(input), &mut agg);

        assert!(report.is_valid());
        assert_eq!(
            report.stats,
            LineStats {
                lines: 6,
                skipped: 3,
                in_range: 3,
                out_of_range: 0,
            }
        );
        assert_eq!(report.first_skipped.as_ref().map(|(n, _)| *n), Some(4));
        assert_eq!(agg.finish(), AggregateOutput::Distinct(2));
    }

    #[test]
    fn test_range_drops_lines_without_counting_skipped() {
        let from = Timestamp::parse_partial(Timestamp::MIN, "2020-05-01 11").unwrap();
        let to = Timestamp::parse_partial(Timestamp::MAX, "2020-05-01").unwrap();
        let range = TimeRange::new(from, to);
        let scanner = Scanner::new(&range);
        let mut agg = distinct();

        let report = scanner.scan_reader("mem".into(), Cursor::new(VALID), &mut agg);

        assert!(report.is_valid());
        assert_eq!(report.stats.in_range, 1);
        assert_eq!(report.stats.out_of_range, 2);
        assert_eq!(report.stats.skipped, 0);
        assert_eq!(agg.finish(), AggregateOutput::Distinct(1));
    }

    #[test]
    fn test_all_out_of_range_is_still_valid() {
        let year = Timestamp::parse_partial(Timestamp::MIN, "2001").unwrap();
        let range = TimeRange::new(Timestamp::MIN, year);
        let scanner = Scanner::new(&range);
        let mut agg = distinct();

        let report = scanner.scan_reader("mem".into(), Cursor::new(VALID), &mut agg);

        assert!(report.is_valid());
        assert_eq!(agg.finish(), AggregateOutput::Distinct(0));
    }

    #[test]
    fn test_only_malformed_is_no_valid_line() {
        let range = TimeRange::unbounded();
        let scanner = Scanner::new(&range);
        let mut agg = distinct();

        let report = scanner.scan_reader("junk".into(), Cursor::new(GARBAGE), &mut agg);

        assert!(matches!(
            report.status,
            Err(SourceError::NoValidLine { skipped: 3, .. })
        ));
    }

    #[test]
    fn test_empty_source_is_no_valid_line() {
        let range = TimeRange::unbounded();
        let scanner = Scanner::new(&range);
        let mut agg = distinct();

        let report = scanner.scan_reader("empty".into(), Cursor::new(""), &mut agg);

        assert!(matches!(
            report.status,
            Err(SourceError::NoValidLine { skipped: 0, .. })
        ));
    }

    #[test]
    fn test_read_error_fails_source() {
        let range = TimeRange::unbounded();
        let scanner = Scanner::new(&range);
        let mut agg = distinct();
        let reader = io::BufReader::new(FailingReader {
            data: Cursor::new(VALID.as_bytes().to_vec()),
        });

        let report = scanner.scan_reader("flaky".into(), reader, &mut agg);

        assert_eq!(report.stats.lines, 3);
        assert!(matches!(
            report.status,
            Err(SourceError::Read { line: 3, .. })
        ));
    }

    #[test]
    fn test_only_invalid_sources_fail_the_run() {
        let range = TimeRange::unbounded();
        let scanner = Scanner::new(&range);
        let mut agg = distinct();
        let opener = memory_opener(vec![("junk.log", Some(GARBAGE))]);

        let summary = scanner.scan_all_with(&files(&["junk.log", "missing.log"]), opener, &mut agg);

        assert!(!summary.any_valid());
        assert_eq!(summary.failures().count(), 2);
        assert!(matches!(
            summary.reports[1].status,
            Err(SourceError::Unopenable { .. })
        ));
    }

    #[test]
    fn test_valid_source_rescues_run() {
        let range = TimeRange::unbounded();
        let scanner = Scanner::new(&range);
        let mut agg = distinct();
        let opener = memory_opener(vec![("junk.log", Some(GARBAGE)), ("ok.log", Some(VALID))]);

        let summary = scanner.scan_all_with(&files(&["junk.log", "ok.log"]), opener, &mut agg);

        assert!(summary.any_valid());
        assert_eq!(summary.valid_sources(), 1);
        assert_eq!(summary.valid_totals().in_range, 3);
        assert_eq!(agg.finish(), AggregateOutput::Distinct(2));
    }

    #[test]
    fn test_failed_source_contributes_nothing() {
        let range = TimeRange::unbounded();
        let scanner = Scanner::new(&range);
        let mut agg = Aggregator::for_command(Command::Top(NonZeroUsize::new(5).unwrap()));
        let sources = files(&["ok.log", "flaky.log"]);
        let opener = |source: &InputSource| -> io::Result<Box<dyn BufRead>> {
            if source.name() == "flaky.log" {
                Ok(Box::new(io::BufReader::new(FailingReader {
                    data: Cursor::new(b"2020-05-01 10:00:00\tz\n".to_vec()),
                })))
            } else {
                Ok(Box::new(Cursor::new(VALID.as_bytes().to_vec())))
            }
        };

        let summary = scanner.scan_all_with(&sources, opener, &mut agg);

        assert_eq!(summary.valid_sources(), 1);
        match agg.finish() {
            AggregateOutput::Top(ranked) => {
                assert!(ranked.iter().all(|e| e.query != b"z"));
                assert_eq!(ranked[0].query, b"a");
                assert_eq!(ranked[0].count, 2);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_scan_real_files() -> anyhow::Result<()> {
        let mut first = NamedTempFile::new()?;
        write!(first, "{VALID}")?;
        first.flush()?;
        let mut second = NamedTempFile::new()?;
        write!(second, "2020-05-03 00:00:00\tc\n2020-05-03 00:00:01\ta")?;
        second.flush()?;

        let range = TimeRange::unbounded();
        let scanner = Scanner::new(&range);
        let mut agg = distinct();
        let sources = vec![
            InputSource::File(first.path().to_path_buf()),
            InputSource::File(second.path().to_path_buf()),
        ];

        let summary = scanner.scan_all(&sources, &mut agg);

        assert_eq!(summary.valid_sources(), 2);
        assert_eq!(summary.valid_totals().lines, 5);
        assert_eq!(agg.finish(), AggregateOutput::Distinct(3));
        Ok(())
    }
}
