//! Error types for querystat.
//!
//! `QueryError` is fatal and aborts a run. `SourceError` describes a single
//! input source that was dropped while the run carried on.

use crate::timestamp::Field;
use std::fmt;
use std::io;

/// Why a timestamp could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// No digits where a field was expected.
    MissingField { field: Field, offset: usize },

    /// Digits present but outside the field's bounds.
    OutOfRange { field: Field, offset: usize },

    /// A byte other than the expected separator followed a field.
    UnexpectedByte { offset: usize, found: u8 },

    /// Input ended before all six fields of a full timestamp.
    Truncated { after: Field },
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::MissingField { field, offset } => {
                write!(f, "missing {} at offset {}", field.name(), offset)
            }
            TimestampError::OutOfRange { field, offset } => {
                let (min, max) = field.bounds();
                write!(
                    f,
                    "invalid {} at offset {} (expected {}..={})",
                    field.name(),
                    offset,
                    min,
                    max
                )
            }
            TimestampError::UnexpectedByte { offset, found } => write!(
                f,
                "unexpected {:?} at offset {}",
                char::from(*found),
                offset
            ),
            TimestampError::Truncated { after } => {
                write!(f, "timestamp ends after {}", after.name())
            }
        }
    }
}

impl std::error::Error for TimestampError {}

/// Which end of the time range a boundary argument belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    From,
    To,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::From => f.write_str("from"),
            Bound::To => f.write_str("to"),
        }
    }
}

/// Fatal errors: the run stops and nothing is printed on stdout.
#[derive(Debug)]
pub enum QueryError {
    /// A `--from`/`--to` argument did not parse.
    MalformedBoundaryDate {
        bound: Bound,
        input: String,
        source: TimestampError,
    },

    /// `top` was asked for zero entries.
    InvalidTopCount(u64),

    /// Every input source was unopenable, failed mid-read or had no valid line.
    NoValidSource,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::MalformedBoundaryDate {
                bound,
                input,
                source,
            } => write!(f, "malformed {} date '{}': {}", bound, input, source),
            QueryError::InvalidTopCount(n) => {
                write!(f, "invalid top count {}: must be at least 1", n)
            }
            QueryError::NoValidSource => f.write_str("no valid input source"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::MalformedBoundaryDate { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A source that was excluded from the result.
#[derive(Debug)]
pub enum SourceError {
    /// The source could not be opened.
    Unopenable { name: String, source: io::Error },

    /// Reading stopped on an I/O error.
    Read {
        name: String,
        line: usize,
        source: io::Error,
    },

    /// Read to the end, but every line was malformed.
    NoValidLine { name: String, skipped: usize },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unopenable { name, source } => {
                write!(f, "{}: cannot open: {}", name, source)
            }
            SourceError::Read { name, line, source } => {
                write!(f, "{}: read error after line {}: {}", name, line, source)
            }
            SourceError::NoValidLine { name, skipped } => write!(
                f,
                "{}: no valid line ({} malformed line{})",
                name,
                skipped,
                if *skipped == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Unopenable { source, .. } | SourceError::Read { source, .. } => {
                Some(source)
            }
            SourceError::NoValidLine { .. } => None,
        }
    }
}
