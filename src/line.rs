//! Parsing of a single `<timestamp>\t<query>` log line.

use crate::error::TimestampError;
use crate::timestamp::Timestamp;
use std::fmt;

/// One structurally valid log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry<'a> {
    pub timestamp: Timestamp,
    /// Query bytes, without the line terminator.
    pub query: &'a [u8],
}

/// Reason a line was skipped as malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    Timestamp(TimestampError),
    MissingTab,
    EmptyQuery,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::Timestamp(err) => write!(f, "bad timestamp: {}", err),
            LineError::MissingTab => f.write_str("no tab after timestamp"),
            LineError::EmptyQuery => f.write_str("empty query"),
        }
    }
}

impl std::error::Error for LineError {}

/// Strip one trailing `\n` (or `\r\n`) if present.
pub fn strip_terminator(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(rest) => rest.strip_suffix(b"\r").unwrap_or(rest),
        None => line,
    }
}

/// Split a raw line into its timestamp and query.
///
/// The timestamp must be complete and be followed by exactly one tab; the
/// rest of the line, tabs included, is the query.
pub fn parse_line(raw: &[u8]) -> Result<LogEntry<'_>, LineError> {
    let line = strip_terminator(raw);
    let (timestamp, consumed) = Timestamp::parse_full(line).map_err(LineError::Timestamp)?;

    let query = match line[consumed..].split_first() {
        Some((&b'\t', rest)) => rest,
        _ => return Err(LineError::MissingTab),
    };
    if query.is_empty() {
        return Err(LineError::EmptyQuery);
    }

    Ok(LogEntry { timestamp, query })
}
