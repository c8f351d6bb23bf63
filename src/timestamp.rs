//! Timestamp codec for query log lines and range boundaries.
//!
//! A [`Timestamp`] is an ordered tuple of `(year, month, day, hour, minute,
//! second)`. The derived ordering compares fields most-significant first, so
//! comparing two timestamps is the same as comparing the instants they name.
//! [`Timestamp::packed`] gives the equivalent 64-bit packed form.

use crate::error::TimestampError;
use std::fmt;

/// One field of a timestamp, in parse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    /// All fields, most significant first.
    pub const ALL: [Field; 6] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Hour,
        Field::Minute,
        Field::Second,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
        }
    }

    /// Inclusive `(min, max)` accepted for this field.
    ///
    /// Day is not checked against the month length.
    pub fn bounds(self) -> (u16, u16) {
        match self {
            Field::Year => (2000, 2020),
            Field::Month => (1, 12),
            Field::Day => (1, 31),
            Field::Hour => (0, 24),
            Field::Minute => (0, 59),
            Field::Second => (0, 59),
        }
    }

    /// Separator expected after this field, if any.
    fn separator(self) -> Option<u8> {
        match self {
            Field::Year | Field::Month => Some(b'-'),
            Field::Day => Some(b' '),
            Field::Hour | Field::Minute => Some(b':'),
            Field::Second => None,
        }
    }
}

/// A calendar date and time of day, ordered chronologically.
///
/// Field order matters: `Ord` is derived and compares lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    pub year: u16,
    pub month: u16,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    /// Smallest representable value; the default lower range bound.
    pub const MIN: Timestamp = Timestamp {
        year: 0,
        month: 0,
        day: 0,
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Largest representable value (all bits set); the default upper bound.
    pub const MAX: Timestamp = Timestamp {
        year: u16::MAX,
        month: u16::MAX,
        day: u8::MAX,
        hour: u8::MAX,
        minute: u8::MAX,
        second: u8::MAX,
    };

    /// Parse a complete `YYYY-MM-DD hh:mm:ss` timestamp at the start of `input`.
    ///
    /// Returns the timestamp and the number of bytes consumed. Anything after
    /// the seconds field is left for the caller.
    pub fn parse_full(input: &[u8]) -> Result<(Timestamp, usize), TimestampError> {
        Self::parse_onto(Timestamp::MIN, input, true)
    }

    /// Parse a boundary date: any prefix of the full grammar ending at a
    /// field boundary (`2020`, `2020-05`, `2020-05-01 10`, ...).
    ///
    /// Fields that are not supplied keep their value from `base`. The whole
    /// input must be consumed.
    pub fn parse_partial(base: Timestamp, input: &str) -> Result<Timestamp, TimestampError> {
        let bytes = input.as_bytes();
        let (ts, consumed) = Self::parse_onto(base, bytes, false)?;
        if consumed != bytes.len() {
            return Err(TimestampError::UnexpectedByte {
                offset: consumed,
                found: bytes[consumed],
            });
        }
        Ok(ts)
    }

    /// Parse fields left to right, overwriting the corresponding fields of
    /// `base`.
    ///
    /// When `expect_full` is false, running out of input right after a field
    /// ends the parse successfully. When it is true, all six fields must be
    /// present. Any other byte in place of a separator is always an error.
    pub fn parse_onto(
        base: Timestamp,
        input: &[u8],
        expect_full: bool,
    ) -> Result<(Timestamp, usize), TimestampError> {
        let mut ts = base;
        let mut pos = 0;

        for field in Field::ALL {
            let (value, len) = parse_field(&input[pos..], field, pos)?;
            ts.set(field, value);
            pos += len;

            let Some(sep) = field.separator() else {
                break;
            };
            match input.get(pos) {
                Some(&b) if b == sep => pos += 1,
                None if !expect_full => return Ok((ts, pos)),
                None => return Err(TimestampError::Truncated { after: field }),
                Some(&found) => {
                    return Err(TimestampError::UnexpectedByte { offset: pos, found })
                }
            }
        }

        Ok((ts, pos))
    }

    fn set(&mut self, field: Field, value: u16) {
        // parse_field keeps every value inside the field's bounds, all of
        // which fit in a u8 except year and month.
        match field {
            Field::Year => self.year = value,
            Field::Month => self.month = value,
            Field::Day => self.day = value as u8,
            Field::Hour => self.hour = value as u8,
            Field::Minute => self.minute = value as u8,
            Field::Second => self.second = value as u8,
        }
    }

    /// Packed form: second in the lowest byte, then minute, hour, day, a
    /// 16-bit month, and a 16-bit year in the top bits.
    pub fn packed(&self) -> u64 {
        (self.year as u64) << 48
            | (self.month as u64) << 32
            | (self.day as u64) << 24
            | (self.hour as u64) << 16
            | (self.minute as u64) << 8
            | self.second as u64
    }

    pub fn from_packed(value: u64) -> Self {
        Self {
            year: (value >> 48) as u16,
            month: (value >> 32) as u16,
            day: (value >> 24) as u8,
            hour: (value >> 16) as u8,
            minute: (value >> 8) as u8,
            second: value as u8,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Parse an unsigned decimal run for `field`, returning `(value, digits)`.
fn parse_field(input: &[u8], field: Field, offset: usize) -> Result<(u16, usize), TimestampError> {
    let (min, max) = field.bounds();
    let digits = input.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return Err(TimestampError::MissingField { field, offset });
    }

    let mut value: u32 = 0;
    for &b in &input[..digits] {
        value = value * 10 + u32::from(b - b'0');
        if value > u32::from(max) {
            return Err(TimestampError::OutOfRange { field, offset });
        }
    }
    if value < u32::from(min) {
        return Err(TimestampError::OutOfRange { field, offset });
    }

    Ok((value as u16, digits))
}
