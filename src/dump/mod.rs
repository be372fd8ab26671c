//! Parse and encode the escaped-text dump of interval entries.
//!
//! # Format
//!
//! A dump is a flat byte stream of entries, each encoding one interval:
//!
//! ```text
//! +-------+---+-----+---+-------+---+---+
//! | Start | " | End | \ | Value | \ | " |
//! +-------+---+-----+---+-------+---+---+
//!
//! Start, End = decimal integer text
//! Value      = decimal float text
//! ```
//!
//! `"` and `\` are structural and cannot appear inside a field: a bare `"`
//! terminates the start field, a bare `\` terminates the end field, and the
//! two-byte sequence `\"` terminates the value field and completes the entry.
//! Delimiter recognition is ordered: a `\` immediately followed by `"` is
//! always the entry terminator, never a bare `\`. The final entry of a dump
//! may omit its `\"`; end of input completes it.
//!
//! For example, `1"5\3.14\"2"9\1.0\"` decodes to the entries `(1, 5, 3.14)`
//! and `(2, 9, 1.0)`.
//!
//! # Partial loads
//!
//! [parse] applies entries to the target map as they complete. A field that
//! fails numeric conversion aborts the parse, leaving every previously
//! completed entry in place; the returned [Failure] reports the offending
//! field and how many entries were applied before it. Numeric fields convert
//! through Rust's `i64` and `f64` string grammars.

use crate::interval::{Entry, IntervalMap};
use bytes::{BufMut, Bytes, BytesMut};
use std::mem;
use thiserror::Error;

const QUOTE: u8 = b'"';
const ESCAPE: u8 = b'\\';

/// A dump field that failed numeric conversion.
///
/// Each variant carries the field text (lossily decoded when not UTF-8) and
/// the byte offset of the delimiter that completed the field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid start field {text:?} at byte {offset}")]
    InvalidStart { text: String, offset: usize },
    #[error("invalid end field {text:?} at byte {offset}")]
    InvalidEnd { text: String, offset: usize },
    #[error("invalid value field {text:?} at byte {offset}")]
    InvalidValue { text: String, offset: usize },
}

/// A parse abort: the field error plus how many entries were applied to the
/// target map before it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{error} ({applied} entries applied)")]
pub struct Failure {
    pub applied: usize,
    pub error: Error,
}

/// Accumulator state for one parse.
#[derive(Default)]
struct Parser {
    field: Vec<u8>,
    start: Option<i64>,
    end: Option<i64>,
    applied: usize,
}

impl Parser {
    fn take_field(&mut self) -> String {
        String::from_utf8_lossy(&mem::take(&mut self.field)).into_owned()
    }

    /// The field buffer is complete as the next entry's start key.
    fn complete_start(&mut self, offset: usize) -> Result<(), Error> {
        let text = self.take_field();
        let start = text
            .parse()
            .map_err(|_| Error::InvalidStart { text, offset })?;
        self.start = Some(start);
        Ok(())
    }

    /// The field buffer is complete as the next entry's end bound.
    fn complete_end(&mut self, offset: usize) -> Result<(), Error> {
        let text = self.take_field();
        let end = text.parse().map_err(|_| Error::InvalidEnd { text, offset })?;
        self.end = Some(end);
        Ok(())
    }

    /// The field buffer is complete as the entry's value; insert the entry.
    fn complete_entry(&mut self, map: &mut IntervalMap, offset: usize) -> Result<(), Error> {
        let text = self.take_field();
        let value = text
            .parse()
            .map_err(|_| Error::InvalidValue { text, offset })?;
        let start = self.start.take().ok_or(Error::InvalidStart {
            text: String::new(),
            offset,
        })?;
        let end = self.end.take().ok_or(Error::InvalidEnd {
            text: String::new(),
            offset,
        })?;
        map.insert(start, end, value);
        self.applied += 1;
        Ok(())
    }

    fn is_drained(&self) -> bool {
        self.field.is_empty() && self.start.is_none() && self.end.is_none()
    }
}

/// Parse a dump, applying each completed entry to `map` as an insert.
///
/// Returns the number of entries applied. On conversion failure, entries
/// applied before the failure remain in `map` (loads are not atomic).
pub fn parse(data: &[u8], map: &mut IntervalMap) -> Result<usize, Failure> {
    let mut parser = Parser::default();
    let mut offset = 0;
    while offset < data.len() {
        let result = match data[offset] {
            ESCAPE if data.get(offset + 1) == Some(&QUOTE) => {
                let result = parser.complete_entry(map, offset);
                offset += 2;
                result
            }
            QUOTE => {
                let result = parser.complete_start(offset);
                offset += 1;
                result
            }
            ESCAPE => {
                let result = parser.complete_end(offset);
                offset += 1;
                result
            }
            byte => {
                parser.field.push(byte);
                offset += 1;
                Ok(())
            }
        };
        if let Err(error) = result {
            return Err(Failure {
                applied: parser.applied,
                error,
            });
        }
    }

    // A trailing entry may omit its final `\"`; end of input completes it.
    if !parser.is_drained() {
        if let Err(error) = parser.complete_entry(map, data.len()) {
            return Err(Failure {
                applied: parser.applied,
                error,
            });
        }
    }
    Ok(parser.applied)
}

/// Encode entries into the dump byte format.
///
/// Round-trips through [parse]: loading the returned bytes into an empty map
/// reproduces the given entries.
pub fn encode(entries: impl IntoIterator<Item = Entry>) -> Bytes {
    let mut buf = BytesMut::new();
    for entry in entries {
        buf.put_slice(entry.start.to_string().as_bytes());
        buf.put_u8(QUOTE);
        buf.put_slice(entry.end.to_string().as_bytes());
        buf.put_u8(ESCAPE);
        buf.put_slice(entry.value.to_string().as_bytes());
        buf.put_u8(ESCAPE);
        buf.put_u8(QUOTE);
    }
    buf.freeze()
}
