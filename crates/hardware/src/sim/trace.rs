//! Memory trace parsing.
//!
//! A trace is plain text with one access per line: an operation mnemonic
//! (`R` or `W`) and an address, separated by whitespace:
//!
//! ```text
//! R 0xb7737f64
//! W 0xb7737f68
//! ```
//!
//! Blank lines are ignored. Any other line that does not have exactly these
//! two fields is skipped with a warning; a bad line never aborts a run.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use super::SimError;
use crate::common::{AccessType, Address, CacheError};

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    /// Read or write.
    pub op: AccessType,
    /// Byte address accessed.
    pub addr: Address,
}

impl TraceEntry {
    /// Creates a trace entry.
    pub const fn new(op: AccessType, addr: Address) -> Self {
        Self { op, addr }
    }

    /// Parses one trace line.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedLine`] describing why the line is not an access.
    pub fn parse_line(line: &str) -> Result<Self, MalformedLine> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [op, addr] = fields.as_slice() else {
            return Err(MalformedLine::FieldCount(fields.len()));
        };
        let op = AccessType::from_str(op).map_err(|_| MalformedLine::UnknownOp((*op).to_string()))?;
        let addr = Address::parse(addr)?;
        Ok(Self { op, addr })
    }
}

/// Why a trace line was skipped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedLine {
    /// The line does not have exactly two fields.
    #[error("expected 2 fields, found {0}")]
    FieldCount(usize),

    /// The operation is neither `R` nor `W`.
    #[error("unknown access type `{0}`")]
    UnknownOp(String),

    /// The address does not parse.
    #[error(transparent)]
    Address(#[from] CacheError),
}

/// A trace loaded into memory, ready to be replayed any number of times.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trace {
    entries: Vec<TraceEntry>,
    sample_address: Option<String>,
    skipped: usize,
}

impl Trace {
    /// Reads a whole trace from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from `reader`. Malformed lines are not
    /// errors; they are logged and counted in [`Trace::skipped`].
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut trace = Self::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match TraceEntry::parse_line(&line) {
                Ok(entry) => {
                    if trace.sample_address.is_none() {
                        trace.sample_address = line.split_whitespace().nth(1).map(str::to_string);
                    }
                    trace.entries.push(entry);
                }
                Err(reason) => {
                    trace.skipped += 1;
                    warn!(line = index + 1, %reason, "skipping trace line");
                }
            }
        }
        Ok(trace)
    }

    /// Reads a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be opened or read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file))?)
    }

    /// Builds a trace from already parsed entries.
    ///
    /// The sample address is the first entry's address in hex.
    pub fn from_entries(entries: Vec<TraceEntry>) -> Self {
        let sample_address = entries.first().map(|entry| entry.addr.to_string());
        Self {
            entries,
            sample_address,
            skipped: 0,
        }
    }

    /// Parsed accesses in trace order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Address text of the first well-formed line, as written in the trace.
    pub fn sample_address(&self) -> Option<&str> {
        self.sample_address.as_deref()
    }

    /// Number of malformed lines skipped while reading.
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of accesses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the trace holds no access.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
