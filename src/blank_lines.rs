use std::collections::VecDeque;
use std::io::{self, Read};

/// Where the scanner is in the CSV grammar. Mirrors the parser's own states
/// closely enough to tell an empty line from a line break inside quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartRecord,
    // The last line ended with `\r`, so a `\n` right after it is not a new line
    EndRecordCr,
    StartField,
    InField,
    InQuotedField,
    InDoubleEscapedQuote,
}

/// Wraps the CSV input and records where its empty lines are.
///
/// The `csv` reader drops empty lines without producing a record, while an
/// empty line still counts as an (empty) row for us. Every byte the reader
/// pulls through here is scanned, and each empty line is remembered together
/// with the number of records that started before it.
pub struct BlankLineTracker<R> {
    inner: R,
    state: State,
    records: u64,
    blanks: VecDeque<u64>,
}

impl<R: Read> BlankLineTracker<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: State::StartRecord,
            records: 0,
            blanks: VecDeque::new(),
        }
    }

    /// Take the empty lines that come before the record at `index` (0-based)
    /// and return how many there were.
    ///
    /// The reader may have scanned ahead of the record it just returned, so
    /// only lines that precede `index` are taken.
    pub fn take_before(&mut self, index: u64) -> usize {
        let mut taken = 0;
        while self.blanks.front().map_or(false, |&before| before <= index) {
            self.blanks.pop_front();
            taken += 1;
        }
        taken
    }

    /// Take every empty line not yet taken. Call once the input is exhausted.
    pub fn take_rest(&mut self) -> usize {
        let taken = self.blanks.len();
        self.blanks.clear();
        taken
    }

    fn step(&mut self, c: u8) {
        use self::State::*;

        self.state = match self.state {
            EndRecordCr if c == b'\n' => StartRecord,
            StartRecord | EndRecordCr => match c {
                b'\r' | b'\n' => {
                    self.blanks.push_back(self.records);
                    if c == b'\r' {
                        EndRecordCr
                    } else {
                        StartRecord
                    }
                }
                _ => {
                    self.records += 1;
                    field_start(c)
                }
            },
            StartField => field_start(c),
            InField => unquoted(c),
            InQuotedField if c == b'"' => InDoubleEscapedQuote,
            InQuotedField => InQuotedField,
            InDoubleEscapedQuote if c == b'"' => InQuotedField,
            InDoubleEscapedQuote => unquoted(c),
        };
    }
}

fn field_start(c: u8) -> State {
    if c == b'"' {
        State::InQuotedField
    } else {
        unquoted(c)
    }
}

fn unquoted(c: u8) -> State {
    match c {
        b',' => State::StartField,
        b'\r' => State::EndRecordCr,
        b'\n' => State::StartRecord,
        _ => State::InField,
    }
}

impl<R: Read> Read for BlankLineTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        for &c in &buf[..n] {
            self.step(c);
        }
        Ok(n)
    }
}
