use std::fs::File;
use std::io::{self, Write};

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;
use tracing::{info, trace};

use crate::blank_lines::BlankLineTracker;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse record: {0}")]
    Parse(#[from] csv::Error),
    #[error("Failed to write output: {0}")]
    Write(#[source] io::Error),
}

/// Label written before the running row count.
const COUNTER_LABEL: &str = "row counter ";

pub struct RowPrinter {
    input_file: String,
    // Number of rows printed so far
    counter: u64,
}

impl RowPrinter {
    pub fn new(input_file: String) -> Self {
        Self {
            input_file,
            counter: 0,
        }
    }

    /// Print every row of the input file to `writer`, each one preceded by
    /// its 1-based position. Returns the number of rows printed.
    ///
    /// The first open, parse or write failure aborts the run. Rows printed
    /// before the failure stay written.
    pub fn run<W: Write>(&mut self, writer: &mut W) -> Result<u64> {
        let file = File::open(&self.input_file).map_err(|source| Error::Open {
            path: self.input_file.clone(),
            source,
        })?;
        info!(path = %self.input_file, "opened input file");

        // Headers are printed like any other row and rows may differ in length
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(BlankLineTracker::new(file));
        let empty = StringRecord::new();
        let mut record = StringRecord::new();
        let mut parsed = 0;
        while reader.read_record(&mut record)? {
            // The parser skips empty lines, each one is still an empty row
            for _ in 0..reader.get_mut().take_before(parsed) {
                self.print_row(writer, &empty)?;
            }
            parsed += 1;
            self.print_row(writer, &record)?;
        }
        for _ in 0..reader.get_mut().take_rest() {
            self.print_row(writer, &empty)?;
        }

        info!(rows = self.counter, "finished");
        Ok(self.counter)
    }

    fn print_row<W: Write>(&mut self, writer: &mut W, record: &StringRecord) -> Result<()> {
        self.counter += 1;
        trace!(counter = self.counter, fields = record.len(), "row");
        writeln!(writer, "{} {}", COUNTER_LABEL, self.counter).map_err(Error::Write)?;
        writeln!(writer, "{}", format_row(record)).map_err(Error::Write)?;
        Ok(())
    }
}

/// Render a record as a bracketed list of quoted fields, e.g. `['a', 'b']`.
pub fn format_row(record: &StringRecord) -> String {
    let fields: Vec<String> = record.iter().map(quote_field).collect();
    format!("[{}]", fields.join(", "))
}

fn quote_field(field: &str) -> String {
    let quote = if field.contains('\'') && !field.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(field.len() + 2);
    out.push(quote);
    for c in field.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
