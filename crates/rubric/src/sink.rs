//! Output capability the engine writes rendered diagnostics to.

use std::io::{self, Stderr, Stdout, Write};

use log::error;

/// Where the engine sends text.
///
/// The engine only depends on this capability set, never on a concrete
/// output device.
pub trait Sink {
    /// Informational text.
    fn info(&mut self, text: &str);

    /// A rendered warning.
    fn warning(&mut self, text: &str);

    /// A rendered error.
    fn error(&mut self, text: &str);

    /// Unformatted text from the fatal path.
    fn raw_error(&mut self, text: &str);
}

/// Writes info to one stream and everything else to another.
#[derive(Debug)]
pub struct ConsoleSink<O: Write, E: Write> {
    out: O,
    err: E,
}

impl ConsoleSink<Stdout, Stderr> {
    /// Info to standard output, the rest to standard error.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn write_line(writer: &mut dyn Write, text: &str) {
        if let Err(err) = writeln!(writer, "{text}").and_then(|()| writer.flush()) {
            error!(error:% = err; "Failed to write diagnostic output");
        }
    }
}

impl<O: Write, E: Write> Sink for ConsoleSink<O, E> {
    fn info(&mut self, text: &str) {
        Self::write_line(&mut self.out, text);
    }

    fn warning(&mut self, text: &str) {
        Self::write_line(&mut self.err, text);
    }

    fn error(&mut self, text: &str) {
        Self::write_line(&mut self.err, text);
    }

    fn raw_error(&mut self, text: &str) {
        Self::write_line(&mut self.err, text);
    }
}

/// One call recorded by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Info(String),
    Warning(String),
    Error(String),
    RawError(String),
}

/// Records every call in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<Record>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call in order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn infos(&self) -> Vec<&str> {
        self.texts(|record| match record {
            Record::Info(text) => Some(text),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.texts(|record| match record {
            Record::Warning(text) => Some(text),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<&str> {
        self.texts(|record| match record {
            Record::Error(text) => Some(text),
            _ => None,
        })
    }

    pub fn raw_errors(&self) -> Vec<&str> {
        self.texts(|record| match record {
            Record::RawError(text) => Some(text),
            _ => None,
        })
    }

    fn texts<'a>(&'a self, select: impl Fn(&'a Record) -> Option<&'a String>) -> Vec<&'a str> {
        self.records
            .iter()
            .filter_map(select)
            .map(String::as_str)
            .collect()
    }
}

impl Sink for MemorySink {
    fn info(&mut self, text: &str) {
        self.records.push(Record::Info(text.to_string()));
    }

    fn warning(&mut self, text: &str) {
        self.records.push(Record::Warning(text.to_string()));
    }

    fn error(&mut self, text: &str) {
        self.records.push(Record::Error(text.to_string()));
    }

    fn raw_error(&mut self, text: &str) {
        self.records.push(Record::RawError(text.to_string()));
    }
}
