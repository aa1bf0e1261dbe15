//! Pass-through for raw parser syntax errors.

use std::io::{self, Stderr, Write};

use log::error;

/// Writes unformatted syntax errors as `line <L>:<C> <message>`.
///
/// These bypass formats and counters entirely.
#[derive(Debug)]
pub struct ConsoleErrorListener<W: Write> {
    writer: W,
}

impl ConsoleErrorListener<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleErrorListener<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn syntax_error(&mut self, line: u32, column: u32, message: &str) {
        if let Err(err) = writeln!(self.writer, "line {line}:{column} {message}") {
            error!(error:% = err; "Failed to write syntax error");
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let mut listener = ConsoleErrorListener::new(Vec::new());
        listener.syntax_error(3, 14, "mismatched input ';' expecting ID");
        listener.syntax_error(10, 0, "token recognition error at: '#'");

        assert_eq!(
            String::from_utf8(listener.into_inner()).unwrap(),
            "line 3:14 mismatched input ';' expecting ID\nline 10:0 token recognition error at: '#'\n"
        );
    }
}
