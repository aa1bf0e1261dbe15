//! Best-effort provenance for internal errors.
//!
//! Internal errors are prefixed with the first stack frame outside the
//! engine itself, found by scanning a captured backtrace.

use std::backtrace::Backtrace;

/// Frame name prefixes that belong to the engine or to backtrace capture.
const OWN_FRAMES: [&str; 6] = [
    "rubric::engine",
    "rubric::fatal",
    "<rubric::engine",
    "std::backtrace",
    "std::backtrace_rs",
    "<std::backtrace",
];

/// Placeholder when a trace holds no frames.
pub const UNKNOWN_LOCATION: &str = "<unknown>";

/// Location of the caller that raised an internal error.
pub fn code_location() -> String {
    let trace = Backtrace::force_capture();
    code_location_in(&trace.to_string())
}

/// Pick the first foreign frame from a rendered backtrace.
///
/// Falls back to the last frame, then to [`UNKNOWN_LOCATION`].
pub fn code_location_in(trace: &str) -> String {
    let frames = parse_frames(trace);
    frames
        .iter()
        .find(|frame| !OWN_FRAMES.iter().any(|own| frame.function.starts_with(own)))
        .or(frames.last())
        .map(Frame::to_string)
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}

#[derive(Debug, PartialEq)]
struct Frame<'a> {
    function: &'a str,
    at: Option<&'a str>,
}

impl std::fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.at {
            Some(at) => write!(f, "{} ({at})", self.function),
            None => f.write_str(self.function),
        }
    }
}

/// Frames look like `  3: name` optionally followed by `      at file:line:col`.
fn parse_frames(trace: &str) -> Vec<Frame<'_>> {
    let mut frames: Vec<Frame<'_>> = Vec::new();
    for line in trace.lines().map(str::trim) {
        if let Some(at) = line.strip_prefix("at ") {
            if let Some(last) = frames.last_mut() {
                last.at.get_or_insert(at);
            }
            continue;
        }
        let Some((index, function)) = line.split_once(": ") else {
            continue;
        };
        if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
            frames.push(Frame { function, at: None });
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "\
   0: std::backtrace::Backtrace::force_capture
             at /rustc/library/std/src/backtrace.rs:312:9
   1: rubric::fatal::code_location
             at ./src/fatal.rs:23:17
   2: rubric::engine::DiagnosticEngine<S>::internal_error
             at ./src/engine.rs:210:24
   3: grammar_tool::check_rules
             at ./src/check.rs:41:5
   4: main
";

    #[test]
    fn test_first_foreign_frame() {
        assert_eq!(
            code_location_in(TRACE),
            "grammar_tool::check_rules (./src/check.rs:41:5)"
        );
    }

    #[test]
    fn test_last_frame_when_all_own() {
        let trace = "   0: rubric::fatal::code_location\n   1: rubric::engine::x\n";
        assert_eq!(code_location_in(trace), "rubric::engine::x");
    }

    #[test]
    fn test_empty_trace() {
        assert_eq!(code_location_in(""), UNKNOWN_LOCATION);
        assert_eq!(code_location_in("disabled backtrace"), UNKNOWN_LOCATION);
    }

    #[test]
    fn test_live_capture_is_not_empty() {
        assert!(!code_location().is_empty());
    }
}
