//! The reportable event raised by tool code.
//!
//! A [`Diagnostic`] couples an [`ErrorType`] with an optional source location
//! and the ordered arguments of its message template. The closed set of
//! [`DiagnosticKind`]s covers every producer of diagnostics; each kind
//! contributes its own attributes to the message template.

use crate::{Attributes, ErrorType, LEFT_RECURSION_CYCLES, Value};

/// What raised a diagnostic, with the data only that producer carries.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// A grammar syntax error, optionally naming the offending token text.
    Syntax { offending: Option<String> },

    /// A semantic error in a grammar.
    Semantics,

    /// A tool-level problem with no grammar location, optionally caused by
    /// another error.
    Tool { cause: Option<String> },

    /// Sets of rules that are mutually left-recursive.
    LeftRecursionCycles { cycles: Vec<Vec<String>> },
}

/// A single reportable event.
///
/// # Example
///
/// ```
/// # use rubric_core::{Diagnostic, ErrorType, Severity};
/// const TOKEN_NAMES_MUST_START_UPPER: ErrorType = ErrorType::new(
///     60,
///     Severity::Error,
///     "token names must start with an uppercase letter: <arg>",
/// );
///
/// let diag = Diagnostic::semantics(TOKEN_NAMES_MUST_START_UPPER)
///     .in_file("T.g4")
///     .at(3, 7)
///     .with_arg("foo");
///
/// assert_eq!(diag.line(), Some(3));
/// assert_eq!(diag.args().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    error_type: ErrorType,
    kind: DiagnosticKind,
    file_name: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
    args: Vec<Value>,
    long_form: bool,
}

impl Diagnostic {
    /// Create a syntax diagnostic.
    pub fn syntax(error_type: ErrorType) -> Self {
        Self::new(error_type, DiagnosticKind::Syntax { offending: None })
    }

    /// Create a semantics diagnostic.
    pub fn semantics(error_type: ErrorType) -> Self {
        Self::new(error_type, DiagnosticKind::Semantics)
    }

    /// Create a tool diagnostic.
    pub fn tool(error_type: ErrorType) -> Self {
        Self::new(error_type, DiagnosticKind::Tool { cause: None })
    }

    /// Create a left-recursion diagnostic for the given rule cycles.
    pub fn left_recursion_cycles(cycles: Vec<Vec<String>>) -> Self {
        Self::new(
            LEFT_RECURSION_CYCLES,
            DiagnosticKind::LeftRecursionCycles { cycles },
        )
    }

    pub fn error_type(&self) -> &ErrorType {
        &self.error_type
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn is_long_form(&self) -> bool {
        self.long_form
    }

    /// Set the file the diagnostic refers to.
    pub fn in_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set both line and column.
    pub fn at(self, line: u32, column: u32) -> Self {
        self.with_line(line).with_column(column)
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    /// Append one message argument.
    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several message arguments in order.
    pub fn with_args<I, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Record the offending token text. Ignored for non-syntax diagnostics.
    pub fn with_offending(mut self, text: impl Into<String>) -> Self {
        if let DiagnosticKind::Syntax { offending } = &mut self.kind {
            *offending = Some(text.into());
        }
        self
    }

    /// Record the underlying cause. Ignored for non-tool diagnostics.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        if let DiagnosticKind::Tool { cause: slot } = &mut self.kind {
            *slot = Some(cause.into());
        }
        self
    }

    /// Request the long form of the message.
    pub fn long_form(mut self, long_form: bool) -> Self {
        self.long_form = long_form;
        self
    }

    /// Attributes for this diagnostic's message template.
    ///
    /// Arguments are exposed as `arg`, `arg2`, `arg3`, and so on. `verbose`
    /// is set when either the caller or the diagnostic asks for the long form.
    pub fn message_attributes(&self, verbose: bool) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("verbose", verbose || self.long_form);

        let leading = match &self.kind {
            DiagnosticKind::LeftRecursionCycles { cycles } => {
                Some(Value::from(format_cycles(cycles)))
            }
            _ => None,
        };
        for (index, arg) in leading.iter().chain(&self.args).enumerate() {
            attrs.insert(arg_name(index), arg.clone());
        }

        match &self.kind {
            DiagnosticKind::Syntax {
                offending: Some(text),
            } => attrs.insert("offending", text.as_str()),
            DiagnosticKind::Tool { cause: Some(cause) } => {
                attrs.insert("exception", cause.as_str())
            }
            _ => {}
        }

        attrs
    }

    fn new(error_type: ErrorType, kind: DiagnosticKind) -> Self {
        Self {
            error_type,
            kind,
            file_name: None,
            line: None,
            column: None,
            args: Vec::new(),
            long_form: false,
        }
    }
}

/// Name of the attribute holding the argument at `index`.
fn arg_name(index: usize) -> String {
    match index {
        0 => "arg".to_string(),
        n => format!("arg{}", n + 1),
    }
}

/// `[a, b] and [c, d]`
fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|cycle| format!("[{}]", cycle.join(", ")))
        .collect::<Vec<_>>()
        .join(" and ")
}
