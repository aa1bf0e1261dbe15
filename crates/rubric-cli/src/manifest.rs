//! Diagnostic manifests: TOML files listing diagnostics to replay.
//!
//! ```toml
//! [[diagnostic]]
//! kind = "syntax"
//! code = 50
//! severity = "error"
//! template = "syntax error: <arg>"
//! file = "T.g4"
//! line = 3
//! column = 7
//! args = ["extraneous input ';'"]
//! ```

use serde::Deserialize;
use toml::Spanned;

use rubric::{Diagnostic, ErrorType, RubricError, Severity, Value};

/// A parsed manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "diagnostic")]
    entries: Vec<Spanned<Entry>>,
}

/// What an entry asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Syntax,
    Semantics,
    Tool,
    Cycles,
    /// Unformatted parser syntax error for the console listener.
    Raw,
    /// Switch the active message format.
    Format,
}

/// A message argument as written in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl From<Arg> for Value {
    fn from(arg: Arg) -> Self {
        match arg {
            Arg::Int(n) => Value::Int(n),
            Arg::Bool(b) => Value::Bool(b),
            Arg::Text(text) => Value::Text(text),
        }
    }
}

/// One `[[diagnostic]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    kind: EntryKind,
    code: Option<u32>,
    #[serde(default = "default_severity")]
    severity: Severity,
    #[serde(default)]
    template: String,
    file: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
    #[serde(default)]
    args: Vec<Arg>,
    #[serde(default)]
    cycles: Vec<Vec<String>>,
    offending: Option<String>,
    cause: Option<String>,
    #[serde(default)]
    long: bool,
    /// Raw entries: the text written by the listener.
    message: Option<String>,
    /// Format entries: the format to switch to.
    name: Option<String>,
}

fn default_severity() -> Severity {
    Severity::Error
}

/// A manifest entry turned into an engine call.
#[derive(Debug, Clone)]
pub enum Action {
    Emit(Diagnostic),
    Raw {
        line: u32,
        column: u32,
        message: String,
    },
    SetFormat(String),
}

impl Manifest {
    /// Parse manifest text.
    ///
    /// # Errors
    ///
    /// Returns [`RubricError::Manifest`] carrying the source and, when TOML
    /// reports one, the span of the offending text.
    pub fn parse(source: &str) -> Result<Self, RubricError> {
        toml::from_str(source).map_err(|err: toml::de::Error| {
            RubricError::new_manifest_error(err.message(), source, err.span())
        })
    }

    /// Turn every entry into an action, failing on the first invalid one.
    ///
    /// An invalid entry is reported with the span of its table.
    pub fn into_actions(self, source: &str) -> Result<Vec<Action>, RubricError> {
        self.entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let span = entry.span();
                entry.into_inner().into_action().map_err(|reason| {
                    RubricError::new_manifest_error(
                        format!("diagnostic #{}: {reason}", index + 1),
                        source,
                        Some(span),
                    )
                })
            })
            .collect()
    }
}

impl Entry {
    fn error_type(&self) -> Result<ErrorType, String> {
        let code = self.code.ok_or_else(|| "`code` is required".to_string())?;
        Ok(ErrorType::owned(code, self.severity, self.template.clone()))
    }

    fn into_action(self) -> Result<Action, String> {
        let diagnostic = match self.kind {
            EntryKind::Raw => {
                return match (self.line, self.column, self.message) {
                    (Some(line), Some(column), Some(message)) => Ok(Action::Raw {
                        line,
                        column,
                        message,
                    }),
                    _ => Err("raw entries need `line`, `column` and `message`".to_string()),
                };
            }
            EntryKind::Format => {
                return self
                    .name
                    .map(Action::SetFormat)
                    .ok_or_else(|| "format entries need `name`".to_string());
            }
            EntryKind::Syntax => {
                let diagnostic = Diagnostic::syntax(self.error_type()?);
                match &self.offending {
                    Some(text) => diagnostic.with_offending(text.clone()),
                    None => diagnostic,
                }
            }
            EntryKind::Semantics => Diagnostic::semantics(self.error_type()?),
            EntryKind::Tool => {
                let diagnostic = Diagnostic::tool(self.error_type()?);
                match &self.cause {
                    Some(cause) => diagnostic.with_cause(cause.clone()),
                    None => diagnostic,
                }
            }
            EntryKind::Cycles => {
                if self.cycles.is_empty() {
                    return Err("cycles entries need at least one cycle".to_string());
                }
                Diagnostic::left_recursion_cycles(self.cycles.clone())
            }
        };

        let mut diagnostic = diagnostic
            .with_args(self.args.into_iter().map(Value::from))
            .long_form(self.long);
        if let Some(file) = self.file {
            diagnostic = diagnostic.in_file(file);
        }
        if let Some(line) = self.line {
            diagnostic = diagnostic.with_line(line);
        }
        if let Some(column) = self.column {
            diagnostic = diagnostic.with_column(column);
        }
        Ok(Action::Emit(diagnostic))
    }
}
