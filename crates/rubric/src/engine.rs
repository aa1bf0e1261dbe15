//! The diagnostic engine facade.

use std::error::Error;

use log::{debug, trace};

use rubric_core::{Diagnostic, ErrorType, Value};
use rubric_template::ParseError;

use crate::{
    config::MessageConfig,
    error::Fatal,
    fatal,
    format::{FormatGroup, FormatRegistry},
    policy::{EmissionPolicy, Verdict},
    render::MessageRenderer,
    sink::Sink,
};

/// Owns the state of one run: counters, seen error types and the active
/// format.
///
/// # Examples
///
/// ```
/// use rubric::{DiagnosticEngine, ErrorType, MemorySink, Severity, Value, config::MessageConfig};
/// # use tempfile::TempDir;
///
/// const UNDEFINED_RULE: ErrorType =
///     ErrorType::new(56, Severity::Error, "reference to undefined rule: <arg>");
///
/// # let dir = TempDir::new().unwrap();
/// let config = MessageConfig::default().with_formats_dir(dir.path());
/// let mut engine = DiagnosticEngine::new(MemorySink::new(), &config)?;
///
/// engine.grammar_error(UNDEFINED_RULE, "T.g4", 4, 10, &[Value::from("expr")]);
///
/// assert_eq!(engine.error_count(), 1);
/// assert_eq!(
///     engine.sink().errors(),
///     ["error(56): T.g4:4:10: reference to undefined rule: expr"]
/// );
/// # Ok::<(), rubric::Fatal>(())
/// ```
#[derive(Debug)]
pub struct DiagnosticEngine<S: Sink> {
    sink: S,
    registry: FormatRegistry,
    format: FormatGroup,
    renderer: MessageRenderer,
    policy: EmissionPolicy,
}

impl<S: Sink> DiagnosticEngine<S> {
    /// Create an engine with the format named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Fatal::InstallationCorrupted`] when no trustworthy format
    /// can be loaded. The reason has already been written to the sink.
    pub fn new(sink: S, config: &MessageConfig) -> Result<Self, Fatal> {
        Self::with_registry(sink, FormatRegistry::from_config(config), config)
    }

    /// Create an engine that resolves formats through `registry`.
    pub fn with_registry(
        mut sink: S,
        registry: FormatRegistry,
        config: &MessageConfig,
    ) -> Result<Self, Fatal> {
        let format = load_format(&mut sink, &registry, config.format())?;
        debug!(
            format = format.name(),
            long_messages = config.long_messages();
            "Diagnostic engine ready"
        );

        Ok(Self {
            sink,
            registry,
            format,
            renderer: MessageRenderer::new(config.long_messages()),
            policy: EmissionPolicy::new(),
        })
    }

    /// Switch the active format.
    ///
    /// An unknown or incomplete format quietly becomes the default one.
    ///
    /// # Errors
    ///
    /// Returns [`Fatal::InstallationCorrupted`] when the format file is
    /// malformed or the default format is unusable. The previous format stays
    /// active.
    pub fn set_format(&mut self, name: &str) -> Result<(), Fatal> {
        self.format = load_format(&mut self.sink, &self.registry, name)?;
        Ok(())
    }

    /// Name of the active format.
    pub fn format_name(&self) -> &str {
        self.format.name()
    }

    pub fn format(&self) -> &FormatGroup {
        &self.format
    }

    pub fn error_count(&self) -> usize {
        self.policy.error_count()
    }

    pub fn warning_count(&self) -> usize {
        self.policy.warning_count()
    }

    /// Zero the counters and forget which one-off types were raised.
    ///
    /// The active format is kept.
    pub fn reset_error_state(&mut self) {
        self.policy.reset();
    }

    pub fn info(&mut self, text: &str) {
        self.sink.info(text);
    }

    /// Count and, unless suppressed, report a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) -> Verdict {
        let verdict = self.policy.classify(diagnostic.error_type());
        trace!(
            code = diagnostic.error_type().code(),
            verdict:? = verdict;
            "Diagnostic classified"
        );
        if !verdict.is_reported() {
            return verdict;
        }

        let text = match self.renderer.render(&diagnostic, &self.format) {
            Ok(text) => text,
            Err(err) => {
                self.template_error(diagnostic.error_type(), &err);
                return verdict;
            }
        };

        match verdict {
            Verdict::Warning => self.sink.warning(&text),
            Verdict::Error => self.sink.error(&text),
            Verdict::Suppressed => {}
        }
        verdict
    }

    /// Report a grammar syntax error at a token position.
    pub fn syntax_error(
        &mut self,
        error_type: ErrorType,
        file_name: &str,
        line: u32,
        column: u32,
        args: &[Value],
    ) -> Verdict {
        let diagnostic = Diagnostic::syntax(error_type)
            .in_file(file_name)
            .at(line, column)
            .with_args(args.iter().cloned());
        self.emit(diagnostic)
    }

    /// Report a semantic error in a grammar at a token position.
    pub fn grammar_error(
        &mut self,
        error_type: ErrorType,
        file_name: &str,
        line: u32,
        column: u32,
        args: &[Value],
    ) -> Verdict {
        let diagnostic = Diagnostic::semantics(error_type)
            .in_file(file_name)
            .at(line, column)
            .with_args(args.iter().cloned());
        self.emit(diagnostic)
    }

    /// Report a problem with no grammar location.
    pub fn tool_error(&mut self, error_type: ErrorType, args: &[Value]) -> Verdict {
        self.emit(Diagnostic::tool(error_type).with_args(args.iter().cloned()))
    }

    pub fn tool_error_with_cause(
        &mut self,
        error_type: ErrorType,
        cause: &dyn Error,
        args: &[Value],
    ) -> Verdict {
        let diagnostic = Diagnostic::tool(error_type)
            .with_cause(cause.to_string())
            .with_args(args.iter().cloned());
        self.emit(diagnostic)
    }

    /// Report sets of mutually left-recursive rules.
    pub fn left_recursion_cycles(&mut self, file_name: &str, cycles: Vec<Vec<String>>) -> Verdict {
        self.emit(Diagnostic::left_recursion_cycles(cycles).in_file(file_name))
    }

    /// Render the report for `diagnostic` as [`emit`](Self::emit) would,
    /// without counting or writing it.
    pub fn message_text(&mut self, diagnostic: &Diagnostic) -> Result<String, ParseError> {
        self.renderer.render(diagnostic, &self.format)
    }

    /// Write an internal error straight to the raw sink, prefixed with the
    /// calling code location.
    pub fn internal_error(&mut self, message: &str) {
        let location = fatal::code_location();
        self.sink
            .raw_error(&format!("internal error: {location}: {message}"));
    }

    pub fn internal_error_with_cause(&mut self, message: &str, cause: &dyn Error) {
        let location = fatal::code_location();
        self.sink.raw_error(&format!(
            "internal error: Exception {cause}@{location}: {message}"
        ));
    }

    /// Report an internal error and abort the run.
    #[must_use = "the run must stop: return the Fatal to the harness"]
    pub fn fatal_internal_error(&mut self, message: &str, cause: &dyn Error) -> Fatal {
        self.internal_error_with_cause(message, cause);
        Fatal::Internal {
            message: message.to_string(),
            cause: Some(cause.to_string()),
        }
    }

    /// Write `message` to the raw sink and abort the run.
    #[must_use = "the run must stop: return the Fatal to the harness"]
    pub fn panic(&mut self, message: &str) -> Fatal {
        self.sink.raw_error(message);
        Fatal::Panic(message.to_string())
    }

    /// Render the report for `error_type`, write it raw and abort the run.
    ///
    /// The report goes through the active format like an emitted
    /// diagnostic, collapsed to one line when the format asks for it. A
    /// message template that does not compile is written as its source text.
    #[must_use = "the run must stop: return the Fatal to the harness"]
    pub fn panic_with(&mut self, error_type: ErrorType, args: &[Value]) -> Fatal {
        let diagnostic = Diagnostic::tool(error_type).with_args(args.iter().cloned());
        let text = self
            .renderer
            .render(&diagnostic, &self.format)
            .unwrap_or_else(|_| diagnostic.error_type().template().to_string());
        self.panic(&text)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn template_error(&mut self, error_type: &ErrorType, err: &ParseError) {
        let message = format!(
            "can't compile message template of error {}: {}",
            error_type.code(),
            err.describe(error_type.template()).trim_end()
        );
        self.internal_error(&message);
    }
}

/// Load a format, escalating failures to the raw sink and a [`Fatal`].
fn load_format<S: Sink>(
    sink: &mut S,
    registry: &FormatRegistry,
    name: &str,
) -> Result<FormatGroup, Fatal> {
    registry.load(name).map_err(|err| {
        sink.raw_error(&err.describe());
        Fatal::InstallationCorrupted(err.to_string())
    })
}
