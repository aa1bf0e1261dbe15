//! Turning diagnostics into display text through the active format.

use std::{collections::HashMap, path::Path};

use rubric_core::{Attributes, Diagnostic, Fragment, Value};
use rubric_template::{ParseError, Template};

use crate::format::FormatGroup;

/// Renders diagnostics, caching compiled message templates.
#[derive(Debug, Default)]
pub struct MessageRenderer {
    long_messages: bool,
    templates: HashMap<String, Template>,
}

impl MessageRenderer {
    pub fn new(long_messages: bool) -> Self {
        Self {
            long_messages,
            templates: HashMap::new(),
        }
    }

    /// Render the diagnostic-specific message text, without location or
    /// report decoration.
    ///
    /// # Errors
    ///
    /// Returns the compile errors of the error type's message template.
    pub fn message_text(&mut self, diagnostic: &Diagnostic) -> Result<String, ParseError> {
        let source = diagnostic.error_type().template();
        if !self.templates.contains_key(source) {
            let compiled = Template::compile(source)?;
            self.templates.insert(source.to_string(), compiled);
        }
        let template = &self.templates[source];
        Ok(template.render(&diagnostic.message_attributes(self.long_messages)))
    }

    /// Render the full report for a diagnostic.
    pub fn render(
        &mut self,
        diagnostic: &Diagnostic,
        format: &FormatGroup,
    ) -> Result<String, ParseError> {
        let error_type = diagnostic.error_type();
        let text = self.message_text(diagnostic)?;

        let message_attrs = Attributes::new()
            .with("id", error_type.code())
            .with("text", text);
        let message = Fragment::new(format.render_message(&message_attrs), message_attrs);

        let mut report_attrs = Attributes::new().with("type", error_type.severity().text());
        if let Some(location_attrs) = location_attributes(diagnostic) {
            let location = Fragment::new(format.render_location(&location_attrs), location_attrs);
            report_attrs.insert("location", location);
        }
        report_attrs.insert("message", message);

        let report = format.render_report(&report_attrs);
        Ok(if format.wants_single_line() {
            report.replace('\n', " ")
        } else {
            report
        })
    }
}

/// Location attributes, or `None` when the diagnostic has no location.
///
/// Each field is added on its own; any one of them makes the location valid.
pub fn location_attributes(diagnostic: &Diagnostic) -> Option<Attributes> {
    let mut attrs = Attributes::new();
    if let Some(line) = diagnostic.line() {
        attrs.insert("line", line);
    }
    if let Some(column) = diagnostic.column() {
        attrs.insert("column", column);
    }
    if let Some(file_name) = diagnostic.file_name() {
        attrs.insert("file", Value::Text(display_file_name(file_name)));
    }
    (!attrs.is_empty()).then_some(attrs)
}

/// Base name of `file_name` when it names an existing file, otherwise the
/// name unchanged.
pub fn display_file_name(file_name: &str) -> String {
    let path = Path::new(file_name);
    if path.is_file() {
        if let Some(base) = path.file_name() {
            return base.to_string_lossy().into_owned();
        }
    }
    file_name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{EMBEDDED_DEFAULT, FormatOrigin};
    use rubric_core::{ErrorType, Severity};
    use rubric_template::parse_group;
    use std::fs;
    use tempfile::TempDir;

    const SYNTAX: ErrorType = ErrorType::new(50, Severity::Error, "syntax error: <arg>");
    const MULTI_LINE: ErrorType = ErrorType::new(
        99,
        Severity::Warning,
        "first line\nsecond line<if(verbose)> (more)<endif>",
    );

    fn format(source: &str) -> FormatGroup {
        let group = parse_group(source).expect("Failed to parse group");
        FormatGroup::verify("test", FormatOrigin::Embedded, &group).expect("incomplete format")
    }

    fn default_format() -> FormatGroup {
        format(EMBEDDED_DEFAULT)
    }

    fn gnu_format() -> FormatGroup {
        format(include_str!("../formats/gnu.stg"))
    }

    #[test]
    fn test_default_report() {
        let mut renderer = MessageRenderer::default();
        let diag = Diagnostic::syntax(SYNTAX)
            .in_file("<generated>")
            .at(3, 7)
            .with_arg("extraneous input ';'");

        assert_eq!(
            renderer.render(&diag, &default_format()).unwrap(),
            "error(50): <generated>:3:7: syntax error: extraneous input ';'"
        );
    }

    #[test]
    fn test_gnu_report() {
        let mut renderer = MessageRenderer::default();
        let diag = Diagnostic::semantics(SYNTAX).in_file("T.g4").at(1, 0).with_arg("x");

        assert_eq!(
            renderer.render(&diag, &gnu_format()).unwrap(),
            "T.g4:1:0: error: syntax error: x [error 50]"
        );
    }

    #[test]
    fn test_column_only_location_is_valid() {
        let diag = Diagnostic::semantics(SYNTAX).with_column(12);
        let attrs = location_attributes(&diag).expect("location should be valid");

        assert_eq!(attrs.len(), 1);
        assert!(attrs.contains("column"));
        assert_eq!(default_format().render_location(&attrs), "::12:");
    }

    #[test]
    fn test_no_location() {
        let mut renderer = MessageRenderer::default();
        let diag = Diagnostic::tool(SYNTAX).with_arg("boom");

        assert!(location_attributes(&diag).is_none());
        assert_eq!(
            renderer.render(&diag, &default_format()).unwrap(),
            "error(50):  syntax error: boom"
        );
    }

    #[test]
    fn test_display_file_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("X.g4");
        fs::write(&path, "grammar X;").unwrap();

        assert_eq!(display_file_name(path.to_str().unwrap()), "X.g4");
        assert_eq!(display_file_name("<generated>"), "<generated>");
        assert_eq!(
            display_file_name("/no/such/dir/Y.g4"),
            "/no/such/dir/Y.g4"
        );
        assert_eq!(
            display_file_name(dir.path().to_str().unwrap()),
            dir.path().to_str().unwrap()
        );
    }

    #[test]
    fn test_single_line_collapse() {
        let mut renderer = MessageRenderer::default();
        let diag = Diagnostic::tool(MULTI_LINE);

        assert_eq!(
            renderer.render(&diag, &gnu_format()).unwrap(),
            " warning: first line second line [error 99]"
        );
        assert_eq!(
            renderer.render(&diag, &default_format()).unwrap(),
            "warning(99):  first line\nsecond line"
        );
    }

    #[test]
    fn test_long_messages() {
        let mut renderer = MessageRenderer::new(true);
        let diag = Diagnostic::tool(MULTI_LINE);
        assert_eq!(renderer.message_text(&diag).unwrap(), "first line\nsecond line (more)");

        let mut renderer = MessageRenderer::new(false);
        let diag = Diagnostic::tool(MULTI_LINE).long_form(true);
        assert_eq!(renderer.message_text(&diag).unwrap(), "first line\nsecond line (more)");
    }

    #[test]
    fn test_message_template_errors() {
        let broken = ErrorType::new(7, Severity::Error, "oops <arg");
        let mut renderer = MessageRenderer::default();

        assert!(renderer.message_text(&Diagnostic::tool(broken)).is_err());
    }
}
