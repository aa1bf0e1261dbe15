//! Compiled template groups.

use indexmap::IndexMap;
use rubric_core::Attributes;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::Definition,
    span::Span,
    template::Template,
};

/// A template together with its declared parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTemplate {
    params: Vec<String>,
    template: Template,
}

impl GroupTemplate {
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn template(&self) -> &Template {
        &self.template
    }
}

/// Named templates loaded from one group source, in definition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateGroup {
    templates: IndexMap<String, GroupTemplate>,
}

impl TemplateGroup {
    /// Compile and check a list of parsed definitions.
    ///
    /// Every definition is checked even after a failure so one load reports
    /// every problem in the source.
    pub(crate) fn build(definitions: Vec<Definition<'_>>) -> Result<Self, ParseError> {
        let mut collector = DiagnosticCollector::new();
        let mut templates = IndexMap::new();
        let mut first_seen: IndexMap<&str, Span> = IndexMap::new();

        for definition in definitions {
            let name = *definition.name.inner();
            let body_span = definition.body.span();

            if let Some(first) = first_seen.get(name) {
                collector.emit(
                    Diagnostic::error(format!("template `{name}` is defined more than once"))
                        .with_code(ErrorCode::T300)
                        .with_label(definition.name.span(), "duplicate definition")
                        .with_secondary_label(*first, "first defined here")
                        .with_help("remove or rename one of the definitions"),
                );
                continue;
            }
            first_seen.insert(name, definition.name.span());

            let template = match Template::compile(definition.body.inner()) {
                Ok(template) => template,
                Err(err) => {
                    for diag in err.into_diagnostics() {
                        collector.emit(relocate(name, diag, body_span));
                    }
                    continue;
                }
            };

            let params: Vec<String> = definition
                .params
                .iter()
                .map(|p| p.inner().to_string())
                .collect();
            for reference in template.references() {
                if !params.iter().any(|p| p == reference.name()) {
                    collector.emit(
                        Diagnostic::error(format!(
                            "template `{name}` references undeclared attribute `{}`",
                            reference.name()
                        ))
                        .with_code(ErrorCode::T301)
                        .with_label(body_span, "referenced here")
                        .with_help(format!("declare `{}` in the parameter list", reference.name())),
                    );
                }
            }

            templates.insert(name.to_string(), GroupTemplate { params, template });
        }

        collector.finish()?;
        Ok(Self { templates })
    }

    pub fn get(&self, name: &str) -> Option<&GroupTemplate> {
        self.templates.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render a named template, or `None` when it is not defined.
    pub fn render(&self, name: &str, attributes: &Attributes) -> Option<String> {
        self.get(name).map(|t| t.template.render(attributes))
    }
}

/// Body diagnostics carry spans relative to the body; point them at the
/// body token in the group source instead.
fn relocate(name: &str, diag: Diagnostic, body_span: Span) -> Diagnostic {
    let mut relocated = Diagnostic::error(format!("in template `{name}`: {}", diag.message()))
        .with_label(body_span, "in this template body");
    if let Some(code) = diag.code() {
        relocated = relocated.with_code(code);
    }
    if let Some(help) = diag.help() {
        relocated = relocated.with_help(help);
    }
    relocated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_group;

    fn codes(source: &str) -> Vec<ErrorCode> {
        parse_group(source)
            .expect_err("expected group errors")
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_group_keeps_definition_order() {
        let group = parse_group(
            r#"
            report(location, message, type) ::= "<type>"
            location(file, line, column) ::= "<file>"
            message(id, text) ::= "<id>"
            "#,
        )
        .unwrap();

        assert_eq!(group.names().collect::<Vec<_>>(), ["report", "location", "message"]);
        assert_eq!(group.get("message").unwrap().params(), ["id", "text"]);
        assert!(group.is_defined("location"));
        assert!(!group.is_defined("wantsSingleLineMessage"));
    }

    #[test]
    fn test_render_named_template() {
        let group = parse_group(r#"message(id, text) ::= "(<id>) <text>""#).unwrap();
        let attrs = Attributes::new().with("id", 50u32).with("text", "oops");

        assert_eq!(group.render("message", &attrs).as_deref(), Some("(50) oops"));
        assert_eq!(group.render("report", &attrs), None);
    }

    #[test]
    fn test_duplicate_template() {
        let source = "a() ::= \"x\"\na() ::= \"y\"";
        let err = parse_group(source).unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::T300));
        assert_eq!(diag.primary_span(), Some(Span::new(12..13)));
        assert_eq!(diag.labels().len(), 2);
    }

    #[test]
    fn test_undeclared_attribute() {
        assert_eq!(codes(r#"message(id) ::= "<id> <text>""#), [ErrorCode::T301]);
        assert_eq!(codes(r#"flag() ::= "<if(x)>y<endif>""#), [ErrorCode::T301]);
    }

    #[test]
    fn test_body_errors_point_at_body() {
        let source = r#"message(id) ::= "<id"  "#;
        let err = parse_group(source).unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::T200));
        assert!(diag.message().starts_with("in template `message`"));
        assert_eq!(diag.primary_span(), Some(Span::new(16..21)));
    }

    #[test]
    fn test_all_problems_collected() {
        let source = r#"
            a(x) ::= "<y>"
            b() ::= "<if(q)>"
            a(x) ::= "<x>"
        "#;
        assert_eq!(codes(source), [ErrorCode::T301, ErrorCode::T201, ErrorCode::T300]);
    }
}
