use std::path::PathBuf;

use rubric_core::Attributes;
use rubric_template::{Template, TemplateGroup};

/// Templates every format must define.
pub const REQUIRED_TEMPLATES: [&str; 3] = ["location", "message", "report"];

const SINGLE_LINE_FLAG: &str = "wantsSingleLineMessage";

/// Where a loaded format came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOrigin {
    File(PathBuf),
    Embedded,
}

/// A verified message format.
///
/// Construction checks the required templates once, so rendering never has
/// to handle a missing one.
#[derive(Debug, Clone)]
pub struct FormatGroup {
    name: String,
    origin: FormatOrigin,
    location: Template,
    message: Template,
    report: Template,
    single_line: bool,
}

impl FormatGroup {
    /// Verify a parsed group.
    ///
    /// Returns the names of the missing required templates on failure.
    pub fn verify(
        name: impl Into<String>,
        origin: FormatOrigin,
        group: &TemplateGroup,
    ) -> Result<Self, Vec<&'static str>> {
        let template = |slot: &str| group.get(slot).map(|t| t.template().clone());

        let (location, message, report) =
            match (template("location"), template("message"), template("report")) {
                (Some(location), Some(message), Some(report)) => (location, message, report),
                _ => {
                    return Err(REQUIRED_TEMPLATES
                        .into_iter()
                        .filter(|slot| !group.is_defined(slot))
                        .collect());
                }
            };

        let single_line = group
            .render(SINGLE_LINE_FLAG, &Attributes::new())
            .is_some_and(|flag| flag == "true");

        Ok(Self {
            name: name.into(),
            origin,
            location,
            message,
            report,
            single_line,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &FormatOrigin {
        &self.origin
    }

    /// Whether rendered reports should be collapsed onto one line.
    pub fn wants_single_line(&self) -> bool {
        self.single_line
    }

    pub fn render_location(&self, attributes: &Attributes) -> String {
        self.location.render(attributes)
    }

    pub fn render_message(&self, attributes: &Attributes) -> String {
        self.message.render(attributes)
    }

    pub fn render_report(&self, attributes: &Attributes) -> String {
        self.report.render(attributes)
    }
}
