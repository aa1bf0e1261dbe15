//! # Rubric Template
//!
//! The template group language used by Rubric message formats. A group
//! source holds named definitions such as
//!
//! ```text
//! location(file, line, column) ::= "<file>:<line>:<column>:"
//! report(location, message, type) ::= <<
//! <type>: <location> <message>
//! >>
//! ```
//!
//! ## Usage
//!
//! ```
//! # use rubric_core::Attributes;
//! # use rubric_template::{parse_group, ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let group = parse_group(r#"greet(name) ::= "hello <name>""#)?;
//!     let attrs = Attributes::new().with("name", "world");
//!     assert_eq!(group.render("greet", &attrs).as_deref(), Some("hello world"));
//!     Ok(())
//! }
//! ```

mod error;
mod group;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod template;
mod tokens;

pub use error::{Diagnostic, ErrorCode, Label, ParseError};
pub use group::{GroupTemplate, TemplateGroup};
pub use span::{Span, Spanned};
pub use template::{Reference, Template};

use log::debug;

/// Parse a group source into compiled templates.
///
/// Runs three steps, each collecting its own errors:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build definitions from tokens
/// 3. **Build** - Compile bodies and check names and parameters
pub fn parse_group(source: &str) -> Result<TemplateGroup, ParseError> {
    let tokens = lexer::tokenize(source)?;
    let definitions = parser::build_definitions(&tokens)?;
    let group = TemplateGroup::build(definitions)?;

    debug!(templates = group.len(); "Template group parsed");
    Ok(group)
}
