//! Parse tree of a format group source.

use crate::span::Spanned;

/// One `name(params) ::= body` definition, before its body is compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition<'src> {
    pub name: Spanned<&'src str>,
    pub params: Vec<Spanned<&'src str>>,
    pub body: Spanned<String>,
}
