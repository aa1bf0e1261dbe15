//! Template bodies: compilation to a node tree and rendering.
//!
//! A body is literal text interleaved with `<...>` expressions:
//!
//! - `<name>` and `<name.prop>` insert an attribute (empty when missing)
//! - `<if(name)> ... <else> ... <endif>` selects a branch on truthiness
//! - `\<` and `\>` are literal angle brackets

use std::fmt::Write as _;

use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{alt, delimited, eof, preceded, repeat, separated, terminated},
    error::ModalResult,
    stream::{LocatingSlice, Location as _, Stream as _},
    token::{take_till, take_while},
};

use rubric_core::{Attributes, Value};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

type Input<'a> = LocatingSlice<&'a str>;

/// An attribute path such as `message.id`, with the span of its expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    path: Vec<String>,
    span: Span,
}

impl Reference {
    /// Path segments; the first one names the attribute.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    /// Span of the enclosing expression, relative to the template body.
    pub fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Attr(Reference),
    If {
        condition: Reference,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Attr(Vec<String>),
    If(Vec<String>),
    Else,
    EndIf,
}

/// A compiled template body.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Compile a template body, collecting every problem found.
    ///
    /// Spans in the returned diagnostics are relative to `body`.
    pub fn compile(body: &str) -> Result<Self, ParseError> {
        let mut collector = DiagnosticCollector::new();
        let pieces = scan(body, &mut collector);
        let nodes = fold(pieces, &mut collector);
        collector.finish()?;
        Ok(Self { nodes })
    }

    /// Render with the given attributes.
    pub fn render(&self, attributes: &Attributes) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, attributes, &mut out);
        out
    }

    /// Every attribute reference, in source order, including conditions.
    pub fn references(&self) -> Vec<&Reference> {
        let mut references = Vec::new();
        collect_references(&self.nodes, &mut references);
        references
    }
}

enum Piece {
    Text(String),
    Expr(Expr, Span),
}

fn identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn path(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., identifier.map(str::to_string), '.').parse_next(input)
}

fn condition(input: &mut &str) -> ModalResult<Vec<String>> {
    preceded(
        ("if", multispace0, '(', multispace0),
        terminated(path, (multispace0, ')')),
    )
    .parse_next(input)
}

/// Parse the text between `<` and `>`.
fn parse_expr(content: &str) -> Option<Expr> {
    let mut input = content;
    let expr = delimited(
        multispace0,
        alt((
            condition.map(Expr::If),
            path.map(|path| {
                if path.len() == 1 && path[0] == "else" {
                    Expr::Else
                } else if path.len() == 1 && path[0] == "endif" {
                    Expr::EndIf
                } else {
                    Expr::Attr(path)
                }
            }),
        )),
        (multispace0, eof),
    )
    .parse_next(&mut input)
    .ok()?;

    match &expr {
        Expr::Attr(path) if path.iter().any(|s| s == "if") => None,
        _ => Some(expr),
    }
}

fn escape<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    alt(("\\<".value("<"), "\\>".value(">"), '\\'.value("\\"))).parse_next(input)
}

fn text_run<'a>(input: &mut Input<'a>) -> ModalResult<String> {
    repeat(1.., alt((escape, take_till(1.., ['<', '\\']))))
        .fold(String::new, |mut acc, piece: &str| {
            acc.push_str(piece);
            acc
        })
        .parse_next(input)
}

fn expression<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    delimited('<', take_till(0.., ['>']), '>').parse_next(input)
}

fn scan(body: &str, collector: &mut DiagnosticCollector) -> Vec<Piece> {
    let mut input = LocatingSlice::new(body);
    let mut pieces = Vec::new();

    while !input.is_empty() {
        let start = input.current_token_start();
        if let Ok(text) = text_run.parse_next(&mut input) {
            pieces.push(Piece::Text(text));
            continue;
        }

        let checkpoint = input.checkpoint();
        match expression.with_span().parse_next(&mut input) {
            Ok((content, range)) => match parse_expr(content) {
                Some(expr) => pieces.push(Piece::Expr(expr, Span::new(range))),
                None => collector.emit(
                    Diagnostic::error(format!("malformed expression `<{content}>`"))
                        .with_code(ErrorCode::T202)
                        .with_label(Span::new(range), "malformed expression")
                        .with_help(
                            "expected `<name>`, `<name.prop>`, `<if(name)>`, `<else>` or `<endif>`",
                        ),
                ),
            },
            Err(_) => {
                input.reset(&checkpoint);
                collector.emit(
                    Diagnostic::error("unterminated expression")
                        .with_code(ErrorCode::T200)
                        .with_label(Span::new(start..body.len()), "expression starts here")
                        .with_help("add closing `>` or escape the bracket as `\\<`"),
                );
                break;
            }
        }
    }

    pieces
}

struct Frame {
    condition: Reference,
    then: Vec<Node>,
    otherwise: Option<Vec<Node>>,
}

impl Frame {
    fn target(&mut self) -> &mut Vec<Node> {
        match &mut self.otherwise {
            Some(otherwise) => otherwise,
            None => &mut self.then,
        }
    }
}

fn unbalanced(message: &str, span: Span) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(ErrorCode::T201)
        .with_label(span, "unbalanced conditional")
        .with_help("every `<if(...)>` needs one matching `<endif>`")
}

fn fold(pieces: Vec<Piece>, collector: &mut DiagnosticCollector) -> Vec<Node> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for piece in pieces {
        let node = match piece {
            Piece::Text(text) => Node::Text(text),
            Piece::Expr(Expr::Attr(path), span) => Node::Attr(Reference { path, span }),
            Piece::Expr(Expr::If(path), span) => {
                stack.push(Frame {
                    condition: Reference { path, span },
                    then: Vec::new(),
                    otherwise: None,
                });
                continue;
            }
            Piece::Expr(Expr::Else, span) => {
                match stack.last_mut() {
                    Some(frame) if frame.otherwise.is_none() => frame.otherwise = Some(Vec::new()),
                    Some(_) => collector.emit(unbalanced("`<else>` repeated in one conditional", span)),
                    None => collector.emit(unbalanced("`<else>` without matching `<if>`", span)),
                }
                continue;
            }
            Piece::Expr(Expr::EndIf, span) => {
                let Some(frame) = stack.pop() else {
                    collector.emit(unbalanced("`<endif>` without matching `<if>`", span));
                    continue;
                };
                Node::If {
                    condition: frame.condition,
                    then: frame.then,
                    otherwise: frame.otherwise.unwrap_or_default(),
                }
            }
        };

        match stack.last_mut() {
            Some(frame) => frame.target().push(node),
            None => root.push(node),
        }
    }

    for frame in stack {
        collector.emit(unbalanced(
            "`<if>` without matching `<endif>`",
            frame.condition.span,
        ));
    }

    root
}

fn render_nodes(nodes: &[Node], attributes: &Attributes, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Attr(reference) => {
                if let Some(value) = attributes.resolve(reference.path.as_slice()) {
                    let _ = write!(out, "{value}");
                }
            }
            Node::If {
                condition,
                then,
                otherwise,
            } => {
                let truthy = attributes
                    .resolve(condition.path.as_slice())
                    .is_some_and(Value::is_truthy);
                render_nodes(if truthy { then } else { otherwise }, attributes, out);
            }
        }
    }
}

fn collect_references<'t>(nodes: &'t [Node], out: &mut Vec<&'t Reference>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Attr(reference) => out.push(reference),
            Node::If {
                condition,
                then,
                otherwise,
            } => {
                out.push(condition);
                collect_references(then, out);
                collect_references(otherwise, out);
            }
        }
    }
}
