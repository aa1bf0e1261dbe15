//! Parser for format group tokens.
//!
//! Turns the token stream from the [`lexer`](super::lexer) into a list of
//! [`Definition`]s. The public entry point is [`build_definitions`].

use winnow::{
    Parser as _,
    combinator::{opt, preceded, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types::Definition,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    StartOffset(usize),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Parse whitespace and comments
fn trivia<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn trivia0<'src>(input: &mut Input<'src>) -> IResult<()> {
    winnow::combinator::repeat(0.., trivia).parse_next(input)
}

/// Parse a single punctuation token, skipping leading trivia
fn punct<'src>(
    expected: Token<'static>,
    label: &'static str,
) -> impl FnMut(&mut Input<'src>) -> IResult<()> {
    move |input: &mut Input<'src>| {
        preceded(
            trivia0,
            any.verify(|token: &PositionedToken<'_>| token.token == expected)
                .void(),
        )
        .context(Context::Label(label))
        .parse_next(input)
    }
}

/// Parse an identifier with span preservation
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    preceded(
        trivia0,
        any.verify_map(|token: &PositionedToken<'src>| match &token.token {
            Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
            _ => None,
        }),
    )
    .context(Context::Label("identifier"))
    .parse_next(input)
}

/// Parse a template body: a string or a big string
fn body<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    preceded(
        trivia0,
        any.verify_map(|token: &PositionedToken<'src>| match &token.token {
            Token::StringLiteral(text) | Token::BigString(text) => {
                Some(Spanned::new(text.clone(), token.span))
            }
            _ => None,
        }),
    )
    .context(Context::Label("template body"))
    .parse_next(input)
}

/// Parse a formal parameter list: `(a, b, c)`
fn params<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<&'src str>>> {
    punct(Token::LeftParen, "`(`").parse_next(input)?;
    let params = opt(separated(1.., identifier, punct(Token::Comma, "`,`")))
        .parse_next(input)?
        .unwrap_or_default();
    punct(Token::RightParen, "`)`").parse_next(input)?;
    Ok(params)
}

/// Parse one `name(params) ::= body` definition
fn definition<'src>(input: &mut Input<'src>) -> IResult<Definition<'src>> {
    let name = identifier.parse_next(input)?;

    // Once a name is seen the rest of the definition is required
    cut_err(input, |input| {
        let params = params(input)?;
        punct(Token::Define, "`::=`").parse_next(input)?;
        let body = body(input)?;
        Ok(Definition { name, params, body })
    })
}

/// Parse a whole group: definitions separated by trivia
fn group<'src>(input: &mut Input<'src>) -> IResult<Vec<Definition<'src>>> {
    let mut definitions = Vec::new();
    loop {
        trivia0.parse_next(input)?;
        if input.eof_offset() == 0 {
            return Ok(definitions);
        }
        let start_remaining = input.eof_offset();
        match definition.parse_next(input) {
            Ok(definition) => definitions.push(definition),
            Err(ErrMode::Backtrack(mut e)) => {
                e.push(Context::StartOffset(start_remaining));
                return Err(ErrMode::Cut(e));
            }
            Err(e) => return Err(e),
        }
    }
}

/// Convert winnow errors to a [`Diagnostic`]
///
/// The primary label sits on the first meaningful token at the failure
/// position; a secondary label marks where the failed definition started.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let end_offset = tokens.len() - current_remaining;
    let meaningful_at = |from: usize| {
        tokens[from.min(tokens.len())..]
            .iter()
            .find(|t| !t.token.is_trivia())
    };
    let last_span = tokens.last().map(|t| t.span).unwrap_or_default();

    match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => {
            let start_offset = e
                .context()
                .find_map(|ctx| match ctx {
                    Context::StartOffset(n) => Some(tokens.len() - n),
                    _ => None,
                })
                .unwrap_or(end_offset);

            let expected: Vec<&str> = e
                .context()
                .filter_map(|ctx| match ctx {
                    Context::Label(label) => Some(*label),
                    _ => None,
                })
                .collect();

            let found = meaningful_at(end_offset);
            let (found_text, found_span) = match found {
                Some(token) => (token.token.to_string(), token.span),
                None => ("end of input".to_string(), Span::new(last_span.end()..last_span.end())),
            };
            let start_span = meaningful_at(start_offset)
                .map(|t| t.span)
                .filter(|span| span.start() < found_span.start());

            let message = match expected.first() {
                Some(label) => format!("expected {label}, found {found_text}"),
                None => format!("unexpected {found_text}"),
            };

            let diagnostic = if found.is_none() {
                Diagnostic::error(format!("incomplete input: {message}"))
                    .with_code(ErrorCode::T101)
                    .with_label(found_span, "definition ends early")
            } else {
                Diagnostic::error(message)
                    .with_code(ErrorCode::T100)
                    .with_label(found_span, "unexpected token")
            };
            let diagnostic = match start_span {
                Some(span) => diagnostic.with_secondary_label(span, "in this definition"),
                None => diagnostic,
            };
            diagnostic.with_help("definitions have the form `name(params) ::= \"body\"`")
        }
        ErrMode::Incomplete(_) => Diagnostic::error("incomplete input, more tokens expected")
            .with_code(ErrorCode::T101)
            .with_label(last_span, "incomplete")
            .with_help("ensure input is complete"),
    }
}

/// Build definitions from tokens
pub fn build_definitions<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Vec<Definition<'src>>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    group.parse_next(&mut token_slice).map_err(|e| {
        let current_remaining = token_slice.eof_offset();
        convert_error(e, tokens, current_remaining)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn definitions(source: &str) -> Vec<(String, Vec<String>, String)> {
        let tokens = tokenize(source).expect("Failed to tokenize input");
        build_definitions(&tokens)
            .expect("Failed to parse definitions")
            .into_iter()
            .map(|d| {
                (
                    d.name.inner().to_string(),
                    d.params.iter().map(|p| p.inner().to_string()).collect(),
                    d.body.into_inner(),
                )
            })
            .collect()
    }

    fn parse_error(source: &str) -> Diagnostic {
        let tokens = tokenize(source).expect("Failed to tokenize input");
        build_definitions(&tokens).expect_err("expected a parse error")
    }

    #[test]
    fn test_single_definition() {
        let defs = definitions(r#"location(file, line, column) ::= "<file>:<line>:<column>:""#);

        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].0, "location");
        assert_eq!(defs[0].1, ["file", "line", "column"]);
        assert_eq!(defs[0].2, "<file>:<line>:<column>:");
    }

    #[test]
    fn test_empty_parameter_list() {
        let defs = definitions(r#"wantsSingleLineMessage() ::= "false""#);
        assert!(defs[0].1.is_empty());
    }

    #[test]
    fn test_definitions_with_comments_and_big_strings() {
        let source = r#"
            // the default format
            message(id, text) ::= "(<id>) <text>"
            /* multi-line
               report */
            report(location, message, type) ::= <<
            <type>: <message>
            >>
        "#;
        let defs = definitions(source);

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[1].0, "report");
        assert_eq!(defs[1].2.trim(), "<type>: <message>");
    }

    #[test]
    fn test_empty_group() {
        assert!(definitions("").is_empty());
        assert!(definitions("  // nothing here\n").is_empty());
    }

    #[test]
    fn test_definition_span() {
        let tokens = tokenize("a() ::= \"x\"").unwrap();
        let defs = build_definitions(&tokens).unwrap();
        assert_eq!(defs[0].name.span(), Span::new(0..1));
        assert_eq!(defs[0].body.span(), Span::new(8..11));
    }

    #[test]
    fn test_missing_define() {
        let diag = parse_error(r#"message(id) "(<id>)""#);
        assert_eq!(diag.code(), Some(ErrorCode::T100));
        assert!(diag.message().contains("`::=`"), "{}", diag.message());
    }

    #[test]
    fn test_missing_parameter_list() {
        let diag = parse_error(r#"message ::= "x""#);
        assert_eq!(diag.code(), Some(ErrorCode::T100));
        assert!(diag.message().contains("`(`"), "{}", diag.message());
    }

    #[test]
    fn test_stray_body() {
        let diag = parse_error(r#"a() ::= "x" "y""#);
        assert_eq!(diag.code(), Some(ErrorCode::T100));
    }

    #[test]
    fn test_truncated_definition() {
        let diag = parse_error("report(location, message");
        assert_eq!(diag.code(), Some(ErrorCode::T101));
    }
}
