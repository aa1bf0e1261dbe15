//! Lexical analyzer for format group source text.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Parse an escape sequence in a string starting with backslash.
///
/// `\<` and `\>` are kept as-is so the template compiler sees them as
/// literal delimiters.
fn string_escape<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    let escaped: IResult<'a, char> =
        one_of(['"', '\\', 'n', 'r', 't', '<', '>']).parse_next(input);
    if let Ok(c) = escaped {
        return Ok(match c {
            'n' => "\n",
            'r' => "\r",
            't' => "\t",
            '<' => "\\<",
            '>' => "\\>",
            '"' => "\"",
            _ => "\\",
        });
    }

    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        LexerDiagnostic {
            code: ErrorCode::T003,
            message: "invalid escape sequence",
            help: Some("valid escapes: `\\\"`, `\\\\`, `\\n`, `\\r`, `\\t`, `\\<`, `\\>`"),
            start: escape_start,
        },
    )))
}

/// Parse a double-quoted string literal.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let plain = take_while(1.., |c: char| !matches!(c, '"' | '\\' | '\n' | '\r'));
    let string_content =
        repeat(0.., alt((string_escape, plain))).fold(String::new, |mut acc, piece: &str| {
            acc.push_str(piece);
            acc
        });

    let start_pos = input.current_token_start();

    '"'.parse_next(input)
        .map_err(|_: ErrMode<ContextError<LexerDiagnostic>>| {
            ErrMode::Backtrack(ContextError::new())
        })?;

    cut_err(terminated(string_content, '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::T001,
            message: "unterminated string literal",
            help: Some("add closing `\"`"),
            start: start_pos,
        })
        .parse_next(input)
        .map(Token::StringLiteral)
}

/// Parse a `<< ... >>` big string.
///
/// One newline right after `<<` and one right before `>>` are dropped so
/// multi-line bodies can start and end on their own lines.
fn big_string<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    "<<".parse_next(input)?;

    cut_err(terminated(take_until(0.., ">>"), ">>"))
        .context(LexerDiagnostic {
            code: ErrorCode::T004,
            message: "unterminated big string",
            help: Some("add closing `>>`"),
            start: start_pos,
        })
        .map(|body: &str| {
            let body = body
                .strip_prefix("\r\n")
                .or_else(|| body.strip_prefix('\n'))
                .unwrap_or(body);
            let body = body
                .strip_suffix("\r\n")
                .or_else(|| body.strip_suffix('\n'))
                .unwrap_or(body);
            Token::BigString(body.to_string())
        })
        .parse_next(input)
}

/// Parse line comment starting with '//'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse block comment `/* ... */`
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    "/*".parse_next(input)?;

    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(LexerDiagnostic {
            code: ErrorCode::T005,
            message: "unterminated block comment",
            help: Some("add closing `*/`"),
            start: start_pos,
        })
        .map(Token::BlockComment)
        .parse_next(input)
}

/// Parse identifiers
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse punctuation tokens
fn punctuation<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        literal("::=").value(Token::Define),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, etc. but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,   // Must come before any other '/'
        block_comment,
        string_literal,
        big_string,
        identifier,
        punctuation,
        newline,        // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => {
                    self.tokens.push(token);
                }
                Err(e) => {
                    let error_pos = input.current_token_start();

                    let diagnostic = Self::convert_err_mode(e, error_pos);
                    self.diagnostics.emit(diagnostic);

                    // Skip one character and try again from there.
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to T002 (unexpected character) if no diagnostic context is
    /// found.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::T002)
            .with_label(span, ErrorCode::T002.description())
    }
}

/// Tokenize format source text, collecting every lexer error.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully lexed
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let located_input = LocatingSlice::new(input);
    let mut lexer = Lexer::new();
    lexer.tokenize(located_input);
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_token(input: &str) -> Token<'_> {
        let mut located_input = LocatingSlice::new(input);
        let result = positioned_token(&mut located_input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
        result.unwrap().token
    }

    fn error_codes(input: &str) -> Vec<ErrorCode> {
        tokenize(input)
            .expect_err("expected lexer errors")
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(single_token("location"), Token::Identifier("location"));
        assert_eq!(single_token("_x1"), Token::Identifier("_x1"));
        assert_eq!(
            single_token("wantsSingleLineMessage"),
            Token::Identifier("wantsSingleLineMessage")
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(single_token("::="), Token::Define);
        assert_eq!(single_token("("), Token::LeftParen);
        assert_eq!(single_token(")"), Token::RightParen);
        assert_eq!(single_token(","), Token::Comma);
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            single_token("\"<file>:<line>\""),
            Token::StringLiteral("<file>:<line>".to_string())
        );
        assert_eq!(single_token("\"\""), Token::StringLiteral(String::new()));
        assert_eq!(
            single_token(r#""say \"hi\"\n""#),
            Token::StringLiteral("say \"hi\"\n".to_string())
        );
    }

    #[test]
    fn test_string_keeps_delimiter_escapes() {
        assert_eq!(
            single_token(r#""a \< b""#),
            Token::StringLiteral("a \\< b".to_string())
        );
    }

    #[test]
    fn test_big_string_strips_one_newline_each_side() {
        assert_eq!(
            single_token("<<\n<type>: <message>\n>>"),
            Token::BigString("<type>: <message>".to_string())
        );
        assert_eq!(
            single_token("<<\n\nline\n\n>>"),
            Token::BigString("\nline\n".to_string())
        );
        assert_eq!(single_token("<<x>>"), Token::BigString("x".to_string()));
    }

    #[test]
    fn test_comments() {
        assert_eq!(single_token("// note"), Token::LineComment(" note"));
        assert_eq!(single_token("/* a\nb */"), Token::BlockComment(" a\nb "));
    }

    #[test]
    fn test_full_definition() {
        let tokens = tokenize(r#"message(id, text) ::= "(<id>) <text>""#).unwrap();
        let kinds: Vec<_> = tokens
            .iter()
            .map(|t| &t.token)
            .filter(|t| !t.is_trivia())
            .collect();

        assert_eq!(kinds.len(), 8);
        assert!(matches!(kinds[0], Token::Identifier("message")));
        assert!(matches!(kinds[1], Token::LeftParen));
        assert!(matches!(kinds[3], Token::Comma));
        assert!(matches!(kinds[5], Token::RightParen));
        assert!(matches!(kinds[6], Token::Define));
        assert!(matches!(kinds[7], Token::StringLiteral(_)));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("a ::=").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].span, Span::new(0..1));
        assert_eq!(tokens[1].span, Span::new(1..2));
        assert_eq!(tokens[2].span, Span::new(2..5));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("a() ::= \"open").unwrap_err();
        let first = &err.diagnostics()[0];
        assert_eq!(first.code(), Some(ErrorCode::T001));
        assert_eq!(first.primary_span().map(|s| s.start()), Some(8));
    }

    #[test]
    fn test_invalid_escape() {
        assert!(error_codes(r#"a() ::= "bad \q""#).contains(&ErrorCode::T003));
    }

    #[test]
    fn test_unterminated_big_string_and_comment() {
        assert_eq!(error_codes("a() ::= << never closed")[0], ErrorCode::T004);
        assert_eq!(error_codes("/* never closed")[0], ErrorCode::T005);
    }

    #[test]
    fn test_unexpected_character_recovers() {
        let codes = error_codes("a() ::= \"x\" $ b() ::= \"y\" #");
        assert_eq!(codes, vec![ErrorCode::T002, ErrorCode::T002]);
    }
}
