use rubric_core::{Attributes, Fragment};
use rubric_template::{ErrorCode, parse_group};

const GNU: &str = r#"
// GNU-style messages
location(file, line, column) ::= "<file>:<line>:<column>:"

message(id, text) ::= "<text> [error <id>]"

report(location, message, type) ::= "<location> <type>: <message>"

wantsSingleLineMessage() ::= "true"
"#;

#[test]
fn test_format_group_renders_full_report() {
    let group = parse_group(GNU).expect("Failed to parse group");

    let location_attrs = Attributes::new()
        .with("file", "T.g4")
        .with("line", 3u32)
        .with("column", 7u32);
    let location = group.render("location", &location_attrs).unwrap();

    let message_attrs = Attributes::new().with("id", 50u32).with("text", "syntax error");
    let message = group.render("message", &message_attrs).unwrap();

    let report_attrs = Attributes::new()
        .with("type", "error")
        .with("location", Fragment::new(location, location_attrs))
        .with("message", Fragment::new(message, message_attrs));

    assert_eq!(
        group.render("report", &report_attrs).as_deref(),
        Some("T.g4:3:7: error: syntax error [error 50]")
    );
    assert_eq!(
        group.render("wantsSingleLineMessage", &Attributes::new()).as_deref(),
        Some("true")
    );
}

#[test]
fn test_big_string_report_with_conditionals() {
    let source = r#"
        report(location, message, type) ::= <<
        <if(location)><location> <endif><type>(<message.id>): <message.text>
        >>
    "#;
    let group = parse_group(source).expect("Failed to parse group");

    let message = Fragment::new(
        "",
        Attributes::new().with("id", 9u32).with("text", "bad"),
    );
    let attrs = Attributes::new().with("type", "warning").with("message", message);

    assert_eq!(
        group.render("report", &attrs).unwrap().trim(),
        "warning(9): bad"
    );
}

#[test]
fn test_corrupted_group_describes_every_problem() {
    let source = "location(file ::= \"<file>\"\nmessage() ::= \"oops";
    let err = parse_group(source).expect_err("expected errors");

    let codes: Vec<ErrorCode> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::T001]);

    let listing = err.describe(source);
    assert!(listing.starts_with("2:15: error[T001]"), "{listing}");
}

#[test]
fn test_syntax_error_after_clean_lex() {
    let source = "location(file ::= \"<file>\"";
    let err = parse_group(source).expect_err("expected errors");

    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::T100));
    assert!(err.describe(source).starts_with("1:15: error[T100]"));
}
